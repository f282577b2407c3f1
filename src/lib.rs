//! # eurofin
//!
//! Small async clients for three public European finance services:
//! the ECB daily euro reference rates, the Belgian IBANBIC account lookup,
//! and the EU VIES VAT number validation service.
//!
//! Every operation is one request/response round trip. Failures at any
//! step (transport, body read, XML parsing, service faults) surface as a
//! [`FinanceError`]; nothing is retried or cached.
//!
//! ## Quick Start
//!
//! ```ignore
//! use eurofin::rates::RateFeedClient;
//! use eurofin::vat::VatValidationClient;
//!
//! let rates = RateFeedClient::with_defaults()?;
//! let usd = rates.convert_rate(100.0, "EUR", "USD").await?;
//!
//! let vies = VatValidationClient::with_defaults()?;
//! let info = vies.check_vat("BE 0836.157.420").await?;
//! println!("{} valid={}", info.name, info.is_valid);
//! ```
//!
//! Endpoints and timeouts are set per client through [`EndpointConfig`]:
//!
//! ```ignore
//! use std::time::Duration;
//! use eurofin::EndpointConfig;
//! use eurofin::iban::{BankAccountClient, DEFAULT_IBANBIC_URL};
//!
//! let client = BankAccountClient::new(
//!     EndpointConfig::new(DEFAULT_IBANBIC_URL).with_timeout(Duration::from_secs(2)),
//! )?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rates` (default) | ECB reference-rate feed and currency conversion |
//! | `iban` (default) | BBAN to bank name, IBAN and BIC lookup |
//! | `vat` (default) | VIES VAT number validation |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "rates")]
pub mod rates;

#[cfg(feature = "iban")]
pub mod iban;

#[cfg(feature = "vat")]
pub mod vat;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
