//! Belgian bank account lookup: BBAN to bank name, IBAN and BIC.
//!
//! # Example
//!
//! ```ignore
//! use eurofin::iban::*;
//!
//! let client = BankAccountClient::with_defaults()?;
//! let info = client.check_account("738120256174").await?;
//! assert_eq!(info.bank_name, "KBC Bank");
//! assert_eq!(info.iban, "BE16 7381 2025 6174");
//! assert_eq!(info.bic, "KRED BE BB");
//! ```

mod client;
mod parse;

pub use client::{BankAccountClient, BankAccountInfo, DEFAULT_IBANBIC_URL};
pub use parse::parse_iban_bic;
