//! VAT number validation through the EU VIES SOAP service.
//!
//! # Example
//!
//! ```ignore
//! use eurofin::vat::*;
//!
//! // Normalization only (no network)
//! assert_eq!(sanitize_vat_number("BE 0836.157.420"), "BE0836157420");
//!
//! // VIES check (async, requires network)
//! let client = VatValidationClient::with_defaults()?;
//! let info = client.check_vat("BE 0836.157.420").await?;
//! assert!(info.is_valid);
//! ```

mod envelope;
mod format;
mod vies;

pub use envelope::{
    CheckVatResponse, SoapFault, SoapResponse, build_check_vat_envelope,
    parse_check_vat_response,
};
pub use format::{sanitize_vat_number, split_vat_number};
pub use vies::{DEFAULT_VIES_URL, VatInfo, VatValidationClient};
