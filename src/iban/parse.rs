//! Response conventions of the IBANBIC lookup service.

use crate::core::{FinanceError, Result};

/// Split the service's composite `IBAN#BIC` value on the first `#`.
///
/// # Errors
///
/// [`FinanceError::ServiceProtocol`] if the value holds no `#`.
pub fn parse_iban_bic(value: &str) -> Result<(String, String)> {
    value
        .split_once('#')
        .map(|(iban, bic)| (iban.to_string(), bic.to_string()))
        .ok_or_else(|| {
            FinanceError::ServiceProtocol(format!(
                "failed to get IBAN and BIC from '{value}': missing '#' separator"
            ))
        })
}

/// The service reports failures as a .NET exception dump with a 200 status.
/// Returns the first line of such a body.
pub(super) fn service_exception(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    if !text.contains("Exception") {
        return None;
    }
    Some(text.lines().next().unwrap_or_default().trim().to_string())
}
