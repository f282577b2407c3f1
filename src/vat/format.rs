//! VAT number normalization.

use crate::core::{FinanceError, Result};

/// Trim the input, then drop every interior space and period.
///
/// `"BE 0836.157.420"` becomes `"BE0836157420"`.
pub fn sanitize_vat_number(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != ' ' && *c != '.').collect()
}

/// Split a sanitized VAT number into its upper-cased country prefix and number.
///
/// # Errors
///
/// [`FinanceError::TooShort`] for fewer than 3 characters.
pub fn split_vat_number(vat_number: &str) -> Result<(String, String)> {
    if vat_number.chars().count() < 3 {
        return Err(FinanceError::TooShort(vat_number.to_string()));
    }
    let split = vat_number
        .char_indices()
        .nth(2)
        .map_or(vat_number.len(), |(i, _)| i);
    let (country, number) = vat_number.split_at(split);
    Ok((country.to_uppercase(), number.to_uppercase()))
}
