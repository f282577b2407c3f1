//! EU VIES SOAP client for VAT number validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::envelope::{
    CheckVatResponse, SoapResponse, build_check_vat_envelope, parse_check_vat_response,
};
use super::format::{sanitize_vat_number, split_vat_number};
use crate::core::{EndpointConfig, FinanceError, RequestExecutor, Result, parse_url};

/// SOAP endpoint of the VIES `checkVatService`.
pub const DEFAULT_VIES_URL: &str =
    "http://ec.europa.eu/taxation_customs/vies/services/checkVatService";

const SOAP_CONTENT_TYPE: &str = "text/xml;charset=UTF-8";

/// VIES answers this instead of a fault when it rejects the number outright.
const INVALID_INPUT_MARKER: &[u8] = b"INVALID_INPUT";

/// Result of a VIES VAT number check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatInfo {
    pub country_code: String,
    /// The number part, without the country prefix.
    pub vat_number: String,
    /// Whether the number is currently registered.
    pub is_valid: bool,
    /// Registered name; empty when not valid or not disclosed.
    pub name: String,
    /// Registered address; empty when not valid or not disclosed.
    pub address: String,
    /// Date VIES handled the request.
    pub request_date: Option<NaiveDate>,
}

impl From<CheckVatResponse> for VatInfo {
    fn from(resp: CheckVatResponse) -> Self {
        // VIES fills undisclosed trader details with "---"
        let disclosed = |s: String| if s.trim() == "---" { String::new() } else { s };
        let (name, address) = if resp.valid {
            (disclosed(resp.name), disclosed(resp.address))
        } else {
            (String::new(), String::new())
        };

        Self {
            country_code: resp.country_code,
            vat_number: resp.vat_number,
            is_valid: resp.valid,
            name,
            address,
            request_date: resp
                .request_date
                .as_deref()
                .and_then(|d| d.trim().get(..10))
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        }
    }
}

/// Validates VAT numbers against VIES.
#[derive(Debug, Clone)]
pub struct VatValidationClient {
    config: EndpointConfig,
    executor: RequestExecutor,
}

impl VatValidationClient {
    pub fn new(config: EndpointConfig) -> Result<Self> {
        let executor = RequestExecutor::new(config.timeout)?;
        Ok(Self { config, executor })
    }

    /// Client for [`DEFAULT_VIES_URL`] with the default timeout.
    pub fn with_defaults() -> Result<Self> {
        Self::new(EndpointConfig::new(DEFAULT_VIES_URL))
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Check a VAT number, country prefix included (e.g. `"BE 0836.157.420"`).
    ///
    /// A number VIES knows but reports as not registered is a successful
    /// result with `is_valid == false`.
    ///
    /// # Errors
    ///
    /// Returns `FinanceError::TooShort` before any request when the sanitized
    /// number has fewer than 3 characters,
    /// `FinanceError::NotValid` when VIES flags the input as invalid,
    /// `FinanceError::ServiceFault` on a SOAP fault,
    /// `FinanceError::MalformedResponse` on unexpected response formats,
    /// and the executor's transport errors.
    pub async fn check_vat(&self, vat_number: &str) -> Result<VatInfo> {
        let sanitized = sanitize_vat_number(vat_number);
        let (country_code, number) = split_vat_number(&sanitized)?;
        let envelope = build_check_vat_envelope(&country_code, &number)?;

        let url = parse_url(&self.config.url)?;
        let body = self.executor.post(url, SOAP_CONTENT_TYPE, envelope).await?;

        if body
            .windows(INVALID_INPUT_MARKER.len())
            .any(|w| w == INVALID_INPUT_MARKER)
        {
            debug!(%country_code, %number, "VIES rejected the number as invalid input");
            return Err(FinanceError::NotValid);
        }

        match parse_check_vat_response(&body)? {
            SoapResponse::Fault(fault) => {
                warn!(code = %fault.code, message = %fault.message, "VIES returned a SOAP fault");
                Err(FinanceError::ServiceFault(fault.message))
            }
            SoapResponse::Success(resp) => {
                let info = VatInfo::from(resp);
                debug!(country_code = %info.country_code, vat_number = %info.vat_number, valid = info.is_valid, "VIES check done");
                Ok(info)
            }
        }
    }
}
