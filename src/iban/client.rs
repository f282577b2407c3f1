//! HTTP client for the IBANBIC account lookup service.

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::parse::{parse_iban_bic, service_exception};
use crate::core::xml::parse_string_element;
use crate::core::{EndpointConfig, FinanceError, RequestExecutor, Result, parse_url};

/// Base URL of the public IBANBIC web service.
pub const DEFAULT_IBANBIC_URL: &str = "https://www.ibanbic.be/IBANBIC.asmx";

const BANK_NAME_ACTION: &str = "BBANtoBANKNAME";
const IBAN_BIC_ACTION: &str = "BBANtoIBANandBIC";

/// Bank details of a Belgian account number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccountInfo {
    /// The Belgian Basic Bank Account Number as queried.
    pub account_number: String,
    /// Name of the bank that issued the account.
    pub bank_name: String,
    pub iban: String,
    pub bic: String,
}

/// Resolves account numbers through two sequential lookups.
#[derive(Debug, Clone)]
pub struct BankAccountClient {
    config: EndpointConfig,
    executor: RequestExecutor,
}

impl BankAccountClient {
    pub fn new(config: EndpointConfig) -> Result<Self> {
        let executor = RequestExecutor::new(config.timeout)?;
        Ok(Self { config, executor })
    }

    /// Client for [`DEFAULT_IBANBIC_URL`] with the default timeout.
    pub fn with_defaults() -> Result<Self> {
        Self::new(EndpointConfig::new(DEFAULT_IBANBIC_URL))
    }

    pub fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Look up bank name, IBAN and BIC of a Belgian account number.
    ///
    /// Both lookups must succeed; no partial result is ever returned.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty number (no request is made),
    /// `ServiceFault` when the service answers with an exception,
    /// `ServiceProtocol` when the IBAN/BIC value has no `#` separator,
    /// plus the transport and parse errors of each lookup.
    pub async fn check_account(&self, account_number: &str) -> Result<BankAccountInfo> {
        let account_number = account_number.trim();
        if account_number.is_empty() {
            return Err(FinanceError::InvalidInput(
                "bank account number is empty".into(),
            ));
        }

        let bank_name = self.lookup(BANK_NAME_ACTION, account_number).await?;
        let composite = self.lookup(IBAN_BIC_ACTION, account_number).await?;
        let (iban, bic) = parse_iban_bic(&composite)?;

        Ok(BankAccountInfo {
            account_number: account_number.to_string(),
            bank_name,
            iban,
            bic,
        })
    }

    async fn lookup(&self, action: &str, value: &str) -> Result<String> {
        let url = self.action_url(action, value)?;
        let body = self.executor.get(url).await?;

        if let Some(message) = service_exception(&body) {
            warn!(action, %message, "IBANBIC service returned an exception");
            return Err(FinanceError::ServiceFault(message));
        }

        let value = parse_string_element(&body)?;
        debug!(action, %value, "lookup succeeded");
        Ok(value)
    }

    /// `{base}/{action}?Value={value}`, with the value form-encoded.
    fn action_url(&self, action: &str, value: &str) -> Result<Url> {
        let mut url = parse_url(&self.config.url)?;
        url.path_segments_mut()
            .map_err(|()| {
                FinanceError::ServiceUnreachable(format!(
                    "'{}' cannot be used as a base URL",
                    self.config.url
                ))
            })?
            .pop_if_empty()
            .push(action);
        url.query_pairs_mut().clear().append_pair("Value", value);
        Ok(url)
    }
}
