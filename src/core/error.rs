use thiserror::Error;

/// Errors returned by the rate feed, account lookup and VIES clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FinanceError {
    /// Connection refused, DNS failure, unparseable URL or timeout exceeded.
    #[error("service unreachable: {0}")]
    ServiceUnreachable(String),

    /// The response body could not be fully read.
    #[error("failed to read response body: {0}")]
    ResponseRead(String),

    /// The body was read but is not XML of the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A caller-supplied argument failed a precondition.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The sanitized VAT number cannot be split into country code and number.
    #[error("VAT number is too short: '{0}'")]
    TooShort(String),

    /// A currency code is not present in the fetched rate table.
    #[error("unknown currency: '{0}'")]
    UnknownCurrency(String),

    /// VIES flagged the VAT number as invalid input.
    #[error("VAT number is not valid")]
    NotValid,

    /// The remote service reported a fault.
    #[error("service returned an error: {0}")]
    ServiceFault(String),

    /// The response parsed but violates the service's value conventions.
    #[error("service protocol error: {0}")]
    ServiceProtocol(String),
}

pub type Result<T, E = FinanceError> = std::result::Result<T, E>;
