//! ECB euro foreign exchange reference rates.
//!
//! Fetches the daily reference-rate feed and converts amounts between any
//! two currencies it lists, using EUR as the pivot.
//!
//! # Example
//!
//! ```ignore
//! use eurofin::rates::*;
//!
//! let client = RateFeedClient::with_defaults()?;
//!
//! let table = client.fetch_rates().await?;
//! assert_eq!(table.get("EUR"), Some(1.0));
//!
//! // Re-fetches the feed on every call
//! let usd = client.convert_rate(100.0, "EUR", "USD").await?;
//! ```

mod client;
mod feed;

pub use client::{DEFAULT_RATES_URL, RateFeedClient};
pub use feed::{ExchangeRateTable, parse_rate_feed};
