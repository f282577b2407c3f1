//! The reference-rate table and the nested-cube feed parser.

use chrono::NaiveDate;
use quick_xml::events::BytesStart;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::xml::{XmlVisitor, attribute, malformed, walk};
use crate::core::{FinanceError, Result};

/// Rates of 1 EUR expressed in each listed currency.
///
/// Always holds `EUR -> 1.0` once built from a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    date: Option<NaiveDate>,
    rates: BTreeMap<String, f64>,
}

impl ExchangeRateTable {
    /// Reference date of the feed, when it carries one.
    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn get(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.rates.contains_key(currency)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Currency codes and rates, ordered by code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    /// Convert `value` from one currency to another through EUR.
    ///
    /// Lookups are exact: codes are stored upper-case.
    ///
    /// # Errors
    ///
    /// [`FinanceError::UnknownCurrency`] if either code is not in the table.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64> {
        let from_rate = self
            .get(from)
            .ok_or_else(|| FinanceError::UnknownCurrency(from.to_string()))?;
        let to_rate = self
            .get(to)
            .ok_or_else(|| FinanceError::UnknownCurrency(to.to_string()))?;
        if from == to {
            return Ok(value);
        }
        Ok(value / from_rate * to_rate)
    }
}

/// Collects every `Cube` carrying a currency/rate pair, at any depth.
#[derive(Default)]
struct CubeCollector {
    date: Option<NaiveDate>,
    rates: BTreeMap<String, f64>,
}

impl XmlVisitor for CubeCollector {
    fn open(&mut self, name: &str, element: &BytesStart<'_>) -> Result<()> {
        if name != "Cube" {
            return Ok(());
        }

        if let Some(time) = attribute(element, "time")? {
            let date = NaiveDate::parse_from_str(time.trim(), "%Y-%m-%d")
                .map_err(|e| malformed(format!("invalid cube time '{time}': {e}")))?;
            self.date = Some(date);
        }

        if let (Some(currency), Some(rate)) =
            (attribute(element, "currency")?, attribute(element, "rate")?)
        {
            let value: f64 = rate
                .trim()
                .parse()
                .map_err(|e| malformed(format!("invalid rate '{rate}' for {currency}: {e}")))?;
            self.rates.insert(currency.trim().to_uppercase(), value);
        }
        Ok(())
    }
}

/// Parse the ECB daily feed into a rate table.
///
/// `EUR -> 1.0` is always present and cannot be overridden by the feed.
///
/// # Errors
///
/// [`FinanceError::MalformedResponse`] when the body is not a well-formed XML
/// document or a rate is not a number.
pub fn parse_rate_feed(bytes: &[u8]) -> Result<ExchangeRateTable> {
    let mut cubes = CubeCollector::default();
    walk(bytes, &mut cubes)?;

    let mut rates = cubes.rates;
    rates.insert("EUR".into(), 1.0);

    Ok(ExchangeRateTable {
        date: cubes.date,
        rates,
    })
}
