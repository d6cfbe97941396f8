//! Stay period and nightly pricing

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

use crate::shared::types::errors::{ClientError, ClientResult};

const MS_PER_DAY: i64 = 86_400_000;

/// A validated `[check_in, check_out)` range with `check_in < check_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StayPeriod {
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
}

impl StayPeriod {
    pub fn new(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> ClientResult<Self> {
        if check_out <= check_in {
            return Err(ClientError::Validation(
                "check-out must be after check-in".into(),
            ));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Calendar dates, both taken at midnight UTC.
    pub fn from_dates(check_in: NaiveDate, check_out: NaiveDate) -> ClientResult<Self> {
        Self::new(midnight(check_in), midnight(check_out))
    }

    /// Parse two user-supplied dates (`YYYY-MM-DD` or RFC 3339).
    pub fn parse(check_in: &str, check_out: &str) -> ClientResult<Self> {
        Self::new(parse_instant(check_in)?, parse_instant(check_out)?)
    }

    pub fn check_in(&self) -> DateTime<Utc> {
        self.check_in
    }

    pub fn check_out(&self) -> DateTime<Utc> {
        self.check_out
    }

    /// Whole nights billed: a partial day counts as a full night.
    pub fn nights(&self) -> i64 {
        let ms = (self.check_out - self.check_in).num_milliseconds();
        (ms + MS_PER_DAY - 1) / MS_PER_DAY
    }
}

/// `nights × nightly_price`, rejecting negative prices.
pub fn total_price(nightly_price: Decimal, period: &StayPeriod) -> ClientResult<Decimal> {
    if nightly_price < Decimal::ZERO {
        return Err(ClientError::Validation(format!(
            "nightly price must not be negative (got {nightly_price})"
        )));
    }
    Decimal::from(period.nights())
        .checked_mul(nightly_price)
        .ok_or_else(|| {
            ClientError::Validation(format!(
                "total price for {} nights at {nightly_price} is out of range",
                period.nights()
            ))
        })
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Accepts `2024-06-01` as well as `2024-06-01T14:00:00Z`.
pub fn parse_instant(value: &str) -> ClientResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(midnight)
        .map_err(|e| ClientError::Validation(format!("invalid date '{value}': {e}")))
}

/// Serde helper for backend dates that may come as plain dates or instants.
pub(crate) fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_instant_opt<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_instant(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
