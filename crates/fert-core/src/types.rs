use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mint-time attributes of a single Fertilizer id.
///
/// `end_progress` always equals `id`: the id is the BPF value at which the
/// token is fully repaid. Both fields are kept because upstream sources report
/// them separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    /// Token id, also the repayment ceiling.
    #[serde(deserialize_with = "lenient::u64")]
    pub id: u64,
    /// Number of units minted at this id.
    #[serde(default, deserialize_with = "lenient::u64")]
    pub supply: u64,
    /// Reward multiplier at mint time (5 means 500%).
    #[serde(deserialize_with = "lenient::f64")]
    pub humidity: f64,
    /// Global progress counter at mint time.
    #[serde(alias = "startBpf", deserialize_with = "lenient::u64")]
    pub start_progress: u64,
    /// Global progress value at which the token is fully repaid.
    #[serde(alias = "endBpf", deserialize_with = "lenient::u64")]
    pub end_progress: u64,
    /// Season in which the id was minted.
    #[serde(deserialize_with = "lenient::u32")]
    pub season: u32,
}

/// Per-token figures computed against the current global progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    /// Progress still owed to this token, floored at zero.
    pub remaining: u64,
    /// Share of the token's range already covered. Not clamped to `[0, 1]`.
    pub completion: f64,
    /// Time the metrics were computed, when the caller records it.
    pub observed_at: Option<DateTime<Utc>>,
}

impl DerivedMetrics {
    /// Stamps the metrics with the observation time.
    pub fn observed(mut self, at: DateTime<Utc>) -> Self {
        self.observed_at = Some(at);
        self
    }

    /// Completion expressed as a percentage (unclamped).
    pub fn percent(&self) -> f64 {
        self.completion * 100.0
    }
}

/// Subgraph numbers arrive as JSON strings (BigInt/BigDecimal) or as plain
/// numbers depending on the field; both forms are accepted.
mod lenient {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(u64),
        Float(f64),
        Text(String),
    }

    pub fn u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Number::deserialize(deserializer)? {
            Number::Int(value) => Ok(value),
            Number::Float(value) => Err(D::Error::custom(format!(
                "expected a non-negative integer, found {value}"
            ))),
            Number::Text(text) => text
                .trim()
                .parse::<u64>()
                .map_err(|err| D::Error::custom(format!("invalid integer {text:?}: {err}"))),
        }
    }

    pub fn u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = u64(deserializer)?;
        u32::try_from(value).map_err(|_| D::Error::custom(format!("{value} exceeds u32")))
    }

    pub fn f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Number::deserialize(deserializer)? {
            Number::Int(value) => Ok(value as f64),
            Number::Float(value) => Ok(value),
            Number::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|err| D::Error::custom(format!("invalid decimal {text:?}: {err}"))),
        }
    }
}
