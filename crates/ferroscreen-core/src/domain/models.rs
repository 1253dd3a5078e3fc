use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::TradingDay;

/// One row of the market-data listing.
///
/// Every field tolerates being missing or `null` on the wire: price fields fall
/// back to `0`, `symbol` to an empty string, and the optional fields stay absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub symbol: String,
    #[serde(default, deserialize_with = "optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub change: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percent_change: f64,
    #[serde(default, deserialize_with = "optional_count")]
    pub volume: Option<u64>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub market_cap: Option<f64>,
}

impl EquityRecord {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_price(mut self, price: f64, change: f64, percent_change: f64) -> Self {
        self.price = price;
        self.change = change;
        self.percent_change = percent_change;
        self
    }

    pub fn with_volume(mut self, volume: Option<u64>) -> Self {
        self.volume = volume;
        self
    }

    pub fn with_market_cap(mut self, market_cap: Option<f64>) -> Self {
        self.market_cap = market_cap;
        self
    }

    /// Display name, empty when the upstream omitted it.
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Direction used for colouring; `change` is authoritative, not `percent_change`.
    pub fn is_advancing(&self) -> bool {
        self.change >= 0.0
    }

    /// Whether `change` and `percent_change` disagree in sign.
    pub fn has_sign_mismatch(&self) -> bool {
        (self.change > 0.0 && self.percent_change < 0.0)
            || (self.change < 0.0 && self.percent_change > 0.0)
    }
}

/// Error-shaped object returned by the backend instead of a payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamFailure {
    pub message: String,
}

impl UpstreamFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extracts `error` (or `message`) from an error-shaped JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        ["error", "message"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .map(Self::new)
    }
}

/// Boundary payload of the market-data endpoint.
///
/// The endpoint should return a list of records but may return an error
/// object; consumers read [`MarketPayload::records`], which is empty for the
/// failure case.
#[derive(Debug, Clone, PartialEq)]
pub enum MarketPayload {
    Records {
        records: Vec<EquityRecord>,
        /// Array elements that were not record-shaped objects.
        skipped: usize,
    },
    Failure(UpstreamFailure),
}

impl MarketPayload {
    pub fn from_records(records: Vec<EquityRecord>) -> Self {
        Self::Records {
            records,
            skipped: 0,
        }
    }

    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let value = serde_json::from_str::<Value>(body)?;
        Ok(Self::from_value(value))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                let total = items.len();
                let records = items
                    .into_iter()
                    .enumerate()
                    .filter_map(|(index, item)| {
                        if !item.is_object() {
                            tracing::warn!(index, "skipping non-object market data element");
                            return None;
                        }
                        match serde_json::from_value::<EquityRecord>(item) {
                            Ok(record) => Some(record),
                            Err(error) => {
                                tracing::warn!(index, %error, "skipping malformed market data element");
                                None
                            }
                        }
                    })
                    .collect::<Vec<_>>();
                let skipped = total - records.len();
                Self::Records { records, skipped }
            }
            other => {
                let failure = UpstreamFailure::from_value(&other).unwrap_or_else(|| {
                    UpstreamFailure::new(format!(
                        "expected a list of equity records, got {}",
                        json_kind(&other)
                    ))
                });
                Self::Failure(failure)
            }
        }
    }

    pub fn records(&self) -> &[EquityRecord] {
        match self {
            Self::Records { records, .. } => records,
            Self::Failure(_) => &[],
        }
    }

    pub fn failure(&self) -> Option<&UpstreamFailure> {
        match self {
            Self::Records { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    pub fn skipped(&self) -> usize {
        match self {
            Self::Records { skipped, .. } => *skipped,
            Self::Failure(_) => 0,
        }
    }
}

/// Live snapshot shown in the detail view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    #[serde(default, deserialize_with = "optional_string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub long_name: Option<String>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub current_price: Option<f64>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub previous_close: Option<f64>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub day_high: Option<f64>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub day_low: Option<f64>,
    #[serde(default, deserialize_with = "optional_count")]
    pub volume: Option<u64>,
    #[serde(default, deserialize_with = "optional_f64")]
    pub market_cap: Option<f64>,
}

/// Daily price sample for the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub time: TradingDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    pub close: f64,
}

impl PricePoint {
    /// Decodes a chart series, skipping points without a valid day or close.
    pub fn from_series(items: Vec<Value>) -> Vec<Self> {
        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<Self>(item) {
                Ok(point) => Some(point),
                Err(error) => {
                    tracing::warn!(index, %error, "skipping malformed chart point");
                    None
                }
            })
            .collect()
    }
}

/// AI summary payload; `summary` is the freeform narrative.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SummaryPayload {
    #[serde(default, deserialize_with = "optional_string")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "optional_string")]
    pub summary: Option<String>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_string(deserializer)?.unwrap_or_default())
}

fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_f64(deserializer)?.unwrap_or(0.0))
}

fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().filter(|number| number.is_finite()))
}

fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(count) = value.as_u64() {
        return Ok(Some(count));
    }
    Ok(value
        .as_f64()
        .filter(|number| number.is_finite() && *number >= 0.0)
        .map(|number| number.round() as u64))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_record_with_missing_and_null_fields() {
        let record: EquityRecord = serde_json::from_value(json!({
            "symbol": "TCS",
            "name": null,
            "price": 3900.5,
            "percentChange": null,
            "volume": 1200.0
        }))
        .expect("record should decode");

        assert_eq!(record.symbol, "TCS");
        assert_eq!(record.name, None);
        assert_eq!(record.change, 0.0);
        assert_eq!(record.percent_change, 0.0);
        assert_eq!(record.volume, Some(1200));
        assert_eq!(record.market_cap, None);
    }

    #[test]
    fn error_object_becomes_failure_with_message() {
        let payload = MarketPayload::from_value(json!({
            "error": "FMP_API_KEY is not configured."
        }));

        assert!(payload.records().is_empty());
        assert_eq!(
            payload.failure().map(|failure| failure.message.as_str()),
            Some("FMP_API_KEY is not configured.")
        );
    }

    #[test]
    fn scalar_payload_becomes_failure() {
        let payload = MarketPayload::from_value(json!("oops"));
        let failure = payload.failure().expect("must be a failure");
        assert!(failure.message.contains("a string"));
    }

    #[test]
    fn non_object_elements_are_counted_as_skipped() {
        let payload = MarketPayload::from_value(json!([
            {"symbol": "INFY", "name": "Infosys"},
            42,
            null,
            {"symbol": "ITC", "name": "ITC Ltd"}
        ]));

        assert_eq!(payload.records().len(), 2);
        assert_eq!(payload.skipped(), 2);
    }

    #[test]
    fn malformed_chart_points_are_skipped() {
        let points = PricePoint::from_series(vec![
            json!({"time": "2024-05-01", "open": 3800, "close": 3840}),
            json!({"time": "May 2", "close": 3850}),
            json!({"time": "2024-05-03", "close": null}),
            json!("garbage"),
            json!({"time": "2024-05-06", "close": 3880}),
        ]);

        let days = points
            .iter()
            .map(|point| point.time.to_string())
            .collect::<Vec<_>>();
        assert_eq!(days, ["2024-05-01", "2024-05-06"]);
        assert_eq!(points[0].open, Some(3800.0));
    }

    #[test]
    fn flags_sign_mismatch() {
        let consistent = EquityRecord::new("A", "A").with_price(10.0, 1.0, 10.0);
        let mismatched = EquityRecord::new("B", "B").with_price(10.0, -1.0, 10.0);

        assert!(!consistent.has_sign_mismatch());
        assert!(mismatched.has_sign_mismatch());
        assert!(!mismatched.is_advancing());
    }
}
