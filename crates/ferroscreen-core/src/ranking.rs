//! Client-side ranking and search over a market-data snapshot.
//!
//! [`view`] re-derives the displayed list from the raw records every time the
//! ranking mode, the search text or the snapshot changes. It never mutates the
//! caller's slice and never drops or duplicates a record except through the
//! search filter.
//!
//! ```rust
//! use ferroscreen_core::{ranking, EquityRecord, RankingMode};
//!
//! let records = vec![
//!     EquityRecord::new("TCS", "Tata Consultancy").with_market_cap(Some(1.4e13)),
//!     EquityRecord::new("INFY", "Infosys").with_market_cap(Some(6.0e12)),
//! ];
//!
//! let ranked = ranking::view(&records, RankingMode::MarketCap, "inf");
//! assert_eq!(ranked.len(), 1);
//! assert_eq!(ranked[0].symbol, "INFY");
//! ```

use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{EquityRecord, MarketPayload};

/// Named rule selecting a sort key and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    #[default]
    MarketCap,
    TopGainers,
    TopLosers,
    Volume,
}

impl RankingMode {
    pub const ALL: [Self; 4] = [
        Self::MarketCap,
        Self::TopGainers,
        Self::TopLosers,
        Self::Volume,
    ];

    /// Human-facing label, as shown on the filter buttons.
    pub const fn label(self) -> &'static str {
        match self {
            Self::MarketCap => "Market Cap",
            Self::TopGainers => "Top Gainers",
            Self::TopLosers => "Top Losers",
            Self::Volume => "Volume",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketCap => "market-cap",
            Self::TopGainers => "top-gainers",
            Self::TopLosers => "top-losers",
            Self::Volume => "volume",
        }
    }

    /// Resolves a label or CLI spelling; anything unrecognized is `MarketCap`.
    pub fn from_label(input: &str) -> Self {
        let key = input
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|ch| ch.to_ascii_lowercase())
            .collect::<String>();

        match key.as_str() {
            "topgainers" | "gainers" => Self::TopGainers,
            "toplosers" | "losers" => Self::TopLosers,
            "volume" => Self::Volume,
            _ => Self::MarketCap,
        }
    }

    fn compare(self, a: &EquityRecord, b: &EquityRecord) -> Ordering {
        match self {
            Self::TopGainers => change_key(b).total_cmp(&change_key(a)),
            Self::TopLosers => change_key(a).total_cmp(&change_key(b)),
            Self::Volume => b.volume.cmp(&a.volume),
            Self::MarketCap => compare_optional(b.market_cap, a.market_cap),
        }
    }
}

impl Display for RankingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ranks a copy of `records` under `mode`, then keeps the rows matching `query`.
///
/// The sort is stable, so rows with equal keys keep their input order. A query
/// that is empty after trimming keeps every row. Otherwise the trimmed query is
/// the needle, so `" motors"` matches the symbol `TATAMOTORS` as well.
pub fn view(records: &[EquityRecord], mode: RankingMode, query: &str) -> Vec<EquityRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| mode.compare(a, b));

    let needle = query.trim();
    if needle.is_empty() {
        return ranked;
    }

    let needle = needle.to_lowercase();
    ranked.retain(|record| matches_needle(record, &needle));
    ranked
}

/// [`view`] over a boundary payload; an error-shaped payload ranks as empty.
pub fn view_payload(payload: &MarketPayload, mode: RankingMode, query: &str) -> Vec<EquityRecord> {
    view(payload.records(), mode, query)
}

/// Case-insensitive substring match on symbol or name.
pub fn matches_query(record: &EquityRecord, query: &str) -> bool {
    let needle = query.trim();
    needle.is_empty() || matches_needle(record, &needle.to_lowercase())
}

fn matches_needle(record: &EquityRecord, needle: &str) -> bool {
    record.symbol.to_lowercase().contains(needle)
        || record.name_or_empty().to_lowercase().contains(needle)
}

fn change_key(record: &EquityRecord) -> f64 {
    if record.percent_change.is_finite() {
        record.percent_change
    } else {
        0.0
    }
}

// Absent ranks below every present value, including zero.
fn compare_optional(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(records: &[EquityRecord]) -> Vec<&str> {
        records.iter().map(|record| record.symbol.as_str()).collect()
    }

    fn sample() -> Vec<EquityRecord> {
        vec![
            EquityRecord::new("ITC", "ITC Ltd")
                .with_price(430.0, 4.3, 1.0)
                .with_volume(Some(9_000_000))
                .with_market_cap(Some(5.4e12)),
            EquityRecord::new("YESBANK", "Yes Bank")
                .with_price(22.0, -0.66, -3.0)
                .with_volume(Some(120_000_000))
                .with_market_cap(Some(6.9e11)),
            EquityRecord::new("TCS", "Tata Consultancy Services")
                .with_price(3900.0, 78.0, 2.0)
                .with_volume(Some(2_000_000))
                .with_market_cap(Some(1.4e13)),
        ]
    }

    #[test]
    fn market_cap_is_the_default_mode() {
        assert_eq!(RankingMode::default(), RankingMode::MarketCap);
        assert_eq!(
            symbols(&view(&sample(), RankingMode::default(), "")),
            ["TCS", "ITC", "YESBANK"]
        );
    }

    #[test]
    fn each_mode_orders_by_its_key() {
        let records = sample();
        assert_eq!(
            symbols(&view(&records, RankingMode::TopGainers, "")),
            ["TCS", "ITC", "YESBANK"]
        );
        assert_eq!(
            symbols(&view(&records, RankingMode::TopLosers, "")),
            ["YESBANK", "ITC", "TCS"]
        );
        assert_eq!(
            symbols(&view(&records, RankingMode::Volume, "")),
            ["YESBANK", "ITC", "TCS"]
        );
    }

    #[test]
    fn resolves_labels_and_falls_back_to_market_cap() {
        assert_eq!(RankingMode::from_label("Top Gainers"), RankingMode::TopGainers);
        assert_eq!(RankingMode::from_label("top-losers"), RankingMode::TopLosers);
        assert_eq!(RankingMode::from_label("VOLUME"), RankingMode::Volume);
        assert_eq!(RankingMode::from_label("Dividend Yield"), RankingMode::MarketCap);
        assert_eq!(RankingMode::from_label(""), RankingMode::MarketCap);
    }

    #[test]
    fn labels_round_trip_through_from_label() {
        for mode in RankingMode::ALL {
            assert_eq!(RankingMode::from_label(mode.label()), mode);
            assert_eq!(RankingMode::from_label(mode.as_str()), mode);
        }
    }

    #[test]
    fn whitespace_query_keeps_everything() {
        assert_eq!(view(&sample(), RankingMode::Volume, "   ").len(), 3);
        assert!(matches_query(&EquityRecord::default(), "  "));
    }

    #[test]
    fn query_matches_missing_name_as_empty() {
        let mut record = EquityRecord::new("HDFCBANK", "unused");
        record.name = None;

        assert!(matches_query(&record, "hdfc"));
        assert!(!matches_query(&record, "bank ltd"));
    }

    #[test]
    fn absent_volume_ranks_below_zero_volume() {
        let records = vec![
            EquityRecord::new("A", "A").with_volume(None),
            EquityRecord::new("B", "B").with_volume(Some(0)),
            EquityRecord::new("C", "C").with_volume(Some(5)),
        ];
        assert_eq!(symbols(&view(&records, RankingMode::Volume, "")), ["C", "B", "A"]);
    }

    #[test]
    fn non_finite_change_ranks_as_flat() {
        let records = vec![
            EquityRecord::new("NAN", "n").with_price(1.0, 0.0, f64::NAN),
            EquityRecord::new("UP", "u").with_price(1.0, 0.1, 1.5),
            EquityRecord::new("DOWN", "d").with_price(1.0, -0.1, -1.5),
        ];
        assert_eq!(
            symbols(&view(&records, RankingMode::TopGainers, "")),
            ["UP", "NAN", "DOWN"]
        );
    }
}
