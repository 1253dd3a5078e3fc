use ferroscreen_core::{ranking, DashboardClient, Endpoint, EnvelopeError, EquityRecord, RankingMode};
use serde::Serialize;

use crate::cli::ListArgs;
use crate::error::CliError;
use crate::format;

use super::CommandResult;

const NAME_WIDTH: usize = 30;

#[derive(Debug, Serialize)]
struct ListResponseData {
    mode: RankingMode,
    mode_label: &'static str,
    query: String,
    total: usize,
    matched: usize,
    records: Vec<EquityRecord>,
}

pub async fn run(args: &ListArgs, client: &DashboardClient) -> Result<CommandResult, CliError> {
    if args.limit == Some(0) {
        return Err(CliError::Command(String::from(
            "--limit must be greater than zero",
        )));
    }

    let mode = RankingMode::from(args.rank);

    match client.market_data().await {
        Ok(fetched) => {
            let payload = &fetched.data;
            let mut warnings = Vec::new();
            if let Some(failure) = payload.failure() {
                warnings.push(format!("market data unavailable: {}", failure.message));
            }
            if payload.skipped() > 0 {
                warnings.push(format!(
                    "{} malformed market rows skipped",
                    payload.skipped()
                ));
            }

            let ranked = ranking::view_payload(payload, mode, &args.search);
            let matched = ranked.len();
            let records = truncate(ranked, args.limit);
            warnings.extend(sign_mismatch_warning(&records));

            let table = listing_lines(mode, &records, matched);
            let data = serde_json::to_value(ListResponseData {
                mode,
                mode_label: mode.label(),
                query: args.search.clone(),
                total: payload.records().len(),
                matched,
                records,
            })?;

            Ok(CommandResult::ok(data, vec![Endpoint::MarketData])
                .with_table(table)
                .with_warnings(warnings)
                .with_latency(fetched.latency_ms)
                .with_cache_hit(fetched.cache_hit))
        }
        Err(error) => {
            let data = serde_json::to_value(ListResponseData {
                mode,
                mode_label: mode.label(),
                query: args.search.clone(),
                total: 0,
                matched: 0,
                records: Vec::new(),
            })?;
            Ok(CommandResult::ok(data, vec![Endpoint::MarketData])
                .with_table(vec![format!("Could not load market data: {error}")])
                .with_errors(vec![EnvelopeError::from(&error)]))
        }
    }
}

fn truncate(mut records: Vec<EquityRecord>, limit: Option<usize>) -> Vec<EquityRecord> {
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    records
}

/// Symbols whose `change` and `percentChange` disagree in sign.
pub(crate) fn sign_mismatch_warning(records: &[EquityRecord]) -> Option<String> {
    let mismatched = records
        .iter()
        .filter(|record| record.has_sign_mismatch())
        .map(|record| record.symbol.as_str())
        .collect::<Vec<_>>();

    if mismatched.is_empty() {
        return None;
    }

    Some(format!(
        "change and percentChange disagree in sign for {}; direction follows change",
        mismatched.join(", ")
    ))
}

/// Table rows for a ranked listing, `matched` being the count before any limit.
pub(crate) fn listing_lines(mode: RankingMode, records: &[EquityRecord], matched: usize) -> Vec<String> {
    if records.is_empty() {
        return vec![String::from("No stocks found matching your criteria.")];
    }

    let mut lines = vec![
        format!("{} ({} of {matched})", mode.label(), records.len()),
        format!(
            "{:>4}  {:<12} {:<NAME_WIDTH$} {:>14} {:>24} {:>18}",
            "#", "SYMBOL", "NAME", "PRICE", "CHANGE", "MARKET CAP"
        ),
    ];

    for (index, record) in records.iter().enumerate() {
        lines.push(format!(
            "{:>4}  {:<12} {:<NAME_WIDTH$} {:>14} {:>24} {:>18}",
            index + 1,
            record.symbol,
            clip(record.name_or_empty(), NAME_WIDTH),
            format::rupees(Some(record.price)),
            format!("{} {}", format::direction(record), format::change_label(record)),
            format::crores(record.market_cap),
        ));
    }

    lines
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_owned();
    }
    let mut clipped = value.chars().take(width.saturating_sub(1)).collect::<String>();
    clipped.push('…');
    clipped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<EquityRecord> {
        vec![
            EquityRecord::new("RELIANCE", "Reliance Industries Limited")
                .with_price(2850.5, 12.0, 0.42)
                .with_market_cap(Some(19_000_000_000_000.0)),
            EquityRecord::new("HDFCBANK", "HDFC Bank Limited")
                .with_price(1500.0, -3.0, 0.2)
                .with_market_cap(None),
        ]
    }

    #[test]
    fn empty_listing_shows_placeholder() {
        let lines = listing_lines(RankingMode::Volume, &[], 0);
        assert_eq!(lines, ["No stocks found matching your criteria."]);
    }

    #[test]
    fn listing_rows_carry_rank_price_and_crores() {
        let lines = listing_lines(RankingMode::MarketCap, &sample(), 5);

        assert_eq!(lines[0], "Market Cap (2 of 5)");
        assert!(lines[2].contains("RELIANCE"));
        assert!(lines[2].contains("₹2,850.5"));
        assert!(lines[2].contains("₹19,00,000 Cr"));
        assert!(lines[3].trim_start().starts_with('2'));
    }

    #[test]
    fn reports_sign_mismatch() {
        let warning = sign_mismatch_warning(&sample()).expect("HDFCBANK mismatches");
        assert!(warning.contains("HDFCBANK"));
        assert!(!warning.contains("RELIANCE"));
    }

    #[test]
    fn clips_long_names() {
        assert_eq!(clip("Tata", 10), "Tata");
        assert_eq!(clip("Tata Consultancy Services", 8), "Tata Co…");
    }

    #[test]
    fn truncates_to_limit() {
        assert_eq!(truncate(sample(), Some(1)).len(), 1);
        assert_eq!(truncate(sample(), None).len(), 2);
    }
}
