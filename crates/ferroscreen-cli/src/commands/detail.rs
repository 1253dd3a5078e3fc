use ferroscreen_core::{
    ClassifiedSection, DashboardClient, DetailBundle, Endpoint, EnvelopeError, PricePoint,
    StockSnapshot, Symbol, TradingDay,
};
use serde::Serialize;

use crate::cli::SymbolArgs;
use crate::error::CliError;
use crate::format;

use super::{section_lines, CommandResult};

const DETAIL_ENDPOINTS: [Endpoint; 3] = [
    Endpoint::StockData,
    Endpoint::StockChart,
    Endpoint::StockSummary,
];

#[derive(Debug, Serialize)]
struct DetailResponseData {
    symbol: Symbol,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot: Option<StockSnapshot>,
    chart: Vec<PricePoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    chart_stats: Option<ChartStats>,
    sections: Vec<ClassifiedSection>,
}

/// Range summary over the price history, shown in place of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct ChartStats {
    points: usize,
    first_day: TradingDay,
    last_day: TradingDay,
    first_close: f64,
    last_close: f64,
    period_high: f64,
    period_low: f64,
    change_percent: Option<f64>,
}

impl ChartStats {
    fn from_points(points: &[PricePoint]) -> Option<Self> {
        let first = points.first()?;
        let last = points.last()?;

        let period_high = points
            .iter()
            .map(|point| point.high.unwrap_or(point.close))
            .fold(f64::NEG_INFINITY, f64::max);
        let period_low = points
            .iter()
            .map(|point| point.low.unwrap_or(point.close))
            .fold(f64::INFINITY, f64::min);
        let change_percent = (first.close != 0.0)
            .then(|| (last.close - first.close) / first.close * 100.0);

        Some(Self {
            points: points.len(),
            first_day: first.time,
            last_day: last.time,
            first_close: first.close,
            last_close: last.close,
            period_high,
            period_low,
            change_percent,
        })
    }
}

pub async fn run(args: &SymbolArgs, client: &DashboardClient) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    match client.load_detail(&symbol).await {
        Ok(fetched) => {
            let sections = fetched.data.sections();
            let mut warnings = Vec::new();
            if sections.is_empty() {
                warnings.push(String::from("summary contains no recognisable sections"));
            }

            let table = detail_lines(&symbol, &fetched.data, &sections);
            let DetailBundle {
                snapshot, chart, ..
            } = fetched.data;
            let data = serde_json::to_value(DetailResponseData {
                symbol,
                snapshot: Some(snapshot),
                chart_stats: ChartStats::from_points(&chart),
                chart,
                sections,
            })?;

            Ok(CommandResult::ok(data, DETAIL_ENDPOINTS.to_vec())
                .with_table(table)
                .with_warnings(warnings)
                .with_latency(fetched.latency_ms)
                .with_cache_hit(fetched.cache_hit))
        }
        Err(error) => {
            let table = vec![format!("Could not load details for {symbol}: {error}")];
            let data = serde_json::to_value(DetailResponseData {
                symbol,
                snapshot: None,
                chart: Vec::new(),
                chart_stats: None,
                sections: Vec::new(),
            })?;
            Ok(CommandResult::ok(data, DETAIL_ENDPOINTS.to_vec())
                .with_table(table)
                .with_errors(vec![EnvelopeError::from(&error)]))
        }
    }
}

/// Table lines for a loaded detail view.
pub(crate) fn detail_lines(
    symbol: &Symbol,
    bundle: &DetailBundle,
    sections: &[ClassifiedSection],
) -> Vec<String> {
    let snapshot = &bundle.snapshot;
    let title = snapshot.long_name.as_deref().unwrap_or(symbol.as_str());

    let mut lines = vec![
        format!("{title} ({symbol})"),
        String::new(),
        format!("  Current Price   {}", format::rupees(snapshot.current_price)),
        format!("  Day High        {}", format::rupees(snapshot.day_high)),
        format!("  Day Low         {}", format::rupees(snapshot.day_low)),
        format!("  Previous Close  {}", format::rupees(snapshot.previous_close)),
        format!("  Volume          {}", format::count(snapshot.volume)),
        format!("  Market Cap      {}", format::rupees(snapshot.market_cap)),
        String::new(),
    ];

    match ChartStats::from_points(&bundle.chart) {
        Some(stats) => {
            lines.push(format!(
                "Price History  {} .. {} ({} sessions)",
                stats.first_day, stats.last_day, stats.points
            ));
            lines.push(format!(
                "  Close {} -> {}{}",
                format::rupees(Some(stats.first_close)),
                format::rupees(Some(stats.last_close)),
                stats
                    .change_percent
                    .map(|pct| format!(" ({pct:+.2}%)"))
                    .unwrap_or_default()
            ));
            lines.push(format!(
                "  Range {} - {}",
                format::rupees(Some(stats.period_low)),
                format::rupees(Some(stats.period_high))
            ));
        }
        None => lines.push(String::from("Price History  no data")),
    }
    lines.push(String::new());

    lines.push(String::from("AI Summary"));
    if sections.is_empty() {
        lines.push(String::from("  No summary available."));
    } else {
        lines.extend(section_lines(sections));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(day: &str, close: f64, high: Option<f64>, low: Option<f64>) -> PricePoint {
        PricePoint {
            time: TradingDay::parse(day).expect("valid day"),
            open: None,
            high,
            low,
            close,
        }
    }

    #[test]
    fn chart_stats_span_history() {
        let points = vec![
            point("2024-01-01", 100.0, Some(104.0), Some(98.0)),
            point("2024-01-02", 110.0, None, None),
            point("2024-01-03", 105.0, Some(112.0), Some(101.0)),
        ];

        let stats = ChartStats::from_points(&points).expect("stats");

        assert_eq!(stats.points, 3);
        assert_eq!(stats.first_day.to_string(), "2024-01-01");
        assert_eq!(stats.last_day.to_string(), "2024-01-03");
        assert_eq!(stats.period_high, 112.0);
        assert_eq!(stats.period_low, 98.0);
        let change = stats.change_percent.expect("non-zero first close");
        assert!((change - 5.0).abs() < 1e-9);
    }

    #[test]
    fn no_stats_for_empty_history() {
        assert_eq!(ChartStats::from_points(&[]), None);
    }

    #[test]
    fn detail_lines_fall_back_to_symbol_and_placeholder_summary() {
        let symbol = Symbol::parse("TCS").expect("valid symbol");
        let bundle = DetailBundle {
            snapshot: StockSnapshot::default(),
            chart: Vec::new(),
            summary: Default::default(),
        };

        let lines = detail_lines(&symbol, &bundle, &[]);

        assert_eq!(lines[0], "TCS (TCS)");
        assert!(lines.iter().any(|line| line == "Price History  no data"));
        assert!(lines.iter().any(|line| line == "  No summary available."));
    }
}
