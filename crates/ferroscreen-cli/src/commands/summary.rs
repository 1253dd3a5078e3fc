use ferroscreen_core::{
    narrative, ClassifiedSection, DashboardClient, Endpoint, EnvelopeError, Symbol,
};
use serde::Serialize;

use crate::cli::SymbolArgs;
use crate::error::CliError;

use super::{section_lines, CommandResult};

#[derive(Debug, Serialize)]
struct SummaryResponseData {
    symbol: Symbol,
    sections: Vec<ClassifiedSection>,
}

pub async fn run(args: &SymbolArgs, client: &DashboardClient) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    match client.stock_summary(&symbol).await {
        Ok(fetched) => {
            let sections = narrative::parse_classified(fetched.data.summary.as_deref());
            let table = if sections.is_empty() {
                vec![format!("No summary available for {symbol}.")]
            } else {
                section_lines(&sections)
            };

            let mut result = CommandResult::ok(
                serde_json::to_value(SummaryResponseData {
                    symbol,
                    sections: sections.clone(),
                })?,
                vec![Endpoint::StockSummary],
            )
            .with_table(table)
            .with_latency(fetched.latency_ms)
            .with_cache_hit(fetched.cache_hit);

            if sections.is_empty() && fetched.data.summary.is_some() {
                result = result.with_warning("summary contains no recognisable sections");
            }
            Ok(result)
        }
        Err(error) => {
            let table = vec![format!("Could not load summary for {symbol}: {error}")];
            let data = serde_json::to_value(SummaryResponseData {
                symbol,
                sections: Vec::new(),
            })?;
            Ok(CommandResult::ok(data, vec![Endpoint::StockSummary])
                .with_table(table)
                .with_errors(vec![EnvelopeError::from(&error)]))
        }
    }
}
