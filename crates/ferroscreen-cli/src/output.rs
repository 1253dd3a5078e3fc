use crate::cli::OutputFormat;
use crate::commands::CommandOutput;
use crate::error::CliError;

pub fn render(output: &CommandOutput, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let envelope = &output.envelope;
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Ndjson => {
            let payload = serde_json::to_string(envelope)?;
            println!("{payload}");
        }
        OutputFormat::Table => {
            for line in table_lines(output) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn table_lines(output: &CommandOutput) -> Vec<String> {
    let envelope = &output.envelope;
    let mut lines = output.table.clone();

    if !envelope.meta.warnings.is_empty() {
        lines.push(String::from("warnings:"));
        for warning in &envelope.meta.warnings {
            lines.push(format!("  - {warning}"));
        }
    }

    if !envelope.errors.is_empty() {
        lines.push(String::from("errors:"));
        for error in &envelope.errors {
            lines.push(format!("  - {}: {}", error.code, error.message));
        }
    }

    let endpoints = envelope
        .meta
        .endpoints
        .iter()
        .map(|endpoint| endpoint.as_str())
        .collect::<Vec<_>>();
    lines.push(format!(
        "-- {} | {} ms | cache {} | {}",
        if endpoints.is_empty() {
            String::from("offline")
        } else {
            endpoints.join(",")
        },
        envelope.meta.latency_ms,
        if envelope.meta.cache_hit { "hit" } else { "miss" },
        envelope.meta.request_id
    ));

    lines
}

#[cfg(test)]
mod tests {
    use ferroscreen_core::{Endpoint, Envelope, EnvelopeError};
    use serde_json::json;

    use super::*;
    use crate::metadata::Metadata;

    fn output(endpoints: Vec<Endpoint>, errors: Vec<EnvelopeError>) -> CommandOutput {
        let mut metadata = Metadata::new(endpoints, 7, true);
        metadata.push_warning("2 malformed market rows skipped");
        let meta = metadata.into_envelope_meta().expect("valid meta");
        CommandOutput {
            envelope: Envelope::with_errors(meta, json!({}), errors).expect("valid envelope"),
            table: vec![String::from("row")],
        }
    }

    #[test]
    fn table_appends_warnings_errors_and_footer() {
        let error = EnvelopeError::new("upstream_error", "boom").expect("valid error");
        let lines = table_lines(&output(vec![Endpoint::MarketData], vec![error]));

        assert_eq!(lines[0], "row");
        assert_eq!(lines[1], "warnings:");
        assert_eq!(lines[2], "  - 2 malformed market rows skipped");
        assert_eq!(lines[3], "errors:");
        assert_eq!(lines[4], "  - upstream_error: boom");
        assert!(lines[5].starts_with("-- market_data | 7 ms | cache hit | "));
    }

    #[test]
    fn offline_commands_say_so() {
        let lines = table_lines(&output(Vec::new(), Vec::new()));
        assert!(lines.last().expect("footer").starts_with("-- offline"));
    }
}
