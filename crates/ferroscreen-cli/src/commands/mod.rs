pub mod browse;
mod detail;
mod list;
mod parse_summary;
mod summary;

use ferroscreen_core::{
    ClassifiedSection, ClientConfig, DashboardClient, Endpoint, Envelope, EnvelopeError,
};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

/// What a command produced, before metadata is attached.
pub struct CommandResult {
    pub data: Value,
    pub table: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub cache_hit: bool,
    pub endpoints: Vec<Endpoint>,
}

impl CommandResult {
    pub fn ok(data: Value, endpoints: Vec<Endpoint>) -> Self {
        Self {
            data,
            table: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            cache_hit: false,
            endpoints,
        }
    }

    pub fn with_table(mut self, table: Vec<String>) -> Self {
        self.table = table;
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_errors(mut self, errors: Vec<EnvelopeError>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_cache_hit(mut self, cache_hit: bool) -> Self {
        self.cache_hit = cache_hit;
        self
    }
}

/// Envelope plus the pre-rendered table lines for `--format table`.
pub struct CommandOutput {
    pub envelope: Envelope<Value>,
    pub table: Vec<String>,
}

pub fn client_for(cli: &Cli) -> DashboardClient {
    let mut config = ClientConfig::from_env().with_cache_mode(cli.cache.into());
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config = config.with_timeout_ms(timeout_ms);
    }

    tracing::debug!(
        base_url = %config.base_url,
        timeout_ms = config.timeout_ms,
        cache_mode = %config.cache_mode,
        "client configured"
    );
    DashboardClient::new(config)
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let client = client_for(cli);

    let command_result = match &cli.command {
        Command::List(args) => list::run(args, &client).await?,
        Command::Detail(args) => detail::run(args, &client).await?,
        Command::Summary(args) => summary::run(args, &client).await?,
        Command::ParseSummary(args) => parse_summary::run(args).await?,
        Command::Browse(_) => {
            return Err(CliError::Command(String::from(
                "browse is interactive and produces no envelope",
            )))
        }
    };

    let CommandResult {
        data,
        table,
        warnings,
        errors,
        latency_ms,
        cache_hit,
        endpoints,
    } = command_result;

    let mut metadata = Metadata::new(endpoints, latency_ms, cache_hit);
    for warning in warnings {
        metadata.push_warning(warning);
    }

    let meta = metadata.into_envelope_meta()?;
    let envelope = Envelope::with_errors(meta, data, errors)?;

    Ok(CommandOutput { envelope, table })
}

/// Table lines for sectioned narrative text.
pub(crate) fn section_lines(sections: &[ClassifiedSection]) -> Vec<String> {
    let mut lines = Vec::new();
    for section in sections {
        lines.push(format!("[{}] {}", section.category, section.title));
        for line in section.content.lines() {
            lines.push(format!("    {line}"));
        }
        lines.push(String::new());
    }
    lines
}
