//! CLI argument definitions for Ferroscreen.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `list` | Ranked and filtered market listing |
//! | `detail` | Snapshot, price history and AI summary for one symbol |
//! | `summary` | AI summary sections for one symbol |
//! | `parse-summary` | Section a narrative read from a file or stdin |
//! | `browse` | Interactive session over stdin |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json, ndjson) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--base-url` | `$FERROSCREEN_BASE_URL` or `http://127.0.0.1:5001` | Backend base URL |
//! | `--timeout-ms` | `$FERROSCREEN_TIMEOUT_MS` or `10000` | Request timeout in ms |
//! | `--cache` | `use` | Response cache mode |
//!
//! # Examples
//!
//! ```bash
//! ferroscreen list --rank top-gainers --limit 10
//! ferroscreen list --search bank --format json --pretty
//! ferroscreen detail RELIANCE
//! ferroscreen parse-summary summary.txt
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ferroscreen_core::{CacheMode, RankingMode};

/// Ferroscreen - terminal market screener
///
/// Ranks and searches the market listing served by the dashboard backend and
/// shows per-symbol detail with a sectioned AI summary.
#[derive(Debug, Parser)]
#[command(
    name = "ferroscreen",
    author,
    version,
    about = "Terminal market screener",
    long_about = "Ferroscreen ranks and searches the market listing served by the dashboard \
backend. Features include:\n\
\n\
  • Ranking by market cap, top gainers, top losers or volume\n\
  • Case-insensitive search on symbol and name\n\
  • Per-symbol snapshot, price history and sectioned AI summary\n\
  • Structured JSON output with metadata\n\
\n\
Use 'ferroscreen <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Backend base URL (overrides FERROSCREEN_BASE_URL).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds (overrides FERROSCREEN_TIMEOUT_MS).
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Response cache mode.
    #[arg(long, global = true, value_enum, default_value_t = CacheSelector::Use)]
    pub cache: CacheSelector,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
}

/// Cache mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheSelector {
    /// Reuse live cached responses.
    Use,
    /// Fetch again and overwrite cached responses.
    Refresh,
    /// Ignore the cache entirely.
    Bypass,
}

impl From<CacheSelector> for CacheMode {
    fn from(value: CacheSelector) -> Self {
        match value {
            CacheSelector::Use => Self::Use,
            CacheSelector::Refresh => Self::Refresh,
            CacheSelector::Bypass => Self::Bypass,
        }
    }
}

/// Ranking mode selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankSelector {
    /// Largest market capitalisation first.
    MarketCap,
    /// Highest percent change first.
    TopGainers,
    /// Lowest percent change first.
    TopLosers,
    /// Highest traded volume first.
    Volume,
}

impl From<RankSelector> for RankingMode {
    fn from(value: RankSelector) -> Self {
        match value {
            RankSelector::MarketCap => Self::MarketCap,
            RankSelector::TopGainers => Self::TopGainers,
            RankSelector::TopLosers => Self::TopLosers,
            RankSelector::Volume => Self::Volume,
        }
    }
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank and search the market listing.
    ///
    /// # Examples
    ///
    ///   ferroscreen list
    ///   ferroscreen list --rank top-losers --limit 10
    ///   ferroscreen list --search tata
    List(ListArgs),

    /// Show snapshot, price history and AI summary for one symbol.
    ///
    /// The three requests run concurrently; if any fails, the detail fails.
    Detail(SymbolArgs),

    /// Show the sectioned AI summary for one symbol.
    Summary(SymbolArgs),

    /// Section a narrative read from a file, or stdin when no path is given.
    ParseSummary(ParseSummaryArgs),

    /// Interactive session: rank, search and open symbols from stdin.
    ///
    /// Commands: rank <mode>, search [text], open <symbol>, close, show, help, quit
    Browse(BrowseArgs),
}

/// Arguments for the `list` command.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Ranking mode.
    #[arg(long, value_enum, default_value_t = RankSelector::MarketCap)]
    pub rank: RankSelector,

    /// Case-insensitive search on symbol or name.
    #[arg(long, default_value = "")]
    pub search: String,

    /// Maximum number of rows to show.
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Arguments for per-symbol commands.
#[derive(Debug, Args)]
pub struct SymbolArgs {
    /// Exchange symbol (e.g., RELIANCE, TCS, BAJAJ-AUTO).
    pub symbol: String,
}

/// Arguments for the `parse-summary` command.
#[derive(Debug, Args)]
pub struct ParseSummaryArgs {
    /// Narrative file; reads stdin when omitted or `-`.
    pub path: Option<PathBuf>,
}

/// Arguments for the `browse` command.
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Rows shown per listing.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_defaults_to_market_cap_and_table() {
        let cli = Cli::try_parse_from(["ferroscreen", "list"]).expect("valid args");
        assert_eq!(cli.format, OutputFormat::Table);
        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(RankingMode::from(args.rank), RankingMode::MarketCap);
        assert!(args.search.is_empty());
        assert_eq!(args.limit, None);
    }

    #[test]
    fn parses_rank_search_and_global_flags() {
        let cli = Cli::try_parse_from([
            "ferroscreen",
            "list",
            "--rank",
            "top-gainers",
            "--search",
            "Bank",
            "--format",
            "json",
            "--cache",
            "bypass",
            "--base-url",
            "http://localhost:9000",
        ])
        .expect("valid args");

        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(CacheMode::from(cli.cache), CacheMode::Bypass);
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:9000"));
        let Command::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(RankingMode::from(args.rank), RankingMode::TopGainers);
        assert_eq!(args.search, "Bank");
    }

    #[test]
    fn rejects_unknown_rank() {
        assert!(Cli::try_parse_from(["ferroscreen", "list", "--rank", "dividend"]).is_err());
    }

    #[test]
    fn detail_requires_symbol() {
        assert!(Cli::try_parse_from(["ferroscreen", "detail"]).is_err());
    }
}
