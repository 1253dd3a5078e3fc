//! Interactive session over stdin.
//!
//! The session owns a [`ViewState`]. Detail loads run as spawned tasks and
//! report back over a channel with the [`SelectionTicket`] they were issued
//! for; a response whose ticket is no longer current is discarded, so closing
//! or re-selecting never shows data for the wrong symbol.

use ferroscreen_core::{
    DashboardClient, DetailBundle, FetchError, Fetched, MarketPayload, RankingMode,
    SelectionTicket, Symbol, ViewState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cli::BrowseArgs;
use crate::error::CliError;

use super::detail::detail_lines;
use super::list::{listing_lines, sign_mismatch_warning};

const HELP: &str = "\
commands:
  rank <market-cap|top-gainers|top-losers|volume>
  search [text]      filter by symbol or name; empty clears
  open <symbol>      load snapshot, history and summary
  close              close the detail view
  show               print the current listing
  help               this text
  quit               leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum BrowseCommand {
    Rank(RankingMode),
    Search(String),
    Open(String),
    Close,
    Show,
    Help,
    Quit,
}

impl BrowseCommand {
    /// `Ok(None)` for a blank line.
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        let command = match verb.to_ascii_lowercase().as_str() {
            "rank" | "r" if rest.is_empty() => return Err(String::from("usage: rank <mode>")),
            "rank" | "r" => Self::Rank(RankingMode::from_label(rest)),
            "search" | "s" | "/" => Self::Search(rest.to_owned()),
            "open" | "o" if rest.is_empty() => return Err(String::from("usage: open <symbol>")),
            "open" | "o" => Self::Open(rest.to_owned()),
            "close" | "c" => Self::Close,
            "show" | "ls" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(format!("unknown command '{other}'; type 'help'")),
        };

        Ok(Some(command))
    }
}

struct DetailMessage {
    ticket: SelectionTicket,
    result: Result<Fetched<DetailBundle>, FetchError>,
}

struct Session {
    client: DashboardClient,
    state: ViewState,
    listing: MarketPayload,
    limit: usize,
    inflight: Option<JoinHandle<()>>,
    sender: mpsc::Sender<DetailMessage>,
}

impl Session {
    fn new(client: DashboardClient, limit: usize, sender: mpsc::Sender<DetailMessage>) -> Self {
        Self {
            client,
            state: ViewState::new(),
            listing: MarketPayload::from_records(Vec::new()),
            limit: limit.max(1),
            inflight: None,
            sender,
        }
    }

    async fn load_listing(&mut self) -> Vec<String> {
        match self.client.market_data().await {
            Ok(fetched) => {
                let mut lines = Vec::new();
                if let Some(failure) = fetched.data.failure() {
                    lines.push(format!("market data unavailable: {}", failure.message));
                }
                self.listing = fetched.data;
                lines.extend(self.listing_view());
                lines
            }
            Err(error) => vec![format!("Could not load market data: {error}")],
        }
    }

    fn listing_view(&self) -> Vec<String> {
        let mut rows = self.state.visible(self.listing.records());
        let matched = rows.len();
        rows.truncate(self.limit);

        let mut lines = Vec::new();
        if !self.state.query().trim().is_empty() {
            lines.push(format!("search: \"{}\"", self.state.query().trim()));
        }
        lines.extend(listing_lines(self.state.mode(), &rows, matched));
        lines.extend(sign_mismatch_warning(&rows).map(|warning| format!("warning: {warning}")));
        lines
    }

    fn apply(&mut self, command: BrowseCommand) -> Vec<String> {
        match command {
            BrowseCommand::Rank(mode) => {
                self.state.set_mode(mode);
                self.listing_view()
            }
            BrowseCommand::Search(query) => {
                self.state.set_query(query);
                self.listing_view()
            }
            BrowseCommand::Open(raw) => match Symbol::parse(&raw) {
                Ok(symbol) => {
                    let line = format!("loading {symbol}...");
                    self.open(symbol);
                    vec![line]
                }
                Err(error) => vec![format!("invalid symbol: {error}")],
            },
            BrowseCommand::Close => {
                self.abort_inflight();
                self.state.close();
                vec![String::from("detail closed")]
            }
            BrowseCommand::Show => self.listing_view(),
            BrowseCommand::Help => HELP.lines().map(str::to_owned).collect(),
            BrowseCommand::Quit => Vec::new(),
        }
    }

    fn open(&mut self, symbol: Symbol) {
        self.abort_inflight();
        let ticket = self.state.select(symbol);
        let client = self.client.clone();
        let sender = self.sender.clone();

        tracing::debug!(
            symbol = %ticket.symbol(),
            generation = ticket.generation(),
            "loading detail"
        );
        self.inflight = Some(tokio::spawn(async move {
            let result = client.load_detail(ticket.symbol()).await;
            // The receiver only goes away when the session ends.
            let _ = sender.send(DetailMessage { ticket, result }).await;
        }));
    }

    /// Lines to print for a finished detail load; nothing when it is stale.
    fn receive(&mut self, message: DetailMessage) -> Vec<String> {
        let DetailMessage { ticket, result } = message;
        let Some(result) = self.state.accept(&ticket, result) else {
            tracing::debug!(
                symbol = %ticket.symbol(),
                generation = ticket.generation(),
                "discarding stale detail response"
            );
            return Vec::new();
        };

        self.inflight = None;
        match result {
            Ok(fetched) => {
                let sections = fetched.data.sections();
                detail_lines(ticket.symbol(), &fetched.data, &sections)
            }
            Err(error) => vec![format!(
                "Could not load details for {}: {error}",
                ticket.symbol()
            )],
        }
    }

    fn has_pending_detail(&self) -> bool {
        self.inflight.is_some()
    }

    fn abort_inflight(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
    }
}

pub async fn run(args: &BrowseArgs, client: DashboardClient) -> Result<(), CliError> {
    let (sender, mut receiver) = mpsc::channel(8);
    let mut session = Session::new(client, args.limit, sender);

    print_lines(&session.load_listing().await);
    println!("type 'help' for commands");

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut input_closed = false;
    loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line? else {
                    input_closed = true;
                    break;
                };

                match BrowseCommand::parse(&line) {
                    Ok(Some(BrowseCommand::Quit)) => break,
                    Ok(Some(command)) => print_lines(&session.apply(command)),
                    Ok(None) => {}
                    Err(message) => println!("{message}"),
                }
            }
            Some(message) = receiver.recv() => print_lines(&session.receive(message)),
        }
    }

    // Piped input may end before the last detail arrives.
    if input_closed {
        print_lines(&drain_pending(&mut session, &mut receiver).await);
    }

    session.abort_inflight();
    Ok(())
}

/// Waits for the current detail, skipping stale responses already queued.
async fn drain_pending(
    session: &mut Session,
    receiver: &mut mpsc::Receiver<DetailMessage>,
) -> Vec<String> {
    let mut lines = Vec::new();
    while session.has_pending_detail() {
        match receiver.recv().await {
            Some(message) => lines.extend(session.receive(message)),
            None => break,
        }
    }
    lines
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}
