//! # Ferroscreen Core
//!
//! Domain types and logic behind the ferroscreen market dashboard.
//!
//! ## Overview
//!
//! Two pure components carry the logic; everything else moves data to and
//! from them:
//!
//! - **Ranking & search** ([`ranking::view`]) re-derives the displayed listing
//!   from a raw snapshot under a [`RankingMode`] and a search string.
//! - **Narrative sectioning** ([`narrative::parse`]) turns a generated summary
//!   into ordered, titled sections.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Session cache of backend response bodies |
//! | [`client`] | Typed client for the dashboard backend |
//! | [`config`] | Client configuration from defaults and environment |
//! | [`domain`] | Records, snapshots, price points, symbols, timestamps |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`narrative`] | Summary text sectioning and classification |
//! | [`ranking`] | Ranking modes and the listing view |
//! | [`view_state`] | UI-owned view state and stale-response guard |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / browse   │──── owns ViewState
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ DashboardClient │────▶│ CacheStore       │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ HttpClient      │
//! │ (reqwest/fixture)│
//! └────────┬────────┘
//!          │ MarketPayload, SummaryPayload
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ ranking::view   │     │ narrative::parse │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! The pure components never fail: malformed listings rank as empty, missing
//! fields take neutral defaults, and unparseable narratives yield no sections.
//! Network calls return [`FetchError`]:
//!
//! ```rust
//! use ferroscreen_core::{FetchError, FetchErrorKind};
//!
//! fn describe(error: &FetchError) -> &'static str {
//!     match error.kind() {
//!         FetchErrorKind::Transport => "backend unreachable",
//!         FetchErrorKind::Upstream => "backend reported an error",
//!         FetchErrorKind::Decode => "unexpected response shape",
//!     }
//! }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod narrative;
pub mod ranking;
pub mod view_state;

pub use cache::{CacheMode, CacheStore};
pub use client::{DashboardClient, DetailBundle, Endpoint, FetchError, FetchErrorKind, Fetched};
pub use config::ClientConfig;
pub use domain::{
    EquityRecord, MarketPayload, PricePoint, StockSnapshot, SummaryPayload, Symbol, TradingDay,
    UpstreamFailure, UtcDateTime,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::ValidationError;
pub use http_client::{
    FixtureHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};
pub use narrative::{ClassifiedSection, NarrativeSection, SectionCategory};
pub use ranking::RankingMode;
pub use view_state::{SelectionTicket, ViewState};
