//! Typed client for the dashboard backend.
//!
//! # Endpoints
//!
//! | Endpoint | Path | Response | Cache TTL |
//! |----------|------|----------|-----------|
//! | [`Endpoint::MarketData`] | `/api/nifty500-market-data` | [`MarketPayload`] | 10 min |
//! | [`Endpoint::StockData`] | `/api/stock-data/{symbol}` | [`StockSnapshot`] | 5 min |
//! | [`Endpoint::StockChart`] | `/api/stock-chart/{symbol}` | `Vec<PricePoint>` | 1 h |
//! | [`Endpoint::StockSummary`] | `/api/stock-summary/{symbol}` | [`SummaryPayload`] | 24 h |
//!
//! # Example
//!
//! ```rust,ignore
//! use ferroscreen_core::{ranking, ClientConfig, DashboardClient, RankingMode};
//!
//! async fn top_gainers() -> Result<(), ferroscreen_core::FetchError> {
//!     let client = DashboardClient::new(ClientConfig::from_env());
//!     let listing = client.market_data().await?;
//!     for record in ranking::view_payload(&listing.data, RankingMode::TopGainers, "").iter().take(5) {
//!         println!("{} {:+.2}%", record.symbol, record.percent_change);
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::narrative::{self, ClassifiedSection};
use crate::{
    CacheStore, ClientConfig, MarketPayload, PricePoint, StockSnapshot, SummaryPayload, Symbol,
    UpstreamFailure,
};

/// Backend endpoint, used for routing, caching and envelope metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    MarketData,
    StockData,
    StockChart,
    StockSummary,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarketData => "market_data",
            Self::StockData => "stock_data",
            Self::StockChart => "stock_chart",
            Self::StockSummary => "stock_summary",
        }
    }

    pub const fn cache_ttl(self) -> Duration {
        match self {
            Self::MarketData => Duration::from_secs(600),
            Self::StockData => Duration::from_secs(300),
            Self::StockChart => Duration::from_secs(3_600),
            Self::StockSummary => Duration::from_secs(86_400),
        }
    }

    /// Request path; per-symbol endpoints require `symbol`.
    pub fn path(self, symbol: Option<&Symbol>) -> String {
        let segment = symbol.map(Symbol::to_path_segment).unwrap_or_default();
        match self {
            Self::MarketData => String::from("/api/nifty500-market-data"),
            Self::StockData => format!("/api/stock-data/{segment}"),
            Self::StockChart => format!("/api/stock-chart/{segment}"),
            Self::StockSummary => format!("/api/stock-summary/{segment}"),
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetch failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The request never produced a response.
    Transport,
    /// The backend answered with an error status or error object.
    Upstream,
    /// The body did not have the expected shape.
    Decode,
}

/// Structured fetch error carrying the endpoint it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    endpoint: Endpoint,
    message: String,
    status: Option<u16>,
    retryable: bool,
}

impl FetchError {
    pub fn transport(endpoint: Endpoint, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind: FetchErrorKind::Transport,
            endpoint,
            message: message.into(),
            status: None,
            retryable,
        }
    }

    pub fn upstream(endpoint: Endpoint, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Upstream,
            endpoint,
            message: message.into(),
            status,
            retryable: status.is_some_and(|status| status >= 500 || status == 429),
        }
    }

    pub fn decode(endpoint: Endpoint, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Decode,
            endpoint,
            message: message.into(),
            status: None,
            retryable: false,
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    /// Stable machine-readable code for envelopes.
    pub const fn code(&self) -> &'static str {
        match self.kind {
            FetchErrorKind::Transport => "transport_error",
            FetchErrorKind::Upstream => "upstream_error",
            FetchErrorKind::Decode => "decode_error",
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({status}): {}", self.endpoint, self.message),
            None => write!(f, "{}: {}", self.endpoint, self.message),
        }
    }
}

impl std::error::Error for FetchError {}

/// A decoded response plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub cache_hit: bool,
    pub latency_ms: u64,
}

/// Everything the detail view shows for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailBundle {
    pub snapshot: StockSnapshot,
    pub chart: Vec<PricePoint>,
    pub summary: SummaryPayload,
}

impl DetailBundle {
    pub fn sections(&self) -> Vec<ClassifiedSection> {
        narrative::parse_classified(self.summary.summary.as_deref())
    }
}

/// Client for the four backend endpoints with a session cache.
#[derive(Clone)]
pub struct DashboardClient {
    http: Arc<dyn HttpClient>,
    cache: CacheStore,
    config: ClientConfig,
}

impl DashboardClient {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::new()))
    }

    pub fn with_http_client(config: ClientConfig, http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            cache: CacheStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Full listing. An error object in a successful response is returned as
    /// [`MarketPayload::Failure`] rather than as an error.
    pub async fn market_data(&self) -> Result<Fetched<MarketPayload>, FetchError> {
        let endpoint = Endpoint::MarketData;
        let path = endpoint.path(None);
        let raw = self.fetch_body(endpoint, &path).await?;

        let payload = MarketPayload::from_json(&raw.body)
            .map_err(|error| FetchError::decode(endpoint, error.to_string()))?;

        if let Some(failure) = payload.failure() {
            tracing::warn!(message = %failure.message, "market data endpoint returned an error object");
        } else {
            if payload.skipped() > 0 {
                tracing::warn!(skipped = payload.skipped(), "market data contained malformed rows");
            }
            self.store(endpoint, path, &raw).await;
        }

        Ok(raw.finish(payload))
    }

    pub async fn stock_snapshot(&self, symbol: &Symbol) -> Result<Fetched<StockSnapshot>, FetchError> {
        self.fetch_json(Endpoint::StockData, symbol).await
    }

    pub async fn stock_chart(&self, symbol: &Symbol) -> Result<Fetched<Vec<PricePoint>>, FetchError> {
        let fetched = self.fetch_json::<Vec<Value>>(Endpoint::StockChart, symbol).await?;
        Ok(Fetched {
            data: PricePoint::from_series(fetched.data),
            cache_hit: fetched.cache_hit,
            latency_ms: fetched.latency_ms,
        })
    }

    pub async fn stock_summary(&self, symbol: &Symbol) -> Result<Fetched<SummaryPayload>, FetchError> {
        self.fetch_json(Endpoint::StockSummary, symbol).await
    }

    /// Snapshot, summary and chart fetched concurrently; any failure fails all.
    pub async fn load_detail(&self, symbol: &Symbol) -> Result<Fetched<DetailBundle>, FetchError> {
        let (snapshot, summary, chart) = tokio::try_join!(
            self.stock_snapshot(symbol),
            self.stock_summary(symbol),
            self.stock_chart(symbol),
        )?;

        Ok(Fetched {
            cache_hit: snapshot.cache_hit && summary.cache_hit && chart.cache_hit,
            latency_ms: snapshot
                .latency_ms
                .max(summary.latency_ms)
                .max(chart.latency_ms),
            data: DetailBundle {
                snapshot: snapshot.data,
                chart: chart.data,
                summary: summary.data,
            },
        })
    }

    async fn fetch_json<T>(&self, endpoint: Endpoint, symbol: &Symbol) -> Result<Fetched<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let path = endpoint.path(Some(symbol));
        let raw = self.fetch_body(endpoint, &path).await?;

        let value = serde_json::from_str::<Value>(&raw.body)
            .map_err(|error| FetchError::decode(endpoint, error.to_string()))?;
        if let Some(failure) = UpstreamFailure::from_value(&value) {
            return Err(FetchError::upstream(endpoint, None, failure.message));
        }
        let data = serde_json::from_value::<T>(value)
            .map_err(|error| FetchError::decode(endpoint, error.to_string()))?;

        self.store(endpoint, path, &raw).await;
        Ok(raw.finish(data))
    }

    async fn fetch_body(&self, endpoint: Endpoint, path: &str) -> Result<RawBody, FetchError> {
        let started = Instant::now();

        if self.config.cache_mode.reads() {
            if let Some(body) = self.cache.get(path).await {
                tracing::debug!(%endpoint, path, "cache hit");
                return Ok(RawBody {
                    body,
                    cache_hit: true,
                    started,
                });
            }
        }

        let url = format!("{}{path}", self.config.base_url);
        tracing::debug!(%endpoint, %url, "fetching");
        let request = HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.config.timeout_ms);

        let response = self.http.execute(request).await.map_err(|error| {
            tracing::warn!(%endpoint, error = %error, "transport failure");
            FetchError::transport(endpoint, error.message(), error.retryable())
        })?;

        if !response.is_success() {
            let message = serde_json::from_str::<Value>(&response.body)
                .ok()
                .and_then(|value| UpstreamFailure::from_value(&value))
                .map(|failure| failure.message)
                .unwrap_or_else(|| format!("backend returned status {}", response.status));
            tracing::warn!(%endpoint, status = response.status, %message, "upstream failure");
            return Err(FetchError::upstream(endpoint, Some(response.status), message));
        }

        Ok(RawBody {
            body: response.body,
            cache_hit: false,
            started,
        })
    }

    async fn store(&self, endpoint: Endpoint, path: String, raw: &RawBody) {
        if !raw.cache_hit && self.config.cache_mode.writes() {
            self.cache
                .put(path, raw.body.clone(), endpoint.cache_ttl())
                .await;
        }
    }
}

struct RawBody {
    body: String,
    cache_hit: bool,
    started: Instant,
}

impl RawBody {
    fn finish<T>(&self, data: T) -> Fetched<T> {
        Fetched {
            data,
            cache_hit: self.cache_hit,
            latency_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }
}
