//! # Domain Models
//!
//! Wire and value types exchanged with the dashboard backend.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`EquityRecord`] | One row of the market-data listing |
//! | [`MarketPayload`] | Market-data body, either records or an error object |
//! | [`StockSnapshot`] | Live snapshot for the detail view |
//! | [`PricePoint`] | Daily close sample for the chart |
//! | [`SummaryPayload`] | Freeform AI narrative for one symbol |
//! | [`Symbol`] | Validated exchange ticker |
//! | [`TradingDay`] | `YYYY-MM-DD` calendar date |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Record-level types are lenient: missing or `null` fields decode to neutral
//! defaults and one malformed row never fails a whole listing.

mod models;
mod symbol;
mod timestamp;

pub use models::{
    EquityRecord, MarketPayload, PricePoint, StockSnapshot, SummaryPayload, UpstreamFailure,
};
pub use symbol::Symbol;
pub use timestamp::{TradingDay, UtcDateTime};
