//! UI-owned view state and the stale-response guard for detail loads.
//!
//! Every call to [`ViewState::select`] or [`ViewState::close`] bumps a
//! generation counter. A detail response is applied only while the ticket
//! issued for its request is still current, so the last relevant response wins
//! even when responses arrive out of order or the same symbol is re-selected.

use serde::Serialize;

use crate::ranking::{self, RankingMode};
use crate::{EquityRecord, Symbol};

/// Proof of which selection a detail request was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionTicket {
    generation: u64,
    symbol: Symbol,
}

impl SelectionTicket {
    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Current ranking mode, search text and selected symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    mode: RankingMode,
    query: String,
    selected: Option<Symbol>,
    #[serde(skip)]
    generation: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn mode(&self) -> RankingMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn selected(&self) -> Option<&Symbol> {
        self.selected.as_ref()
    }

    pub fn set_mode(&mut self, mode: RankingMode) {
        self.mode = mode;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Opens the detail view for `symbol`, superseding any earlier selection.
    pub fn select(&mut self, symbol: Symbol) -> SelectionTicket {
        self.generation += 1;
        self.selected = Some(symbol.clone());
        SelectionTicket {
            generation: self.generation,
            symbol,
        }
    }

    /// Closes the detail view; outstanding tickets become stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.selected = None;
    }

    pub fn is_current(&self, ticket: &SelectionTicket) -> bool {
        ticket.generation == self.generation && self.selected.as_ref() == Some(&ticket.symbol)
    }

    /// Returns `value` only if `ticket` is still current.
    pub fn accept<T>(&self, ticket: &SelectionTicket, value: T) -> Option<T> {
        self.is_current(ticket).then_some(value)
    }

    /// The ranked and filtered rows for the current mode and query.
    pub fn visible(&self, records: &[EquityRecord]) -> Vec<EquityRecord> {
        ranking::view(records, self.mode, &self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    #[test]
    fn latest_selection_is_current() {
        let mut state = ViewState::new();
        let first = state.select(symbol("INFY"));
        let second = state.select(symbol("TCS"));

        assert!(!state.is_current(&first));
        assert!(state.is_current(&second));
        assert_eq!(state.selected().map(Symbol::as_str), Some("TCS"));
    }

    #[test]
    fn reselecting_same_symbol_invalidates_older_ticket() {
        let mut state = ViewState::new();
        let stale = state.select(symbol("INFY"));
        state.select(symbol("TCS"));
        let fresh = state.select(symbol("INFY"));

        assert_eq!(state.accept(&stale, "old"), None);
        assert_eq!(state.accept(&fresh, "new"), Some("new"));
    }

    #[test]
    fn closing_discards_inflight_response() {
        let mut state = ViewState::new();
        let ticket = state.select(symbol("ITC"));
        state.close();

        assert!(state.selected().is_none());
        assert!(!state.is_current(&ticket));
    }

    #[test]
    fn visible_uses_mode_and_query() {
        let records = vec![
            EquityRecord::new("SBIN", "State Bank of India").with_volume(Some(10)),
            EquityRecord::new("PNB", "Punjab National Bank").with_volume(Some(20)),
            EquityRecord::new("TITAN", "Titan Company").with_volume(Some(30)),
        ];
        let mut state = ViewState::new();
        state.set_mode(RankingMode::Volume);
        state.set_query("bank");

        let visible = state.visible(&records);
        let symbols = visible
            .iter()
            .map(|record| record.symbol.as_str())
            .collect::<Vec<_>>();
        assert_eq!(symbols, ["PNB", "SBIN"]);
    }
}
