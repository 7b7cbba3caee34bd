//! Open position and closed trade records.

use chrono::NaiveDate;

/// A long position while it is held. Owned exclusively by the execution
/// engine; converted into a [`Trade`] on exit.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenPosition {
    pub entry_index: usize,
    pub entry_date: NaiveDate,
    /// Fill price, slippage included.
    pub entry_price: f64,
    pub shares: f64,
    /// Cash spent on shares, commission excluded.
    pub entry_cost: f64,
    pub entry_commission: f64,
}

impl OpenPosition {
    pub fn market_value(&self, price: f64) -> f64 {
        self.shares * price
    }
}

/// A closed round-trip, immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_index: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_index: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub shares: f64,
    /// Net of entry and exit commissions.
    pub pnl: f64,
    /// PnL relative to total entry outlay.
    pub return_pct: f64,
    /// True when the position was closed by end-of-series, not a signal.
    pub forced_exit: bool,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}
