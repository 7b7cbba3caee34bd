//! Trade execution: the single-position state machine.
//!
//! Bars are processed strictly in ascending index order. Each bar applies
//! at most one transition, filled at that bar's close:
//!
//! - `Flat` + `Buy`  → open a long position
//! - `Long` + `Sell` → close it and record a [`Trade`]
//! - everything else → no transition (`Sell` while flat and `Buy` while
//!   long are ignored; shorting is not modeled)
//!
//! A position still open after the final bar is force-closed at that
//! bar's close and flagged on the trade record.

use chrono::NaiveDate;

use super::error::BacktestError;
use super::ohlcv::Bar;
use super::position::{OpenPosition, Trade};
use super::series::BarSeries;
use super::signal::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionConfig {
    pub initial_cash: f64,
    /// Fraction of current cash committed per entry.
    pub position_size: f64,
    pub commission_pct: f64,
    pub slippage_pct: f64,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            initial_cash: 100_000.0,
            position_size: 1.0,
            commission_pct: 0.0,
            slippage_pct: 0.0,
        }
    }
}

/// Mark-to-market portfolio value at one bar.
#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub index: usize,
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PositionState {
    Flat,
    Long(OpenPosition),
}

/// Trade ledger plus equity curve for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutput {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

/// The per-bar state machine. Carries only `{position state, cash}`
/// between bars, so it can be driven bar-by-bar by an event loop as well
/// as by [`run`].
pub struct ExecutionEngine {
    config: ExecutionConfig,
    cash: f64,
    state: PositionState,
}

impl ExecutionEngine {
    pub fn new(config: &ExecutionConfig) -> Self {
        ExecutionEngine {
            config: config.clone(),
            cash: config.initial_cash,
            state: PositionState::Flat,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn is_long(&self) -> bool {
        matches!(self.state, PositionState::Long(_))
    }

    /// Apply one bar's signal. Returns the trade closed by this bar, if
    /// any. Cash and position state update together; no intermediate
    /// state is observable between bars.
    pub fn step(&mut self, index: usize, bar: &Bar, signal: Signal) -> Option<Trade> {
        match (std::mem::replace(&mut self.state, PositionState::Flat), signal) {
            (PositionState::Flat, Signal::Buy) => {
                self.state = PositionState::Long(self.open(index, bar));
                None
            }
            (PositionState::Long(pos), Signal::Sell) => Some(self.close(pos, index, bar, false)),
            (state, _) => {
                self.state = state;
                None
            }
        }
    }

    /// Close any open position at this bar's close, flagged as forced.
    pub fn force_close(&mut self, index: usize, bar: &Bar) -> Option<Trade> {
        match std::mem::replace(&mut self.state, PositionState::Flat) {
            PositionState::Long(pos) => Some(self.close(pos, index, bar, true)),
            PositionState::Flat => None,
        }
    }

    /// Cash plus the open position valued at this bar's close.
    pub fn mark_to_market(&self, bar: &Bar) -> f64 {
        match &self.state {
            PositionState::Flat => self.cash,
            PositionState::Long(pos) => self.cash + pos.market_value(bar.close),
        }
    }

    /// Size the entry so cost + commission consumes exactly
    /// `cash * position_size`; fractional shares allowed.
    fn open(&mut self, index: usize, bar: &Bar) -> OpenPosition {
        let fill = bar.close * (1.0 + self.config.slippage_pct / 100.0);
        let budget = self.cash * self.config.position_size;
        let shares = budget / (fill * (1.0 + self.config.commission_pct / 100.0));
        let cost = shares * fill;
        let commission = cost * self.config.commission_pct / 100.0;

        self.cash -= cost + commission;

        OpenPosition {
            entry_index: index,
            entry_date: bar.date,
            entry_price: fill,
            shares,
            entry_cost: cost,
            entry_commission: commission,
        }
    }

    fn close(&mut self, pos: OpenPosition, index: usize, bar: &Bar, forced: bool) -> Trade {
        let fill = bar.close * (1.0 - self.config.slippage_pct / 100.0);
        let proceeds = pos.shares * fill;
        let commission = proceeds * self.config.commission_pct / 100.0;
        let net_proceeds = proceeds - commission;

        self.cash += net_proceeds;

        let invested = pos.entry_cost + pos.entry_commission;
        let pnl = net_proceeds - invested;
        let return_pct = if invested > 0.0 { pnl / invested } else { 0.0 };

        Trade {
            entry_index: pos.entry_index,
            entry_date: pos.entry_date,
            entry_price: pos.entry_price,
            exit_index: index,
            exit_date: bar.date,
            exit_price: fill,
            shares: pos.shares,
            pnl,
            return_pct,
            forced_exit: forced,
        }
    }
}

/// Run the state machine over a full series.
///
/// Fails fast on a signal sequence that is not aligned 1:1 with the bars;
/// date monotonicity is already guaranteed by [`BarSeries`] construction.
/// Produces exactly one equity point per bar, mark-to-market at close.
pub fn run(
    series_data: &BarSeries,
    signals: &[Signal],
    config: &ExecutionConfig,
) -> Result<ExecutionOutput, BacktestError> {
    if signals.len() != series_data.len() {
        return Err(BacktestError::SignalLengthMismatch {
            signals: signals.len(),
            bars: series_data.len(),
        });
    }

    let mut engine = ExecutionEngine::new(config);
    let mut trades = Vec::new();
    let mut equity_curve = Vec::with_capacity(series_data.len());
    let last = series_data.len().saturating_sub(1);

    for (index, bar) in series_data.bars().iter().enumerate() {
        if let Some(trade) = engine.step(index, bar, signals[index]) {
            trades.push(trade);
        }
        if index == last {
            if let Some(trade) = engine.force_close(index, bar) {
                trades.push(trade);
            }
        }
        equity_curve.push(EquityPoint {
            index,
            date: bar.date,
            equity: engine.mark_to_market(bar),
        });
    }

    Ok(ExecutionOutput {
        trades,
        equity_curve,
    })
}
