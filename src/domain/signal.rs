//! Signal generation from indicator columns.
//!
//! # Evaluation Semantics
//!
//! - Each rule inspects bars i-1 and i only; there is no look-ahead.
//! - A rule returns `None` (abstains) when any column it needs is
//!   undefined at the bars it inspects, `Some(Hold)` when defined but
//!   silent, and `Some(Buy | Sell)` when it fires.
//! - Abstaining rules are excluded from aggregation; if every enabled
//!   rule abstains the combined signal is `Hold`.
//! - Conflicts never resolve to an arbitrary direction.

use super::series::{self, BarSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

/// How the RSI rule interprets its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiMode {
    /// Fire while the level is beyond the threshold (RSI < oversold /
    /// RSI > overbought).
    Threshold,
    /// Fire only on the bar where the level crosses the threshold.
    Crossover,
}

/// How votes from the enabled rules combine into one signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// All votes must agree on the same non-Hold direction.
    Unanimous,
    /// Any non-Hold vote fires; a Buy and a Sell in the same bar cancel.
    Any,
    /// Strictly more votes in one direction than the other.
    Majority,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalConfig {
    pub oversold: f64,
    pub overbought: f64,
    pub rsi_mode: RsiMode,
    pub aggregation: AggregationMode,
    pub enable_rsi: bool,
    pub enable_macd: bool,
    pub enable_sma: bool,
}

impl Default for SignalConfig {
    fn default() -> Self {
        SignalConfig {
            oversold: 30.0,
            overbought: 70.0,
            rsi_mode: RsiMode::Threshold,
            aggregation: AggregationMode::Unanimous,
            enable_rsi: true,
            enable_macd: true,
            enable_sma: true,
        }
    }
}

/// A single sub-rule of the strategy.
///
/// `None` means the rule cannot vote at this bar (indicator warm-up).
pub trait SignalRule {
    fn evaluate(&self, series_data: &BarSeries, index: usize) -> Option<Signal>;
}

/// RSI threshold/crossover rule.
#[derive(Debug, Clone)]
pub struct RsiRule {
    pub oversold: f64,
    pub overbought: f64,
    pub mode: RsiMode,
}

impl SignalRule for RsiRule {
    fn evaluate(&self, series_data: &BarSeries, index: usize) -> Option<Signal> {
        let current = series_data.indicator_value(series::RSI, index)?;

        match self.mode {
            RsiMode::Threshold => {
                if current < self.oversold {
                    Some(Signal::Buy)
                } else if current > self.overbought {
                    Some(Signal::Sell)
                } else {
                    Some(Signal::Hold)
                }
            }
            RsiMode::Crossover => {
                if index == 0 {
                    return None;
                }
                let prev = series_data.indicator_value(series::RSI, index - 1)?;
                if prev >= self.oversold && current < self.oversold {
                    Some(Signal::Buy)
                } else if prev <= self.overbought && current > self.overbought {
                    Some(Signal::Sell)
                } else {
                    Some(Signal::Hold)
                }
            }
        }
    }
}

/// MACD line vs signal line crossover rule.
#[derive(Debug, Clone)]
pub struct MacdRule;

impl SignalRule for MacdRule {
    fn evaluate(&self, series_data: &BarSeries, index: usize) -> Option<Signal> {
        crossover(series_data, series::MACD, series::MACD_SIGNAL, index)
    }
}

/// Short SMA vs long SMA crossover rule.
#[derive(Debug, Clone)]
pub struct SmaCrossRule;

impl SignalRule for SmaCrossRule {
    fn evaluate(&self, series_data: &BarSeries, index: usize) -> Option<Signal> {
        crossover(series_data, series::SMA_SHORT, series::SMA_LONG, index)
    }
}

/// Crossover of column `a` over column `b` between bars i-1 and i.
/// Abstains at index 0 or when either column is undefined at either bar.
fn crossover(series_data: &BarSeries, a: &str, b: &str, index: usize) -> Option<Signal> {
    if index == 0 {
        return None;
    }
    let a_curr = series_data.indicator_value(a, index)?;
    let b_curr = series_data.indicator_value(b, index)?;
    let a_prev = series_data.indicator_value(a, index - 1)?;
    let b_prev = series_data.indicator_value(b, index - 1)?;

    if a_curr > b_curr && a_prev <= b_prev {
        Some(Signal::Buy)
    } else if a_curr < b_curr && a_prev >= b_prev {
        Some(Signal::Sell)
    } else {
        Some(Signal::Hold)
    }
}

/// Combines the enabled rules' votes into one per-bar signal.
pub struct SignalGenerator {
    rules: Vec<Box<dyn SignalRule>>,
    aggregation: AggregationMode,
}

impl SignalGenerator {
    pub fn new(rules: Vec<Box<dyn SignalRule>>, aggregation: AggregationMode) -> Self {
        SignalGenerator { rules, aggregation }
    }

    pub fn from_config(config: &SignalConfig) -> Self {
        let mut rules: Vec<Box<dyn SignalRule>> = Vec::new();
        if config.enable_rsi {
            rules.push(Box::new(RsiRule {
                oversold: config.oversold,
                overbought: config.overbought,
                mode: config.rsi_mode,
            }));
        }
        if config.enable_macd {
            rules.push(Box::new(MacdRule));
        }
        if config.enable_sma {
            rules.push(Box::new(SmaCrossRule));
        }
        SignalGenerator::new(rules, config.aggregation)
    }

    /// Combined signal for one bar. The first two bars are always `Hold`:
    /// bar 0 has no prior bar and bar 1 is inside every warm-up window.
    pub fn signal_at(&self, series_data: &BarSeries, index: usize) -> Signal {
        if index < 2 {
            return Signal::Hold;
        }
        let votes: Vec<Signal> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(series_data, index))
            .collect();
        combine(&votes, self.aggregation)
    }

    /// One signal per bar, in bar order.
    pub fn generate(&self, series_data: &BarSeries) -> Vec<Signal> {
        (0..series_data.len())
            .map(|i| self.signal_at(series_data, i))
            .collect()
    }
}

fn combine(votes: &[Signal], aggregation: AggregationMode) -> Signal {
    let buys = votes.iter().filter(|v| **v == Signal::Buy).count();
    let sells = votes.iter().filter(|v| **v == Signal::Sell).count();

    match aggregation {
        AggregationMode::Unanimous => {
            if !votes.is_empty() && buys == votes.len() {
                Signal::Buy
            } else if !votes.is_empty() && sells == votes.len() {
                Signal::Sell
            } else {
                Signal::Hold
            }
        }
        AggregationMode::Any => match (buys > 0, sells > 0) {
            (true, false) => Signal::Buy,
            (false, true) => Signal::Sell,
            _ => Signal::Hold,
        },
        AggregationMode::Majority => {
            if buys > sells {
                Signal::Buy
            } else if sells > buys {
                Signal::Sell
            } else {
                Signal::Hold
            }
        }
    }
}
