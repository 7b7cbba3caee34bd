//! Bar series with aligned indicator columns.
//!
//! A `BarSeries` is the immutable input to the signal/execution pipeline:
//! an ordered sequence of OHLCV bars plus named indicator columns aligned
//! 1:1 by index. `None` in a column marks a warm-up bar where the
//! indicator is undefined and no signal is possible.

use std::collections::HashMap;

use super::error::BacktestError;
use super::ohlcv::Bar;

/// Standard column names consumed by the built-in signal rules.
pub const RSI: &str = "rsi";
pub const MACD: &str = "macd";
pub const MACD_SIGNAL: &str = "macd_signal";
pub const SMA_SHORT: &str = "sma_short";
pub const SMA_LONG: &str = "sma_long";

#[derive(Debug, Clone)]
pub struct BarSeries {
    symbol: String,
    bars: Vec<Bar>,
    indicators: HashMap<String, Vec<Option<f64>>>,
}

impl BarSeries {
    /// Build a series, validating each bar and the strict date ordering.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, BacktestError> {
        for (i, bar) in bars.iter().enumerate() {
            bar.validate(i)?;
        }
        for i in 1..bars.len() {
            if bars[i].date <= bars[i - 1].date {
                return Err(BacktestError::MalformedInput {
                    reason: format!(
                        "timestamps not strictly increasing at index {i} ({} after {})",
                        bars[i].date,
                        bars[i - 1].date
                    ),
                });
            }
        }
        Ok(Self {
            symbol: symbol.into(),
            bars,
            indicators: HashMap::new(),
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn bar(&self, index: usize) -> &Bar {
        &self.bars[index]
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Attach a named indicator column. The column must have exactly one
    /// entry per bar.
    pub fn attach_indicator(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<(), BacktestError> {
        let name = name.into();
        if values.len() != self.bars.len() {
            return Err(BacktestError::MalformedInput {
                reason: format!(
                    "indicator column {name} has {} values for {} bars",
                    values.len(),
                    self.bars.len()
                ),
            });
        }
        self.indicators.insert(name, values);
        Ok(())
    }

    pub fn indicator(&self, name: &str) -> Option<&[Option<f64>]> {
        self.indicators.get(name).map(|v| v.as_slice())
    }

    /// Value of a named column at a bar index. `None` when the column is
    /// missing, the index is out of range, or the bar is in warm-up.
    pub fn indicator_value(&self, name: &str, index: usize) -> Option<f64> {
        self.indicators
            .get(name)
            .and_then(|col| col.get(index))
            .copied()
            .flatten()
    }
}
