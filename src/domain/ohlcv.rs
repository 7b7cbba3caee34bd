//! OHLCV bar representation.

use chrono::NaiveDate;

use super::error::BacktestError;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// Check that all price fields are finite and positive, the high/low
    /// bracket holds, and volume is non-negative.
    pub fn validate(&self, index: usize) -> Result<(), BacktestError> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(BacktestError::MalformedInput {
                    reason: format!("bar {index} ({}): invalid {field} {value}", self.date),
                });
            }
        }
        if self.high < self.low {
            return Err(BacktestError::MalformedInput {
                reason: format!(
                    "bar {index} ({}): high {} below low {}",
                    self.date, self.high, self.low
                ),
            });
        }
        if self.volume < 0 {
            return Err(BacktestError::MalformedInput {
                reason: format!("bar {index} ({}): negative volume {}", self.date, self.volume),
            });
        }
        Ok(())
    }
}
