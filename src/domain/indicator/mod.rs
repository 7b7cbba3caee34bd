//! Technical indicator computation.
//!
//! Each function consumes a close-price slice and returns a column of
//! `Option<f64>` aligned 1:1 with the input; `None` marks warm-up bars
//! where the indicator is undefined. The signal layer never sees raw
//! zeros for warm-up values.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

use super::error::BacktestError;
use super::series::{self, BarSeries};

/// Window parameters for the standard indicator columns.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub sma_short: usize,
    pub sma_long: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            sma_short: 20,
            sma_long: 50,
        }
    }
}

impl IndicatorParams {
    /// Bar count needed before every standard column has left warm-up.
    pub fn warmup_bars(&self) -> usize {
        let rsi = self.rsi_period + 1;
        let macd = self.macd_slow + self.macd_signal - 1;
        rsi.max(macd).max(self.sma_long)
    }
}

/// Compute and attach the standard columns consumed by the built-in rules:
/// `rsi`, `macd`, `macd_signal`, `sma_short`, `sma_long`.
pub fn attach_standard(
    series_data: &mut BarSeries,
    params: &IndicatorParams,
) -> Result<(), BacktestError> {
    let closes: Vec<f64> = series_data.bars().iter().map(|b| b.close).collect();

    series_data.attach_indicator(series::RSI, rsi::rsi(&closes, params.rsi_period))?;

    let macd_out = macd::macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
    series_data.attach_indicator(series::MACD, macd_out.line)?;
    series_data.attach_indicator(series::MACD_SIGNAL, macd_out.signal)?;

    series_data.attach_indicator(series::SMA_SHORT, sma::sma(&closes, params.sma_short))?;
    series_data.attach_indicator(series::SMA_LONG, sma::sma(&closes, params.sma_long))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use chrono::NaiveDate;

    fn make_series(closes: &[f64]) -> BarSeries {
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        BarSeries::new("TEST", bars).unwrap()
    }

    #[test]
    fn default_params() {
        let p = IndicatorParams::default();
        assert_eq!(p.rsi_period, 14);
        assert_eq!(p.macd_fast, 12);
        assert_eq!(p.macd_slow, 26);
        assert_eq!(p.macd_signal, 9);
        assert_eq!(p.sma_short, 20);
        assert_eq!(p.sma_long, 50);
    }

    #[test]
    fn warmup_is_largest_window() {
        // Defaults: rsi 15, macd 34, sma_long 50
        assert_eq!(IndicatorParams::default().warmup_bars(), 50);

        let p = IndicatorParams {
            sma_long: 10,
            ..IndicatorParams::default()
        };
        assert_eq!(p.warmup_bars(), 34);
    }

    #[test]
    fn attach_standard_populates_all_columns() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
        let mut series_data = make_series(&closes);
        attach_standard(&mut series_data, &IndicatorParams::default()).unwrap();

        for name in [
            series::RSI,
            series::MACD,
            series::MACD_SIGNAL,
            series::SMA_SHORT,
            series::SMA_LONG,
        ] {
            let col = series_data.indicator(name).unwrap();
            assert_eq!(col.len(), 60, "column {name} misaligned");
            assert!(col.last().unwrap().is_some(), "column {name} never defined");
        }
    }

    #[test]
    fn attach_standard_short_series_all_undefined() {
        let mut series_data = make_series(&[100.0, 101.0, 102.0]);
        attach_standard(&mut series_data, &IndicatorParams::default()).unwrap();

        let col = series_data.indicator(series::SMA_LONG).unwrap();
        assert!(col.iter().all(|v| v.is_none()));
    }
}
