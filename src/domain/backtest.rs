//! Backtest orchestration.
//!
//! Wires the pipeline end to end: signals from the annotated series,
//! execution over the signals, metrics over the execution output. Each
//! stage consumes its predecessor's complete, immutable output.

use super::error::BacktestError;
use super::execution::{self, EquityPoint, ExecutionConfig};
use super::metrics::{Metrics, MetricsConfig};
use super::position::Trade;
use super::series::BarSeries;
use super::signal::{SignalConfig, SignalGenerator};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestConfig {
    pub signal: SignalConfig,
    pub execution: ExecutionConfig,
    pub metrics: MetricsConfig,
}

/// Everything a run produces. The engine holds no state afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
    pub metrics: Metrics,
}

/// Run the full pipeline over an indicator-annotated series.
pub fn run_backtest(
    series_data: &BarSeries,
    config: &BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    let generator = SignalGenerator::from_config(&config.signal);
    let signals = generator.generate(series_data);

    let output = execution::run(series_data, &signals, &config.execution)?;
    let metrics = Metrics::compute(&output.equity_curve, &output.trades, &config.metrics);

    Ok(BacktestResult {
        trades: output.trades,
        equity_curve: output.equity_curve,
        metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;
    use crate::domain::series;
    use chrono::NaiveDate;

    fn make_series(closes: &[f64]) -> BarSeries {
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
            })
            .collect();
        BarSeries::new("TEST", bars).unwrap()
    }

    fn sma_only_config() -> BacktestConfig {
        BacktestConfig {
            signal: SignalConfig {
                enable_rsi: false,
                enable_macd: false,
                ..SignalConfig::default()
            },
            execution: ExecutionConfig {
                initial_cash: 10_000.0,
                ..ExecutionConfig::default()
            },
            ..BacktestConfig::default()
        }
    }

    #[test]
    fn flat_indicators_produce_no_trades() {
        let mut series_data = make_series(&[100.0; 10]);
        series_data
            .attach_indicator(series::SMA_SHORT, vec![Some(100.0); 10])
            .unwrap();
        series_data
            .attach_indicator(series::SMA_LONG, vec![Some(100.0); 10])
            .unwrap();

        let result = run_backtest(&series_data, &sma_only_config()).unwrap();

        assert!(result.trades.is_empty());
        assert_eq!(result.equity_curve.len(), 10);
        for point in &result.equity_curve {
            assert!((point.equity - 10_000.0).abs() < f64::EPSILON);
        }
        assert_eq!(result.metrics.win_rate, None);
        assert_eq!(result.metrics.sharpe_ratio, None);
    }

    #[test]
    fn sma_cross_round_trip_through_pipeline() {
        let closes = [100.0, 100.0, 102.0, 104.0, 103.0, 98.0, 97.0];
        let mut series_data = make_series(&closes);

        // Short SMA crosses above long at bar 2, below at bar 5.
        let short = [99.0, 99.5, 101.0, 102.0, 101.0, 99.0, 98.0];
        let long = [100.0; 7];
        series_data
            .attach_indicator(series::SMA_SHORT, short.iter().map(|&v| Some(v)).collect())
            .unwrap();
        series_data
            .attach_indicator(series::SMA_LONG, long.iter().map(|&v| Some(v)).collect())
            .unwrap();

        let result = run_backtest(&series_data, &sma_only_config()).unwrap();

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.entry_index, 2);
        assert_eq!(trade.exit_index, 5);
        assert!(!trade.forced_exit);
        // Bought at 102, sold at 98.
        assert!(trade.pnl < 0.0);
        assert_eq!(result.metrics.trade_count, 1);
        assert_eq!(result.metrics.trades_lost, 1);
    }

    #[test]
    fn series_ending_long_is_flagged() {
        let closes = [100.0, 100.0, 102.0, 104.0, 106.0];
        let mut series_data = make_series(&closes);
        let short = [99.0, 99.5, 101.0, 102.0, 103.0];
        series_data
            .attach_indicator(series::SMA_SHORT, short.iter().map(|&v| Some(v)).collect())
            .unwrap();
        series_data
            .attach_indicator(series::SMA_LONG, vec![Some(100.0); 5])
            .unwrap();

        let result = run_backtest(&series_data, &sma_only_config()).unwrap();

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert!(trade.forced_exit);
        assert_eq!(trade.exit_index, 4);
        assert!(trade.pnl > 0.0);
    }

    #[test]
    fn result_owns_everything_after_run() {
        let mut series_data = make_series(&[100.0; 5]);
        series_data
            .attach_indicator(series::SMA_SHORT, vec![Some(100.0); 5])
            .unwrap();
        series_data
            .attach_indicator(series::SMA_LONG, vec![Some(100.0); 5])
            .unwrap();

        let config = sma_only_config();
        let first = run_backtest(&series_data, &config).unwrap();
        let second = run_backtest(&series_data, &config).unwrap();
        assert_eq!(first, second, "runs are deterministic and stateless");
    }
}
