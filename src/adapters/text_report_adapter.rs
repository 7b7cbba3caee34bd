//! Plain-text report adapter.
//!
//! Renders the metrics block and a per-trade table. Undefined metrics
//! are printed as `undefined`, never as zero.

use std::io::Write;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;
use crate::ports::report_port::ReportPort;

pub struct TextReportAdapter;

fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn opt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), pct)
}

fn opt_num(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |v| format!("{v:.4}"))
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        result: &BacktestResult,
        symbol: &str,
        out: &mut dyn Write,
    ) -> Result<(), BacktestError> {
        let m = &result.metrics;

        writeln!(out, "==================== BACKTEST RESULTS: {symbol} ====================")?;
        writeln!(out, "Total Return:          {}", pct(m.total_return))?;
        writeln!(out, "Annualized Return:     {}", pct(m.annualized_return))?;
        writeln!(out, "Annualized Volatility: {}", pct(m.annualized_volatility))?;
        writeln!(out, "Sharpe Ratio:          {}", opt_num(m.sharpe_ratio))?;
        writeln!(out, "Max Drawdown:          {}", pct(m.max_drawdown))?;
        writeln!(out, "Win Rate:              {}", opt_pct(m.win_rate))?;
        writeln!(
            out,
            "Trades:                {} ({} won, {} lost)",
            m.trade_count, m.trades_won, m.trades_lost
        )?;

        if let Some(point) = result.equity_curve.last() {
            writeln!(out, "Final Equity:          {:.2}", point.equity)?;
        }

        if !result.trades.is_empty() {
            writeln!(out)?;
            writeln!(
                out,
                "{:<12} {:<12} {:>10} {:>10} {:>12} {:>9}",
                "Entry", "Exit", "Entry Px", "Exit Px", "PnL", "Return"
            )?;
            for trade in &result.trades {
                writeln!(
                    out,
                    "{:<12} {:<12} {:>10.2} {:>10.2} {:>12.2} {:>8.2}%{}",
                    trade.entry_date.to_string(),
                    trade.exit_date.to_string(),
                    trade.entry_price,
                    trade.exit_price,
                    trade.pnl,
                    trade.return_pct * 100.0,
                    if trade.forced_exit { " (forced)" } else { "" },
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::execution::EquityPoint;
    use crate::domain::metrics::Metrics;
    use crate::domain::position::Trade;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample_result(sharpe: Option<f64>, win_rate: Option<f64>) -> BacktestResult {
        BacktestResult {
            trades: vec![Trade {
                entry_index: 0,
                entry_date: date(1),
                entry_price: 100.0,
                exit_index: 4,
                exit_date: date(5),
                exit_price: 110.0,
                shares: 100.0,
                pnl: 1000.0,
                return_pct: 0.10,
                forced_exit: true,
            }],
            equity_curve: vec![
                EquityPoint {
                    index: 0,
                    date: date(1),
                    equity: 10_000.0,
                },
                EquityPoint {
                    index: 1,
                    date: date(5),
                    equity: 11_000.0,
                },
            ],
            metrics: Metrics {
                total_return: 0.10,
                annualized_return: 0.2,
                annualized_volatility: 0.15,
                sharpe_ratio: sharpe,
                max_drawdown: 0.05,
                trade_count: 1,
                trades_won: 1,
                trades_lost: 0,
                win_rate,
            },
        }
    }

    fn render(result: &BacktestResult) -> String {
        let mut buf = Vec::new();
        TextReportAdapter.write(result, "AAPL", &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn report_contains_headline_metrics() {
        let text = render(&sample_result(Some(1.2345), Some(1.0)));
        assert!(text.contains("BACKTEST RESULTS: AAPL"));
        assert!(text.contains("Total Return:          10.00%"));
        assert!(text.contains("Sharpe Ratio:          1.2345"));
        assert!(text.contains("Win Rate:              100.00%"));
        assert!(text.contains("Final Equity:          11000.00"));
    }

    #[test]
    fn undefined_metrics_render_as_undefined() {
        let text = render(&sample_result(None, None));
        assert!(text.contains("Sharpe Ratio:          undefined"));
        assert!(text.contains("Win Rate:              undefined"));
        assert!(!text.contains("Sharpe Ratio:          0"));
    }

    #[test]
    fn forced_exit_is_marked() {
        let text = render(&sample_result(Some(1.0), Some(1.0)));
        assert!(text.contains("(forced)"));
    }
}
