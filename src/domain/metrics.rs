//! Performance metrics over an equity curve and trade ledger.
//!
//! A pure, single-pass function of the execution output. Metrics that
//! have no defined value (Sharpe on a zero-variance curve, win rate with
//! no closed trades) are `None`, never zero: "no signal" must stay
//! distinguishable from "bad performance".

use super::execution::EquityPoint;
use super::position::Trade;

#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    pub risk_free_rate_per_period: f64,
    pub periods_per_year: f64,
    /// When false, forced end-of-series closes are left out of the trade
    /// statistics (they reflect the sampling window, not the strategy).
    pub include_forced_exits: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            risk_free_rate_per_period: 0.0,
            periods_per_year: 252.0,
            include_forced_exits: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: Option<f64>,
    pub max_drawdown: f64,
    pub trade_count: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub win_rate: Option<f64>,
}

impl Metrics {
    pub fn compute(
        equity_curve: &[EquityPoint],
        trades: &[Trade],
        config: &MetricsConfig,
    ) -> Self {
        let initial = equity_curve.first().map(|p| p.equity);
        let final_equity = equity_curve.last().map(|p| p.equity);

        let total_return = match (initial, final_equity) {
            (Some(initial), Some(final_equity)) if initial > 0.0 => {
                final_equity / initial - 1.0
            }
            _ => 0.0,
        };

        let years = equity_curve.len() as f64 / config.periods_per_year;
        let annualized_return = if years > 0.0 && total_return > -1.0 {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let returns = period_returns(equity_curve);
        let (stddev, sharpe_ratio) = risk_stats(&returns, config);
        let annualized_volatility = stddev * config.periods_per_year.sqrt();

        let max_drawdown = compute_drawdown(equity_curve);

        let mut trade_count = 0usize;
        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        for trade in trades {
            if trade.forced_exit && !config.include_forced_exits {
                continue;
            }
            trade_count += 1;
            if trade.is_win() {
                trades_won += 1;
            } else if trade.pnl < 0.0 {
                trades_lost += 1;
            }
        }

        let win_rate = if trade_count > 0 {
            Some(trades_won as f64 / trade_count as f64)
        } else {
            None
        };

        Metrics {
            total_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown,
            trade_count,
            trades_won,
            trades_lost,
            win_rate,
        }
    }
}

/// Simple percentage change between consecutive equity points.
fn period_returns(equity_curve: &[EquityPoint]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| {
            if w[0].equity > 0.0 {
                (w[1].equity - w[0].equity) / w[0].equity
            } else {
                0.0
            }
        })
        .collect()
}

/// Population standard deviation of per-period returns, and the
/// annualized Sharpe ratio when it is defined.
fn risk_stats(returns: &[f64], config: &MetricsConfig) -> (f64, Option<f64>) {
    if returns.is_empty() {
        return (0.0, None);
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if returns.len() < 2 || stddev == 0.0 {
        return (stddev, None);
    }

    let excess = mean - config.risk_free_rate_per_period;
    let sharpe = (excess / stddev) * config.periods_per_year.sqrt();
    (stddev, Some(sharpe))
}

/// Largest peak-to-trough decline as a fraction of the running peak.
/// Single forward scan.
fn compute_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for point in equity_curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
