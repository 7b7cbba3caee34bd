//! MACD (Moving Average Convergence Divergence).
//!
//! Line = EMA(fast) - EMA(slow), defined once the slow EMA is.
//! Signal = EMA(signal) of the line, seeded with the SMA of the first
//! `signal_period` defined line values.
//! Warmup: line from slow-1, signal from slow-1 + signal_period-1.

use super::ema::ema;

pub struct MacdColumns {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

/// Compute MACD line and signal columns aligned with `closes`.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdColumns {
    if fast == 0 || slow == 0 || signal_period == 0 {
        return MacdColumns {
            line: vec![None; closes.len()],
            signal: vec![None; closes.len()],
        };
    }

    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);

    let line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    let mut signal = vec![None; closes.len()];
    let line_start = slow.saturating_sub(1);
    let seed_end = line_start + signal_period;

    if seed_end <= closes.len() {
        let k = 2.0 / (signal_period as f64 + 1.0);
        let mut seed_sum = 0.0;
        for value in line.iter().take(seed_end).skip(line_start).flatten() {
            seed_sum += value;
        }

        let mut current = seed_sum / signal_period as f64;
        signal[seed_end - 1] = Some(current);

        for i in seed_end..closes.len() {
            if let Some(value) = line[i] {
                current = value * k + current * (1.0 - k);
                signal[i] = Some(current);
            }
        }
    }

    MacdColumns { line, signal }
}
