//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the first n-close SMA, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Warmup: first (n-1) bars undefined.

/// Compute an EMA column aligned with `closes`.
pub fn ema(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let mut values = Vec::with_capacity(closes.len());
    let k = 2.0 / (period as f64 + 1.0);
    let mut current = 0.0;
    let mut seed_sum = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        if i + 1 < period {
            seed_sum += close;
            values.push(None);
        } else if i + 1 == period {
            seed_sum += close;
            current = seed_sum / period as f64;
            values.push(Some(current));
        } else {
            current = close * k + current * (1.0 - k);
            values.push(Some(current));
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_warmup() {
        let values = ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert_eq!(values[0], None);
        assert_eq!(values[1], None);
        assert!(values[2].is_some());
    }

    #[test]
    fn ema_seed_is_sma() {
        let values = ema(&[10.0, 20.0, 30.0, 40.0], 3);
        assert!((values[2].unwrap() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_step() {
        let values = ema(&[10.0, 20.0, 30.0, 40.0], 3);
        // k = 0.5; EMA[3] = 40*0.5 + 20*0.5 = 30
        assert!((values[3].unwrap() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_constant_series_is_flat() {
        let values = ema(&[50.0; 10], 4);
        for value in values.iter().skip(3) {
            assert!((value.unwrap() - 50.0).abs() < 1e-12);
        }
    }

    #[test]
    fn ema_zero_period_all_undefined() {
        assert_eq!(ema(&[1.0, 2.0], 0), vec![None, None]);
    }
}
