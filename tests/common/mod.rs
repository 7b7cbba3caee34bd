//! Shared helpers for integration tests.

use chrono::NaiveDate;
use crossback::domain::ohlcv::Bar;
use crossback::domain::series::BarSeries;

pub fn make_bar(day_offset: i64, close: f64) -> Bar {
    Bar {
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(day_offset),
        open: close,
        high: close + 1.0,
        low: (close - 1.0).max(0.01),
        close,
        volume: 10_000,
    }
}

pub fn make_series(symbol: &str, closes: &[f64]) -> BarSeries {
    let bars: Vec<Bar> = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(i as i64, close))
        .collect();
    BarSeries::new(symbol, bars).unwrap()
}

/// Ten bars: flat, a rally, then a collapse. With SMA(3)/SMA(5) the short
/// average crosses above the long at bar 5 and back below at bar 9.
pub fn cross_and_fade_closes() -> Vec<f64> {
    vec![
        100.0, 100.0, 100.0, 100.0, 100.0, 104.0, 108.0, 112.0, 96.0, 80.0,
    ]
}

pub fn csv_content(closes: &[f64]) -> String {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for (i, close) in closes.iter().enumerate() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
            + chrono::Duration::days(i as i64);
        content.push_str(&format!(
            "{date},{close},{high},{low},{close},10000\n",
            high = close + 1.0,
            low = close - 1.0,
        ));
    }
    content
}
