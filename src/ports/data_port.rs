//! Data access port trait.

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

pub trait DataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BacktestError>;

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError>;

    /// First date, last date and bar count for a symbol, if any data
    /// exists.
    fn data_range(&self, symbol: &str)
        -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError>;
}
