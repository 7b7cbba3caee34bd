//! CSV file data adapter.
//!
//! One file per symbol at `<base>/<SYMBOL>.csv` with columns
//! `date,open,high,low,close,volume` and ISO dates. Rows outside the
//! requested range are skipped; output is sorted by date.

use chrono::NaiveDate;
use std::fs::File;
use std::path::PathBuf;

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{symbol}.csv"))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<Bar>, BacktestError> {
        let path = self.csv_path(symbol);
        let file = File::open(&path).map_err(|_| BacktestError::NoData {
            symbol: symbol.to_string(),
        })?;

        let mut rdr = csv::Reader::from_reader(file);
        let mut bars = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| BacktestError::MalformedInput {
                reason: format!("{}: {e}", path.display()),
            })?;
            bars.push(parse_record(&record, row, symbol)?);
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

fn parse_record(
    record: &csv::StringRecord,
    row: usize,
    symbol: &str,
) -> Result<Bar, BacktestError> {
    let field = |index: usize, name: &str| -> Result<&str, BacktestError> {
        record.get(index).ok_or_else(|| BacktestError::MalformedInput {
            reason: format!("{symbol} row {row}: missing {name} column"),
        })
    };
    let number = |index: usize, name: &str| -> Result<f64, BacktestError> {
        field(index, name)?
            .parse()
            .map_err(|e| BacktestError::MalformedInput {
                reason: format!("{symbol} row {row}: invalid {name}: {e}"),
            })
    };

    let date = NaiveDate::parse_from_str(field(0, "date")?, "%Y-%m-%d").map_err(|e| {
        BacktestError::MalformedInput {
            reason: format!("{symbol} row {row}: invalid date: {e}"),
        }
    })?;

    Ok(Bar {
        date,
        open: number(1, "open")?,
        high: number(2, "high")?,
        low: number(3, "low")?,
        close: number(4, "close")?,
        volume: field(5, "volume")?
            .parse()
            .map_err(|e| BacktestError::MalformedInput {
                reason: format!("{symbol} row {row}: invalid volume: {e}"),
            })?,
    })
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BacktestError> {
        let bars = self
            .read_all(symbol)?
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect();
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, BacktestError> {
        let entries = std::fs::read_dir(&self.base_path)?;

        let mut symbols = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if let Some(symbol) = name.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, BacktestError> {
        let bars = self.read_all(symbol)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}
