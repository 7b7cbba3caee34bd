//! Report generation port trait.

use std::io::Write;

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;

/// Port for rendering a backtest result to a writer (stdout, a file, a
/// test buffer).
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        symbol: &str,
        out: &mut dyn Write,
    ) -> Result<(), BacktestError>;
}
