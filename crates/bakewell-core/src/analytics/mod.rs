//! Time-series analytics: price volatility summaries and period-over-period
//! growth deltas.

pub mod growth;
pub mod volatility;

pub use growth::{compute_delta, delta_report, DeltaReportError};
pub use volatility::summarize_volatility;
