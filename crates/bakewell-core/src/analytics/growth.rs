//! Period-over-period growth deltas from income statements.

use thiserror::Error;

use crate::data_source::{MarketDataSource, SourceError, StatementsRequest};
use crate::{AnalysisError, DeltaRow, IncomeStatementRow, Kpi, StatementPeriod, Ticker};

/// Annual reports compared: latest plus one prior year.
const ANNUAL_ROWS: usize = 2;
/// Quarterly reports compared: latest plus the four prior quarters.
const QUARTERLY_ROWS: usize = 5;

/// Failures raised while assembling a delta report.
#[derive(Debug, Error)]
pub enum DeltaReportError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Percentage change of a KPI between the latest reporting period and the
/// comparison period (prior year for annual, four quarters back for
/// quarterly). Rows are indexed most-recent-first.
///
/// A zero comparison value is an error, not a zero or infinite delta.
pub fn compute_delta(
    rows: &[IncomeStatementRow],
    kpi: Kpi,
    period: StatementPeriod,
) -> Result<f64, AnalysisError> {
    let lookback = period.lookback();
    if rows.len() <= lookback {
        return Err(AnalysisError::InsufficientHistory {
            needed: lookback + 1,
            available: rows.len(),
        });
    }

    let latest = rows[0].kpi(kpi);
    let previous = rows[lookback].kpi(kpi);
    if previous == 0.0 {
        return Err(AnalysisError::ZeroBaseline {
            metric: format!("{period} {kpi}"),
        });
    }

    Ok((latest - previous) / previous * 100.0)
}

/// Build one [`DeltaRow`] per ticker, in input order.
///
/// Fetches 2 annual and 5 quarterly statement rows per ticker and computes
/// all five KPI deltas for both cadences.
pub async fn delta_report(
    tickers: &[Ticker],
    source: &dyn MarketDataSource,
) -> Result<Vec<DeltaRow>, DeltaReportError> {
    let mut report = Vec::with_capacity(tickers.len());

    for ticker in tickers {
        let annual = source
            .income_statements(StatementsRequest::new(
                ticker.clone(),
                StatementPeriod::Annual,
                ANNUAL_ROWS,
            )?)
            .await?;
        let quarterly = source
            .income_statements(StatementsRequest::new(
                ticker.clone(),
                StatementPeriod::Quarterly,
                QUARTERLY_ROWS,
            )?)
            .await?;

        report.push(build_row(ticker.clone(), &annual.rows, &quarterly.rows)?);
    }

    Ok(report)
}

fn build_row(
    ticker: Ticker,
    annual: &[IncomeStatementRow],
    quarterly: &[IncomeStatementRow],
) -> Result<DeltaRow, AnalysisError> {
    let yoy = |kpi| compute_delta(annual, kpi, StatementPeriod::Annual);
    let qoq = |kpi| compute_delta(quarterly, kpi, StatementPeriod::Quarterly);

    Ok(DeltaRow {
        ticker,
        total_revenue_yoy: yoy(Kpi::TotalRevenue)?,
        operating_expense_yoy: yoy(Kpi::OperatingExpense)?,
        net_income_yoy: yoy(Kpi::NetIncome)?,
        cost_of_revenue_yoy: yoy(Kpi::CostOfRevenue)?,
        selling_general_admin_yoy: yoy(Kpi::SellingGeneralAdmin)?,
        total_revenue_qoq: qoq(Kpi::TotalRevenue)?,
        operating_expense_qoq: qoq(Kpi::OperatingExpense)?,
        net_income_qoq: qoq(Kpi::NetIncome)?,
        cost_of_revenue_qoq: qoq(Kpi::CostOfRevenue)?,
        selling_general_admin_qoq: qoq(Kpi::SellingGeneralAdmin)?,
    })
}
