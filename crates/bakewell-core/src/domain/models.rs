use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Ticker, ValidationError};

/// One entry of the provider's asset catalog snapshot.
///
/// The catalog is fetched once per process lifetime and treated as read-only
/// afterwards; candidates are never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCandidate {
    pub symbol: String,
    pub canonical_id: String,
    pub name: String,
}

impl AssetCandidate {
    pub fn new(
        symbol: impl Into<String>,
        canonical_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let symbol = symbol.into();
        let canonical_id = canonical_id.into();
        if symbol.trim().is_empty() {
            return Err(ValidationError::EmptyCatalogSymbol);
        }
        if canonical_id.trim().is_empty() {
            return Err(ValidationError::EmptyCanonicalId);
        }

        Ok(Self {
            symbol,
            canonical_id,
            name: name.into(),
        })
    }
}

/// Outcome of resolving a free-text ticker against the catalog.
///
/// `resolved == false` with an empty canonical id signals that no catalog
/// entry matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedAsset {
    pub ticker: Ticker,
    pub canonical_id: String,
    pub resolved: bool,
}

impl ResolvedAsset {
    pub fn resolved(ticker: Ticker, canonical_id: impl Into<String>) -> Self {
        Self {
            ticker,
            canonical_id: canonical_id.into(),
            resolved: true,
        }
    }

    pub fn unresolved(ticker: Ticker) -> Self {
        Self {
            ticker,
            canonical_id: String::new(),
            resolved: false,
        }
    }

    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }
}

/// A fully valued position: resolved asset, spot price, and derived total.
///
/// Immutable once computed; `total` is always `price * quantity`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Holding {
    pub ticker: Ticker,
    pub canonical_id: String,
    pub quantity: f64,
    pub price: f64,
    pub total: f64,
    pub annual_yield_usd: f64,
}

impl Holding {
    pub fn new(
        ticker: Ticker,
        canonical_id: impl Into<String>,
        quantity: f64,
        price: f64,
        annual_yield_usd: f64,
    ) -> Result<Self, ValidationError> {
        let canonical_id = canonical_id.into();
        if canonical_id.trim().is_empty() {
            return Err(ValidationError::EmptyCanonicalId);
        }
        validate_non_negative("quantity", quantity)?;
        validate_non_negative("price", price)?;
        validate_non_negative("annual_yield_usd", annual_yield_usd)?;

        Ok(Self {
            ticker,
            canonical_id,
            quantity,
            price,
            total: price * quantity,
            annual_yield_usd,
        })
    }
}

/// Aggregated yield for a set of holdings, in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioYield {
    pub one_year_yield: f64,
    pub one_day_yield: f64,
}

/// A valued portfolio with derived totals.
///
/// `portfolio_total` and `portfolio_yield` are always recomputed from the
/// holdings list at construction; there is no partial-update path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Portfolio {
    holdings: Vec<Holding>,
    portfolio_total: f64,
    portfolio_yield: PortfolioYield,
}

impl Portfolio {
    pub fn from_holdings(holdings: Vec<Holding>) -> Self {
        let portfolio_total = holdings.iter().map(|h| h.total).sum();
        let portfolio_yield = crate::valuation::aggregate_yield(&holdings);

        Self {
            holdings,
            portfolio_total,
            portfolio_yield,
        }
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    pub const fn portfolio_total(&self) -> f64 {
        self.portfolio_total
    }

    pub const fn portfolio_yield(&self) -> PortfolioYield {
        self.portfolio_yield
    }
}

/// One historical daily price record for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub ticker: Ticker,
    pub date: Date,
    pub open: f64,
    pub close: f64,
    pub low: f64,
    pub high: f64,
    pub change_percent: f64,
}

impl PriceObservation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ticker: Ticker,
        date: Date,
        open: f64,
        close: f64,
        low: f64,
        high: f64,
        change_percent: f64,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("close", close)?;
        validate_non_negative("low", low)?;
        validate_non_negative("high", high)?;
        if !change_percent.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                field: "change_percent",
            });
        }

        if high < low {
            return Err(ValidationError::InvalidObservationRange);
        }
        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidObservationBounds);
        }

        Ok(Self {
            ticker,
            date,
            open,
            close,
            low,
            high,
            change_percent,
        })
    }
}

/// Per-ticker descriptive statistics over an analysis window.
///
/// `mean` through `max` describe the daily `change_percent` distribution;
/// `low`/`high` are the price extremes across the whole window; `open` and
/// `close` come from the window-global start and end dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilitySummary {
    pub ticker: Ticker,
    pub mean: f64,
    pub std: f64,
    pub quartile_25: f64,
    pub median: f64,
    pub quartile_75: f64,
    pub min: f64,
    pub max: f64,
    pub low: f64,
    pub high: f64,
    pub open: f64,
    pub close: f64,
    #[serde(rename = "return")]
    pub window_return: f64,
}

/// Financial KPIs tracked in growth-delta reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kpi {
    TotalRevenue,
    OperatingExpense,
    NetIncome,
    CostOfRevenue,
    SellingGeneralAdmin,
}

impl Kpi {
    pub const ALL: [Self; 5] = [
        Self::TotalRevenue,
        Self::OperatingExpense,
        Self::NetIncome,
        Self::CostOfRevenue,
        Self::SellingGeneralAdmin,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TotalRevenue => "total_revenue",
            Self::OperatingExpense => "operating_expense",
            Self::NetIncome => "net_income",
            Self::CostOfRevenue => "cost_of_revenue",
            Self::SellingGeneralAdmin => "selling_general_admin",
        }
    }
}

impl std::fmt::Display for Kpi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting cadence for income statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementPeriod {
    Annual,
    Quarterly,
}

impl StatementPeriod {
    /// How many rows back the comparison period sits in a
    /// most-recent-first statement sequence.
    pub const fn lookback(self) -> usize {
        match self {
            Self::Annual => 1,
            Self::Quarterly => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarterly => "quarterly",
        }
    }
}

impl std::fmt::Display for StatementPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One income-statement reporting period for a ticker.
///
/// Sequences of these are always ordered most-recent-first, matching the
/// provider wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatementRow {
    pub report_date: Date,
    pub total_revenue: f64,
    pub operating_expense: f64,
    pub net_income: f64,
    pub cost_of_revenue: f64,
    pub selling_general_admin: f64,
}

impl IncomeStatementRow {
    pub const fn kpi(&self, kpi: Kpi) -> f64 {
        match kpi {
            Kpi::TotalRevenue => self.total_revenue,
            Kpi::OperatingExpense => self.operating_expense,
            Kpi::NetIncome => self.net_income,
            Kpi::CostOfRevenue => self.cost_of_revenue,
            Kpi::SellingGeneralAdmin => self.selling_general_admin,
        }
    }
}

/// Year-over-year and quarter-over-quarter percentage deltas for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaRow {
    pub ticker: Ticker,
    pub total_revenue_yoy: f64,
    pub operating_expense_yoy: f64,
    pub net_income_yoy: f64,
    pub cost_of_revenue_yoy: f64,
    pub selling_general_admin_yoy: f64,
    pub total_revenue_qoq: f64,
    pub operating_expense_qoq: f64,
    pub net_income_qoq: f64,
    pub cost_of_revenue_qoq: f64,
    pub selling_general_admin_qoq: f64,
}

pub(crate) fn validate_non_negative(
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
