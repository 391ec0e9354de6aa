//! Canonical domain types for bakewell portfolio analytics.
//!
//! All models are strongly typed, validated at construction, and fully
//! serde-serializable. Derived values ([`Holding::total`], the portfolio
//! totals) are computed by constructors and never independently set.

mod models;
mod symbol;

pub use models::{
    AssetCandidate, DeltaRow, Holding, IncomeStatementRow, Kpi, Portfolio, PortfolioYield,
    PriceObservation, ResolvedAsset, StatementPeriod, VolatilitySummary,
};
pub use symbol::Ticker;

pub(crate) use models::validate_non_negative;
