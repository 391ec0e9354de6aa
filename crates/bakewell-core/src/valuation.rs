//! Portfolio valuation and yield aggregation.
//!
//! Valuation consumes user holdings input, the asset resolver, and a spot
//! price book, and produces a [`Portfolio`] whose totals are internally
//! consistent with its holdings. A failure while valuing one holding is
//! never silently dropped: the strict entry point fails the batch, the
//! partial entry point returns every failure alongside the valued rest.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::resolver::AssetResolver;
use crate::{AnalysisError, Holding, Portfolio, PortfolioYield, Ticker};

const DAYS_PER_YEAR: f64 = 365.0;

/// One user-supplied position before resolution and pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldingInput {
    pub ticker: Ticker,
    pub quantity: f64,
    pub annual_yield_usd: f64,
}

impl HoldingInput {
    pub fn new(ticker: Ticker, quantity: f64, annual_yield_usd: f64) -> Self {
        Self {
            ticker,
            quantity,
            annual_yield_usd,
        }
    }
}

/// Spot prices keyed by canonical asset id, USD-denominated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBook {
    prices: BTreeMap<String, f64>,
}

impl PriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, canonical_id: impl Into<String>, usd: f64) {
        self.prices.insert(canonical_id.into(), usd);
    }

    pub fn get(&self, canonical_id: &str) -> Option<f64> {
        self.prices.get(canonical_id).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl FromIterator<(String, f64)> for PriceBook {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            prices: iter.into_iter().collect(),
        }
    }
}

/// A holding that could not be valued, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoldingFailure {
    pub ticker: Ticker,
    pub error: String,
}

/// Value every holding or fail the whole batch on the first bad one.
pub fn value_holdings(
    inputs: &[HoldingInput],
    resolver: &AssetResolver,
    prices: &PriceBook,
) -> Result<Portfolio, AnalysisError> {
    let mut holdings = Vec::with_capacity(inputs.len());
    for input in inputs {
        holdings.push(value_one(input, resolver, prices)?);
    }
    Ok(Portfolio::from_holdings(holdings))
}

/// Value what can be valued and report every failure alongside.
///
/// The returned portfolio covers only the successful holdings; callers must
/// treat a non-empty failure list as an incomplete total.
pub fn value_holdings_partial(
    inputs: &[HoldingInput],
    resolver: &AssetResolver,
    prices: &PriceBook,
) -> (Portfolio, Vec<HoldingFailure>) {
    let mut holdings = Vec::with_capacity(inputs.len());
    let mut failures = Vec::new();

    for input in inputs {
        match value_one(input, resolver, prices) {
            Ok(holding) => holdings.push(holding),
            Err(error) => failures.push(HoldingFailure {
                ticker: input.ticker.clone(),
                error: error.to_string(),
            }),
        }
    }

    (Portfolio::from_holdings(holdings), failures)
}

fn value_one(
    input: &HoldingInput,
    resolver: &AssetResolver,
    prices: &PriceBook,
) -> Result<Holding, AnalysisError> {
    let resolved = resolver.resolve(&input.ticker);
    if !resolved.is_resolved() {
        return Err(AnalysisError::AssetNotResolved {
            ticker: input.ticker.to_string(),
        });
    }

    let price = prices
        .get(&resolved.canonical_id)
        .ok_or_else(|| AnalysisError::PriceUnavailable {
            canonical_id: resolved.canonical_id.clone(),
        })?;

    Ok(Holding::new(
        input.ticker.clone(),
        resolved.canonical_id,
        input.quantity,
        price,
        input.annual_yield_usd,
    )?)
}

/// Aggregate annual and daily yield across holdings.
///
/// Callable independently of [`Portfolio`] construction.
pub fn aggregate_yield(holdings: &[Holding]) -> PortfolioYield {
    let one_year_yield: f64 = holdings.iter().map(|h| h.annual_yield_usd).sum();
    PortfolioYield {
        one_year_yield,
        one_day_yield: one_year_yield / DAYS_PER_YEAR,
    }
}
