//! Market data source trait and request/response types.
//!
//! This module defines the adapter contract (`MarketDataSource`) that all
//! provider implementations follow, with one endpoint per kind of data the
//! analysis pipeline consumes:
//!
//! | Endpoint | Request | Response | Description |
//! |----------|---------|----------|-------------|
//! | Catalog | — | [`CatalogSnapshot`] | Asset catalog, fetched once |
//! | SpotPrices | [`PriceRequest`] | [`PriceBatch`] | USD spot quotes |
//! | PriceHistory | [`HistoryRequest`] | [`HistoryBatch`] | Daily price observations |
//! | IncomeStatements | [`StatementsRequest`] | [`StatementsBatch`] | Financial statements |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    AssetCandidate, IncomeStatementRow, PriceObservation, StatementPeriod, Ticker, ValidationError,
};

/// Canonical provider identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    CoinGecko,
    IexCloud,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::CoinGecko, Self::IexCloud];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CoinGecko => "coingecko",
            Self::IexCloud => "iexcloud",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "coingecko" => Ok(Self::CoinGecko),
            "iexcloud" => Ok(Self::IexCloud),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}

/// Data endpoint type used for capability checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Catalog,
    SpotPrices,
    PriceHistory,
    IncomeStatements,
}

impl Endpoint {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::SpotPrices => "spot_prices",
            Self::PriceHistory => "price_history",
            Self::IncomeStatements => "income_statements",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported endpoint matrix for a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub catalog: bool,
    pub spot_prices: bool,
    pub price_history: bool,
    pub income_statements: bool,
}

impl CapabilitySet {
    pub const fn new(
        catalog: bool,
        spot_prices: bool,
        price_history: bool,
        income_statements: bool,
    ) -> Self {
        Self {
            catalog,
            spot_prices,
            price_history,
            income_statements,
        }
    }

    /// Crypto-side capabilities: catalog and spot quotes.
    pub const fn token_data() -> Self {
        Self::new(true, true, false, false)
    }

    /// Equities-side capabilities: history and statements.
    pub const fn equity_data() -> Self {
        Self::new(false, false, true, true)
    }

    pub const fn supports(self, endpoint: Endpoint) -> bool {
        match endpoint {
            Endpoint::Catalog => self.catalog,
            Endpoint::SpotPrices => self.spot_prices,
            Endpoint::PriceHistory => self.price_history,
            Endpoint::IncomeStatements => self.income_statements,
        }
    }

    pub fn supported_endpoints(self) -> Vec<&'static str> {
        let mut values = Vec::with_capacity(4);
        if self.catalog {
            values.push("catalog");
        }
        if self.spot_prices {
            values.push("spot_prices");
        }
        if self.price_history {
            values.push("price_history");
        }
        if self.income_statements {
            values.push("income_statements");
        }
        values
    }
}

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    UnsupportedEndpoint,
    Unavailable,
    RateLimited,
    InvalidRequest,
    Internal,
}

/// Structured source error returned by provider adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn unsupported_endpoint(provider: ProviderId, endpoint: Endpoint) -> Self {
        Self {
            kind: SourceErrorKind::UnsupportedEndpoint,
            message: format!("endpoint '{endpoint}' is not supported by '{provider}'"),
            retryable: false,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::UnsupportedEndpoint => "source.unsupported_endpoint",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for spot price lookups, keyed by canonical asset id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRequest {
    pub canonical_ids: Vec<String>,
}

impl PriceRequest {
    pub fn new(canonical_ids: Vec<String>) -> Result<Self, SourceError> {
        if canonical_ids.is_empty() {
            return Err(SourceError::invalid_request(
                "price request must include at least one canonical id",
            ));
        }
        if canonical_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(SourceError::invalid_request(
                "price request canonical ids must not be empty",
            ));
        }
        Ok(Self { canonical_ids })
    }
}

/// Request payload for historical price observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub ticker: Ticker,
    pub start: Date,
    pub end: Date,
}

impl HistoryRequest {
    pub fn new(ticker: Ticker, start: Date, end: Date) -> Result<Self, SourceError> {
        if start > end {
            return Err(SourceError::invalid_request(format!(
                "history window start {start} is after end {end}"
            )));
        }
        Ok(Self { ticker, start, end })
    }
}

/// Request payload for income statement rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementsRequest {
    pub ticker: Ticker,
    pub period: StatementPeriod,
    pub count: usize,
}

impl StatementsRequest {
    pub fn new(ticker: Ticker, period: StatementPeriod, count: usize) -> Result<Self, SourceError> {
        if count == 0 {
            return Err(SourceError::invalid_request(
                "statements request count must be greater than zero",
            ));
        }
        Ok(Self {
            ticker,
            period,
            count,
        })
    }
}

/// One-time asset catalog snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub candidates: Vec<AssetCandidate>,
}

/// A single USD spot quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotPrice {
    pub canonical_id: String,
    pub usd: f64,
}

/// Normalized spot price batch. Ids the provider has no quote for are
/// absent, not zeroed; the valuation layer decides what that means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBatch {
    pub prices: Vec<SpotPrice>,
}

/// Normalized historical observation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryBatch {
    pub observations: Vec<PriceObservation>,
}

/// Normalized statement batch, rows most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementsBatch {
    pub ticker: Ticker,
    pub period: StatementPeriod,
    pub rows: Vec<IncomeStatementRow>,
}

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`; methods return boxed futures so
/// the trait stays object-safe for `&dyn MarketDataSource` callers.
pub trait MarketDataSource: Send + Sync {
    /// Unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Supported endpoint matrix.
    fn capabilities(&self) -> CapabilitySet;

    /// Fetch the full asset catalog. Intended to be called once per
    /// process; callers hold the snapshot as read-only state.
    fn catalog<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<CatalogSnapshot, SourceError>> + Send + 'a>>;

    /// Fetch USD spot prices for resolved assets.
    fn spot_prices<'a>(
        &'a self,
        req: PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceBatch, SourceError>> + Send + 'a>>;

    /// Fetch daily price observations for a ticker over a date window.
    fn price_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HistoryBatch, SourceError>> + Send + 'a>>;

    /// Fetch income statement rows, most-recent-first.
    fn income_statements<'a>(
        &'a self,
        req: StatementsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<StatementsBatch, SourceError>> + Send + 'a>>;
}
