//! Core contracts and analytics for bakewell.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - Ticker-to-canonical-asset resolution with collision tie-breaks
//! - Portfolio valuation and yield aggregation
//! - Time-series analytics (volatility summaries, growth deltas)
//! - APR/APY rate conversion
//! - Data source traits, provider adapters, and the HTTP transport seam

pub mod adapters;
pub mod analytics;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod rates;
pub mod resolver;
pub mod valuation;

pub use adapters::{CoinGeckoAdapter, IexCloudAdapter};
pub use analytics::{compute_delta, delta_report, summarize_volatility, DeltaReportError};
pub use config::{load_holdings, parse_holdings, ConfigError};
pub use data_source::{
    CapabilitySet, CatalogSnapshot, Endpoint, HistoryBatch, HistoryRequest, MarketDataSource,
    PriceBatch, PriceRequest, ProviderId, SourceError, SourceErrorKind, SpotPrice, StatementsBatch,
    StatementsRequest,
};
pub use domain::{
    AssetCandidate, DeltaRow, Holding, IncomeStatementRow, Kpi, Portfolio, PortfolioYield,
    PriceObservation, ResolvedAsset, StatementPeriod, Ticker, VolatilitySummary,
};
pub use error::{AnalysisError, ValidationError, WindowBoundary};
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use rates::{apr_to_apy, apy_to_apr, DEFAULT_COMPOUNDING_PERIODS};
pub use resolver::{AssetResolver, ExclusionRule};
pub use valuation::{
    aggregate_yield, value_holdings, value_holdings_partial, HoldingFailure, HoldingInput,
    PriceBook,
};
