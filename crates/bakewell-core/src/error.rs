use std::fmt::{Display, Formatter};

use thiserror::Error;
use time::Date;

/// Validation and contract errors exposed by `bakewell-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("canonical asset id cannot be empty")]
    EmptyCanonicalId,
    #[error("catalog symbol cannot be empty")]
    EmptyCatalogSymbol,

    #[error("invalid provider '{value}', expected one of coingecko, iexcloud")]
    InvalidProvider { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("observation high must be >= low")]
    InvalidObservationRange,
    #[error("observation open/close must be within high/low range")]
    InvalidObservationBounds,
}

/// Which edge of the analysis window an observation was expected at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowBoundary {
    Start,
    End,
}

impl WindowBoundary {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

impl Display for WindowBoundary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised by the aggregating operations (valuation, volatility,
/// growth deltas). None of these are defaulted to zero; callers decide
/// whether to fail the batch or collect per-item failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("ticker '{ticker}' has no match in the asset catalog")]
    AssetNotResolved { ticker: String },

    #[error("no spot price available for asset '{canonical_id}'")]
    PriceUnavailable { canonical_id: String },

    #[error("ticker '{ticker}' has no observation at window {boundary} {date}")]
    MissingWindowBoundary {
        ticker: String,
        boundary: WindowBoundary,
        date: Date,
    },

    #[error("baseline value for '{metric}' is zero; ratio is undefined")]
    ZeroBaseline { metric: String },

    #[error("need {needed} statement rows, provider returned {available}")]
    InsufficientHistory { needed: usize, available: usize },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
