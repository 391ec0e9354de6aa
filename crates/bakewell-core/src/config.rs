//! Holdings file loading.
//!
//! Users describe their positions in a YAML document:
//!
//! ```yaml
//! holdings:
//!   - ticker: btc
//!     quantity: 0.5
//!     annual_yield_usd: 120.0
//!   - ticker: eth
//!     quantity: 4
//! ```
//!
//! Entries are validated here so the core only ever sees well-formed
//! [`HoldingInput`] records.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::validate_non_negative;
use crate::valuation::HoldingInput;
use crate::{Ticker, ValidationError};

/// Failures while loading the holdings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read holdings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse holdings file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("holdings file lists no holdings")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct HoldingsDocument {
    holdings: Vec<HoldingEntry>,
}

#[derive(Debug, Deserialize)]
struct HoldingEntry {
    ticker: String,
    quantity: f64,
    #[serde(default)]
    annual_yield_usd: f64,
}

/// Load and validate a holdings file from disk.
pub fn load_holdings(path: &Path) -> Result<Vec<HoldingInput>, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    parse_holdings(&raw)
}

/// Parse and validate a holdings document from YAML text.
pub fn parse_holdings(raw: &str) -> Result<Vec<HoldingInput>, ConfigError> {
    let document: HoldingsDocument = serde_yaml::from_str(raw)?;
    if document.holdings.is_empty() {
        return Err(ConfigError::Empty);
    }

    let mut inputs = Vec::with_capacity(document.holdings.len());
    for entry in document.holdings {
        let ticker = Ticker::parse(&entry.ticker)?;
        validate_non_negative("quantity", entry.quantity)?;
        validate_non_negative("annual_yield_usd", entry.annual_yield_usd)?;
        inputs.push(HoldingInput::new(
            ticker,
            entry.quantity,
            entry.annual_yield_usd,
        ));
    }

    Ok(inputs)
}
