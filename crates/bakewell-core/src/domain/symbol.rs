use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

const MAX_TICKER_LEN: usize = 15;

/// Normalized ticker symbol as supplied by the user.
///
/// Tickers are trimmed and uppercased on parse. Matching against catalog
/// symbols is case-insensitive, so a `Ticker` compares equal to both `uni`
/// and `UNI` catalog spellings via [`Ticker::matches_symbol`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Parse and normalize a ticker to uppercase.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTicker);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_TICKER_LEN {
            return Err(ValidationError::TickerTooLong {
                len,
                max: MAX_TICKER_LEN,
            });
        }

        // Crypto tickers may start with a digit (1INCH), so unlike equity
        // symbols there is no leading-letter rule.
        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-';
            if !valid {
                return Err(ValidationError::TickerInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a catalog symbol.
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.0.eq_ignore_ascii_case(symbol.trim())
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Ticker {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Ticker {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_ticker() {
        let parsed = Ticker::parse(" uni ").expect("ticker should parse");
        assert_eq!(parsed.as_str(), "UNI");
    }

    #[test]
    fn accepts_leading_digit() {
        let parsed = Ticker::parse("1inch").expect("ticker should parse");
        assert_eq!(parsed.as_str(), "1INCH");
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = Ticker::parse("BTC$").expect_err("must fail");
        assert!(matches!(err, ValidationError::TickerInvalidChar { .. }));
    }

    #[test]
    fn matches_catalog_symbols_case_insensitively() {
        let ticker = Ticker::parse("UNI").expect("ticker should parse");
        assert!(ticker.matches_symbol("uni"));
        assert!(ticker.matches_symbol(" Uni "));
        assert!(!ticker.matches_symbol("unfi"));
    }
}
