//! CoinGecko adapter: asset catalog and USD spot prices.
//!
//! With a real transport the adapter talks to the public CoinGecko v3 API;
//! with a mock transport it serves a small deterministic catalog (including
//! a symbol collision) so resolver and valuation flows can run offline.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{
    CapabilitySet, CatalogSnapshot, Endpoint, HistoryBatch, HistoryRequest, MarketDataSource,
    PriceBatch, PriceRequest, ProviderId, SourceError, SpotPrice, StatementsBatch,
    StatementsRequest,
};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::AssetCandidate;

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko adapter supporting both real API calls and mock mode.
#[derive(Clone)]
pub struct CoinGeckoAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    use_real_api: bool,
}

impl Default for CoinGeckoAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            base_url: String::from(DEFAULT_BASE_URL),
            use_real_api: false,
        }
    }
}

impl CoinGeckoAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            use_real_api,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_real_catalog(&self) -> Result<CatalogSnapshot, SourceError> {
        let endpoint = format!("{}/coins/list", self.base_url);
        let body = self.execute(&endpoint).await?;

        let entries: Vec<CoinListEntry> = serde_json::from_str(&body).map_err(|e| {
            SourceError::internal(format!("failed to parse coingecko coin list: {e}"))
        })?;

        // Entries with blank symbols or ids cannot be resolved against and
        // are dropped at the edge.
        let candidates = entries
            .into_iter()
            .filter_map(|entry| AssetCandidate::new(entry.symbol, entry.id, entry.name).ok())
            .collect();

        Ok(CatalogSnapshot { candidates })
    }

    async fn fetch_real_prices(&self, req: &PriceRequest) -> Result<PriceBatch, SourceError> {
        let ids_param = req.canonical_ids.join(",");
        let endpoint = format!(
            "{}/simple/price?ids={}&vs_currencies=usd",
            self.base_url,
            urlencoding::encode(&ids_param)
        );
        let body = self.execute(&endpoint).await?;

        let quotes: HashMap<String, CurrencyQuote> = serde_json::from_str(&body).map_err(|e| {
            SourceError::internal(format!("failed to parse coingecko prices: {e}"))
        })?;

        // Preserve request order; ids the provider has no quote for are
        // simply absent from the batch.
        let prices = req
            .canonical_ids
            .iter()
            .filter_map(|id| {
                let usd = quotes.get(id)?.usd?;
                Some(SpotPrice {
                    canonical_id: id.clone(),
                    usd,
                })
            })
            .collect();

        Ok(PriceBatch { prices })
    }

    async fn execute(&self, endpoint: &str) -> Result<String, SourceError> {
        let request = HttpRequest::get(endpoint).with_timeout_ms(10_000);
        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("coingecko transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("coingecko transport error: {}", error.message()))
            }
        })?;

        if response.status == 429 {
            return Err(SourceError::rate_limited("coingecko rate limit exceeded"));
        }
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "coingecko upstream returned status {}",
                response.status
            )));
        }

        Ok(response.body)
    }
}

impl MarketDataSource for CoinGeckoAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::CoinGecko
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::token_data()
    }

    fn catalog<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<CatalogSnapshot, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_catalog().await
            } else {
                Ok(CatalogSnapshot {
                    candidates: fake_catalog(),
                })
            }
        })
    }

    fn spot_prices<'a>(
        &'a self,
        req: PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_prices(&req).await
            } else {
                Ok(fake_prices(&req))
            }
        })
    }

    fn price_history<'a>(
        &'a self,
        _req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HistoryBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            Err(SourceError::unsupported_endpoint(
                ProviderId::CoinGecko,
                Endpoint::PriceHistory,
            ))
        })
    }

    fn income_statements<'a>(
        &'a self,
        _req: StatementsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<StatementsBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            Err(SourceError::unsupported_endpoint(
                ProviderId::CoinGecko,
                Endpoint::IncomeStatements,
            ))
        })
    }
}

// CoinGecko API response structures
#[derive(Debug, Clone, Deserialize)]
struct CoinListEntry {
    id: String,
    symbol: String,
    name: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct CurrencyQuote {
    #[serde(default)]
    usd: Option<f64>,
}

/// Deterministic offline catalog. Includes the UNI symbol collision so the
/// resolver tie-break is exercisable without network access.
fn fake_catalog() -> Vec<AssetCandidate> {
    [
        ("btc", "bitcoin", "Bitcoin"),
        ("eth", "ethereum", "Ethereum"),
        ("uni", "unicorn-token", "Unicorn Token"),
        ("uni", "universe-token", "Universe Token"),
        ("uni", "uniswap", "Uniswap"),
        ("sol", "solana", "Solana"),
        ("ada", "cardano", "Cardano"),
        ("dot", "polkadot", "Polkadot"),
    ]
    .into_iter()
    .map(|(symbol, id, name)| {
        AssetCandidate::new(symbol, id, name).expect("offline catalog entries are valid")
    })
    .collect()
}

fn fake_prices(req: &PriceRequest) -> PriceBatch {
    let prices = req
        .canonical_ids
        .iter()
        .map(|id| SpotPrice {
            canonical_id: id.clone(),
            usd: 1.0 + (id_seed(id) % 60_000) as f64 / 1.7,
        })
        .collect();
    PriceBatch { prices }
}

fn id_seed(id: &str) -> u64 {
    id.bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_catalog_contains_the_uni_collision() {
        let adapter = CoinGeckoAdapter::default();
        let snapshot = adapter.catalog().await.expect("catalog should load");

        let uni_entries = snapshot
            .candidates
            .iter()
            .filter(|c| c.symbol == "uni")
            .count();
        assert_eq!(uni_entries, 3);
    }

    #[tokio::test]
    async fn offline_prices_are_deterministic_per_id() {
        let adapter = CoinGeckoAdapter::default();
        let req = PriceRequest::new(vec![String::from("bitcoin"), String::from("ethereum")])
            .expect("valid request");

        let first = adapter.spot_prices(req.clone()).await.expect("prices");
        let second = adapter.spot_prices(req).await.expect("prices");
        assert_eq!(first, second);
        assert_eq!(first.prices.len(), 2);
        assert!(first.prices.iter().all(|p| p.usd > 0.0));
    }

    #[tokio::test]
    async fn history_endpoint_is_unsupported() {
        use time::{Date, Month};

        let adapter = CoinGeckoAdapter::default();
        let req = HistoryRequest::new(
            crate::Ticker::parse("BTC").expect("valid ticker"),
            Date::from_calendar_date(2024, Month::January, 1).expect("valid date"),
            Date::from_calendar_date(2024, Month::January, 31).expect("valid date"),
        )
        .expect("valid request");

        let error = adapter.price_history(req).await.expect_err("must fail");
        assert_eq!(error.code(), "source.unsupported_endpoint");
    }

    #[test]
    fn parses_real_price_payload() {
        let body = r#"{"bitcoin":{"usd":64250.12},"ethereum":{"usd":3401.5}}"#;
        let quotes: HashMap<String, CurrencyQuote> =
            serde_json::from_str(body).expect("payload should parse");
        assert_eq!(quotes["bitcoin"].usd, Some(64250.12));
    }
}
