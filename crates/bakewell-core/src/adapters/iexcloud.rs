//! IEX Cloud adapter: historical daily prices and income statements.
//!
//! Equities data keys directly off the provider symbol, so no resolver pass
//! is involved on this path. With a mock transport the adapter serves
//! deterministic per-ticker series so analytics flows can run offline.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::{Date, Month};

use crate::data_source::{
    CapabilitySet, CatalogSnapshot, Endpoint, HistoryBatch, HistoryRequest, MarketDataSource,
    PriceBatch, PriceRequest, ProviderId, SourceError, StatementsBatch, StatementsRequest,
};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, NoopHttpClient};
use crate::{IncomeStatementRow, PriceObservation, StatementPeriod, Ticker, ValidationError};

const DEFAULT_BASE_URL: &str = "https://cloud.iexapis.com/stable";

/// IEX Cloud adapter supporting both real API calls and mock mode.
#[derive(Clone)]
pub struct IexCloudAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    use_real_api: bool,
}

impl Default for IexCloudAdapter {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            auth: HttpAuth::None,
            base_url: String::from(DEFAULT_BASE_URL),
            use_real_api: false,
        }
    }
}

impl IexCloudAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, auth: HttpAuth) -> Self {
        let use_real_api = !http_client.is_mock();
        Self {
            http_client,
            auth,
            use_real_api,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_real_history(&self, req: &HistoryRequest) -> Result<HistoryBatch, SourceError> {
        let span_days = (req.end - req.start).whole_days();
        let range = match span_days {
            0..=5 => "5d",
            6..=30 => "1m",
            31..=90 => "3m",
            91..=365 => "1y",
            _ => "2y",
        };

        let endpoint = format!(
            "{}/stock/{}/chart/{}?chartCloseOnly=false",
            self.base_url,
            urlencoding::encode(req.ticker.as_str()),
            range
        );
        let body = self.execute(&endpoint).await?;

        let rows: Vec<ChartRow> = serde_json::from_str(&body)
            .map_err(|e| SourceError::internal(format!("failed to parse iex chart: {e}")))?;

        // The coarse range granularity can over-fetch; trim to the window
        // and drop rows the provider left partially populated.
        let observations = rows
            .into_iter()
            .filter(|row| row.date >= req.start && row.date <= req.end)
            .filter_map(|row| {
                PriceObservation::new(
                    req.ticker.clone(),
                    row.date,
                    row.open?,
                    row.close?,
                    row.low?,
                    row.high?,
                    row.change_percent?,
                )
                .ok()
            })
            .collect();

        Ok(HistoryBatch { observations })
    }

    async fn fetch_real_statements(
        &self,
        req: &StatementsRequest,
    ) -> Result<StatementsBatch, SourceError> {
        let endpoint = format!(
            "{}/stock/{}/income?period={}&last={}",
            self.base_url,
            urlencoding::encode(req.ticker.as_str()),
            req.period,
            req.count
        );
        let body = self.execute(&endpoint).await?;

        let response: IncomeResponse = serde_json::from_str(&body)
            .map_err(|e| SourceError::internal(format!("failed to parse iex income: {e}")))?;

        let rows = response
            .income
            .into_iter()
            .take(req.count)
            .map(|entry| IncomeStatementRow {
                report_date: entry.report_date,
                total_revenue: entry.total_revenue,
                operating_expense: entry.operating_expense,
                net_income: entry.net_income,
                cost_of_revenue: entry.cost_of_revenue,
                selling_general_admin: entry.selling_general_and_admin,
            })
            .collect();

        Ok(StatementsBatch {
            ticker: req.ticker.clone(),
            period: req.period,
            rows,
        })
    }

    async fn execute(&self, endpoint: &str) -> Result<String, SourceError> {
        let request = HttpRequest::get(endpoint)
            .with_auth(&self.auth)
            .with_timeout_ms(10_000);
        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.retryable() {
                SourceError::unavailable(format!("iex transport error: {}", error.message()))
            } else {
                SourceError::internal(format!("iex transport error: {}", error.message()))
            }
        })?;

        if response.status == 429 {
            return Err(SourceError::rate_limited("iex rate limit exceeded"));
        }
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "iex upstream returned status {}",
                response.status
            )));
        }

        Ok(response.body)
    }
}

impl MarketDataSource for IexCloudAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::IexCloud
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::equity_data()
    }

    fn catalog<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = Result<CatalogSnapshot, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            Err(SourceError::unsupported_endpoint(
                ProviderId::IexCloud,
                Endpoint::Catalog,
            ))
        })
    }

    fn spot_prices<'a>(
        &'a self,
        _req: PriceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PriceBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            Err(SourceError::unsupported_endpoint(
                ProviderId::IexCloud,
                Endpoint::SpotPrices,
            ))
        })
    }

    fn price_history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HistoryBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_history(&req).await
            } else {
                fake_history(&req)
            }
        })
    }

    fn income_statements<'a>(
        &'a self,
        req: StatementsRequest,
    ) -> Pin<Box<dyn Future<Output = Result<StatementsBatch, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if self.use_real_api {
                self.fetch_real_statements(&req).await
            } else {
                Ok(fake_statements(&req))
            }
        })
    }
}

// IEX Cloud API response structures
#[derive(Debug, Clone, Deserialize)]
struct ChartRow {
    date: Date,
    open: Option<f64>,
    close: Option<f64>,
    low: Option<f64>,
    high: Option<f64>,
    #[serde(rename = "changePercent")]
    change_percent: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct IncomeResponse {
    income: Vec<IncomeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct IncomeEntry {
    #[serde(rename = "reportDate")]
    report_date: Date,
    #[serde(rename = "totalRevenue", default)]
    total_revenue: f64,
    #[serde(rename = "operatingExpense", default)]
    operating_expense: f64,
    #[serde(rename = "netIncome", default)]
    net_income: f64,
    #[serde(rename = "costOfRevenue", default)]
    cost_of_revenue: f64,
    #[serde(rename = "sellingGeneralAndAdmin", default)]
    selling_general_and_admin: f64,
}

/// One deterministic observation per calendar day across the window.
fn fake_history(req: &HistoryRequest) -> Result<HistoryBatch, SourceError> {
    let seed = ticker_seed(&req.ticker);
    let mut observations = Vec::new();
    let mut date = req.start;
    let mut index: u64 = 0;

    loop {
        let base = 80.0 + ((seed.wrapping_add(index)) % 400) as f64 / 10.0;
        let change_percent = ((seed.wrapping_add(index)) % 9) as f64 / 4.0 - 1.0;

        let observation = PriceObservation::new(
            req.ticker.clone(),
            date,
            base,
            base + 0.30,
            base - 0.80,
            base + 1.20,
            change_percent,
        )
        .map_err(validation_to_error)?;
        observations.push(observation);

        if date == req.end {
            break;
        }
        date = date
            .next_day()
            .ok_or_else(|| SourceError::internal("history window exceeds calendar range"))?;
        index += 1;
    }

    Ok(HistoryBatch { observations })
}

/// Deterministic statement rows, most-recent-first, with KPIs shrinking as
/// rows age so every delta is well-defined and positive.
fn fake_statements(req: &StatementsRequest) -> StatementsBatch {
    let seed = ticker_seed(&req.ticker);
    let base_revenue = 50_000_000.0 + (seed % 1_000) as f64 * 100_000.0;

    let rows = (0..req.count)
        .map(|index| {
            let revenue = base_revenue * (1.0 - 0.03 * index as f64);
            IncomeStatementRow {
                report_date: fake_report_date(req.period, index),
                total_revenue: revenue,
                operating_expense: revenue * 0.35,
                net_income: revenue * 0.18,
                cost_of_revenue: revenue * 0.32,
                selling_general_admin: revenue * 0.09,
            }
        })
        .collect();

    StatementsBatch {
        ticker: req.ticker.clone(),
        period: req.period,
        rows,
    }
}

fn fake_report_date(period: StatementPeriod, index: usize) -> Date {
    match period {
        StatementPeriod::Annual => {
            Date::from_calendar_date(2024 - index as i32, Month::December, 31)
                .unwrap_or(Date::MIN)
        }
        StatementPeriod::Quarterly => {
            const QUARTER_ENDS: [(Month, u8); 4] = [
                (Month::December, 31),
                (Month::September, 30),
                (Month::June, 30),
                (Month::March, 31),
            ];
            let (month, day) = QUARTER_ENDS[index % 4];
            let year = 2024 - (index / 4) as i32;
            Date::from_calendar_date(year, month, day).unwrap_or(Date::MIN)
        }
    }
}

fn ticker_seed(ticker: &Ticker) -> u64 {
    ticker.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

fn validation_to_error(error: ValidationError) -> SourceError {
    SourceError::internal(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::{HttpError, HttpResponse};

    fn date(year: i32, month: Month, day: u8) -> Date {
        Date::from_calendar_date(year, month, day).expect("valid date")
    }

    /// Non-mock transport serving a fixed body, so the real parsing path runs.
    struct CannedHttpClient {
        body: &'static str,
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            _request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            Box::pin(async move { Ok(HttpResponse::ok_json(self.body)) })
        }
    }

    #[tokio::test]
    async fn offline_history_covers_every_day_in_the_window() {
        let adapter = IexCloudAdapter::default();
        let req = HistoryRequest::new(
            Ticker::parse("AAPL").expect("valid ticker"),
            date(2024, Month::January, 1),
            date(2024, Month::January, 31),
        )
        .expect("valid request");

        let batch = adapter.price_history(req).await.expect("history");
        assert_eq!(batch.observations.len(), 31);
        assert_eq!(batch.observations[0].date, date(2024, Month::January, 1));
        assert_eq!(batch.observations[30].date, date(2024, Month::January, 31));
    }

    #[tokio::test]
    async fn offline_statements_are_most_recent_first() {
        let adapter = IexCloudAdapter::default();
        let req = StatementsRequest::new(
            Ticker::parse("MSFT").expect("valid ticker"),
            StatementPeriod::Quarterly,
            5,
        )
        .expect("valid request");

        let batch = adapter.income_statements(req).await.expect("statements");
        assert_eq!(batch.rows.len(), 5);
        for window in batch.rows.windows(2) {
            assert!(window[0].report_date > window[1].report_date);
            assert!(window[0].total_revenue > window[1].total_revenue);
        }
    }

    #[tokio::test]
    async fn catalog_endpoint_is_unsupported() {
        let adapter = IexCloudAdapter::default();
        let error = adapter.catalog().await.expect_err("must fail");
        assert_eq!(error.code(), "source.unsupported_endpoint");
    }

    #[tokio::test]
    async fn chart_rows_missing_change_percent_are_dropped() {
        let body = r#"[
            {"date":"2024-01-02","open":185.2,"close":186.1,"low":184.9,"high":186.6,"changePercent":0.0049},
            {"date":"2024-01-03","open":186.0,"close":185.4,"low":184.8,"high":186.3}
        ]"#;
        let adapter = IexCloudAdapter::with_http_client(
            Arc::new(CannedHttpClient { body }),
            HttpAuth::None,
        );
        let req = HistoryRequest::new(
            Ticker::parse("AAPL").expect("valid ticker"),
            date(2024, Month::January, 1),
            date(2024, Month::January, 31),
        )
        .expect("valid request");

        let batch = adapter.price_history(req).await.expect("history");
        assert_eq!(batch.observations.len(), 1);
        assert_eq!(batch.observations[0].date, date(2024, Month::January, 2));
    }

    #[test]
    fn parses_real_chart_payload() {
        let body = r#"[{"date":"2024-01-02","open":185.2,"close":186.1,"low":184.9,"high":186.6,"changePercent":0.0049}]"#;
        let rows: Vec<ChartRow> = serde_json::from_str(body).expect("payload should parse");
        assert_eq!(rows[0].date, date(2024, Month::January, 2));
        assert_eq!(rows[0].close, Some(186.1));
    }

    #[test]
    fn parses_real_income_payload() {
        let body = r#"{"income":[{"reportDate":"2024-09-28","totalRevenue":94930000000,"operatingExpense":14288000000,"netIncome":14736000000,"costOfRevenue":51051000000,"sellingGeneralAndAdmin":6523000000}]}"#;
        let response: IncomeResponse = serde_json::from_str(body).expect("payload should parse");
        assert_eq!(response.income.len(), 1);
        assert_eq!(response.income[0].total_revenue, 94_930_000_000.0);
    }
}
