use serde::Serialize;
use time::{Duration, OffsetDateTime};

use bakewell_core::{
    summarize_volatility, HistoryRequest, IexCloudAdapter, MarketDataSource, Ticker,
    VolatilitySummary,
};

use crate::cli::VolatilityArgs;
use crate::error::CliError;

use super::{http_client, iex_auth, CommandResult};

#[derive(Debug, Serialize)]
struct VolatilityData {
    summaries: Vec<VolatilitySummary>,
}

pub async fn run(args: &VolatilityArgs, offline: bool) -> Result<CommandResult, CliError> {
    let tickers = args
        .tickers
        .iter()
        .map(|raw| Ticker::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let adapter = IexCloudAdapter::with_http_client(http_client(offline), iex_auth());

    // Trailing window ending yesterday so partial trading days stay out.
    let today = OffsetDateTime::now_utc().date();
    let end = today - Duration::days(1);
    let start = today - Duration::days(i64::from(args.days));

    let mut observations = Vec::new();
    for ticker in tickers {
        let batch = adapter
            .price_history(HistoryRequest::new(ticker, start, end)?)
            .await?;
        observations.extend(batch.observations);
    }

    let summaries = summarize_volatility(&observations)?;
    let data = serde_json::to_value(VolatilityData { summaries })?;
    Ok(CommandResult::ok(data))
}
