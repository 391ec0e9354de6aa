use serde::Serialize;

use bakewell_core::{delta_report, DeltaRow, IexCloudAdapter, Ticker};

use crate::cli::DeltasArgs;
use crate::error::CliError;

use super::{http_client, iex_auth, CommandResult};

#[derive(Debug, Serialize)]
struct DeltasData {
    deltas: Vec<DeltaRow>,
}

pub async fn run(args: &DeltasArgs, offline: bool) -> Result<CommandResult, CliError> {
    let tickers = args
        .tickers
        .iter()
        .map(|raw| Ticker::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let adapter = IexCloudAdapter::with_http_client(http_client(offline), iex_auth());
    let deltas = delta_report(&tickers, &adapter).await?;

    let data = serde_json::to_value(DeltasData { deltas })?;
    Ok(CommandResult::ok(data))
}
