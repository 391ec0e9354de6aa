use serde::Serialize;

use bakewell_core::{
    apr_to_apy, value_holdings_partial, AssetResolver, CoinGeckoAdapter, ExclusionRule,
    HoldingFailure, MarketDataSource, Portfolio, PriceBook, PriceRequest,
};

use crate::cli::ValuateArgs;
use crate::error::CliError;

use super::{http_client, CommandResult};

#[derive(Debug, Serialize)]
struct ValuateData {
    portfolio: Portfolio,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failures: Vec<HoldingFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    yield_apy: Option<f64>,
}

pub async fn run(args: &ValuateArgs, offline: bool) -> Result<CommandResult, CliError> {
    let inputs = bakewell_core::load_holdings(&args.holdings)?;
    let adapter = CoinGeckoAdapter::with_http_client(http_client(offline));

    let snapshot = adapter.catalog().await?;
    let resolver = AssetResolver::new(snapshot.candidates, ExclusionRule::wrapped_token());

    // Resolve up front so a single batch request covers every holding.
    let mut ids: Vec<String> = inputs
        .iter()
        .map(|input| resolver.resolve(&input.ticker))
        .filter(|resolved| resolved.resolved)
        .map(|resolved| resolved.canonical_id)
        .collect();
    ids.sort();
    ids.dedup();

    let mut prices = PriceBook::new();
    if !ids.is_empty() {
        let batch = adapter.spot_prices(PriceRequest::new(ids)?).await?;
        for price in batch.prices {
            prices.insert(price.canonical_id, price.usd);
        }
    }

    let (portfolio, failures) = value_holdings_partial(&inputs, &resolver, &prices);
    let all_failed = portfolio.holdings().is_empty() && !failures.is_empty();
    let warnings: Vec<String> = failures
        .iter()
        .map(|failure| format!("holding '{}' skipped: {}", failure.ticker, failure.error))
        .collect();

    let yield_apy = match args.as_apy {
        Some(periods) => {
            if !periods.is_finite() || periods <= 0.0 {
                return Err(CliError::Command(format!(
                    "compounding periods must be positive, got {periods}"
                )));
            }
            (portfolio.portfolio_total() > 0.0).then(|| {
                let apr = portfolio.portfolio_yield().one_year_yield / portfolio.portfolio_total();
                apr_to_apy(apr, periods)
            })
        }
        None => None,
    };

    let data = serde_json::to_value(ValuateData {
        portfolio,
        failures,
        yield_apy,
    })?;

    let mut result = CommandResult::ok(data).with_warnings(warnings);
    if all_failed {
        result = result.failed();
    }
    Ok(result)
}
