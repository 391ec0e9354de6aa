use std::str::FromStr;

use serde::Serialize;

use bakewell_core::{
    CapabilitySet, CoinGeckoAdapter, IexCloudAdapter, MarketDataSource, ProviderId,
};

use crate::cli::ProvidersArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ProviderRow {
    id: ProviderId,
    endpoints: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
struct ProvidersData {
    providers: Vec<ProviderRow>,
}

fn capabilities_of(id: ProviderId) -> CapabilitySet {
    match id {
        ProviderId::CoinGecko => CoinGeckoAdapter::default().capabilities(),
        ProviderId::IexCloud => IexCloudAdapter::default().capabilities(),
    }
}

pub fn run(args: &ProvidersArgs) -> Result<CommandResult, CliError> {
    let selected = match &args.provider {
        Some(raw) => Some(ProviderId::from_str(raw)?),
        None => None,
    };

    let providers = ProviderId::ALL
        .into_iter()
        .filter(|id| selected.is_none_or(|wanted| wanted == *id))
        .map(|id| ProviderRow {
            id,
            endpoints: capabilities_of(id).supported_endpoints(),
        })
        .collect();

    let data = serde_json::to_value(ProvidersData { providers })?;
    Ok(CommandResult::ok(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_provider_with_its_endpoints() {
        let result = run(&ProvidersArgs { provider: None }).expect("command runs");
        let providers = result.data["providers"].as_array().expect("array");

        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0]["id"], "coingecko");
        assert_eq!(providers[0]["endpoints"][0], "catalog");
        assert_eq!(providers[1]["id"], "iexcloud");
        assert_eq!(providers[1]["endpoints"][0], "price_history");
    }

    #[test]
    fn filters_to_a_named_provider() {
        let result = run(&ProvidersArgs {
            provider: Some(String::from("iexcloud")),
        })
        .expect("command runs");
        let providers = result.data["providers"].as_array().expect("array");

        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0]["id"], "iexcloud");
    }

    #[test]
    fn unknown_provider_name_is_rejected() {
        let error = run(&ProvidersArgs {
            provider: Some(String::from("nasdaq")),
        })
        .expect_err("must fail");
        assert!(matches!(error, CliError::Validation(_)));
    }
}
