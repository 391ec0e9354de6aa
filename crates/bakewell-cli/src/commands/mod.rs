mod deltas;
mod providers;
mod rates;
mod valuate;
mod volatility;

use std::sync::Arc;

use serde_json::Value;

use bakewell_core::{HttpAuth, HttpClient, NoopHttpClient, ReqwestHttpClient};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Environment variable holding the IEX Cloud API token.
const IEX_TOKEN_VAR: &str = "IEX_TOKEN";

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub failed: bool,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            failed: false,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn failed(mut self) -> Self {
        self.failed = true;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Valuate(args) => valuate::run(args, cli.offline).await,
        Command::Volatility(args) => volatility::run(args, cli.offline).await,
        Command::Deltas(args) => deltas::run(args, cli.offline).await,
        Command::Rates(args) => rates::run(args),
        Command::Providers(args) => providers::run(args),
    }
}

pub(crate) fn http_client(offline: bool) -> Arc<dyn HttpClient> {
    if offline {
        Arc::new(NoopHttpClient)
    } else {
        Arc::new(ReqwestHttpClient::new())
    }
}

pub(crate) fn iex_auth() -> HttpAuth {
    match std::env::var(IEX_TOKEN_VAR) {
        Ok(token) if !token.trim().is_empty() => HttpAuth::query_token("token", token),
        _ => HttpAuth::None,
    }
}
