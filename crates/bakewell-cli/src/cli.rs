use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "bakewell",
    version,
    about = "Portfolio valuation, yield, and volatility toolkit"
)]
pub struct Cli {
    /// Output format for command results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Serve deterministic offline data instead of calling providers.
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Value a holdings file against the token catalog and spot prices.
    Valuate(ValuateArgs),
    /// Summarize price volatility over a trailing window.
    Volatility(VolatilityArgs),
    /// Year-over-year and quarter-over-quarter income statement deltas.
    Deltas(DeltasArgs),
    /// Convert between nominal (APR) and effective (APY) rates.
    Rates(RatesArgs),
    /// List data providers and the endpoints each one serves.
    Providers(ProvidersArgs),
}

#[derive(Debug, Args)]
pub struct ValuateArgs {
    /// Path to the YAML holdings file.
    #[arg(long)]
    pub holdings: PathBuf,

    /// Also report the aggregate yield as a compounded annual rate,
    /// optionally under a custom number of compounding periods per year.
    #[arg(long, value_name = "PERIODS", num_args = 0..=1, default_missing_value = "365")]
    pub as_apy: Option<f64>,
}

#[derive(Debug, Args)]
pub struct VolatilityArgs {
    /// Tickers to analyze.
    #[arg(required = true)]
    pub tickers: Vec<String>,

    /// Window length in days, ending yesterday.
    #[arg(long, default_value_t = 31)]
    pub days: u32,
}

#[derive(Debug, Args)]
pub struct DeltasArgs {
    /// Tickers to report on.
    #[arg(required = true)]
    pub tickers: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RatesArgs {
    /// Conversion direction.
    #[arg(value_enum)]
    pub direction: RateDirection,

    /// Rate to convert, as a decimal fraction (0.05 means 5%).
    pub value: f64,

    /// Compounding periods per year.
    #[arg(long, default_value_t = bakewell_core::DEFAULT_COMPOUNDING_PERIODS)]
    pub periods: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RateDirection {
    AprToApy,
    ApyToApr,
}

#[derive(Debug, Args)]
pub struct ProvidersArgs {
    /// Show a single provider instead of all of them.
    pub provider: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn valuate_args(cli: Cli) -> ValuateArgs {
        match cli.command {
            Command::Valuate(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bare_as_apy_flag_uses_daily_compounding() {
        let cli = Cli::try_parse_from(["bakewell", "valuate", "--holdings", "h.yaml", "--as-apy"])
            .expect("parses");
        assert_eq!(valuate_args(cli).as_apy, Some(365.0));
    }

    #[test]
    fn as_apy_accepts_a_period_count() {
        let cli = Cli::try_parse_from([
            "bakewell", "valuate", "--holdings", "h.yaml", "--as-apy", "12",
        ])
        .expect("parses");
        assert_eq!(valuate_args(cli).as_apy, Some(12.0));
    }

    #[test]
    fn as_apy_defaults_to_off() {
        let cli = Cli::try_parse_from(["bakewell", "valuate", "--holdings", "h.yaml"])
            .expect("parses");
        assert_eq!(valuate_args(cli).as_apy, None);
    }
}
