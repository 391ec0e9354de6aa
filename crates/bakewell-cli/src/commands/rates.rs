use serde::Serialize;

use bakewell_core::{apr_to_apy, apy_to_apr};

use crate::cli::{RateDirection, RatesArgs};
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct RatesData {
    direction: &'static str,
    input: f64,
    periods: f64,
    converted: f64,
}

pub fn run(args: &RatesArgs) -> Result<CommandResult, CliError> {
    if !args.value.is_finite() || args.value < 0.0 {
        return Err(CliError::Command(format!(
            "rate must be a non-negative number, got {}",
            args.value
        )));
    }
    if !args.periods.is_finite() || args.periods <= 0.0 {
        return Err(CliError::Command(format!(
            "compounding periods must be positive, got {}",
            args.periods
        )));
    }

    let (direction, converted) = match args.direction {
        RateDirection::AprToApy => ("apr-to-apy", apr_to_apy(args.value, args.periods)),
        RateDirection::ApyToApr => ("apy-to-apr", apy_to_apr(args.value, args.periods)),
    };

    let data = serde_json::to_value(RatesData {
        direction,
        input: args.value,
        periods: args.periods,
        converted,
    })?;
    Ok(CommandResult::ok(data))
}
