//! Per-ticker volatility summaries over a window of price observations.

use std::collections::HashMap;

use crate::error::WindowBoundary;
use crate::{AnalysisError, PriceObservation, Ticker, VolatilitySummary};

/// Summarize daily change distributions per ticker.
///
/// The window start and end are the minimum and maximum dates across the
/// *entire* input, not per ticker: a ticker with no observation on a global
/// boundary date has no defined open/close and fails with
/// [`AnalysisError::MissingWindowBoundary`]. Output rows follow the
/// first-appearance order of tickers in the input, which keeps results
/// deterministic however the observations were fetched.
pub fn summarize_volatility(
    observations: &[PriceObservation],
) -> Result<Vec<VolatilitySummary>, AnalysisError> {
    if observations.is_empty() {
        return Ok(Vec::new());
    }

    let mut window_start = observations[0].date;
    let mut window_end = observations[0].date;
    for obs in observations {
        window_start = window_start.min(obs.date);
        window_end = window_end.max(obs.date);
    }

    // Group by ticker, preserving first-appearance order.
    let mut order: Vec<Ticker> = Vec::new();
    let mut groups: HashMap<Ticker, Vec<&PriceObservation>> = HashMap::new();
    for obs in observations {
        let group = groups.entry(obs.ticker.clone()).or_default();
        if group.is_empty() {
            order.push(obs.ticker.clone());
        }
        group.push(obs);
    }

    let mut summaries = Vec::with_capacity(order.len());
    for ticker in order {
        let group = &groups[&ticker];

        let open = group
            .iter()
            .find(|obs| obs.date == window_start)
            .ok_or_else(|| AnalysisError::MissingWindowBoundary {
                ticker: ticker.to_string(),
                boundary: WindowBoundary::Start,
                date: window_start,
            })?
            .open;
        let close = group
            .iter()
            .find(|obs| obs.date == window_end)
            .ok_or_else(|| AnalysisError::MissingWindowBoundary {
                ticker: ticker.to_string(),
                boundary: WindowBoundary::End,
                date: window_end,
            })?
            .close;

        if open == 0.0 {
            return Err(AnalysisError::ZeroBaseline {
                metric: format!("window open price for '{ticker}'"),
            });
        }

        let mut changes: Vec<f64> = group.iter().map(|obs| obs.change_percent).collect();
        changes.sort_by(f64::total_cmp);

        let low = group.iter().map(|obs| obs.low).fold(f64::INFINITY, f64::min);
        let high = group
            .iter()
            .map(|obs| obs.high)
            .fold(f64::NEG_INFINITY, f64::max);

        summaries.push(VolatilitySummary {
            ticker,
            mean: mean(&changes),
            std: sample_std(&changes),
            quartile_25: percentile(&changes, 0.25),
            median: percentile(&changes, 0.50),
            quartile_75: percentile(&changes, 0.75),
            min: changes[0],
            max: changes[changes.len() - 1],
            low,
            high,
            open,
            close,
            window_return: (close - open) / open,
        });
    }

    Ok(summaries)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). A single observation has
/// no spread and reports 0.
fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - avg).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Percentile by linear interpolation between closest ranks.
/// Input must be sorted ascending.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = q * (sorted.len() - 1) as f64;
    let below = rank.floor() as usize;
    let above = rank.ceil() as usize;
    let fraction = rank - below as f64;
    sorted[below] + (sorted[above] - sorted[below]) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month};

    fn date(day: u8) -> Date {
        Date::from_calendar_date(2024, Month::January, day).expect("valid date")
    }

    fn obs(
        ticker: &str,
        day: u8,
        open: f64,
        close: f64,
        low: f64,
        high: f64,
        change_percent: f64,
    ) -> PriceObservation {
        PriceObservation::new(
            Ticker::parse(ticker).expect("valid ticker"),
            date(day),
            open,
            close,
            low,
            high,
            change_percent,
        )
        .expect("valid observation")
    }

    #[test]
    fn window_return_uses_global_start_open_and_end_close() {
        let observations = vec![
            obs("X", 1, 10.0, 12.0, 9.0, 12.5, 0.2),
            obs("X", 15, 12.0, 11.0, 10.5, 12.5, -0.08),
            obs("X", 31, 12.0, 15.0, 11.5, 15.5, 0.25),
        ];

        let summaries = summarize_volatility(&observations).expect("summary should build");
        assert_eq!(summaries.len(), 1);

        let summary = &summaries[0];
        assert_eq!(summary.open, 10.0);
        assert_eq!(summary.close, 15.0);
        assert!((summary.window_return - 0.5).abs() < 1e-12);
        assert_eq!(summary.low, 9.0);
        assert_eq!(summary.high, 15.5);
    }

    #[test]
    fn ticker_missing_global_boundary_fails() {
        let observations = vec![
            obs("X", 1, 10.0, 12.0, 9.0, 12.5, 0.2),
            obs("X", 31, 12.0, 15.0, 11.5, 15.5, 0.25),
            // Y only has data mid-window.
            obs("Y", 15, 50.0, 51.0, 49.0, 52.0, 0.02),
        ];

        let error = summarize_volatility(&observations).expect_err("must fail");
        assert!(matches!(
            error,
            AnalysisError::MissingWindowBoundary {
                ref ticker,
                boundary: WindowBoundary::Start,
                ..
            } if ticker == "Y"
        ));
    }

    #[test]
    fn output_follows_first_appearance_order() {
        let observations = vec![
            obs("ZZZ", 1, 10.0, 10.5, 9.5, 11.0, 0.05),
            obs("AAA", 1, 20.0, 20.5, 19.5, 21.0, 0.02),
            obs("ZZZ", 2, 10.5, 10.4, 10.0, 11.0, -0.01),
            obs("AAA", 2, 20.5, 20.9, 20.0, 21.0, 0.02),
        ];

        let summaries = summarize_volatility(&observations).expect("summary should build");
        assert_eq!(summaries[0].ticker.as_str(), "ZZZ");
        assert_eq!(summaries[1].ticker.as_str(), "AAA");
    }

    #[test]
    fn change_statistics_match_describe_conventions() {
        let observations = vec![
            obs("X", 1, 10.0, 10.0, 9.0, 11.0, 1.0),
            obs("X", 2, 10.0, 10.0, 9.0, 11.0, 2.0),
            obs("X", 3, 10.0, 10.0, 9.0, 11.0, 3.0),
            obs("X", 4, 10.0, 10.0, 9.0, 11.0, 4.0),
        ];

        let summary = &summarize_volatility(&observations).expect("summary should build")[0];
        assert!((summary.mean - 2.5).abs() < 1e-12);
        assert!((summary.median - 2.5).abs() < 1e-12);
        assert!((summary.quartile_25 - 1.75).abs() < 1e-12);
        assert!((summary.quartile_75 - 3.25).abs() < 1e-12);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 4.0);
        // Sample std of 1..4 is sqrt(5/3).
        assert!((summary.std - (5.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn zero_open_at_window_start_is_a_zero_baseline_error() {
        let observations = vec![
            obs("X", 1, 0.0, 1.0, 0.0, 2.0, 0.1),
            obs("X", 31, 2.0, 3.0, 1.5, 3.5, 0.2),
        ];

        let error = summarize_volatility(&observations).expect_err("must fail");
        assert!(matches!(error, AnalysisError::ZeroBaseline { .. }));
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let summaries = summarize_volatility(&[]).expect("summary should build");
        assert!(summaries.is_empty());
    }
}
