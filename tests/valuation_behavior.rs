//! Behavior-driven tests for portfolio valuation.
//!
//! These tests run the full offline flow: catalog snapshot, resolution,
//! spot price lookup, and aggregation into a valued portfolio.

use bakewell_core::AnalysisError;
use bakewell_tests::{
    value_holdings, value_holdings_partial, AssetResolver, CoinGeckoAdapter, ExclusionRule,
    HoldingInput, MarketDataSource, PriceBook, PriceRequest, Ticker,
};

fn ticker(raw: &str) -> Ticker {
    Ticker::parse(raw).expect("valid ticker")
}

async fn offline_resolver() -> AssetResolver {
    let adapter = CoinGeckoAdapter::default();
    let snapshot = adapter.catalog().await.expect("offline catalog loads");
    AssetResolver::new(snapshot.candidates, ExclusionRule::wrapped_token())
}

async fn offline_prices(ids: Vec<String>) -> PriceBook {
    let adapter = CoinGeckoAdapter::default();
    let batch = adapter
        .spot_prices(PriceRequest::new(ids).expect("valid request"))
        .await
        .expect("offline prices load");
    batch
        .prices
        .into_iter()
        .map(|price| (price.canonical_id, price.usd))
        .collect()
}

// =============================================================================
// Valuation: happy path
// =============================================================================

#[tokio::test]
async fn when_all_holdings_resolve_system_values_the_whole_portfolio() {
    // Given: Two holdings the catalog knows and live-shaped spot prices
    let resolver = offline_resolver().await;
    let prices = offline_prices(vec![String::from("bitcoin"), String::from("ethereum")]).await;
    let inputs = vec![
        HoldingInput::new(ticker("BTC"), 0.5, 120.0),
        HoldingInput::new(ticker("ETH"), 2.0, 50.0),
    ];

    // When: The portfolio is valued strictly
    let portfolio = value_holdings(&inputs, &resolver, &prices).expect("valuation succeeds");

    // Then: Every holding is priced and the total is the sum of line totals
    assert_eq!(portfolio.holdings().len(), 2);
    let expected_total: f64 = portfolio.holdings().iter().map(|h| h.total).sum();
    assert!((portfolio.portfolio_total() - expected_total).abs() < 1e-9);

    let btc = &portfolio.holdings()[0];
    assert_eq!(btc.canonical_id, "bitcoin");
    assert!((btc.total - btc.price * 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn when_holdings_carry_yield_system_aggregates_yearly_and_daily_figures() {
    // Given: Holdings with configured annual yields
    let resolver = offline_resolver().await;
    let prices = offline_prices(vec![String::from("bitcoin"), String::from("ethereum")]).await;
    let inputs = vec![
        HoldingInput::new(ticker("BTC"), 1.0, 120.0),
        HoldingInput::new(ticker("ETH"), 1.0, 50.0),
    ];

    // When: The portfolio is valued
    let portfolio = value_holdings(&inputs, &resolver, &prices).expect("valuation succeeds");

    // Then: Yearly yield is the sum, daily yield is the yearly figure over 365
    let yield_summary = portfolio.portfolio_yield();
    assert!((yield_summary.one_year_yield - 170.0).abs() < 1e-9);
    assert!((yield_summary.one_day_yield - 170.0 / 365.0).abs() < 1e-9);
}

// =============================================================================
// Valuation: per-holding failure isolation
// =============================================================================

#[tokio::test]
async fn when_one_holding_fails_system_still_values_the_rest() {
    // Given: One resolvable holding and one the catalog has never heard of
    let resolver = offline_resolver().await;
    let prices = offline_prices(vec![String::from("bitcoin")]).await;
    let inputs = vec![
        HoldingInput::new(ticker("BTC"), 1.0, 0.0),
        HoldingInput::new(ticker("NOPE"), 3.0, 10.0),
    ];

    // When: The portfolio is valued with failure isolation
    let (portfolio, failures) = value_holdings_partial(&inputs, &resolver, &prices);

    // Then: The good holding is valued and the bad one is reported, not dropped silently
    assert_eq!(portfolio.holdings().len(), 1);
    assert_eq!(portfolio.holdings()[0].canonical_id, "bitcoin");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].ticker.as_str(), "NOPE");

    // And: The skipped holding's yield does not leak into the aggregate
    assert_eq!(portfolio.portfolio_yield().one_year_yield, 0.0);
}

#[tokio::test]
async fn when_a_price_is_missing_strict_valuation_fails() {
    // Given: A resolvable holding but an empty price book
    let resolver = offline_resolver().await;
    let inputs = vec![HoldingInput::new(ticker("BTC"), 1.0, 0.0)];

    // When: The portfolio is valued strictly
    let error = value_holdings(&inputs, &resolver, &PriceBook::new()).expect_err("must fail");

    // Then: The error names the canonical id the price was missing for
    match error {
        AnalysisError::PriceUnavailable { canonical_id } => {
            assert_eq!(canonical_id, "bitcoin");
        }
        other => panic!("unexpected error: {other}"),
    }
}

// =============================================================================
// Valuation: degenerate quantities
// =============================================================================

#[tokio::test]
async fn when_a_quantity_is_zero_system_values_the_line_at_zero() {
    // Given: A holding of zero units
    let resolver = offline_resolver().await;
    let prices = offline_prices(vec![String::from("cardano")]).await;
    let inputs = vec![HoldingInput::new(ticker("ADA"), 0.0, 12.0)];

    // When: The portfolio is valued
    let portfolio = value_holdings(&inputs, &resolver, &prices).expect("valuation succeeds");

    // Then: The line total and portfolio total are both zero, yield still counts
    assert_eq!(portfolio.portfolio_total(), 0.0);
    assert!((portfolio.portfolio_yield().one_year_yield - 12.0).abs() < 1e-9);
}
