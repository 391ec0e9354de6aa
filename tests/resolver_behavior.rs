//! Behavior-driven tests for ticker resolution against a live-shaped catalog.
//!
//! These tests verify HOW the system resolves tickers end to end: catalog
//! snapshot loading, collision tie-breaks, and unresolved fallthrough.

use bakewell_tests::{
    AssetResolver, CoinGeckoAdapter, ExclusionRule, MarketDataSource, Ticker,
};

async fn offline_resolver() -> AssetResolver {
    let adapter = CoinGeckoAdapter::default();
    let snapshot = adapter.catalog().await.expect("offline catalog loads");
    AssetResolver::new(snapshot.candidates, ExclusionRule::wrapped_token())
}

fn ticker(raw: &str) -> Ticker {
    Ticker::parse(raw).expect("valid ticker")
}

// =============================================================================
// Resolution: unique symbols
// =============================================================================

#[tokio::test]
async fn when_a_symbol_is_unique_system_resolves_it_directly() {
    // Given: A resolver over the offline catalog
    let resolver = offline_resolver().await;

    // When: A ticker with exactly one catalog entry is resolved
    let resolved = resolver.resolve(&ticker("BTC"));

    // Then: It maps straight to the canonical id
    assert!(resolved.is_resolved());
    assert_eq!(resolved.canonical_id, "bitcoin");
}

#[tokio::test]
async fn when_casing_differs_system_still_matches_the_symbol() {
    // Given: A catalog listing lowercase symbols
    let resolver = offline_resolver().await;

    // When: The same ticker arrives in mixed case
    let lower = resolver.resolve(&ticker("sol"));
    let upper = resolver.resolve(&ticker("SOL"));

    // Then: Both resolve to the same canonical id
    assert_eq!(lower.canonical_id, "solana");
    assert_eq!(upper.canonical_id, "solana");
}

// =============================================================================
// Resolution: collisions
// =============================================================================

#[tokio::test]
async fn when_symbols_collide_system_skips_wrapped_token_candidates() {
    // Given: The catalog lists three assets under the UNI symbol
    let resolver = offline_resolver().await;

    // When: UNI is resolved
    let resolved = resolver.resolve(&ticker("UNI"));

    // Then: The wrapped variants are skipped and the plain asset wins
    assert!(resolved.is_resolved());
    assert_eq!(resolved.canonical_id, "uniswap");
}

// =============================================================================
// Resolution: misses
// =============================================================================

#[tokio::test]
async fn when_no_catalog_entry_matches_system_reports_unresolved() {
    // Given: A resolver over the offline catalog
    let resolver = offline_resolver().await;

    // When: An unlisted ticker is resolved
    let resolved = resolver.resolve(&ticker("NOPE"));

    // Then: The result is unresolved rather than an error
    assert!(!resolved.is_resolved());
    assert!(resolved.canonical_id.is_empty());
}
