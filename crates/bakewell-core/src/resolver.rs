//! Ticker-to-canonical-asset resolution.
//!
//! Ticker symbols are not unique: unrelated assets share them, and catalog
//! providers list wrapped/derivative variants under the same symbol as the
//! underlying asset. The resolver matches case-insensitively and breaks
//! collisions with a deterministic scan parameterized by an [`ExclusionRule`].

use crate::{AssetCandidate, ResolvedAsset, Ticker};

/// Predicate used to skip candidates during collision tie-breaks.
///
/// One rule replaces the two near-duplicate scan loops that crypto and
/// equity resolution would otherwise carry separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionRule {
    /// Skip candidates whose canonical id contains the marker substring.
    IdMarker(String),
    /// Skip candidates whose canonical id is hyphenated but not a
    /// governance token.
    HyphenatedNonGovernance,
}

impl ExclusionRule {
    /// Marker rule for wrapped/derivative tokens, whose canonical ids
    /// carry a `token` suffix in the catalog.
    pub fn wrapped_token() -> Self {
        Self::IdMarker(String::from("token"))
    }

    fn excludes(&self, candidate: &AssetCandidate) -> bool {
        match self {
            Self::IdMarker(marker) => candidate.canonical_id.contains(marker.as_str()),
            Self::HyphenatedNonGovernance => {
                candidate.canonical_id.contains('-')
                    && !candidate.canonical_id.contains("governance")
            }
        }
    }
}

/// Resolves tickers against an immutable catalog snapshot.
///
/// The snapshot is injected at construction and never mutated, so a single
/// resolver may be shared freely across concurrent lookups.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    catalog: Vec<AssetCandidate>,
    rule: ExclusionRule,
}

impl AssetResolver {
    pub fn new(catalog: Vec<AssetCandidate>, rule: ExclusionRule) -> Self {
        Self { catalog, rule }
    }

    pub fn catalog(&self) -> &[AssetCandidate] {
        &self.catalog
    }

    /// Map a ticker to exactly one canonical asset id.
    ///
    /// Zero matches yield an unresolved result. A unique match wins
    /// outright. On a symbol collision the candidate list is scanned in
    /// catalog order and the first candidate the exclusion rule does not
    /// reject is taken; if the rule rejects every candidate, the scan falls
    /// back to the last examined one. The scan is bounded by the match
    /// count, so an all-excluded collision can never loop.
    pub fn resolve(&self, ticker: &Ticker) -> ResolvedAsset {
        let mut matches = self
            .catalog
            .iter()
            .filter(|candidate| ticker.matches_symbol(&candidate.symbol));

        let Some(first) = matches.next() else {
            return ResolvedAsset::unresolved(ticker.clone());
        };

        let mut last_examined = first;
        if !self.rule.excludes(first) {
            return ResolvedAsset::resolved(ticker.clone(), first.canonical_id.clone());
        }

        for candidate in matches {
            last_examined = candidate;
            if !self.rule.excludes(candidate) {
                return ResolvedAsset::resolved(ticker.clone(), candidate.canonical_id.clone());
            }
        }

        // Degenerate fallback: every colliding candidate was excluded.
        ResolvedAsset::resolved(ticker.clone(), last_examined.canonical_id.clone())
    }
}
