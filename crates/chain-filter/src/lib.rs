//! Supply-Chain Filtering Pipeline
//!
//! Applies a conjunction of independent filter criteria (free-text search,
//! type/risk/severity/source allow-lists, minimum trade value) over the
//! three supply-chain collections and derives summary statistics for the
//! filtered view.
//!
//! Data flows one direction:
//!
//! ```text
//! Dataset → classify (per node) → apply(FilterState) → FilteredView → summarize
//! ```
//!
//! The pipeline is pure: source data is never mutated, and re-invoking
//! with identical arguments yields identical results.

use risk_model::{Disruption, NodeType, RiskLevel, Severity, SupplyNode, TradeRoute};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod filter;
pub mod loader;
pub mod summary;

pub use summary::SummaryStats;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schema violation in {entity} '{id}': {reason}")]
    Schema {
        entity: &'static str,
        id: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, FilterError>;

/// A full dataset as delivered by the upstream feed. Replaced wholesale
/// on refresh; never mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub nodes: Vec<SupplyNode>,
    #[serde(default)]
    pub routes: Vec<TradeRoute>,
    #[serde(default)]
    pub disruptions: Vec<Disruption>,
}

/// The three filtered collections. Internally consistent: every route
/// endpoint resolves to a node present in `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilteredView {
    pub nodes: Vec<SupplyNode>,
    pub routes: Vec<TradeRoute>,
    pub disruptions: Vec<Disruption>,
}

impl FilteredView {
    /// Reinterpret the view as a dataset, e.g. to feed it back through
    /// the filter (which is idempotent).
    pub fn into_dataset(self) -> Dataset {
        Dataset {
            nodes: self.nodes,
            routes: self.routes,
            disruptions: self.disruptions,
        }
    }
}

/// Current view constraints. A plain serializable value object with no
/// tie to any UI: ephemeral, recomputed per interaction, never persisted.
///
/// Allow-list semantics: the closed-enum lists (`node_types`,
/// `risk_levels`, `severities`) are strict — an empty list means nothing
/// passes that dimension. The open-ended `sources` list is a substring
/// allow-list and applies only when non-empty, since the universe of
/// provenance tags is not enumerable up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Free-text query, matched case-insensitively as a substring of
    /// node name/type/id and disruption type/description/source.
    /// Trimmed before use; whitespace-only means no search constraint.
    pub search: String,
    pub node_types: Vec<NodeType>,
    pub risk_levels: Vec<RiskLevel>,
    pub severities: Vec<Severity>,
    /// Existential substring match against disruption provenance tags:
    /// "MarineTraffic" admits a source of "MarineTraffic-v2".
    pub sources: Vec<String>,
    /// Inclusive lower bound; a route with a missing value is treated
    /// as carrying 0.
    pub min_trade_value_usd: f64,
}

impl Default for FilterState {
    /// Everything visible: all enum variants allowed, no search, no
    /// source constraint, zero trade-value threshold.
    fn default() -> Self {
        Self {
            search: String::new(),
            node_types: NodeType::ALL.to_vec(),
            risk_levels: RiskLevel::ALL.to_vec(),
            severities: Severity::ALL.to_vec(),
            sources: Vec::new(),
            min_trade_value_usd: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_shows_everything() {
        let state = FilterState::default();
        assert_eq!(state.node_types.len(), 5);
        assert_eq!(state.risk_levels.len(), 4);
        assert_eq!(state.severities.len(), 4);
        assert!(state.sources.is_empty());
        assert_eq!(state.min_trade_value_usd, 0.0);
    }

    #[test]
    fn test_filter_state_round_trips_partial_json() {
        // Omitted fields fall back to the visible-by-default state
        let state: FilterState =
            serde_json::from_str(r#"{"search": "tsmc", "min_trade_value_usd": 5000.0}"#).unwrap();
        assert_eq!(state.search, "tsmc");
        assert_eq!(state.min_trade_value_usd, 5000.0);
        assert_eq!(state.node_types, NodeType::ALL.to_vec());
    }
}
