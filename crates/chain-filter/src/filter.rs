//! Multi-criteria filter over nodes, routes, and disruptions
//!
//! A node passes iff every active criterion admits it; routes are
//! filtered strictly after nodes so that a route whose endpoint was
//! hidden is itself hidden. That ordering is an invariant of the
//! algorithm, not an implementation detail: the returned view is always
//! referentially consistent.

use crate::{Dataset, FilterState, FilteredView};
use risk_model::{Disruption, SupplyNode, TradeRoute};
use std::collections::HashSet;
use tracing::debug;

/// Apply the filter state to a dataset.
///
/// Pure and deterministic in its two inputs, so callers may memoize
/// freely; correctness does not depend on it.
pub fn apply(dataset: &Dataset, state: &FilterState) -> FilteredView {
    let query = state.search.trim().to_lowercase();

    let nodes: Vec<SupplyNode> = dataset
        .nodes
        .iter()
        .filter(|n| node_passes(n, state, &query))
        .cloned()
        .collect();

    // Routes check endpoints against the already-filtered node set.
    let visible: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let routes: Vec<TradeRoute> = dataset
        .routes
        .iter()
        .filter(|r| route_passes(r, state, &visible))
        .cloned()
        .collect();

    let disruptions: Vec<Disruption> = dataset
        .disruptions
        .iter()
        .filter(|d| disruption_passes(d, state, &query))
        .cloned()
        .collect();

    debug!(
        nodes = nodes.len(),
        routes = routes.len(),
        disruptions = disruptions.len(),
        "filter applied"
    );

    FilteredView {
        nodes,
        routes,
        disruptions,
    }
}

fn node_passes(node: &SupplyNode, state: &FilterState, query: &str) -> bool {
    if !query.is_empty() {
        let hit = node.name.to_lowercase().contains(query)
            || node.node_type.as_str().contains(query)
            || node.id.to_lowercase().contains(query);
        if !hit {
            return false;
        }
    }

    // Empty allow-lists are intentionally strict: nothing passes.
    state.node_types.contains(&node.node_type) && state.risk_levels.contains(&node.risk_level())
}

fn route_passes(route: &TradeRoute, state: &FilterState, visible: &HashSet<&str>) -> bool {
    route.trade_value_or_zero() >= state.min_trade_value_usd
        && visible.contains(route.from.as_str())
        && visible.contains(route.to.as_str())
}

fn disruption_passes(disruption: &Disruption, state: &FilterState, query: &str) -> bool {
    if !state.severities.contains(&disruption.severity) {
        return false;
    }

    // Existential substring match: "MarineTraffic" admits "MarineTraffic-v2".
    if !state.sources.is_empty() && !state.sources.iter().any(|s| disruption.source.contains(s)) {
        return false;
    }

    if !query.is_empty() {
        return disruption.event_type.to_lowercase().contains(query)
            || disruption.description.to_lowercase().contains(query)
            || disruption.source.to_lowercase().contains(query);
    }

    true
}
