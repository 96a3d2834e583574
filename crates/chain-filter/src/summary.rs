//! Summary statistics over a filtered view
//!
//! Pure reduction: every figure is derived from the collections it is
//! shown next to, so there is no separate total that could drift from
//! the filtered view.

use crate::FilteredView;
use risk_model::RiskLevel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub node_count: usize,
    pub route_count: usize,
    pub disruption_count: usize,
    /// Sum of route trade values; missing values count as 0
    pub total_trade_value_usd: f64,
    /// Nodes whose derived risk level is critical
    pub critical_nodes: usize,
    /// Disruption counts keyed by severity name
    pub disruptions_by_severity: HashMap<String, usize>,
}

pub fn summarize(view: &FilteredView) -> SummaryStats {
    let total_trade_value_usd = view.routes.iter().map(|r| r.trade_value_or_zero()).sum();

    let critical_nodes = view
        .nodes
        .iter()
        .filter(|n| n.risk_level() == RiskLevel::Critical)
        .count();

    let mut disruptions_by_severity: HashMap<String, usize> = HashMap::new();
    for d in &view.disruptions {
        *disruptions_by_severity
            .entry(d.severity.as_str().to_string())
            .or_default() += 1;
    }

    SummaryStats {
        node_count: view.nodes.len(),
        route_count: view.routes.len(),
        disruption_count: view.disruptions.len(),
        total_trade_value_usd,
        critical_nodes,
        disruptions_by_severity,
    }
}
