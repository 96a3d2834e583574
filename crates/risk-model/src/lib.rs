//! Supply-Chain Risk Model
//!
//! Domain primitives for the RRIO supply-chain views: graph entities
//! (nodes, trade routes, disruption events) and the derived risk-level
//! classification.
//!
//! # Classification Ladder
//!
//! ```text
//! mean(operational, financial, policy) ≥ 0.8  → Critical
//!                              0.6 ≤ m < 0.8  → High
//!                              0.3 ≤ m < 0.6  → Medium
//!                                    m < 0.3  → Low
//! ```
//!
//! The mean is unweighted. Equal weighting is an accepted assumption of
//! the upstream scoring feed; no knob is exposed to change it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Supply-chain entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Port,
    Manufacturer,
    Supplier,
    Distributor,
    Retailer,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Port,
        NodeType::Manufacturer,
        NodeType::Supplier,
        NodeType::Distributor,
        NodeType::Retailer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Port => "port",
            NodeType::Manufacturer => "manufacturer",
            NodeType::Supplier => "supplier",
            NodeType::Distributor => "distributor",
            NodeType::Retailer => "retailer",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "port" => Ok(NodeType::Port),
            "manufacturer" => Ok(NodeType::Manufacturer),
            "supplier" => Ok(NodeType::Supplier),
            "distributor" => Ok(NodeType::Distributor),
            "retailer" => Ok(NodeType::Retailer),
            other => Err(format!("unknown node type '{other}'")),
        }
    }
}

/// Transport mode of a trade route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Sea,
    Air,
    Rail,
    Road,
    Multimodal,
}

impl TransportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Sea => "sea",
            TransportMode::Air => "air",
            TransportMode::Rail => "rail",
            TransportMode::Road => "road",
            TransportMode::Multimodal => "multimodal",
        }
    }
}

/// Disruption severity, ordinal: low < medium < high < critical
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// Derived risk category of a node. Never stored or cached: always
/// recomputed from the three score dimensions, so it cannot go stale
/// relative to its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// Marker color used by the map renderer
    pub fn color_hex(&self) -> &'static str {
        match self {
            RiskLevel::Low => "#22c55e",
            RiskLevel::Medium => "#eab308",
            RiskLevel::High => "#f97316",
            RiskLevel::Critical => "#ef4444",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            "critical" => Ok(RiskLevel::Critical),
            other => Err(format!("unknown risk level '{other}'")),
        }
    }
}

/// A supply-chain entity (port, factory, warehouse, ...)
///
/// Produced read-only by the backend data feed and replaced wholesale on
/// refresh; `id` is unique and immutable. Risk scores are contractually
/// in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyNode {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub lat: f64,
    pub lng: f64,
    pub risk_operational: f64,
    pub risk_financial: f64,
    pub risk_policy: f64,
    /// Industry name → impact magnitude
    #[serde(default)]
    pub industry_impacts: HashMap<String, f64>,
}

impl SupplyNode {
    /// Derived risk category, per [`classify`]
    pub fn risk_level(&self) -> RiskLevel {
        classify(self.risk_operational, self.risk_financial, self.risk_policy)
    }
}

/// A trade route between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRoute {
    pub from: String,
    pub to: String,
    pub mode: TransportMode,
    pub flow: f64,
    pub congestion: f64,
    pub eta_delay_hours: f64,
    pub criticality: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_value_usd: Option<f64>,
}

impl TradeRoute {
    /// Trade value with the contractual missing-value default of 0
    pub fn trade_value_or_zero(&self) -> f64 {
        self.trade_value_usd.unwrap_or(0.0)
    }
}

/// A disruption event marker. Geographically, not graph-, linked: no
/// structural reference to nodes or routes is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disruption {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub severity: Severity,
    /// (lat, lng) pair
    pub location: [f64; 2],
    pub description: String,
    /// Provenance tag, e.g. "ACLED" or "MarineTraffic-v2"
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economic_impact_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_commodities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_trade_routes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vessels_impacted: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mitigation_strategies: Option<Vec<String>>,
}

/// Classify a node's three risk dimensions into a categorical level.
///
/// Unweighted arithmetic mean, then a non-overlapping right-exclusive
/// threshold ladder evaluated high to low. Inputs are contractually in
/// [0, 1]; the function does not clamp or validate. Pure and total.
pub fn classify(operational: f64, financial: f64, policy: f64) -> RiskLevel {
    let mean = (operational + financial + policy) / 3.0;
    match mean {
        m if m >= 0.8 => RiskLevel::Critical,
        m if m >= 0.6 => RiskLevel::High,
        m if m >= 0.3 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        // Exact ladder boundaries with all dimensions equal
        assert_eq!(classify(0.8, 0.8, 0.8), RiskLevel::Critical);
        assert_eq!(classify(0.6, 0.6, 0.6), RiskLevel::High);
        assert_eq!(classify(0.3, 0.3, 0.3), RiskLevel::Medium);
        assert_eq!(classify(0.0, 0.0, 0.0), RiskLevel::Low);
        assert_eq!(classify(1.0, 1.0, 1.0), RiskLevel::Critical);
    }

    #[test]
    fn test_classify_interior() {
        assert_eq!(classify(0.1, 0.2, 0.3), RiskLevel::Low); // mean 0.2
        assert_eq!(classify(0.5, 0.4, 0.45), RiskLevel::Medium); // mean 0.45
        assert_eq!(classify(0.7, 0.7, 0.7), RiskLevel::High);
        assert_eq!(classify(0.9, 0.9, 0.9), RiskLevel::Critical);
    }

    #[test]
    fn test_classify_depends_only_on_mean() {
        // Same mean, different dominant dimension
        assert_eq!(classify(1.0, 0.5, 0.6), classify(0.7, 0.7, 0.7));
        assert_eq!(classify(0.9, 0.0, 0.0), classify(0.3, 0.3, 0.3));
        assert_eq!(classify(0.0, 0.0, 0.6), classify(0.2, 0.2, 0.2));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_node_wire_format() {
        let json = r#"{
            "id": "tsmc_001",
            "name": "Taiwan Semiconductor Manufacturing Co.",
            "type": "manufacturer",
            "lat": 24.7736,
            "lng": 120.9976,
            "risk_operational": 0.4,
            "risk_financial": 0.2,
            "risk_policy": 0.7,
            "industry_impacts": {"semiconductors": 0.95}
        }"#;

        let node: SupplyNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_type, NodeType::Manufacturer);
        assert_eq!(node.risk_level(), RiskLevel::Medium); // mean ~0.433
        assert_eq!(node.industry_impacts["semiconductors"], 0.95);
    }

    #[test]
    fn test_disruption_wire_format() {
        let json = r#"{
            "id": "dsr-42",
            "type": "port_strike",
            "severity": "critical",
            "location": [31.2304, 121.4737],
            "description": "Terminal workers strike, berths closed",
            "source": "MarineTraffic-v2",
            "vessels_impacted": 37
        }"#;

        let d: Disruption = serde_json::from_str(json).unwrap();
        assert_eq!(d.severity, Severity::Critical);
        assert_eq!(d.vessels_impacted, Some(37));
        assert!(d.economic_impact_usd.is_none());
    }

    #[test]
    fn test_route_missing_trade_value_defaults_to_zero() {
        let json = r#"{
            "from": "a", "to": "b", "mode": "sea",
            "flow": 10.0, "congestion": 0.2,
            "eta_delay_hours": 4.0, "criticality": 0.5
        }"#;

        let route: TradeRoute = serde_json::from_str(json).unwrap();
        assert!(route.trade_value_usd.is_none());
        assert_eq!(route.trade_value_or_zero(), 0.0);
    }
}
