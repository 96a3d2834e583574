//! Dataset loading with boundary validation
//!
//! Upstream payloads are validated at the system boundary: a malformed
//! entity produces a typed [`FilterError::Schema`] instead of being
//! silently defaulted, so data-quality problems surface where they enter
//! the system. The one contractual optional, `trade_value_usd`, stays
//! optional and is defaulted to 0 only at comparison time.

use crate::{Dataset, FilterError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Validate latitude is in valid range
fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && lat.is_finite()
}

/// Validate longitude is in valid range
fn is_valid_longitude(lng: f64) -> bool {
    (-180.0..=180.0).contains(&lng) && lng.is_finite()
}

/// Risk scores, congestion, and criticality are contractually in [0, 1]
fn is_unit_interval(v: f64) -> bool {
    (0.0..=1.0).contains(&v) && v.is_finite()
}

fn schema_err(entity: &'static str, id: &str, reason: impl Into<String>) -> FilterError {
    FilterError::Schema {
        entity,
        id: id.to_string(),
        reason: reason.into(),
    }
}

/// Load and validate a dataset from a JSON file
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    info!("Loading supply-chain dataset from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let dataset: Dataset = serde_json::from_reader(reader)?;

    validate_dataset(&dataset)?;

    info!(
        "Loaded {} nodes, {} routes, {} disruptions",
        dataset.nodes.len(),
        dataset.routes.len(),
        dataset.disruptions.len()
    );

    Ok(dataset)
}

/// Parse and validate a dataset from a JSON string
pub fn parse_dataset(json: &str) -> Result<Dataset> {
    let dataset: Dataset = serde_json::from_str(json)?;
    validate_dataset(&dataset)?;
    Ok(dataset)
}

/// Reject datasets that violate the wire contract
pub fn validate_dataset(dataset: &Dataset) -> Result<()> {
    let mut ids: HashSet<&str> = HashSet::with_capacity(dataset.nodes.len());

    for node in &dataset.nodes {
        if node.id.is_empty() {
            return Err(schema_err("node", &node.name, "empty id"));
        }
        if !ids.insert(node.id.as_str()) {
            return Err(schema_err("node", &node.id, "duplicate id"));
        }
        if !is_valid_latitude(node.lat) {
            return Err(schema_err("node", &node.id, format!("latitude {} out of range", node.lat)));
        }
        if !is_valid_longitude(node.lng) {
            return Err(schema_err("node", &node.id, format!("longitude {} out of range", node.lng)));
        }
        for (label, score) in [
            ("risk_operational", node.risk_operational),
            ("risk_financial", node.risk_financial),
            ("risk_policy", node.risk_policy),
        ] {
            if !is_unit_interval(score) {
                return Err(schema_err(
                    "node",
                    &node.id,
                    format!("{label} {score} outside [0, 1]"),
                ));
            }
        }
    }

    for (i, route) in dataset.routes.iter().enumerate() {
        let route_id = format!("{}->{} (#{i})", route.from, route.to);
        if !ids.contains(route.from.as_str()) {
            return Err(schema_err("route", &route_id, format!("unknown endpoint '{}'", route.from)));
        }
        if !ids.contains(route.to.as_str()) {
            return Err(schema_err("route", &route_id, format!("unknown endpoint '{}'", route.to)));
        }
        if !is_unit_interval(route.congestion) {
            return Err(schema_err("route", &route_id, "congestion outside [0, 1]"));
        }
        if !is_unit_interval(route.criticality) {
            return Err(schema_err("route", &route_id, "criticality outside [0, 1]"));
        }
        if let Some(v) = route.trade_value_usd {
            if !v.is_finite() || v < 0.0 {
                return Err(schema_err("route", &route_id, format!("trade value {v} invalid")));
            }
        }
    }

    for disruption in &dataset.disruptions {
        let [lat, lng] = disruption.location;
        if !is_valid_latitude(lat) || !is_valid_longitude(lng) {
            return Err(schema_err(
                "disruption",
                &disruption.id,
                format!("location ({lat}, {lng}) out of range"),
            ));
        }
        if disruption.source.is_empty() {
            return Err(schema_err("disruption", &disruption.id, "empty source tag"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r#"{
        "nodes": [
            {"id": "tsmc_001", "name": "Taiwan Semiconductor Manufacturing Co.",
             "type": "manufacturer", "lat": 24.7736, "lng": 120.9976,
             "risk_operational": 0.4, "risk_financial": 0.2, "risk_policy": 0.7},
            {"id": "sgp_port", "name": "Port of Singapore",
             "type": "port", "lat": 1.3521, "lng": 103.8198,
             "risk_operational": 0.2, "risk_financial": 0.1, "risk_policy": 0.2}
        ],
        "routes": [
            {"from": "tsmc_001", "to": "sgp_port", "mode": "sea", "flow": 12.0,
             "congestion": 0.3, "eta_delay_hours": 6.0, "criticality": 0.8}
        ],
        "disruptions": [
            {"id": "d1", "type": "port_strike", "severity": "high",
             "location": [31.2304, 121.4737], "description": "Berths closed",
             "source": "MarineTraffic-v2"}
        ]
    }"#;

    #[test]
    fn test_load_valid_dataset() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(VALID.as_bytes()).unwrap();

        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.nodes.len(), 2);
        assert_eq!(dataset.routes.len(), 1);
        assert!(dataset.routes[0].trade_value_usd.is_none());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let dataset = parse_dataset(r#"{"nodes": []}"#).unwrap();
        assert!(dataset.routes.is_empty());
        assert!(dataset.disruptions.is_empty());
    }

    #[test]
    fn test_rejects_out_of_range_risk_score() {
        let json = VALID.replace(r#""risk_policy": 0.7"#, r#""risk_policy": 1.7"#);
        let err = parse_dataset(&json).unwrap_err();
        assert!(matches!(err, FilterError::Schema { entity: "node", .. }));
    }

    #[test]
    fn test_rejects_out_of_range_latitude() {
        let json = VALID.replace(r#""lat": 24.7736"#, r#""lat": 124.7736"#);
        let err = parse_dataset(&json).unwrap_err();
        assert!(matches!(err, FilterError::Schema { entity: "node", .. }));
    }

    #[test]
    fn test_rejects_dangling_route_endpoint() {
        let json = VALID.replace(r#""to": "sgp_port""#, r#""to": "nowhere""#);
        let err = parse_dataset(&json).unwrap_err();
        assert!(matches!(err, FilterError::Schema { entity: "route", .. }));
    }

    #[test]
    fn test_rejects_duplicate_node_id() {
        let json = VALID.replace("sgp_port", "tsmc_001");
        let err = parse_dataset(&json).unwrap_err();
        assert!(matches!(err, FilterError::Schema { entity: "node", .. }));
    }

    #[test]
    fn test_rejects_unknown_enum_value_as_parse_error() {
        let json = VALID.replace(r#""mode": "sea""#, r#""mode": "teleport""#);
        let err = parse_dataset(&json).unwrap_err();
        assert!(matches!(err, FilterError::Json(_)));
    }
}
