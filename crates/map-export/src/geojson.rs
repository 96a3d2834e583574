//! GeoJSON FeatureCollection export
//!
//! Nodes and disruptions become Point features, routes become
//! LineStrings. GeoJSON coordinate order is [lng, lat].

use crate::MapScene;
use std::collections::HashMap;

/// Serialize the scene to a GeoJSON FeatureCollection
pub fn to_geojson(scene: &MapScene<'_>) -> serde_json::Value {
    let coords: HashMap<&str, [f64; 2]> = scene
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), [n.lng, n.lat]))
        .collect();

    let mut features: Vec<serde_json::Value> = Vec::new();

    for node in scene.nodes {
        features.push(serde_json::json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [node.lng, node.lat]
            },
            "properties": {
                "kind": "node",
                "id": node.id,
                "name": node.name,
                "node_type": node.node_type.as_str(),
                "risk_level": node.risk_level().as_str(),
                "risk_operational": node.risk_operational,
                "risk_financial": node.risk_financial,
                "risk_policy": node.risk_policy
            }
        }));
    }

    for route in scene.routes {
        let (Some(from), Some(to)) = (
            coords.get(route.from.as_str()),
            coords.get(route.to.as_str()),
        ) else {
            continue; // dangling endpoint, nothing to draw
        };
        features.push(serde_json::json!({
            "type": "Feature",
            "geometry": {
                "type": "LineString",
                "coordinates": [from, to]
            },
            "properties": {
                "kind": "route",
                "from": route.from,
                "to": route.to,
                "mode": route.mode.as_str(),
                "flow": route.flow,
                "congestion": route.congestion,
                "eta_delay_hours": route.eta_delay_hours,
                "criticality": route.criticality,
                "trade_value_usd": route.trade_value_usd
            }
        }));
    }

    for disruption in scene.disruptions {
        let [lat, lng] = disruption.location;
        features.push(serde_json::json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                "coordinates": [lng, lat]
            },
            "properties": {
                "kind": "disruption",
                "id": disruption.id,
                "event_type": disruption.event_type,
                "severity": disruption.severity.as_str(),
                "source": disruption.source,
                "description": disruption.description,
                "economic_impact_usd": disruption.economic_impact_usd
            }
        }));
    }

    serde_json::json!({
        "type": "FeatureCollection",
        "features": features
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_model::{Disruption, NodeType, Severity, SupplyNode, TradeRoute, TransportMode};
    use std::collections::HashMap;

    fn node(id: &str) -> SupplyNode {
        SupplyNode {
            id: id.to_string(),
            name: id.to_uppercase(),
            node_type: NodeType::Supplier,
            lat: 10.0,
            lng: 20.0,
            risk_operational: 0.5,
            risk_financial: 0.5,
            risk_policy: 0.5,
            industry_impacts: HashMap::new(),
        }
    }

    #[test]
    fn test_feature_collection_shape() {
        let nodes = vec![node("a"), node("b")];
        let routes = vec![TradeRoute {
            from: "a".into(),
            to: "b".into(),
            mode: TransportMode::Rail,
            flow: 2.0,
            congestion: 0.2,
            eta_delay_hours: 1.0,
            criticality: 0.9,
            trade_value_usd: Some(10.0),
        }];
        let disruptions = vec![Disruption {
            id: "d".into(),
            event_type: "flood".into(),
            severity: Severity::Medium,
            location: [5.0, 6.0],
            description: "".into(),
            source: "GDELT".into(),
            economic_impact_usd: None,
            affected_commodities: None,
            affected_trade_routes: None,
            vessels_impacted: None,
            mitigation_strategies: None,
        }];

        let scene = MapScene {
            nodes: &nodes,
            routes: &routes,
            disruptions: &disruptions,
        };
        let collection = to_geojson(&scene);

        assert_eq!(collection["type"], "FeatureCollection");
        let features = collection["features"].as_array().unwrap();
        assert_eq!(features.len(), 4);

        // Coordinate order is [lng, lat]
        assert_eq!(features[0]["geometry"]["coordinates"][0], 20.0);
        assert_eq!(features[0]["geometry"]["coordinates"][1], 10.0);
        assert_eq!(features[3]["geometry"]["coordinates"][0], 6.0);
    }

    #[test]
    fn test_dangling_route_is_skipped() {
        let nodes = vec![node("a")];
        let routes = vec![TradeRoute {
            from: "a".into(),
            to: "ghost".into(),
            mode: TransportMode::Sea,
            flow: 1.0,
            congestion: 0.1,
            eta_delay_hours: 0.0,
            criticality: 0.1,
            trade_value_usd: None,
        }];
        let scene = MapScene {
            nodes: &nodes,
            routes: &routes,
            disruptions: &[],
        };

        let collection = to_geojson(&scene);
        assert_eq!(collection["features"].as_array().unwrap().len(), 1);
    }
}
