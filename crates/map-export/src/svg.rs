//! Equirectangular SVG world-map renderer
//!
//! Routes are drawn under nodes, disruption markers on top. Node color
//! follows the derived risk level; marker size follows severity.

use crate::MapScene;
use risk_model::Severity;
use std::collections::HashMap;
use std::fmt::Write;

/// A fixed-size equirectangular rendering surface
#[derive(Debug, Clone)]
pub struct WorldMap {
    pub width: f64,
    pub height: f64,
}

impl Default for WorldMap {
    fn default() -> Self {
        // 2:1 matches the equirectangular aspect ratio
        Self {
            width: 1024.0,
            height: 512.0,
        }
    }
}

impl WorldMap {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Project (lat, lng) degrees onto pixel coordinates
    pub fn project(&self, lat: f64, lng: f64) -> (f64, f64) {
        let x = (lng + 180.0) / 360.0 * self.width;
        let y = (90.0 - lat) / 180.0 * self.height;
        (x, y)
    }

    /// Render the scene to an SVG document string
    pub fn render(&self, scene: &MapScene<'_>) -> String {
        let mut svg = String::with_capacity(4096);

        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}">"#,
            w = self.width,
            h = self.height
        );
        let _ = write!(
            svg,
            r##"<rect x="0" y="0" width="{}" height="{}" fill="#0b1220"/>"##,
            self.width, self.height
        );

        self.render_graticule(&mut svg);

        // Routes first so markers sit on top of them
        let positions: HashMap<&str, (f64, f64)> = scene
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), self.project(n.lat, n.lng)))
            .collect();

        for route in scene.routes {
            let (Some(&(x1, y1)), Some(&(x2, y2))) = (
                positions.get(route.from.as_str()),
                positions.get(route.to.as_str()),
            ) else {
                continue;
            };
            let width = 1.0 + route.criticality * 2.0;
            let _ = write!(
                svg,
                r##"<line x1="{x1:.1}" y1="{y1:.1}" x2="{x2:.1}" y2="{y2:.1}" stroke="#38bdf8" stroke-width="{width:.1}" stroke-opacity="0.6"/>"##,
            );
        }

        for node in scene.nodes {
            let (x, y) = self.project(node.lat, node.lng);
            let color = node.risk_level().color_hex();
            let _ = write!(
                svg,
                r##"<circle cx="{x:.1}" cy="{y:.1}" r="4" fill="{color}" stroke="#0f172a" stroke-width="1"><title>{} ({})</title></circle>"##,
                escape_xml(&node.name),
                node.node_type,
            );
        }

        for disruption in scene.disruptions {
            let [lat, lng] = disruption.location;
            let (x, y) = self.project(lat, lng);
            let r = severity_radius(disruption.severity);
            let _ = write!(
                svg,
                r##"<circle cx="{x:.1}" cy="{y:.1}" r="{r}" fill="none" stroke="#f43f5e" stroke-width="2" stroke-dasharray="3 2"><title>{} [{}]: {}</title></circle>"##,
                escape_xml(&disruption.event_type),
                disruption.severity,
                escape_xml(&disruption.description),
            );
        }

        let _ = write!(
            svg,
            r##"<text x="8" y="{:.1}" fill="#94a3b8" font-family="monospace" font-size="11">{} nodes · {} routes · {} disruptions</text>"##,
            self.height - 8.0,
            scene.nodes.len(),
            scene.routes.len(),
            scene.disruptions.len(),
        );

        svg.push_str("</svg>");
        svg
    }

    fn render_graticule(&self, svg: &mut String) {
        for lng in (-150..=150).step_by(30) {
            let (x, _) = self.project(0.0, lng as f64);
            let _ = write!(
                svg,
                r##"<line x1="{x:.1}" y1="0" x2="{x:.1}" y2="{:.1}" stroke="#1e293b" stroke-width="0.5"/>"##,
                self.height
            );
        }
        for lat in (-60..=60).step_by(30) {
            let (_, y) = self.project(lat as f64, 0.0);
            let _ = write!(
                svg,
                r##"<line x1="0" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#1e293b" stroke-width="0.5"/>"##,
                self.width
            );
        }
    }
}

fn severity_radius(severity: Severity) -> f64 {
    match severity {
        Severity::Low => 3.0,
        Severity::Medium => 4.5,
        Severity::High => 6.0,
        Severity::Critical => 8.0,
    }
}

fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_model::{NodeType, SupplyNode, TradeRoute, TransportMode};
    use std::collections::HashMap;

    fn node(id: &str, lat: f64, lng: f64) -> SupplyNode {
        SupplyNode {
            id: id.to_string(),
            name: format!("<{id}> & co"),
            node_type: NodeType::Port,
            lat,
            lng,
            risk_operational: 0.9,
            risk_financial: 0.9,
            risk_policy: 0.9,
            industry_impacts: HashMap::new(),
        }
    }

    #[test]
    fn test_projection_corners() {
        let map = WorldMap::default();
        assert_eq!(map.project(90.0, -180.0), (0.0, 0.0));
        assert_eq!(map.project(-90.0, 180.0), (1024.0, 512.0));
        assert_eq!(map.project(0.0, 0.0), (512.0, 256.0));
    }

    #[test]
    fn test_render_draws_one_marker_per_entity() {
        let nodes = vec![node("a", 10.0, 20.0), node("b", -10.0, -20.0)];
        let routes = vec![TradeRoute {
            from: "a".into(),
            to: "b".into(),
            mode: TransportMode::Sea,
            flow: 1.0,
            congestion: 0.1,
            eta_delay_hours: 0.0,
            criticality: 0.5,
            trade_value_usd: None,
        }];
        let scene = MapScene {
            nodes: &nodes,
            routes: &routes,
            disruptions: &[],
        };

        let svg = WorldMap::default().render(&scene);
        assert_eq!(svg.matches("<circle").count(), 2);
        // Route lines are the only ones drawn in the route color
        assert_eq!(svg.matches(r##"stroke="#38bdf8""##).count(), 1);
        // Critical nodes carry the critical color
        assert!(svg.contains("#ef4444"));
    }

    #[test]
    fn test_render_skips_dangling_routes() {
        let nodes = vec![node("a", 10.0, 20.0)];
        let routes = vec![TradeRoute {
            from: "a".into(),
            to: "missing".into(),
            mode: TransportMode::Air,
            flow: 1.0,
            congestion: 0.1,
            eta_delay_hours: 0.0,
            criticality: 0.5,
            trade_value_usd: None,
        }];
        let scene = MapScene {
            nodes: &nodes,
            routes: &routes,
            disruptions: &[],
        };

        let svg = WorldMap::default().render(&scene);
        assert_eq!(svg.matches(r##"stroke="#38bdf8""##).count(), 0);
    }

    #[test]
    fn test_names_are_xml_escaped() {
        let nodes = vec![node("a", 0.0, 0.0)];
        let scene = MapScene {
            nodes: &nodes,
            routes: &[],
            disruptions: &[],
        };

        let svg = WorldMap::default().render(&scene);
        assert!(svg.contains("&lt;a&gt; &amp; co"));
    }
}
