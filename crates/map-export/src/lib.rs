//! Map export
//!
//! Serializes a filtered supply-chain view to downloadable artifacts: an
//! SVG world map or a GeoJSON FeatureCollection.
//!
//! Exporting requires a mounted rendering surface. An [`Exporter`]
//! without one reports [`ExportError::NotReady`] instead of silently
//! producing nothing, so the not-yet-mounted condition is observable and
//! testable.

use chrono::{NaiveDate, Utc};
use risk_model::{Disruption, SupplyNode, TradeRoute};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod geojson;
pub mod svg;

pub use svg::WorldMap;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("rendering surface not mounted")]
    NotReady,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Borrowed view of the collections to render. The caller is expected to
/// hand in an already-filtered, referentially consistent view; routes
/// whose endpoints are absent are skipped rather than drawn dangling.
#[derive(Debug, Clone, Copy)]
pub struct MapScene<'a> {
    pub nodes: &'a [SupplyNode],
    pub routes: &'a [TradeRoute],
    pub disruptions: &'a [Disruption],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Svg,
    GeoJson,
}

impl ExportFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "image/svg+xml",
            ExportFormat::GeoJson => "application/geo+json",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Svg => "svg",
            ExportFormat::GeoJson => "geojson",
        }
    }
}

/// A client-downloadable artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

/// Exports the current scene through an optionally mounted surface
#[derive(Debug, Default)]
pub struct Exporter {
    surface: Option<WorldMap>,
}

impl Exporter {
    /// Exporter with a mounted rendering surface
    pub fn mounted(surface: WorldMap) -> Self {
        Self {
            surface: Some(surface),
        }
    }

    /// Exporter whose surface has not been mounted yet; every export
    /// fails with [`ExportError::NotReady`]
    pub fn unmounted() -> Self {
        Self { surface: None }
    }

    pub fn is_ready(&self) -> bool {
        self.surface.is_some()
    }

    /// Export the scene, dating the filename with today's date
    pub fn export(&self, scene: &MapScene<'_>, format: ExportFormat) -> Result<ExportedFile> {
        self.export_at(scene, format, Utc::now().date_naive())
    }

    /// Export with an explicit filename date
    pub fn export_at(
        &self,
        scene: &MapScene<'_>,
        format: ExportFormat,
        date: NaiveDate,
    ) -> Result<ExportedFile> {
        let surface = self.surface.as_ref().ok_or(ExportError::NotReady)?;

        let contents = match format {
            ExportFormat::Svg => surface.render(scene),
            ExportFormat::GeoJson => {
                let collection = geojson::to_geojson(scene);
                serde_json::to_string_pretty(&collection)
                    .unwrap_or_else(|_| String::from("{}"))
            }
        };

        Ok(ExportedFile {
            file_name: format!(
                "supply-chain-world-map-{}.{}",
                date.format("%Y-%m-%d"),
                format.extension()
            ),
            mime_type: format.mime_type().to_string(),
            contents,
        })
    }
}
