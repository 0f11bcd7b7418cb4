//! Project document errors.

use thiserror::Error;

use crate::geometry::GeometryError;

/// Errors reading or writing project documents.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Text is not valid JSON / GeoJSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Document has no Polygon feature.
    #[error("Document contains no polygon")]
    MissingPolygon,

    /// A geometry failed validation.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(#[from] GeometryError),

    /// A settings value is present but unusable.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// Structurally valid JSON that is not a usable document.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}
