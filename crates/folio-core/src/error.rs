use thiserror::Error;

/// All the ways loading or exporting a catalog can go wrong
///
/// The filter engine itself never fails; these only come out of the
/// edges (config files, catalog documents, exports).
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid catalog: {0}")]
    CatalogError(String),

    #[error("Could not load catalog from {source_name}: {message}")]
    SourceError {
        source_name: String,
        message: String,
    },

    #[error("Project not found: {0}")]
    NotFound(String),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
