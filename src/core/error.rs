use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    /// A quantity, price or total is not numeric once separators are stripped.
    #[error("Malformed amount: {0:?}")]
    MalformedAmount(String),

    #[error("Template not found: {template_id}")]
    MissingTemplate { template_id: String },

    #[error("No input records found in {}", .0.display())]
    MissingInputCollection(PathBuf),

    #[error("No templates available in {}", .0.display())]
    NoTemplatesAvailable(PathBuf),

    #[error("Rendering failed: {0}")]
    Rendering(String),

    #[error("Rendering timed out after {}s", .0.as_secs())]
    RenderTimeout(Duration),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type DocumentResult<T> = Result<T, DocumentError>;
