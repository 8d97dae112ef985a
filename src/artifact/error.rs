//! Error types for artifact identities and resolved graph data.
//!
//! Each variant names the offending input so a broken graph export can be
//! traced back to the record that produced it.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising from malformed artifact graph data.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// An identity string is not in `group:name:version` form.
    #[error("invalid artifact id \"{value}\": {reason}")]
    InvalidId {
        /// The rejected identity string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// A dependency trail was empty; the root project must always be present.
    #[error("dependency trail for {artifact} is empty")]
    EmptyTrail {
        /// The artifact whose trail was empty.
        artifact: String,
    },

    /// The graph file could not be read.
    #[error("failed to read artifact graph {path}")]
    Read {
        /// Path of the graph file.
        path: Utf8PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The graph JSON is malformed or a record failed validation.
    #[error("malformed artifact graph: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`ArtifactError`].
pub type Result<T> = std::result::Result<T, ArtifactError>;
