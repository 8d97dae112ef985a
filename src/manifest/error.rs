//! Error types for manifest assembly and parsing.

use thiserror::Error;

/// Errors arising from invalid manifest content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    /// An attribute name appears twice in the same section.
    #[error("duplicate manifest attribute \"{name}\" in {section}")]
    DuplicateAttribute {
        /// The colliding attribute name.
        name: String,
        /// The section holding the collision (`main section` or its name).
        section: String,
    },

    /// Two named sections share a name.
    #[error("duplicate manifest section \"{0}\"")]
    DuplicateSection(String),

    /// An attribute name is empty, too long or contains invalid characters.
    #[error("invalid manifest attribute name \"{name}\": {reason}")]
    InvalidName {
        /// The rejected attribute name.
        name: String,
        /// Description of the validation failure.
        reason: String,
    },

    /// An attribute value contains a line break or NUL character.
    #[error("manifest attribute \"{name}\" has a value containing a line break or NUL")]
    InvalidValue {
        /// Name of the attribute whose value was rejected.
        name: String,
    },

    /// Manifest text could not be parsed.
    #[error("malformed manifest at line {line}: {reason}")]
    Malformed {
        /// One-based line number of the problem.
        line: usize,
        /// Description of the parse failure.
        reason: String,
    },
}

/// Result type alias using [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
