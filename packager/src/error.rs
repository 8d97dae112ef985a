//! Error types for the packager CLI.
//!
//! Every failure a packaging run can hit ends up in [`PackagerError`]. I/O
//! failures carry what was attempted and on which path, so the message on
//! stderr is enough to act on without a backtrace.

use camino::Utf8PathBuf;
use pluginpack::artifact::ArtifactError;
use pluginpack::config::ConfigError;
use pluginpack::manifest::ManifestError;
use thiserror::Error;

/// Errors that can occur while packaging a plugin.
#[derive(Debug, Error)]
pub enum PackagerError {
    /// Link mode was requested without a host plugin directory.
    #[error(
        "no host plugin directory configured; set `host_plugin_dir` in the configuration \
         or pass --host-plugin-dir"
    )]
    MissingHostPluginDir,

    /// Packaging was requested without a final artifact name.
    #[error(
        "no final name configured; set `final_name` in the configuration or pass --final-name"
    )]
    MissingFinalName,

    /// A filesystem operation failed.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        /// What was being attempted, for example `copy library`.
        operation: &'static str,
        /// The path the operation acted on.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing an archive failed.
    #[error("failed to write archive {path}: {source}")]
    Archive {
        /// The archive being written.
        path: Utf8PathBuf,
        /// The underlying zip error.
        #[source]
        source: zip::result::ZipError,
    },

    /// Two staged libraries would share a file name under `WEB-INF/lib/`.
    #[error(
        "libraries {first} and {second} would both be staged as {file_name}; \
         one would silently replace the other"
    )]
    LibraryNameClash {
        /// The shared file name.
        file_name: String,
        /// The library staged first.
        first: Utf8PathBuf,
        /// The library that would overwrite it.
        second: Utf8PathBuf,
    },

    /// An include or exclude pattern is not a valid glob.
    #[error("invalid archive filter pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// The glob parse error.
        #[source]
        source: glob::PatternError,
    },

    /// Failed to write command output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// The artifact graph could not be loaded.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    /// The manifest could not be assembled or read back.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PackagerError {
    /// Return a mapper that wraps an I/O error as [`PackagerError::Io`] for
    /// `operation` on `path`, for use with `map_err`.
    pub fn io(
        operation: &'static str,
        path: impl Into<Utf8PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            operation,
            path,
            source,
        }
    }
}

/// Result type alias using [`PackagerError`].
pub type Result<T> = std::result::Result<T, PackagerError>;
