//! Artifact graph model for resolved plugin dependencies.
//!
//! The graph is handed to us fully resolved: every record already carries
//! its scope, optional flag, plugin flag and the dependency trail that
//! explains how resolution reached it. Nothing in this module performs
//! version mediation.
//!
//! # Sub-modules
//!
//! - [`error`] — Semantic error types for malformed graph data.
//! - [`graph`] — The ordered [`ArtifactGraph`] and its JSON loader.
//! - [`id`] — Artifact identity newtype (`ArtifactId`).
//! - [`scope`] — Dependency scopes and the runtime scope filter.
//! - [`trail`] — The bounds-checked [`DependencyTrail`] sequence.

pub mod error;
pub mod graph;
pub mod id;
pub mod scope;
pub mod trail;

pub use error::ArtifactError;
pub use graph::{ArtifactGraph, OptionalOverrides};
pub use id::ArtifactId;
pub use scope::Scope;
pub use trail::DependencyTrail;

use camino::{Utf8Path, Utf8PathBuf};

/// One resolved dependency of the plugin being packaged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    id: ArtifactId,
    file: Utf8PathBuf,
    scope: Scope,
    optional: bool,
    plugin: bool,
    trail: DependencyTrail,
}

impl Artifact {
    /// Create an artifact record.
    ///
    /// # Examples
    ///
    /// ```
    /// use pluginpack::artifact::{Artifact, ArtifactId, DependencyTrail, Scope};
    ///
    /// let root = ArtifactId::new("org.example", "demo", "1.0");
    /// let lib = Artifact::new(
    ///     ArtifactId::new("org.example", "lib-x", "2.1"),
    ///     "/repo/lib-x-2.1.jar",
    ///     Scope::Runtime,
    ///     DependencyTrail::from_root(root),
    /// );
    /// assert!(!lib.is_optional());
    /// assert!(!lib.is_plugin());
    /// ```
    #[must_use]
    pub fn new(
        id: ArtifactId,
        file: impl Into<Utf8PathBuf>,
        scope: Scope,
        trail: DependencyTrail,
    ) -> Self {
        Self {
            id,
            file: file.into(),
            scope,
            optional: false,
            plugin: false,
            trail,
        }
    }

    /// Mark the artifact as optional.
    #[must_use]
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Mark the artifact as a sibling plugin of the same host.
    #[must_use]
    pub fn plugin(mut self, plugin: bool) -> Self {
        self.plugin = plugin;
        self
    }

    /// Return the artifact identity.
    #[must_use]
    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    /// Return the absolute path of the backing library file.
    #[must_use]
    pub fn file(&self) -> &Utf8Path {
        &self.file
    }

    /// Return the dependency scope.
    #[must_use]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Return whether the dependency was declared optional.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Return whether the artifact is itself a plugin of the host.
    #[must_use]
    pub fn is_plugin(&self) -> bool {
        self.plugin
    }

    /// Return the ancestor chain from the resolution root to this artifact.
    #[must_use]
    pub fn trail(&self) -> &DependencyTrail {
        &self.trail
    }

    pub(crate) fn set_optional(&mut self, optional: bool) {
        self.optional = optional;
    }
}
