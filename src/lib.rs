//! Classpath resolution and manifest assembly for host plugins.
//!
//! This crate holds the filesystem-free core of `pluginpack`: it takes a
//! resolved artifact graph, decides which libraries a plugin has to carry
//! (or reference, for development links), and assembles the manifest the
//! host reads. The `pluginpack-packager` crate drives staging, archiving and
//! link emission on top of it.

pub mod artifact;
pub mod classify;
pub mod config;
pub mod manifest;
pub mod resolver;

pub use artifact::{Artifact, ArtifactGraph, ArtifactId, DependencyTrail, Scope};
pub use config::PackagingConfig;
pub use manifest::{Manifest, ManifestBuilder, ManifestError};
pub use resolver::{LibrarySet, Resolution, ResolveMode, resolve, resolve_graph};
