//! Runtime classpath resolution.
//!
//! Reduces a classified artifact graph to the [`LibrarySet`] a plugin must
//! bundle (bundle mode) or reference (link mode). Both modes go through
//! [`resolve`], so the external libraries they list are the same set by
//! construction; link mode only prepends local build output.
//!
//! An artifact is dropped when it is a sibling plugin, when it was
//! introduced by a sibling plugin, when the host core is on its trail (or
//! it is the host core), when it is optional, or when its scope is not
//! runtime-visible. Survivors keep resolution order.

use crate::artifact::{ArtifactGraph, ArtifactId, Scope};
use crate::classify::{ArtifactKind, Classification, Classified, CoreIdentities, classify};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::fmt;

/// Separator used when a [`LibrarySet`] is rendered as a manifest value.
pub const LIBRARY_DELIMITER: char = ',';

/// The ordered, de-duplicated paths a plugin ships with or references.
///
/// The first occurrence of a path wins; later duplicates are dropped.
///
/// # Examples
///
/// ```
/// use pluginpack::resolver::LibrarySet;
///
/// let mut set = LibrarySet::default();
/// assert!(set.push("/repo/a.jar"));
/// assert!(!set.push("/repo/a.jar"));
/// set.push("/repo/b.jar");
/// assert_eq!(set.joined(), "/repo/a.jar,/repo/b.jar");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibrarySet(Vec<Utf8PathBuf>);

impl LibrarySet {
    /// Append `path` unless it is already present. Returns true if added.
    pub fn push(&mut self, path: impl Into<Utf8PathBuf>) -> bool {
        let path = path.into();
        if self.0.contains(&path) {
            return false;
        }
        self.0.push(path);
        true
    }

    /// Return the entries in order.
    #[must_use]
    pub fn as_slice(&self) -> &[Utf8PathBuf] {
        &self.0
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Utf8PathBuf> {
        self.0.iter()
    }

    /// Return the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render the entries joined with [`LIBRARY_DELIMITER`].
    #[must_use]
    pub fn joined(&self) -> String {
        let mut out = String::new();
        for (index, path) in self.0.iter().enumerate() {
            if index > 0 {
                out.push(LIBRARY_DELIMITER);
            }
            out.push_str(path.as_str());
        }
        out
    }
}

impl IntoIterator for LibrarySet {
    type Item = Utf8PathBuf;
    type IntoIter = std::vec::IntoIter<Utf8PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a LibrarySet {
    type Item = &'a Utf8PathBuf;
    type IntoIter = std::slice::Iter<'a, Utf8PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Local build output referenced ahead of libraries in link mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkLayout {
    /// The compiled classes directory.
    pub classes_dir: Utf8PathBuf,
    /// Declared resource directories, in declaration order.
    pub resource_dirs: Vec<Utf8PathBuf>,
}

impl LinkLayout {
    /// Return the local entries: the classes directory, then every
    /// resource directory that exists on disk.
    #[must_use]
    pub fn local_entries(&self) -> Vec<Utf8PathBuf> {
        self.local_entries_with(Utf8Path::exists)
    }

    /// Like [`Self::local_entries`], with an injectable existence check.
    pub fn local_entries_with<F>(&self, exists: F) -> Vec<Utf8PathBuf>
    where
        F: Fn(&Utf8Path) -> bool,
    {
        std::iter::once(self.classes_dir.clone())
            .chain(
                self.resource_dirs
                    .iter()
                    .filter(|dir| exists(dir.as_path()))
                    .cloned(),
            )
            .collect()
    }
}

/// Which artifact form the library set is computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode<'a> {
    /// Installable bundle: external libraries only.
    Bundle,
    /// Development link: local output first, then external libraries.
    Link(&'a LinkLayout),
}

/// Why an artifact was left out of the library set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exclusion {
    /// The artifact is itself a sibling plugin.
    SiblingPlugin,
    /// The artifact was introduced by the named sibling plugin.
    ViaSiblingPlugin(ArtifactId),
    /// The artifact is the host core.
    HostCore,
    /// The host core is on the artifact's trail.
    ViaHostCore,
    /// The artifact is optional.
    Optional,
    /// The scope is not visible at runtime.
    Scope(Scope),
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SiblingPlugin => f.write_str("sibling plugin, loaded by the host"),
            Self::ViaSiblingPlugin(plugin) => write!(f, "transitive through plugin {plugin}"),
            Self::HostCore => f.write_str("host core library"),
            Self::ViaHostCore => f.write_str("reached through the host core"),
            Self::Optional => f.write_str("optional dependency"),
            Self::Scope(scope) => write!(f, "{scope} scope is not runtime-visible"),
        }
    }
}

/// The outcome of a resolution run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    libraries: LibrarySet,
    local_entries: usize,
    excluded: Vec<(ArtifactId, Exclusion)>,
}

impl Resolution {
    /// Return the full library set, local entries first in link mode.
    #[must_use]
    pub fn libraries(&self) -> &LibrarySet {
        &self.libraries
    }

    /// Consume the resolution and return the library set.
    #[must_use]
    pub fn into_libraries(self) -> LibrarySet {
        self.libraries
    }

    /// Return only the external library files, without local output.
    #[must_use]
    pub fn external(&self) -> &[Utf8PathBuf] {
        self.libraries
            .as_slice()
            .get(self.local_entries..)
            .unwrap_or_default()
    }

    /// Return every excluded artifact with the reason it was excluded.
    #[must_use]
    pub fn excluded(&self) -> &[(ArtifactId, Exclusion)] {
        &self.excluded
    }
}

/// Decide whether a classified artifact is excluded.
///
/// Returns the first rule that applies, checked in order: sibling plugin,
/// introduced by a sibling plugin, host core, optional, scope.
#[must_use]
pub fn exclusion_for(record: &Classified<'_>) -> Option<Exclusion> {
    let artifact = record.artifact;
    match record.kind {
        ArtifactKind::SiblingPlugin => return Some(Exclusion::SiblingPlugin),
        ArtifactKind::HostCore => return Some(Exclusion::HostCore),
        ArtifactKind::Ordinary => {}
    }
    if record.ancestry.via_sibling_plugin {
        if let Some(plugin) = artifact.trail().introduced_by() {
            return Some(Exclusion::ViaSiblingPlugin(plugin.clone()));
        }
    }
    if record.ancestry.via_host_core {
        return Some(Exclusion::ViaHostCore);
    }
    if artifact.is_optional() {
        return Some(Exclusion::Optional);
    }
    if !artifact.scope().is_runtime_visible() {
        return Some(Exclusion::Scope(artifact.scope()));
    }
    None
}

/// Compute the library set for `mode` from a classified graph.
#[must_use]
pub fn resolve(classification: &Classification<'_>, mode: ResolveMode<'_>) -> Resolution {
    let mut libraries = LibrarySet::default();
    let mut local_entries = 0;

    if let ResolveMode::Link(layout) = mode {
        for entry in layout.local_entries() {
            if libraries.push(entry) {
                local_entries += 1;
            }
        }
    }

    let mut excluded = Vec::new();
    for record in classification.iter() {
        let artifact = record.artifact;
        match exclusion_for(record) {
            Some(reason) => {
                debug!("excluding {}: {reason}", artifact.id());
                excluded.push((artifact.id().clone(), reason));
            }
            None => {
                if !libraries.push(artifact.file()) {
                    debug!("{} duplicates an earlier library entry", artifact.file());
                }
            }
        }
    }

    Resolution {
        libraries,
        local_entries,
        excluded,
    }
}

/// Classify `graph` and resolve it in one step.
#[must_use]
pub fn resolve_graph(
    graph: &ArtifactGraph,
    core: &CoreIdentities,
    mode: ResolveMode<'_>,
) -> Resolution {
    resolve(&classify(graph, core), mode)
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
