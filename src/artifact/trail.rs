//! Dependency trails: the ancestor chain that explains how resolution
//! reached an artifact.
//!
//! Index 0 is always the root project, index 1 is the root's direct
//! dependency that pulled the artifact in, and so on down to (but not
//! including) the artifact itself. The constructor rejects empty trails, so
//! [`DependencyTrail::root`] never fails; every deeper position is reached
//! through a bounds-checked accessor that returns `None` rather than
//! panicking.

use super::error::{ArtifactError, Result};
use super::id::ArtifactId;
use std::fmt;

/// A non-empty, ordered ancestor chain.
///
/// # Examples
///
/// ```
/// use pluginpack::artifact::{ArtifactId, DependencyTrail};
///
/// let root = ArtifactId::new("org.example", "demo", "1.0");
/// let plugin = ArtifactId::new("org.example", "plugin-a", "3.0");
/// let trail = DependencyTrail::from_root(root.clone()).then(plugin.clone());
///
/// assert_eq!(trail.root(), &root);
/// assert_eq!(trail.introduced_by(), Some(&plugin));
/// assert_eq!(trail.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DependencyTrail {
    root: ArtifactId,
    descendants: Vec<ArtifactId>,
}

impl DependencyTrail {
    /// Create the trail of a direct dependency of `root`.
    #[must_use]
    pub fn from_root(root: ArtifactId) -> Self {
        Self {
            root,
            descendants: Vec::new(),
        }
    }

    /// Extend the trail with the next ancestor.
    #[must_use]
    pub fn then(mut self, ancestor: ArtifactId) -> Self {
        self.descendants.push(ancestor);
        self
    }

    /// Return the resolution root at index 0.
    #[must_use]
    pub fn root(&self) -> &ArtifactId {
        &self.root
    }

    /// Return the root's direct dependency that introduced the artifact.
    ///
    /// This is index 1 of the trail. Direct dependencies of the root have a
    /// trail of length 1 and return `None`.
    #[must_use]
    pub fn introduced_by(&self) -> Option<&ArtifactId> {
        self.get(1)
    }

    /// Return the ancestor at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ArtifactId> {
        match index {
            0 => Some(&self.root),
            n => self.descendants.get(n - 1),
        }
    }

    /// Return the number of ancestors, root included. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descendants.len() + 1
    }

    /// Always false; present for API symmetry with `len`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over ancestors from the root downwards.
    pub fn iter(&self) -> impl Iterator<Item = &ArtifactId> {
        std::iter::once(&self.root).chain(self.descendants.iter())
    }
}

impl TryFrom<Vec<ArtifactId>> for DependencyTrail {
    type Error = ArtifactError;

    fn try_from(ancestors: Vec<ArtifactId>) -> Result<Self> {
        let mut iter = ancestors.into_iter();
        let root = iter.next().ok_or_else(|| ArtifactError::EmptyTrail {
            artifact: "<unknown>".to_owned(),
        })?;
        Ok(Self {
            root,
            descendants: iter.collect(),
        })
    }
}

impl fmt::Display for DependencyTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for id in self.iter() {
            if !first {
                f.write_str(" -> ")?;
            }
            write!(f, "{id}")?;
            first = false;
        }
        Ok(())
    }
}
