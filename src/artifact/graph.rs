//! The resolved artifact graph handed over by the dependency resolver.
//!
//! The graph is an ordered collection: resolution order is preserved
//! end-to-end because classloading order downstream depends on it. The
//! JSON interchange form is an array of records:
//!
//! ```json
//! [
//!   {
//!     "id": "org.example:lib-x:2.1",
//!     "file": "/repo/lib-x-2.1.jar",
//!     "scope": "runtime",
//!     "optional": false,
//!     "plugin": false,
//!     "trail": ["org.example:demo:1.0"]
//!   }
//! ]
//! ```

use super::error::{ArtifactError, Result};
use super::id::ArtifactId;
use super::scope::Scope;
use super::trail::DependencyTrail;
use super::Artifact;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered set of resolved artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactGraph {
    artifacts: Vec<Artifact>,
}

impl ArtifactGraph {
    /// Create a graph from artifacts in resolution order.
    #[must_use]
    pub fn new(artifacts: Vec<Artifact>) -> Self {
        Self { artifacts }
    }

    /// Parse a graph from its JSON interchange form.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Json`] when the document is malformed or a
    /// record carries an invalid identity, and
    /// [`ArtifactError::EmptyTrail`] when a record has an empty trail.
    ///
    /// # Examples
    ///
    /// ```
    /// use pluginpack::artifact::ArtifactGraph;
    ///
    /// let json = r#"[{"id":"org.example:lib-x:2.1","file":"/repo/lib-x.jar",
    ///                "scope":"runtime","trail":["org.example:demo:1.0"]}]"#;
    /// let graph = ArtifactGraph::from_json(json).unwrap();
    /// assert_eq!(graph.len(), 1);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<ArtifactRecord> = serde_json::from_str(json)?;
        records
            .into_iter()
            .map(ArtifactRecord::into_artifact)
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }

    /// Read and parse a graph file.
    ///
    /// Relative artifact files are resolved against the graph file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Read`] when the file cannot be read, or any
    /// error from [`Self::from_json`].
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.to_owned(),
            source,
        })?;
        let mut graph = Self::from_json(&json)?;
        if let Some(base) = path.parent() {
            for artifact in &mut graph.artifacts {
                if artifact.file.is_relative() {
                    artifact.file = base.join(&artifact.file);
                }
            }
        }
        debug!("loaded {} artifacts from {path}", graph.len());
        Ok(graph)
    }

    /// Serialise the graph back to its JSON interchange form.
    ///
    /// # Errors
    ///
    /// Returns [`ArtifactError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String> {
        let records: Vec<ArtifactRecord> = self.artifacts.iter().map(ArtifactRecord::from).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Force the optional flag of every artifact named by `overrides`.
    ///
    /// Returns the number of artifacts whose flag changed.
    pub fn apply_optional_overrides(&mut self, overrides: &OptionalOverrides) -> usize {
        let mut changed = 0;
        for artifact in &mut self.artifacts {
            let Some(optional) = overrides.lookup(artifact.id()) else {
                continue;
            };
            if artifact.is_optional() != optional {
                debug!("optional override: {} -> optional={optional}", artifact.id());
                artifact.set_optional(optional);
                changed += 1;
            }
        }
        changed
    }

    /// Iterate over artifacts in resolution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Artifact> {
        self.artifacts.iter()
    }

    /// Return the number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Return true when the graph holds no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl<'a> IntoIterator for &'a ArtifactGraph {
    type Item = &'a Artifact;
    type IntoIter = std::slice::Iter<'a, Artifact>;

    fn into_iter(self) -> Self::IntoIter {
        self.artifacts.iter()
    }
}

impl FromIterator<Artifact> for ArtifactGraph {
    fn from_iter<I: IntoIterator<Item = Artifact>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Per-dependency overrides of the optional flag.
///
/// Keys are `group:name` (any version) or `group:name:version`; an exact
/// version key wins over a versionless one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionalOverrides(BTreeMap<String, bool>);

impl OptionalOverrides {
    /// Set the override for `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, optional: bool) {
        self.0.insert(key.into(), optional);
    }

    /// Return the override that applies to `id`, if any.
    #[must_use]
    pub fn lookup(&self, id: &ArtifactId) -> Option<bool> {
        self.0
            .get(&id.to_string())
            .or_else(|| self.0.get(&format!("{}:{}", id.group(), id.name())))
            .copied()
    }

    /// Return true when no overrides are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArtifactRecord {
    id: ArtifactId,
    file: Utf8PathBuf,
    #[serde(default = "default_scope")]
    scope: Scope,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    plugin: bool,
    trail: Vec<ArtifactId>,
}

const fn default_scope() -> Scope {
    Scope::Compile
}

impl ArtifactRecord {
    fn into_artifact(self) -> Result<Artifact> {
        if self.trail.is_empty() {
            return Err(ArtifactError::EmptyTrail {
                artifact: self.id.to_string(),
            });
        }
        let trail = DependencyTrail::try_from(self.trail)?;
        Ok(Artifact::new(self.id, self.file, self.scope, trail)
            .optional(self.optional)
            .plugin(self.plugin))
    }
}

impl From<&Artifact> for ArtifactRecord {
    fn from(artifact: &Artifact) -> Self {
        Self {
            id: artifact.id().clone(),
            file: artifact.file().to_owned(),
            scope: artifact.scope(),
            optional: artifact.is_optional(),
            plugin: artifact.is_plugin(),
            trail: artifact.trail().iter().cloned().collect(),
        }
    }
}
