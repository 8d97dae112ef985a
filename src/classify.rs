//! Up-front classification of resolved artifacts.
//!
//! Every artifact is tagged once with an [`ArtifactKind`] and an
//! [`Ancestry`] describing how resolution reached it. The resolver then
//! works over these tags alone, so identity matching against host-core
//! names happens here and nowhere else.

use crate::artifact::{Artifact, ArtifactGraph, ArtifactId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Artifact names that identify the host's shared core library.
pub const DEFAULT_CORE_ARTIFACTS: [&str; 2] = ["jenkins-core", "hudson-core"];

/// What an artifact is, from the host's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// A plain library.
    Ordinary,
    /// Another plugin of the same host, loaded by the host independently.
    SiblingPlugin,
    /// The host's shared core library, visible to every plugin.
    HostCore,
}

/// How resolution reached an artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Ancestry {
    /// The root's direct dependency that introduced the artifact is a
    /// sibling plugin.
    pub via_sibling_plugin: bool,
    /// Some ancestor on the trail is the host core.
    pub via_host_core: bool,
}

/// The set of artifact names treated as the host core.
///
/// # Examples
///
/// ```
/// use pluginpack::artifact::ArtifactId;
/// use pluginpack::classify::CoreIdentities;
///
/// let core = CoreIdentities::default();
/// assert!(core.is_core(&ArtifactId::new("org.jenkins-ci.main", "jenkins-core", "2.401")));
/// assert!(!core.is_core(&ArtifactId::new("org.example", "core-utils", "1.0")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoreIdentities(BTreeSet<String>);

impl CoreIdentities {
    /// Create a core identity set from artifact names.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Return true when `id` names the host core.
    #[must_use]
    pub fn is_core(&self, id: &ArtifactId) -> bool {
        self.0.contains(id.name())
    }
}

impl Default for CoreIdentities {
    fn default() -> Self {
        Self::new(DEFAULT_CORE_ARTIFACTS)
    }
}

/// One artifact together with its classification tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classified<'a> {
    /// The classified artifact.
    pub artifact: &'a Artifact,
    /// What the artifact is.
    pub kind: ArtifactKind,
    /// How resolution reached it.
    pub ancestry: Ancestry,
}

/// A classified graph, still in resolution order.
#[derive(Debug, Clone)]
pub struct Classification<'a> {
    records: Vec<Classified<'a>>,
}

impl<'a> Classification<'a> {
    /// Iterate over classified records in resolution order.
    pub fn iter(&self) -> std::slice::Iter<'_, Classified<'a>> {
        self.records.iter()
    }

    /// Return the number of classified records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return true when the classified graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Classify every artifact of `graph`.
///
/// The sibling-plugin set is computed from the same graph first, so a trail
/// entry naming a plugin absent from the graph is simply not treated as a
/// plugin.
#[must_use]
pub fn classify<'a>(graph: &'a ArtifactGraph, core: &CoreIdentities) -> Classification<'a> {
    let plugins: BTreeSet<&ArtifactId> = graph
        .iter()
        .filter(|artifact| artifact.is_plugin())
        .map(Artifact::id)
        .collect();

    let records = graph
        .iter()
        .map(|artifact| Classified {
            artifact,
            kind: kind_of(artifact, &plugins, core),
            ancestry: Ancestry {
                via_sibling_plugin: artifact
                    .trail()
                    .introduced_by()
                    .is_some_and(|parent| plugins.contains(parent)),
                via_host_core: artifact.trail().iter().any(|id| core.is_core(id)),
            },
        })
        .collect();

    Classification { records }
}

fn kind_of(
    artifact: &Artifact,
    plugins: &BTreeSet<&ArtifactId>,
    core: &CoreIdentities,
) -> ArtifactKind {
    if plugins.contains(artifact.id()) {
        ArtifactKind::SiblingPlugin
    } else if core.is_core(artifact.id()) {
        ArtifactKind::HostCore
    } else {
        ArtifactKind::Ordinary
    }
}
