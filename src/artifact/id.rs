//! Artifact identity newtype.
//!
//! An identity is the `group:name:version` triple used for set membership
//! and dependency trail matching, optionally qualified by a classifier.
//! Parsing accepts the four-part `group:name:type:version` form emitted by
//! some resolvers and drops the packaging type. The five-part
//! `group:name:type:classifier:version` form keeps both, so two classified
//! artifacts of one coordinate stay distinct.

use super::error::{ArtifactError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stable artifact identity.
///
/// # Examples
///
/// ```
/// use pluginpack::artifact::ArtifactId;
///
/// let id: ArtifactId = "org.example:lib-x:2.1".parse().unwrap();
/// assert_eq!(id.name(), "lib-x");
/// assert_eq!(id.to_string(), "org.example:lib-x:2.1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId {
    group: String,
    name: String,
    version: String,
    qualifier: Option<Qualifier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Qualifier {
    packaging: String,
    classifier: String,
}

impl ArtifactId {
    /// Create an identity from its components.
    #[must_use]
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            qualifier: None,
        }
    }

    /// Qualify the identity with a packaging type and classifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use pluginpack::artifact::ArtifactId;
    ///
    /// let id = ArtifactId::new("org.example", "native", "1.0").with_classifier("jar", "linux");
    /// assert_eq!(id.classifier(), Some("linux"));
    /// assert_eq!(id.to_string(), "org.example:native:jar:linux:1.0");
    /// ```
    #[must_use]
    pub fn with_classifier(
        mut self,
        packaging: impl Into<String>,
        classifier: impl Into<String>,
    ) -> Self {
        self.qualifier = Some(Qualifier {
            packaging: packaging.into(),
            classifier: classifier.into(),
        });
        self
    }

    /// Return the group component.
    #[must_use]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Return the artifact name component.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the version component.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Return the packaging type of a classified identity.
    #[must_use]
    pub fn packaging(&self) -> Option<&str> {
        self.qualifier.as_ref().map(|qualifier| qualifier.packaging.as_str())
    }

    /// Return the classifier, if any.
    #[must_use]
    pub fn classifier(&self) -> Option<&str> {
        self.qualifier.as_ref().map(|qualifier| qualifier.classifier.as_str())
    }
}

impl std::str::FromStr for ArtifactId {
    type Err = ArtifactError;

    fn from_str(value: &str) -> Result<Self> {
        let parts: Vec<&str> = value.split(':').collect();
        let (group, name, version, qualifier) = match parts.as_slice() {
            [group, name, version] | [group, name, _, version] => (*group, *name, *version, None),
            [group, name, packaging, classifier, version] => {
                (*group, *name, *version, Some((*packaging, *classifier)))
            }
            _ => {
                return Err(ArtifactError::InvalidId {
                    value: value.to_owned(),
                    reason: "expected group:name:version".to_owned(),
                });
            }
        };
        let mut required = vec![("group", group), ("name", name), ("version", version)];
        if let Some((packaging, classifier)) = qualifier {
            required.extend([("type", packaging), ("classifier", classifier)]);
        }
        if let Some((label, _)) = required.iter().find(|(_, part)| part.trim().is_empty()) {
            return Err(ArtifactError::InvalidId {
                value: value.to_owned(),
                reason: format!("{label} must not be empty"),
            });
        }
        let id = Self::new(group, name, version);
        Ok(match qualifier {
            Some((packaging, classifier)) => id.with_classifier(packaging, classifier),
            None => id,
        })
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = ArtifactError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_string()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:", self.group, self.name)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "{}:{}:", qualifier.packaging, qualifier.classifier)?;
        }
        f.write_str(&self.version)
    }
}
