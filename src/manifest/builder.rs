//! Validating manifest builder and the plugin manifest assembler.
//!
//! The builder only records attributes; every check (name syntax, value
//! syntax, case-insensitive collisions) runs in [`ManifestBuilder::build`],
//! so a failed build never leaves a half-written manifest behind.

use super::error::{ManifestError, Result};
use super::{Attribute, LIBRARIES, Manifest, RESOURCE_PATH, Section};
use crate::resolver::LibrarySet;
use camino::Utf8Path;
use std::collections::HashSet;

/// Longest attribute name the manifest format accepts, in bytes.
const MAX_NAME_LEN: usize = 70;

/// Collects manifest attributes and validates them on [`Self::build`].
#[derive(Debug, Clone, Default)]
pub struct ManifestBuilder {
    main: Vec<Attribute>,
    sections: Vec<(String, Vec<Attribute>)>,
}

impl ManifestBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a main-section attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.main.push(Attribute::new(name, value));
        self
    }

    /// Append several main-section attributes, keeping their order.
    #[must_use]
    pub fn attributes<I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = Attribute>,
    {
        self.main.extend(attributes);
        self
    }

    /// Append the `Libraries` attribute for `libraries`.
    #[must_use]
    pub fn libraries(self, libraries: &LibrarySet) -> Self {
        self.attribute(LIBRARIES, libraries.joined())
    }

    /// Append the `Resource-Path` attribute pointing at `resource_root`.
    #[must_use]
    pub fn resource_path(self, resource_root: &Utf8Path) -> Self {
        self.attribute(RESOURCE_PATH, resource_root.as_str())
    }

    /// Append a named section.
    #[must_use]
    pub fn section<I>(mut self, name: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = Attribute>,
    {
        self.sections
            .push((name.into(), attributes.into_iter().collect()));
        self
    }

    /// Validate the collected attributes and produce the manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::DuplicateAttribute`] when a name repeats
    /// within a section (case-insensitively),
    /// [`ManifestError::DuplicateSection`] for repeated section names,
    /// [`ManifestError::InvalidName`] for malformed names and
    /// [`ManifestError::InvalidValue`] for values containing line breaks.
    pub fn build(self) -> Result<Manifest> {
        validate_attributes("main section", &self.main)?;

        let mut seen_sections = HashSet::new();
        let mut sections = Vec::with_capacity(self.sections.len());
        for (name, attributes) in self.sections {
            if !seen_sections.insert(name.to_ascii_lowercase()) {
                return Err(ManifestError::DuplicateSection(name));
            }
            validate_attributes(&format!("section \"{name}\""), &attributes)?;
            sections.push(Section {
                name: Some(name),
                attributes,
            });
        }

        Ok(Manifest {
            main: Section {
                name: None,
                attributes: self.main,
            },
            sections,
        })
    }
}

/// Assemble a plugin manifest.
///
/// Host metadata goes into the main section unchanged and in order, then
/// the `Libraries` attribute, then (link mode only) `Resource-Path`.
///
/// # Errors
///
/// Returns [`ManifestError::DuplicateAttribute`] when the metadata already
/// supplies `Libraries` or `Resource-Path` (or repeats one of its own
/// names), and any other [`ManifestBuilder::build`] failure.
///
/// # Examples
///
/// ```
/// use pluginpack::manifest::{Attribute, ManifestError, assemble};
/// use pluginpack::resolver::LibrarySet;
///
/// let metadata = vec![Attribute::new("Libraries", "/sneaky.jar")];
/// let err = assemble(metadata, &LibrarySet::default(), None).unwrap_err();
/// assert!(matches!(err, ManifestError::DuplicateAttribute { .. }));
/// ```
pub fn assemble<I>(
    metadata: I,
    libraries: &LibrarySet,
    resource_root: Option<&Utf8Path>,
) -> Result<Manifest>
where
    I: IntoIterator<Item = Attribute>,
{
    let builder = ManifestBuilder::new()
        .attributes(metadata)
        .libraries(libraries);
    match resource_root {
        Some(root) => builder.resource_path(root).build(),
        None => builder.build(),
    }
}

fn validate_attributes(section: &str, attributes: &[Attribute]) -> Result<()> {
    let mut seen = HashSet::new();
    for attribute in attributes {
        validate_name(attribute.name())?;
        if attribute.value().contains(['\r', '\n', '\0']) {
            return Err(ManifestError::InvalidValue {
                name: attribute.name().to_owned(),
            });
        }
        if !seen.insert(attribute.name().to_ascii_lowercase()) {
            return Err(ManifestError::DuplicateAttribute {
                name: attribute.name().to_owned(),
                section: section.to_owned(),
            });
        }
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| ManifestError::InvalidName {
        name: name.to_owned(),
        reason: reason.to_owned(),
    };
    if name.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name is longer than 70 bytes"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid("only ASCII letters, digits, '-' and '_' are allowed"));
    }
    Ok(())
}
