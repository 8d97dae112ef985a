//! Plugin manifests: host metadata plus the resolved library set.
//!
//! A [`Manifest`] is an ordered main section followed by ordered named
//! sections, each an ordered list of attributes. Attribute names are
//! compared case-insensitively, as the host does, and a name may appear at
//! most once per section. Manifests are built through
//! [`ManifestBuilder`], which validates everything when
//! [`ManifestBuilder::build`] is called, and are immutable afterwards.
//!
//! # Sub-modules
//!
//! - [`builder`] — Validating builder and the plugin manifest assembler.
//! - [`error`] — Semantic error types for manifest validation and parsing.
//! - [`format`] — Manifest text serialisation and parsing.

pub mod builder;
pub mod error;
pub mod format;

pub use builder::{ManifestBuilder, assemble};
pub use error::ManifestError;

/// Attribute listing the plugin's runtime libraries.
pub const LIBRARIES: &str = "Libraries";

/// Attribute pointing the host at the un-staged resource root (link mode).
pub const RESOURCE_PATH: &str = "Resource-Path";

/// Attribute carrying the manifest format version.
pub const MANIFEST_VERSION: &str = "Manifest-Version";

/// Archive-relative location of the manifest.
pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// One `name: value` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    /// Create an attribute. Validation happens in [`ManifestBuilder::build`].
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Return the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the attribute value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An ordered group of attributes, either the main section or a named one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    name: Option<String>,
    attributes: Vec<Attribute>,
}

impl Section {
    /// Return the section name; `None` for the main section.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Return true when this is the unnamed main section.
    #[must_use]
    pub fn is_main(&self) -> bool {
        self.name.is_none()
    }

    /// Return the attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute value by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name.eq_ignore_ascii_case(name))
            .map(Attribute::value)
    }
}

/// A validated, immutable manifest.
///
/// # Examples
///
/// ```
/// use pluginpack::manifest::{LIBRARIES, ManifestBuilder};
///
/// let manifest = ManifestBuilder::new()
///     .attribute("Short-Name", "demo")
///     .attribute(LIBRARIES, "/repo/lib-x.jar")
///     .build()
///     .unwrap();
/// assert_eq!(manifest.get("libraries"), Some("/repo/lib-x.jar"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: Section,
    sections: Vec<Section>,
}

impl Manifest {
    /// Return the main section.
    #[must_use]
    pub fn main(&self) -> &Section {
        &self.main
    }

    /// Return the named sections in order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a named section.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.name() == Some(name))
    }

    /// Look up a main-section attribute by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.main.get(name)
    }
}
