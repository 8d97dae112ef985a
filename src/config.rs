//! Packaging configuration loaded from `pluginpack.toml`.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! usable configuration once a final name is supplied. Relative paths are
//! resolved against the directory that holds the configuration file, which
//! keeps invocations from other working directories predictable.

use crate::artifact::OptionalOverrides;
use crate::classify::{CoreIdentities, DEFAULT_CORE_ARTIFACTS};
use crate::manifest::Attribute;
use crate::resolver::LinkLayout;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

/// Conventional configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "pluginpack.toml";

/// The packaging type handled by this tool.
pub const PLUGIN_PACKAGING: &str = "hpi";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`PackagingConfig`].
    #[error("failed to parse configuration {path}: {source}")]
    Parse {
        /// The configuration file path.
        path: Utf8PathBuf,
        /// The TOML deserialisation error.
        source: Box<toml::de::Error>,
    },
}

/// One host-required manifest attribute supplied through `[[metadata]]`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetadataAttribute {
    /// Attribute name, for example `Plugin-Version`.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

/// Settings for one packaging run.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PackagingConfig {
    /// Project packaging type. Only [`PLUGIN_PACKAGING`] is packaged; any
    /// other value turns both modes into a logged no-op.
    pub packaging: String,
    /// Base name of the produced archives and link descriptor.
    pub final_name: Option<String>,
    /// Directory receiving the bundle and code archives.
    pub output_dir: Utf8PathBuf,
    /// Compiled classes directory.
    pub classes_dir: Utf8PathBuf,
    /// Exploded staging directory. Defaults to `<output_dir>/<final_name>`.
    pub staging_dir: Option<Utf8PathBuf>,
    /// Un-staged resource root, copied into staging and referenced by
    /// `Resource-Path` in link mode.
    pub resource_source_dir: Utf8PathBuf,
    /// Declared resource directories, prepended in link mode when present.
    pub resource_dirs: Vec<Utf8PathBuf>,
    /// Host plugin directory receiving link descriptors.
    pub host_plugin_dir: Option<Utf8PathBuf>,
    /// Glob patterns selecting bundle archive entries.
    pub includes: Vec<String>,
    /// Glob patterns removing bundle archive entries.
    pub excludes: Vec<String>,
    /// Artifact names identifying the host core.
    pub core_artifacts: Vec<String>,
    /// Forced optional flags keyed by `group:name[:version]`.
    pub optional_overrides: OptionalOverrides,
    /// Host-required manifest attributes, in manifest order.
    pub metadata: Vec<MetadataAttribute>,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            packaging: PLUGIN_PACKAGING.to_owned(),
            final_name: None,
            output_dir: Utf8PathBuf::from("target"),
            classes_dir: Utf8PathBuf::from("target/classes"),
            staging_dir: None,
            resource_source_dir: Utf8PathBuf::from("src/main/webapp"),
            resource_dirs: vec![Utf8PathBuf::from("src/main/resources")],
            host_plugin_dir: None,
            includes: vec!["**".to_owned()],
            excludes: Vec::new(),
            core_artifacts: DEFAULT_CORE_ARTIFACTS.map(str::to_owned).to_vec(),
            optional_overrides: OptionalOverrides::default(),
            metadata: Vec::new(),
        }
    }
}

impl PackagingConfig {
    /// Parse configuration from TOML text without resolving paths.
    ///
    /// # Errors
    ///
    /// Returns the TOML error for malformed input or unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use pluginpack::config::PackagingConfig;
    ///
    /// let config = PackagingConfig::from_toml_str("final_name = \"demo\"\n").unwrap();
    /// assert_eq!(config.final_name.as_deref(), Some("demo"));
    /// assert!(config.is_plugin_packaging());
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Load a configuration file and resolve its paths against the file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not valid configuration.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        let mut config = Self::from_toml_str(&source).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source: Box::new(source),
        })?;
        let base = path.parent().unwrap_or_else(|| Utf8Path::new(""));
        config.resolve_paths(base);
        Ok(config)
    }

    /// Rebase every relative path onto `base`. Absolute paths are kept.
    pub fn resolve_paths(&mut self, base: &Utf8Path) {
        let rebase = |path: &mut Utf8PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        rebase(&mut self.output_dir);
        rebase(&mut self.classes_dir);
        rebase(&mut self.resource_source_dir);
        self.resource_dirs.iter_mut().for_each(rebase);
        if let Some(dir) = self.staging_dir.as_mut() {
            rebase(dir);
        }
        if let Some(dir) = self.host_plugin_dir.as_mut() {
            rebase(dir);
        }
    }

    /// Return true when the project is a plugin and should be packaged.
    #[must_use]
    pub fn is_plugin_packaging(&self) -> bool {
        self.packaging == PLUGIN_PACKAGING
    }

    /// Return the staging directory, defaulting to
    /// `<output_dir>/<final_name>`. `None` when neither is known.
    #[must_use]
    pub fn staging_dir(&self) -> Option<Utf8PathBuf> {
        self.staging_dir.clone().or_else(|| {
            self.final_name
                .as_deref()
                .map(|name| self.output_dir.join(name))
        })
    }

    /// Return the configured host-core identities.
    #[must_use]
    pub fn core_identities(&self) -> CoreIdentities {
        CoreIdentities::new(self.core_artifacts.iter().map(String::as_str))
    }

    /// Return the link-mode local output layout.
    #[must_use]
    pub fn link_layout(&self) -> LinkLayout {
        LinkLayout {
            classes_dir: self.classes_dir.clone(),
            resource_dirs: self.resource_dirs.clone(),
        }
    }

    /// Return the `[[metadata]]` entries as manifest attributes.
    #[must_use]
    pub fn metadata_attributes(&self) -> Vec<Attribute> {
        self.metadata
            .iter()
            .map(|entry| Attribute::new(entry.name.as_str(), entry.value.as_str()))
            .collect()
    }
}
