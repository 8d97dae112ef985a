//! Development link descriptors.
//!
//! A link descriptor is a manifest-format text file dropped into the host's
//! plugin directory. Its `Libraries` attribute points at the build output
//! and resolved jars in place, so the host runs the plugin without a bundle
//! being built.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::info;
use pluginpack::manifest::{Manifest, format};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

/// File extension of link descriptors.
pub const LINK_EXTENSION: &str = "hpl";

/// Writes link descriptors into a host plugin directory.
#[derive(Debug, Clone)]
pub struct LinkEmitter {
    host_plugin_dir: Utf8PathBuf,
}

impl LinkEmitter {
    /// Create an emitter for `host_plugin_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::MissingHostPluginDir`] when no directory is
    /// configured. Nothing touches the filesystem before this check.
    ///
    /// # Examples
    ///
    /// ```
    /// use pluginpack_packager::error::PackagerError;
    /// use pluginpack_packager::link::LinkEmitter;
    ///
    /// let err = LinkEmitter::new(None).unwrap_err();
    /// assert!(matches!(err, PackagerError::MissingHostPluginDir));
    /// ```
    pub fn new(host_plugin_dir: Option<&Utf8Path>) -> Result<Self> {
        let host_plugin_dir = host_plugin_dir.ok_or(PackagerError::MissingHostPluginDir)?;
        Ok(Self {
            host_plugin_dir: host_plugin_dir.to_owned(),
        })
    }

    /// Return the descriptor path for `final_name`.
    #[must_use]
    pub fn descriptor_path(&self, final_name: &str) -> Utf8PathBuf {
        self.host_plugin_dir
            .join(format!("{final_name}.{LINK_EXTENSION}"))
    }

    /// Write `manifest` as the link descriptor for `final_name`, creating
    /// the host plugin directory if needed. Returns the descriptor path.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Io`] if the directory or file cannot be
    /// written.
    pub fn emit(&self, final_name: &str, manifest: &Manifest) -> Result<Utf8PathBuf> {
        let dir = &self.host_plugin_dir;
        fs::create_dir_all(dir).map_err(PackagerError::io("create directory", dir))?;
        let path = self.descriptor_path(final_name);

        let mut temp =
            NamedTempFile::new_in(dir).map_err(PackagerError::io("create temporary file in", dir))?;
        temp.write_all(format::to_manifest_string(manifest).as_bytes())
            .map_err(PackagerError::io("write link descriptor", &path))?;
        temp.persist(&path)
            .map_err(|err| PackagerError::io("persist link descriptor", &path)(err.error))?;

        info!("Generating {path}");
        Ok(path)
    }
}
