//! Exploded staging directory preparation.
//!
//! The staging directory mirrors the bundle layout: resources at the root,
//! the manifest under `META-INF/`, and the plugin's own code archive plus
//! every resolved library under `WEB-INF/lib/`.

use crate::archive::collect_files;
use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info};
use pluginpack::manifest::{MANIFEST_PATH, Manifest, format};
use std::collections::HashMap;
use std::fs;
use std::io;

/// Staging-relative directory holding bundled libraries.
pub const LIBRARY_DIR: &str = "WEB-INF/lib";

/// Builds the exploded bundle tree in a staging directory.
#[derive(Debug, Clone)]
pub struct Stager {
    staging_dir: Utf8PathBuf,
}

impl Stager {
    /// Create a stager rooted at `staging_dir`.
    #[must_use]
    pub fn new(staging_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
        }
    }

    /// Return the staging root.
    #[must_use]
    pub fn staging_dir(&self) -> &Utf8Path {
        &self.staging_dir
    }

    /// Return the directory receiving bundled libraries.
    #[must_use]
    pub fn library_dir(&self) -> Utf8PathBuf {
        self.staging_dir.join(LIBRARY_DIR)
    }

    /// Return the location of the staged manifest.
    #[must_use]
    pub fn manifest_path(&self) -> Utf8PathBuf {
        self.staging_dir.join(MANIFEST_PATH)
    }

    /// Recreate the staging root empty, with its library directory.
    ///
    /// Anything a previous run staged is removed first, so the bundle only
    /// ever holds what this run resolved.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Io`] if the old tree cannot be removed or a
    /// directory cannot be created.
    pub fn prepare(&self) -> Result<()> {
        match fs::remove_dir_all(&self.staging_dir) {
            Ok(()) => debug!("cleared staging directory {}", self.staging_dir),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(PackagerError::io("clear directory", &self.staging_dir)(err));
            }
        }
        let library_dir = self.library_dir();
        fs::create_dir_all(&library_dir).map_err(PackagerError::io("create directory", &library_dir))
    }

    /// Write `manifest` to `META-INF/MANIFEST.MF` and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Io`] if the manifest cannot be written.
    pub fn write_manifest(&self, manifest: &Manifest) -> Result<Utf8PathBuf> {
        let path = self.manifest_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(PackagerError::io("create directory", parent))?;
        }
        info!("Generating {path}");
        fs::write(&path, format::to_manifest_string(manifest))
            .map_err(PackagerError::io("write manifest", &path))?;
        Ok(path)
    }

    /// Read the staged manifest back in.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Io`] if the file cannot be read and
    /// [`PackagerError::Manifest`] if it does not parse.
    pub fn read_manifest(&self) -> Result<Manifest> {
        let path = self.manifest_path();
        let text = fs::read_to_string(&path).map_err(PackagerError::io("read manifest", &path))?;
        Ok(format::parse(&text)?)
    }

    /// Copy the resource tree under `source` into the staging root.
    ///
    /// A missing `source` is not an error; the plugin simply ships no
    /// resources. A manifest inside `source` is not copied, since staging
    /// owns `META-INF/MANIFEST.MF`. Returns the number of files copied.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Io`] if a file cannot be copied.
    pub fn copy_resources(&self, source: &Utf8Path) -> Result<usize> {
        if !source.is_dir() {
            debug!("no resource directory at {source}");
            return Ok(0);
        }
        let mut copied = 0;
        for relative in collect_files(source)? {
            if relative == MANIFEST_PATH {
                continue;
            }
            let from = source.join(&relative);
            let to = self.staging_dir.join(&relative);
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent).map_err(PackagerError::io("create directory", parent))?;
            }
            fs::copy(&from, &to).map_err(PackagerError::io("copy resource", &from))?;
            copied += 1;
        }
        Ok(copied)
    }

    /// Copy one library into `WEB-INF/lib/`, keeping its file name.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Io`] if `library` has no file name or cannot
    /// be copied.
    pub fn stage_library(&self, library: &Utf8Path) -> Result<Utf8PathBuf> {
        let dest = self.library_dir().join(library_file_name(library)?);
        fs::copy(library, &dest).map_err(PackagerError::io("copy library", library))?;
        debug!("staged {library} as {dest}");
        Ok(dest)
    }

    /// Stage every library in order, after checking that no two of them
    /// share a file name.
    ///
    /// # Errors
    ///
    /// Returns the error from [`check_library_names`] before anything is
    /// copied, then the first error from [`Self::stage_library`].
    pub fn stage_libraries<P>(&self, libraries: &[P]) -> Result<Vec<Utf8PathBuf>>
    where
        P: AsRef<Utf8Path>,
    {
        check_library_names(libraries)?;
        libraries
            .iter()
            .map(|library| self.stage_library(library.as_ref()))
            .collect()
    }
}

fn library_file_name(library: &Utf8Path) -> Result<&str> {
    library.file_name().ok_or_else(|| {
        PackagerError::io("stage library", library)(io::Error::new(
            io::ErrorKind::InvalidInput,
            "library path has no file name",
        ))
    })
}

/// Check that `libraries` can share `WEB-INF/lib/` without one file
/// replacing another.
///
/// # Errors
///
/// Returns [`PackagerError::LibraryNameClash`] for the first pair sharing a
/// file name, or [`PackagerError::Io`] for a path without one.
///
/// # Examples
///
/// ```
/// use pluginpack_packager::error::PackagerError;
/// use pluginpack_packager::stager::check_library_names;
///
/// let err = check_library_names(&["/repo-a/util-1.0.jar", "/repo-b/util-1.0.jar"]).unwrap_err();
/// assert!(matches!(err, PackagerError::LibraryNameClash { .. }));
/// ```
pub fn check_library_names<P: AsRef<Utf8Path>>(libraries: &[P]) -> Result<()> {
    let mut seen: HashMap<&str, &Utf8Path> = HashMap::new();
    for library in libraries {
        let library = library.as_ref();
        let file_name = library_file_name(library)?;
        if let Some(first) = seen.insert(file_name, library) {
            return Err(PackagerError::LibraryNameClash {
                file_name: file_name.to_owned(),
                first: first.to_owned(),
                second: library.to_owned(),
            });
        }
    }
    Ok(())
}
