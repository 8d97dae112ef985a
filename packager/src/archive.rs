//! Zip archive creation for bundle and code archives.
//!
//! Archives are deterministic: the manifest is always the first entry at
//! `META-INF/MANIFEST.MF`, remaining entries follow in sorted path order,
//! and every entry carries the same fixed timestamp. Output goes to a
//! temporary file beside the destination and is only renamed into place
//! once the archive has been finished, so a failed run never leaves a
//! truncated archive under the final name.

use crate::error::{PackagerError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use glob::{MatchOptions, Pattern};
use log::{debug, trace};
use pluginpack::manifest::{MANIFEST_PATH, Manifest, format};
use std::fs;
use std::io::{self, Write};
use tempfile::NamedTempFile;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Include/exclude glob filter over archive-relative paths.
///
/// A path is kept when it matches at least one include pattern and no
/// exclude pattern. Patterns use `/` separators; `**` spans directories.
///
/// # Examples
///
/// ```
/// use pluginpack_packager::archive::PathFilter;
///
/// let filter = PathFilter::new(&["**".to_owned()], &["**/*.map".to_owned()]).unwrap();
/// assert!(filter.matches("js/app.js"));
/// assert!(!filter.matches("js/app.map"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathFilter {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
}

impl PathFilter {
    /// Compile include and exclude patterns.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::InvalidPattern`] for the first pattern that
    /// is not a valid glob.
    pub fn new(includes: &[String], excludes: &[String]) -> Result<Self> {
        Ok(Self {
            includes: compile(includes)?,
            excludes: compile(excludes)?,
        })
    }

    /// A filter that keeps every path.
    #[must_use]
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Return true when `path` should be archived.
    ///
    /// An empty include list keeps everything not excluded.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let included = self.includes.is_empty()
            || self
                .includes
                .iter()
                .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS));
        included
            && !self
                .excludes
                .iter()
                .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
    }
}

fn compile(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|source| PackagerError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

/// List every regular file under `root` as sorted relative paths.
///
/// Symbolic links are followed, so a linked directory contributes its
/// files. A missing `root` yields an empty list.
///
/// # Errors
///
/// Returns [`PackagerError::Io`] when a directory cannot be read, a link
/// loops, or a file name is not valid UTF-8.
pub fn collect_files(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .and_then(Utf8Path::from_path)
                .map_or_else(|| root.to_owned(), Utf8Path::to_owned);
            PackagerError::io("read directory", path)(err.into())
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let relative = entry.path().strip_prefix(root).map_err(|err| {
            PackagerError::io("walk", root)(io::Error::new(io::ErrorKind::InvalidData, err))
        })?;
        let relative = Utf8Path::from_path(relative).ok_or_else(|| {
            PackagerError::io("walk", root)(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{} is not valid UTF-8", relative.display()),
            ))
        })?;
        files.push(relative.to_owned());
    }
    files.sort();
    Ok(files)
}

/// Archive-relative entry name for a relative path, always `/`-separated.
fn entry_name(relative: &Utf8Path) -> String {
    relative
        .components()
        .map(|component| component.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

/// Write a zip archive of `root` to `dest` with `manifest` embedded.
///
/// Files under `root` that pass `filter` are added in sorted order. A
/// manifest already present in the tree is skipped in favour of
/// `manifest`. Returns the number of entries written, manifest included.
///
/// # Errors
///
/// Returns [`PackagerError::Io`] for filesystem failures and
/// [`PackagerError::Archive`] when the zip writer fails. On error nothing
/// is left at `dest`.
pub fn write_archive(
    dest: &Utf8Path,
    manifest: &Manifest,
    root: &Utf8Path,
    filter: &PathFilter,
) -> Result<usize> {
    let parent = dest.parent().unwrap_or_else(|| Utf8Path::new("."));
    fs::create_dir_all(parent).map_err(PackagerError::io("create directory", parent))?;
    let temp = NamedTempFile::new_in(parent)
        .map_err(PackagerError::io("create temporary file in", parent))?;

    let zip_err = |source: ZipError| PackagerError::Archive {
        path: dest.to_owned(),
        source,
    };
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default());

    let mut writer = ZipWriter::new(temp.as_file());
    writer.start_file(MANIFEST_PATH, options).map_err(zip_err)?;
    writer
        .write_all(format::to_manifest_string(manifest).as_bytes())
        .map_err(|source| zip_err(ZipError::Io(source)))?;
    let mut written = 1;

    for relative in collect_files(root)? {
        let name = entry_name(&relative);
        if name == MANIFEST_PATH {
            continue;
        }
        if !filter.matches(&name) {
            debug!("filtered out of {dest}: {name}");
            continue;
        }
        let source = root.join(&relative);
        let mut file = fs::File::open(&source).map_err(PackagerError::io("open", &source))?;
        trace!("{dest}: adding {name}");
        writer.start_file(name, options).map_err(zip_err)?;
        io::copy(&mut file, &mut writer).map_err(PackagerError::io("archive", &source))?;
        written += 1;
    }

    writer.finish().map_err(zip_err)?;
    temp.persist(dest)
        .map_err(|err| PackagerError::io("persist archive", dest)(err.error))?;
    Ok(written)
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
