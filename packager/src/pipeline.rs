//! Packaging pipeline orchestration.
//!
//! Each mode computes its library set through the same resolver entry
//! point, assembles the manifest before touching the filesystem, and only
//! then writes output. Bundle packaging is two-pass: the manifest is
//! written into staging, read back, and the parsed copy is embedded into
//! both archives.

use crate::archive::{PathFilter, write_archive};
use crate::cli::PackageArgs;
use crate::error::{PackagerError, Result};
use crate::link::LinkEmitter;
use crate::stager::{Stager, check_library_names};
use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, info, warn};
use pluginpack::artifact::ArtifactGraph;
use pluginpack::config::PackagingConfig;
use pluginpack::manifest::{self, Manifest};
use pluginpack::resolver::{Resolution, ResolveMode, resolve_graph};
use std::io::Write;

/// File extension of the installable bundle archive.
pub const BUNDLE_EXTENSION: &str = "hpi";

/// File extension of the code-only archive.
pub const CODE_EXTENSION: &str = "jar";

/// Everything a packaging run needs: settings and the resolved graph.
#[derive(Debug, Clone)]
pub struct PackageContext {
    config: PackagingConfig,
    graph: ArtifactGraph,
}

impl PackageContext {
    /// Combine configuration and graph, applying optional-flag overrides
    /// to the graph.
    #[must_use]
    pub fn new(config: PackagingConfig, mut graph: ArtifactGraph) -> Self {
        if !config.optional_overrides.is_empty() {
            let changed = graph.apply_optional_overrides(&config.optional_overrides);
            debug!("optional overrides changed {changed} artifact(s)");
        }
        Self { config, graph }
    }

    /// Load configuration and graph for a CLI invocation.
    ///
    /// Configuration comes from `--config` or `pluginpack.toml` in `cwd`
    /// when present, otherwise from defaults resolved against `cwd`.
    /// Command-line overrides are applied last; relative paths among them
    /// are resolved against `cwd` as well.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Config`] or [`PackagerError::Artifact`] when
    /// either input cannot be loaded.
    pub fn load(args: &PackageArgs, cwd: &Utf8Path) -> Result<Self> {
        let config = load_config(args, cwd)?;
        Self::with_graph(config, args, cwd)
    }

    /// Read the graph named by `args` and pair it with an already loaded
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::Artifact`] when the graph cannot be loaded.
    pub fn with_graph(config: PackagingConfig, args: &PackageArgs, cwd: &Utf8Path) -> Result<Self> {
        let graph = ArtifactGraph::load(&cwd.join(&args.graph))?;
        Ok(Self::new(config, graph))
    }

    /// Return the configuration in effect.
    #[must_use]
    pub fn config(&self) -> &PackagingConfig {
        &self.config
    }

    /// Return the resolved artifact graph.
    #[must_use]
    pub fn graph(&self) -> &ArtifactGraph {
        &self.graph
    }

    /// Resolve the library set for bundle or link mode.
    #[must_use]
    pub fn resolve(&self, link: bool) -> Resolution {
        let core = self.config.core_identities();
        if link {
            let layout = self.config.link_layout();
            resolve_graph(&self.graph, &core, ResolveMode::Link(&layout))
        } else {
            resolve_graph(&self.graph, &core, ResolveMode::Bundle)
        }
    }

    fn final_name(&self) -> Result<&str> {
        self.config
            .final_name
            .as_deref()
            .ok_or(PackagerError::MissingFinalName)
    }

    fn skip_unless_plugin(&self) -> bool {
        if self.config.is_plugin_packaging() {
            return false;
        }
        info!(
            "Skipping {} because its packaging is {:?}, not {:?}",
            self.config.final_name.as_deref().unwrap_or("project"),
            self.config.packaging,
            pluginpack::config::PLUGIN_PACKAGING
        );
        true
    }

    fn output_file(&self, final_name: &str, extension: &str) -> Utf8PathBuf {
        self.config
            .output_dir
            .join(format!("{final_name}.{extension}"))
    }
}

/// Load the packaging configuration named by `args`, apply the command-line
/// overrides and resolve every path against `cwd`.
///
/// Without a configuration file the defaults are used.
///
/// # Errors
///
/// Returns [`PackagerError::Config`] when the file cannot be read or parsed.
pub fn load_config(args: &PackageArgs, cwd: &Utf8Path) -> Result<PackagingConfig> {
    let mut config = match args.config_path(cwd) {
        Some(path) => PackagingConfig::load(&cwd.join(path))?,
        None => PackagingConfig::default(),
    };
    args.apply_overrides(&mut config);
    config.resolve_paths(cwd);
    Ok(config)
}

/// Fail early when `config` describes a plugin that cannot be linked.
///
/// Projects that are not plugins pass; [`emit_link`] skips them later.
///
/// # Errors
///
/// Returns [`PackagerError::MissingHostPluginDir`] when a plugin project has
/// no host plugin directory.
pub fn ensure_linkable(config: &PackagingConfig) -> Result<()> {
    if config.is_plugin_packaging() {
        LinkEmitter::new(config.host_plugin_dir.as_deref())?;
    }
    Ok(())
}

/// Artifacts produced by a bundle run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    /// The project's primary output: the bundle archive.
    pub primary: Utf8PathBuf,
    /// Secondary outputs published alongside: the code archive.
    pub attached: Vec<Utf8PathBuf>,
}

/// Build the bundle and code archives.
///
/// Returns `None` without writing anything when the project is not a
/// plugin. The outcome is only returned once both archives are in place.
///
/// # Errors
///
/// Returns [`PackagerError::MissingFinalName`], manifest collisions,
/// invalid filter patterns and [`PackagerError::LibraryNameClash`] before
/// any file is written; staging and archive failures abort the run.
pub fn package_bundle(context: &PackageContext) -> Result<Option<PackageOutcome>> {
    if context.skip_unless_plugin() {
        return Ok(None);
    }
    let config = context.config();
    let final_name = context.final_name()?;
    let staging_dir = config
        .staging_dir()
        .ok_or(PackagerError::MissingFinalName)?;

    let resolution = context.resolve(false);
    let assembled = manifest::assemble(config.metadata_attributes(), resolution.libraries(), None)?;
    let filter = PathFilter::new(&config.includes, &config.excludes)?;
    let code_archive = context.output_file(final_name, CODE_EXTENSION);
    let bundled: Vec<&Utf8Path> = std::iter::once(code_archive.as_path())
        .chain(resolution.libraries().iter().map(Utf8PathBuf::as_path))
        .collect();
    check_library_names(&bundled)?;

    let stager = Stager::new(staging_dir);
    stager.prepare()?;
    stager.write_manifest(&assembled)?;
    let manifest = stager.read_manifest()?;

    write_code_archive(&code_archive, &manifest, &config.classes_dir)?;

    stager.copy_resources(&config.resource_source_dir)?;
    let staged = stager.stage_libraries(&bundled)?;
    debug!("staged {} libraries under {}", staged.len(), stager.library_dir());

    let bundle = context.output_file(final_name, BUNDLE_EXTENSION);
    info!("Generating {bundle}");
    let entries = write_archive(&bundle, &manifest, stager.staging_dir(), &filter)?;
    debug!("{bundle}: {entries} entries");

    Ok(Some(PackageOutcome {
        primary: bundle,
        attached: vec![code_archive],
    }))
}

fn write_code_archive(dest: &Utf8Path, manifest: &Manifest, classes_dir: &Utf8Path) -> Result<()> {
    info!("Generating {dest}");
    if !classes_dir.is_dir() {
        warn!("classes directory {classes_dir} does not exist; {dest} holds only the manifest");
    }
    write_archive(dest, manifest, classes_dir, &PathFilter::allow_all())?;
    Ok(())
}

/// Write the development link descriptor.
///
/// Returns `None` without writing anything when the project is not a
/// plugin.
///
/// # Errors
///
/// Returns [`PackagerError::MissingHostPluginDir`] or
/// [`PackagerError::MissingFinalName`] before any I/O, manifest collisions
/// before the descriptor is written, and I/O failures while writing it.
pub fn emit_link(context: &PackageContext) -> Result<Option<Utf8PathBuf>> {
    if context.skip_unless_plugin() {
        return Ok(None);
    }
    let config = context.config();
    let emitter = LinkEmitter::new(config.host_plugin_dir.as_deref())?;
    let final_name = context.final_name()?;

    let resolution = context.resolve(true);
    let manifest = manifest::assemble(
        config.metadata_attributes(),
        resolution.libraries(),
        Some(config.resource_source_dir.as_path()),
    )?;
    emitter.emit(final_name, &manifest).map(Some)
}

/// Print the resolved library set, one path per line.
///
/// With `explain`, every excluded artifact follows with its reason.
///
/// # Errors
///
/// Returns [`PackagerError::WriteFailed`] if `out` cannot be written.
pub fn classpath(
    context: &PackageContext,
    link: bool,
    explain: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let resolution = context.resolve(link);
    let write_failed = |source| PackagerError::WriteFailed { source };
    for path in resolution.libraries() {
        writeln!(out, "{path}").map_err(write_failed)?;
    }
    if explain {
        for (id, reason) in resolution.excluded() {
            writeln!(out, "excluded {id}: {reason}").map_err(write_failed)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
