//! CLI argument definitions for `pluginpack`.
//!
//! Kept apart from the binary entrypoint so the argument surface can be
//! parsed and tested without running a packaging pass.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use pluginpack::config::{CONFIG_FILE_NAME, PackagingConfig};

/// Package host plugins as installable bundles or development links.
#[derive(Parser, Debug)]
#[command(name = "pluginpack")]
#[command(version, about)]
#[command(long_about = concat!(
    "Package host plugins as installable bundles or development links.\n\n",
    "pluginpack reads an already-resolved dependency graph, works out which ",
    "libraries the plugin must carry at runtime, and either writes a bundle ",
    "archive (plus a code-only archive for API consumers) or a link ",
    "descriptor that points the host at the build output directly.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build the installable bundle:\n",
    "    $ pluginpack bundle --graph target/graph.json\n\n",
    "  Link a development build into a running host:\n",
    "    $ pluginpack link --graph target/graph.json --host-plugin-dir ~/.host/plugins\n\n",
    "  Show why a dependency was left out:\n",
    "    $ pluginpack classpath --graph target/graph.json --explain\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the bundle archive and the code archive.
    Bundle(PackageArgs),

    /// Write a link descriptor into the host plugin directory.
    Link(PackageArgs),

    /// Print the resolved library set.
    Classpath(ClasspathArgs),
}

/// Inputs and overrides shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct PackageArgs {
    /// Configuration file [default: ./pluginpack.toml when present].
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Resolved artifact graph (JSON array of artifact records).
    #[arg(short, long, value_name = "FILE")]
    pub graph: Utf8PathBuf,

    /// Directory receiving the archives.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<Utf8PathBuf>,

    /// Base name of the produced artifacts.
    #[arg(long, value_name = "NAME")]
    pub final_name: Option<String>,

    /// Host plugin directory for link descriptors.
    #[arg(long, value_name = "DIR")]
    pub host_plugin_dir: Option<Utf8PathBuf>,

    /// Glob selecting bundle entries (repeatable; replaces configured includes).
    #[arg(long = "include", value_name = "GLOB")]
    pub includes: Vec<String>,

    /// Glob removing bundle entries (repeatable; added to configured excludes).
    #[arg(long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Treat a dependency as optional (`group:name[:version]`, repeatable).
    #[arg(long = "optional", value_name = "ID")]
    pub optional: Vec<String>,

    /// Treat a dependency as required (`group:name[:version]`, repeatable).
    #[arg(long = "not-optional", value_name = "ID")]
    pub not_optional: Vec<String>,
}

/// Arguments for the `classpath` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ClasspathArgs {
    /// Shared inputs and overrides.
    #[command(flatten)]
    pub package: PackageArgs,

    /// Resolve for link mode, prepending local build output.
    #[arg(long)]
    pub link: bool,

    /// Also list every excluded dependency with the reason.
    #[arg(long)]
    pub explain: bool,
}

impl Command {
    /// Return the shared arguments of whichever subcommand was chosen.
    #[must_use]
    pub fn package_args(&self) -> &PackageArgs {
        match self {
            Self::Bundle(args) | Self::Link(args) => args,
            Self::Classpath(args) => &args.package,
        }
    }
}

impl Cli {
    /// Return the log level implied by `-q` / `-v`.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

impl PackageArgs {
    /// Return the configuration file to read, if any.
    ///
    /// An explicit `--config` is always returned; otherwise
    /// `pluginpack.toml` in `cwd` is used when it exists.
    #[must_use]
    pub fn config_path(&self, cwd: &Utf8Path) -> Option<Utf8PathBuf> {
        self.config.clone().or_else(|| {
            let candidate = cwd.join(CONFIG_FILE_NAME);
            candidate.is_file().then_some(candidate)
        })
    }

    /// Apply command-line overrides on top of a loaded configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use pluginpack::config::PackagingConfig;
    /// use pluginpack_packager::cli::PackageArgs;
    ///
    /// let args = PackageArgs {
    ///     final_name: Some("demo".to_owned()),
    ///     excludes: vec!["**/*.map".to_owned()],
    ///     ..PackageArgs::default()
    /// };
    /// let mut config = PackagingConfig::default();
    /// args.apply_overrides(&mut config);
    /// assert_eq!(config.final_name.as_deref(), Some("demo"));
    /// assert_eq!(config.excludes, ["**/*.map"]);
    /// ```
    pub fn apply_overrides(&self, config: &mut PackagingConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(name) = &self.final_name {
            config.final_name = Some(name.clone());
        }
        if let Some(dir) = &self.host_plugin_dir {
            config.host_plugin_dir = Some(dir.clone());
        }
        if !self.includes.is_empty() {
            config.includes.clone_from(&self.includes);
        }
        config.excludes.extend(self.excludes.iter().cloned());
        for key in &self.optional {
            config.optional_overrides.insert(key.as_str(), true);
        }
        for key in &self.not_optional {
            config.optional_overrides.insert(key.as_str(), false);
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
