//! `pluginpack` CLI entrypoint.
//!
//! Reads the project configuration and resolved artifact graph, then builds
//! the bundle, emits a link descriptor, or prints the library set. Produced
//! paths go to stdout; logs and errors go to stderr.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use pluginpack_packager::cli::{Cli, Command};
use pluginpack_packager::error::{PackagerError, Result};
use pluginpack_packager::pipeline::{
    PackageContext, classpath, emit_link, ensure_linkable, load_config, package_bundle,
};
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "PLUGINPACK_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level());
    let mut stdout = std::io::stdout().lock();
    let run_result = run(&cli, &mut stdout);
    let mut stderr = std::io::stderr();
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn init_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let cwd = current_dir()?;
    run_in(cli, &cwd, stdout)
}

fn current_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().map_err(PackagerError::io("read current directory", "."))?;
    Utf8PathBuf::try_from(cwd)
        .map_err(|err| PackagerError::io("use current directory", ".")(err.into_io_error()))
}

fn run_in(cli: &Cli, cwd: &Utf8Path, stdout: &mut dyn Write) -> Result<()> {
    let args = cli.command.package_args();
    let config = load_config(args, cwd)?;
    if matches!(cli.command, Command::Link(_)) {
        ensure_linkable(&config)?;
    }
    let context = PackageContext::with_graph(config, args, cwd)?;
    match &cli.command {
        Command::Bundle(_) => {
            if let Some(outcome) = package_bundle(&context)? {
                write_path(stdout, &outcome.primary)?;
                for attached in &outcome.attached {
                    write_path(stdout, attached)?;
                }
            }
        }
        Command::Link(_) => {
            if let Some(path) = emit_link(&context)? {
                write_path(stdout, &path)?;
            }
        }
        Command::Classpath(args) => classpath(&context, args.link, args.explain, stdout)?,
    }
    Ok(())
}

fn write_path(stdout: &mut dyn Write, path: &Utf8Path) -> Result<()> {
    writeln!(stdout, "{path}").map_err(|source| PackagerError::WriteFailed { source })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format_args!("error: {err}"));
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::fs;
    use tempfile::TempDir;

    const GRAPH: &str = r#"[
  {
    "id": "org.example:lib-x:2.1",
    "file": "repo/lib-x-2.1.jar",
    "scope": "runtime",
    "trail": ["org.example:demo:1.0"]
  },
  {
    "id": "org.jenkins-ci.main:jenkins-core:2.400",
    "file": "repo/jenkins-core.jar",
    "scope": "provided",
    "trail": ["org.example:demo:1.0"]
  }
]"#;

    struct Project {
        _dir: TempDir,
        root: Utf8PathBuf,
    }

    #[fixture]
    fn project() -> Project {
        let dir = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir");
        fs::create_dir_all(root.join("repo")).expect("mkdir");
        fs::write(root.join("repo/lib-x-2.1.jar"), "jar").expect("write jar");
        fs::write(root.join("graph.json"), GRAPH).expect("write graph");
        fs::write(root.join("pluginpack.toml"), "final_name = \"demo\"\n").expect("write config");
        Project { _dir: dir, root }
    }

    fn run_args(project: &Project, args: &[&str]) -> (Result<()>, String) {
        let cli = Cli::try_parse_from(std::iter::once("pluginpack").chain(args.iter().copied()))
            .expect("valid arguments");
        let mut stdout = Vec::new();
        let result = run_in(&cli, &project.root, &mut stdout);
        (result, String::from_utf8(stdout).expect("utf8 stdout"))
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let mut stderr = Vec::new();
        let exit_code =
            exit_code_for_run_result(Err(PackagerError::MissingHostPluginDir), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.starts_with("error: no host plugin directory configured"));
    }

    #[rstest]
    fn bundle_prints_primary_then_attached(project: Project) {
        let (result, stdout) = run_args(&project, &["bundle", "--graph", "graph.json"]);

        result.expect("bundle");
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(
            lines,
            [
                project.root.join("target/demo.hpi").as_str(),
                project.root.join("target/demo.jar").as_str(),
            ]
        );
    }

    #[rstest]
    fn link_uses_host_plugin_dir_flag(project: Project) {
        let (result, stdout) = run_args(
            &project,
            &["link", "-g", "graph.json", "--host-plugin-dir", "host/plugins"],
        );

        result.expect("link");
        assert_eq!(
            stdout.trim_end(),
            project.root.join("host/plugins/demo.hpl").as_str()
        );
    }

    #[rstest]
    fn link_without_host_plugin_dir_fails(project: Project) {
        let (result, stdout) = run_args(&project, &["link", "-g", "graph.json"]);

        assert!(matches!(result, Err(PackagerError::MissingHostPluginDir)));
        assert!(stdout.is_empty());
    }

    #[rstest]
    fn link_reports_missing_host_dir_before_reading_graph(project: Project) {
        let (result, _) = run_args(&project, &["link", "-g", "absent.json"]);

        assert!(matches!(result, Err(PackagerError::MissingHostPluginDir)));
    }

    #[rstest]
    fn link_skips_non_plugin_without_host_dir(project: Project) {
        fs::write(
            project.root.join("pluginpack.toml"),
            "final_name = \"demo\"\npackaging = \"jar\"\n",
        )
        .expect("write config");

        let (result, stdout) = run_args(&project, &["link", "-g", "graph.json"]);

        result.expect("non-plugin link is skipped");
        assert!(stdout.is_empty());
    }

    #[rstest]
    fn classpath_explains_host_core_exclusion(project: Project) {
        let (result, stdout) = run_args(&project, &["classpath", "-g", "graph.json", "--explain"]);

        result.expect("classpath");
        assert!(stdout.contains("lib-x-2.1.jar"));
        assert!(stdout.contains("excluded org.jenkins-ci.main:jenkins-core:2.400"));
    }

    #[rstest]
    fn missing_graph_is_reported(project: Project) {
        let (result, _) = run_args(&project, &["bundle", "-g", "absent.json"]);

        assert!(matches!(result, Err(PackagerError::Artifact(_))));
    }
}
