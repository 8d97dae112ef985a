//! Behaviour-driven tests for bundle and link packaging.
//!
//! Scenarios drive the pipeline end to end against a throwaway project
//! tree. Tests use the rstest-bdd v0.5.0 mutable world pattern.

use camino::{Utf8Path, Utf8PathBuf};
use pluginpack::artifact::{Artifact, ArtifactGraph, ArtifactId, DependencyTrail, Scope};
use pluginpack::config::{MetadataAttribute, PackagingConfig};
use pluginpack::manifest::{LIBRARIES, MANIFEST_PATH, Manifest, RESOURCE_PATH, format};
use pluginpack_packager::error::PackagerError;
use pluginpack_packager::pipeline::{PackageContext, PackageOutcome, emit_link, package_bundle};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::fs;
use std::io::Read;
use tempfile::TempDir;
use zip::ZipArchive;

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

#[derive(Default)]
struct PackagingWorld {
    temp_dir: Option<TempDir>,
    config: PackagingConfig,
    artifacts: Vec<Artifact>,
    bundle: Option<Option<PackageOutcome>>,
    link: Option<Option<Utf8PathBuf>>,
    error: Option<PackagerError>,
}

#[fixture]
fn world() -> PackagingWorld {
    PackagingWorld {
        temp_dir: Some(TempDir::new().expect("temp dir")),
        ..PackagingWorld::default()
    }
}

fn root(world: &PackagingWorld) -> Utf8PathBuf {
    let dir = world.temp_dir.as_ref().expect("temp_dir set");
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf8 temp dir")
}

fn project_id() -> ArtifactId {
    ArtifactId::new("org.example", "demo", "1.0")
}

/// Write a fake jar under the world's repository directory.
fn repository_jar(world: &PackagingWorld, file_name: &str) -> Utf8PathBuf {
    let path = root(world).join("repo").join(file_name);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir repo");
    fs::write(&path, format!("content of {file_name}")).expect("write jar");
    path
}

fn context(world: &PackagingWorld) -> PackageContext {
    PackageContext::new(
        world.config.clone(),
        ArtifactGraph::new(world.artifacts.clone()),
    )
}

fn bundle_outcome(world: &PackagingWorld) -> &PackageOutcome {
    world
        .bundle
        .as_ref()
        .expect("bundle packaged")
        .as_ref()
        .expect("bundle not skipped")
}

fn bundle_entries(world: &PackagingWorld) -> Vec<String> {
    let path = &bundle_outcome(world).primary;
    let mut zip = ZipArchive::new(fs::File::open(path).expect("open bundle")).expect("zip");
    (0..zip.len())
        .map(|index| zip.by_index(index).expect("entry").name().to_owned())
        .collect()
}

fn bundle_manifest(world: &PackagingWorld) -> Manifest {
    let path = &bundle_outcome(world).primary;
    let mut zip = ZipArchive::new(fs::File::open(path).expect("open bundle")).expect("zip");
    let mut text = String::new();
    zip.by_name(MANIFEST_PATH)
        .expect("manifest entry")
        .read_to_string(&mut text)
        .expect("read manifest");
    format::parse(&text).expect("parse manifest")
}

fn link_manifest(world: &PackagingWorld) -> Manifest {
    let path = world
        .link
        .as_ref()
        .expect("link emitted")
        .as_ref()
        .expect("link not skipped");
    format::parse(&fs::read_to_string(path).expect("read descriptor")).expect("parse descriptor")
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a plugin project named \"{name}\" with runtime library \"{library}\"")]
fn given_project(world: &mut PackagingWorld, name: String, library: String) {
    let root = root(world);
    fs::create_dir_all(root.join("target/classes/org/example")).expect("mkdir classes");
    fs::write(root.join("target/classes/org/example/Demo.class"), "class").expect("write");
    fs::create_dir_all(root.join("src/main/webapp")).expect("mkdir webapp");
    fs::write(root.join("src/main/webapp/index.jelly"), "<j/>").expect("write");

    let mut config = PackagingConfig {
        final_name: Some(name),
        ..PackagingConfig::default()
    };
    config.resolve_paths(&root);
    world.config = config;

    let file = repository_jar(world, &library);
    world.artifacts.push(Artifact::new(
        ArtifactId::new("org.example", library.trim_end_matches(".jar"), "1.0"),
        file,
        Scope::Runtime,
        DependencyTrail::from_root(project_id()),
    ));
}

#[given("a sibling plugin \"{plugin}\" that brings in \"{library}\"")]
fn given_sibling_plugin(world: &mut PackagingWorld, plugin: String, library: String) {
    let plugin_id = ArtifactId::new("org.example", plugin.as_str(), "3.0");
    let plugin_file = repository_jar(world, &format!("{plugin}.hpi"));
    let library_file = repository_jar(world, &library);
    world.artifacts.push(
        Artifact::new(
            plugin_id.clone(),
            plugin_file,
            Scope::Compile,
            DependencyTrail::from_root(project_id()),
        )
        .plugin(true),
    );
    world.artifacts.push(Artifact::new(
        ArtifactId::new("org.example", library.trim_end_matches(".jar"), "1.4"),
        library_file,
        Scope::Compile,
        DependencyTrail::from_root(project_id()).then(plugin_id),
    ));
}

#[given("a host plugin directory")]
fn given_host_plugin_dir(world: &mut PackagingWorld) {
    world.config.host_plugin_dir = Some(root(world).join("host/plugins"));
}

#[given("metadata attribute \"{name}\" set to \"{value}\"")]
fn given_metadata(world: &mut PackagingWorld, name: String, value: String) {
    world.config.metadata.push(MetadataAttribute { name, value });
}

#[given("the project packaging is \"{packaging}\"")]
fn given_packaging(world: &mut PackagingWorld, packaging: String) {
    world.config.packaging = packaging;
}

#[when("the bundle is packaged")]
fn when_bundle_packaged(world: &mut PackagingWorld) {
    match package_bundle(&context(world)) {
        Ok(outcome) => world.bundle = Some(outcome),
        Err(err) => world.error = Some(err),
    }
}

#[when("the link descriptor is emitted")]
fn when_link_emitted(world: &mut PackagingWorld) {
    match emit_link(&context(world)) {
        Ok(path) => world.link = Some(path),
        Err(err) => world.error = Some(err),
    }
}

#[then("the bundle contains \"{entry}\"")]
fn then_bundle_contains(world: &mut PackagingWorld, entry: String) {
    let entries = bundle_entries(world);
    assert!(entries.contains(&entry), "missing {entry}: {entries:?}");
}

#[then("the bundle does not contain \"{entry}\"")]
fn then_bundle_lacks(world: &mut PackagingWorld, entry: String) {
    let entries = bundle_entries(world);
    assert!(!entries.contains(&entry), "unexpected {entry}: {entries:?}");
}

#[then("the bundle manifest lists libraries \"{names}\"")]
fn then_manifest_libraries(world: &mut PackagingWorld, names: String) {
    let manifest = bundle_manifest(world);
    let libraries = manifest.get(LIBRARIES).expect("Libraries attribute");
    let file_names: Vec<&str> = libraries
        .split(',')
        .filter_map(|path| Utf8Path::new(path).file_name())
        .collect();
    assert_eq!(file_names.join(","), names);
}

#[then("the descriptor is named \"{file_name}\"")]
fn then_descriptor_named(world: &mut PackagingWorld, file_name: String) {
    let path = world
        .link
        .as_ref()
        .expect("link emitted")
        .as_ref()
        .expect("link not skipped");
    assert_eq!(path, &root(world).join("host/plugins").join(file_name));
}

#[then("the descriptor libraries start with the classes directory")]
fn then_descriptor_starts_with_classes(world: &mut PackagingWorld) {
    let manifest = link_manifest(world);
    let libraries = manifest.get(LIBRARIES).expect("Libraries attribute");
    assert_eq!(
        libraries.split(',').next(),
        Some(world.config.classes_dir.as_str())
    );
    assert!(libraries.ends_with("lib-x-2.1.jar"));
}

#[then("the descriptor has a resource path")]
fn then_descriptor_resource_path(world: &mut PackagingWorld) {
    let manifest = link_manifest(world);
    assert_eq!(
        manifest.get(RESOURCE_PATH),
        Some(world.config.resource_source_dir.as_str())
    );
}

#[then("packaging fails because the host plugin directory is missing")]
fn then_missing_host_dir(world: &mut PackagingWorld) {
    assert!(
        matches!(world.error, Some(PackagerError::MissingHostPluginDir)),
        "expected MissingHostPluginDir, got {:?}",
        world.error
    );
}

#[then("packaging fails with a manifest error")]
fn then_manifest_error(world: &mut PackagingWorld) {
    assert!(
        matches!(world.error, Some(PackagerError::Manifest(_))),
        "expected a manifest error, got {:?}",
        world.error
    );
}

#[then("packaging is skipped")]
fn then_skipped(world: &mut PackagingWorld) {
    assert!(matches!(world.bundle, Some(None)), "expected a skipped run");
}

#[then("no bundle is written")]
fn then_no_bundle(world: &mut PackagingWorld) {
    let output_dir = &world.config.output_dir;
    assert!(!output_dir.join("demo.hpi").exists());
    assert!(!output_dir.join("demo").exists());
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Bundle a plugin with its runtime library"
)]
fn scenario_bundle_runtime_library(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Sibling plugins and their dependencies stay out of the bundle"
)]
fn scenario_sibling_plugins_excluded(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Link descriptor points at the build output first"
)]
fn scenario_link_descriptor(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Linking without a host plugin directory fails"
)]
fn scenario_link_without_host_dir(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Metadata may not override the library list"
)]
fn scenario_metadata_collision(world: PackagingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/packaging.feature",
    name = "Projects that are not plugins are skipped"
)]
fn scenario_non_plugin_skipped(world: PackagingWorld) {
    let _ = world;
}
