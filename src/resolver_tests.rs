//! Unit tests for classpath resolution.

use super::*;
use crate::artifact::{Artifact, DependencyTrail};
use rstest::{fixture, rstest};
use tempfile::TempDir;

fn id(name: &str) -> ArtifactId {
    ArtifactId::new("org.example", name, "1.0")
}

fn root() -> DependencyTrail {
    DependencyTrail::from_root(id("demo"))
}

fn lib(name: &str, scope: Scope, trail: DependencyTrail) -> Artifact {
    Artifact::new(id(name), format!("/repo/{name}.jar"), scope, trail)
}

fn core_id() -> ArtifactId {
    ArtifactId::new("org.jenkins-ci.main", "jenkins-core", "2.401")
}

#[fixture]
fn mixed_graph() -> ArtifactGraph {
    ArtifactGraph::new(vec![
        lib("lib-x", Scope::Runtime, root()),
        lib("plugin-a", Scope::Compile, root()).plugin(true),
        lib("lib-y", Scope::Compile, root().then(id("plugin-a"))),
        Artifact::new(core_id(), "/repo/jenkins-core.jar", Scope::Provided, root()),
        lib("guava", Scope::Compile, root().then(core_id())),
        lib("lib-opt", Scope::Compile, root()).optional(true),
        lib("junit", Scope::Test, root()),
        lib("servlet-api", Scope::Provided, root()),
        lib("lib-z", Scope::Compile, root().then(id("lib-x"))),
    ])
}

fn bundle(graph: &ArtifactGraph) -> Resolution {
    resolve_graph(graph, &CoreIdentities::default(), ResolveMode::Bundle)
}

#[rstest]
fn keeps_only_runtime_libraries_in_resolution_order(mixed_graph: ArtifactGraph) {
    let resolution = bundle(&mixed_graph);
    let paths: Vec<&str> = resolution.libraries().iter().map(|p| p.as_str()).collect();
    assert_eq!(paths, ["/repo/lib-x.jar", "/repo/lib-z.jar"]);
}

#[rstest]
#[case::plugin("plugin-a", Exclusion::SiblingPlugin)]
#[case::through_plugin("lib-y", Exclusion::ViaSiblingPlugin(id("plugin-a")))]
#[case::core("jenkins-core", Exclusion::HostCore)]
#[case::through_core("guava", Exclusion::ViaHostCore)]
#[case::optional("lib-opt", Exclusion::Optional)]
#[case::test_scope("junit", Exclusion::Scope(Scope::Test))]
#[case::provided_scope("servlet-api", Exclusion::Scope(Scope::Provided))]
fn records_exclusion_reason(
    mixed_graph: ArtifactGraph,
    #[case] name: &str,
    #[case] expected: Exclusion,
) {
    let resolution = bundle(&mixed_graph);
    let (_, reason) = resolution
        .excluded()
        .iter()
        .find(|(excluded, _)| excluded.name() == name)
        .expect("artifact should be excluded");
    assert_eq!(reason, &expected);
}

#[test]
fn optional_plugin_dependency_reports_plugin_first() {
    let graph = ArtifactGraph::new(vec![
        lib("plugin-a", Scope::Compile, root()).plugin(true).optional(true),
    ]);
    let resolution = bundle(&graph);
    assert_eq!(resolution.excluded()[0].1, Exclusion::SiblingPlugin);
}

#[test]
fn core_on_trail_excludes_regardless_of_scope() {
    let graph = ArtifactGraph::new(vec![lib(
        "commons-io",
        Scope::Runtime,
        root().then(id("lib-x")).then(core_id()),
    )]);
    let resolution = bundle(&graph);
    assert!(resolution.libraries().is_empty());
    assert_eq!(resolution.excluded()[0].1, Exclusion::ViaHostCore);
}

#[test]
fn deeper_plugin_on_trail_does_not_exclude() {
    // Only the root's direct child is consulted for plugin ancestry.
    let graph = ArtifactGraph::new(vec![
        lib("plugin-a", Scope::Compile, root().then(id("lib-x"))).plugin(true),
        lib("lib-y", Scope::Compile, root().then(id("lib-x")).then(id("plugin-a"))),
    ]);
    let resolution = bundle(&graph);
    assert!(resolution.libraries().iter().any(|path| path == "/repo/lib-y.jar"));
}

#[test]
fn duplicate_files_are_listed_once() {
    let shared = "/repo/shared.jar";
    let graph = ArtifactGraph::new(vec![
        Artifact::new(id("a"), shared, Scope::Compile, root()),
        Artifact::new(id("b"), shared, Scope::Runtime, root()),
    ]);
    assert_eq!(bundle(&graph).libraries().len(), 1);
}

#[test]
fn empty_graph_resolves_to_empty_set() {
    let resolution = bundle(&ArtifactGraph::default());
    assert!(resolution.libraries().is_empty());
    assert_eq!(resolution.libraries().joined(), "");
}

#[rstest]
fn link_mode_prepends_existing_local_directories(mixed_graph: ArtifactGraph) {
    let dir = TempDir::new().expect("temp dir");
    let base = Utf8Path::from_path(dir.path()).expect("utf8 temp dir");
    let resources = base.join("resources");
    std::fs::create_dir(&resources).expect("mkdir resources");
    let layout = LinkLayout {
        classes_dir: base.join("classes"),
        resource_dirs: vec![base.join("missing"), resources.clone()],
    };

    let resolution = resolve_graph(
        &mixed_graph,
        &CoreIdentities::default(),
        ResolveMode::Link(&layout),
    );

    let expected = vec![
        base.join("classes"),
        resources,
        Utf8PathBuf::from("/repo/lib-x.jar"),
        Utf8PathBuf::from("/repo/lib-z.jar"),
    ];
    assert_eq!(resolution.libraries().as_slice(), expected.as_slice());
    assert_eq!(resolution.external(), bundle(&mixed_graph).external());
}

#[test]
fn local_entries_with_honours_existence_check() {
    let layout = LinkLayout {
        classes_dir: Utf8PathBuf::from("/build/classes"),
        resource_dirs: vec![
            Utf8PathBuf::from("/src/resources"),
            Utf8PathBuf::from("/src/absent"),
        ],
    };
    let entries = layout.local_entries_with(|dir| dir.as_str() != "/src/absent");
    assert_eq!(
        entries,
        [
            Utf8PathBuf::from("/build/classes"),
            Utf8PathBuf::from("/src/resources")
        ]
    );
}

#[test]
fn exclusion_messages_name_the_rule() {
    assert!(
        Exclusion::ViaSiblingPlugin(id("plugin-a"))
            .to_string()
            .contains("org.example:plugin-a:1.0")
    );
    assert!(Exclusion::Scope(Scope::Test).to_string().contains("test"));
}
