//! Scenario: First rebuild into an empty probing folder
//!
//! Journey: a host starts for the first time with one module, `Foo`,
//! whose `bin` ships `Foo.dll` and a reference `Markdig.dll`.
//!
//! Success Criteria:
//! - Both binaries are copied, keeping their source timestamps
//! - The dependencies file records the winning loader and the reference
//! - A second rebuild with nothing changed does nothing

use modhost::domain::ports::DependenciesFolder;
use modhost::infrastructure::TomlDependenciesFolder;

use crate::common::*;
use crate::{assert_not_stored, assert_stored};

#[test]
fn scenario_foo_is_copied_into_empty_store() {
    let env = TestEnv::new();
    env.add_module("Foo", &[]);
    let foo = env.add_binary("Foo", "Foo", 10);
    let markdig = env.add_binary("Foo", "Markdig", 5);
    let host = env.host();

    let modules = host.discover().unwrap();
    let (plan, report) = host.rebuild_use_case().rebuild(&modules).unwrap();

    assert_eq!(plan.selections.len(), 1);
    assert_eq!(plan.selections[0].loader_name(), "precompiled");
    assert_eq!(report.copied, vec!["Foo".to_string(), "Markdig".to_string()]);
    assert!(report.deleted.is_empty());
    assert!(!report.restart_required);

    assert_stored!(env, "Foo");
    assert_stored!(env, "Markdig");
    assert_eq!(mtime(&env.stored("Foo")), mtime(&foo));
    assert_eq!(mtime(&env.stored("Markdig")), mtime(&markdig));

    let recorded = TomlDependenciesFolder::new(host.dependencies_file())
        .load_descriptors()
        .unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].name, "Foo");
    assert_eq!(recorded[0].loader_name, "precompiled");
    assert_eq!(recorded[0].virtual_path, "~/Modules/Foo/bin/Foo.dll");
    assert_eq!(recorded[0].references.len(), 1);
    assert_eq!(recorded[0].references[0].name, "Markdig");
}

#[test]
fn scenario_second_rebuild_is_a_noop() {
    let env = TestEnv::new();
    env.add_module("Foo", &[]);
    env.add_binary("Foo", "Foo", 10);
    let host = env.host();
    let use_case = host.rebuild_use_case();
    let modules = host.discover().unwrap();
    use_case.rebuild(&modules).unwrap();

    let (plan, report) = use_case.rebuild(&modules).unwrap();

    assert!(plan.is_noop());
    assert!(!report.has_changes());
}

#[test]
fn scenario_newer_source_is_copied_again_when_not_loaded() {
    let env = TestEnv::new();
    env.add_module("Foo", &[]);
    env.add_binary("Foo", "Foo", 10);
    let host = env.host();
    let use_case = host.rebuild_use_case();
    use_case.rebuild(&host.discover().unwrap()).unwrap();

    let rebuilt = env.add_binary("Foo", "Foo", 20);
    let (_, report) = use_case.rebuild(&host.discover().unwrap()).unwrap();

    assert_eq!(report.copied, vec!["Foo".to_string()]);
    assert!(!report.restart_required);
    assert_eq!(mtime(&env.stored("Foo")), mtime(&rebuilt));
}

#[test]
fn scenario_module_without_binary_is_skipped() {
    let env = TestEnv::new();
    env.add_module("Themes", &[]);
    let host = env.host();

    let (plan, report) = host
        .rebuild_use_case()
        .rebuild(&host.discover().unwrap())
        .unwrap();

    assert!(plan.selections.is_empty());
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].id, "Themes");
    assert!(!report.has_changes());
    assert_not_stored!(env, "Themes");
}

#[test]
fn scenario_dependencies_are_activated_first() {
    let env = TestEnv::new();
    env.add_module("Blog", &["Common"]);
    env.add_module("Common", &[]);
    env.add_binary("Blog", "Blog", 10);
    env.add_binary("Common", "Common", 10);
    let host = env.host();

    let (plan, _) = host
        .rebuild_use_case()
        .rebuild(&host.discover().unwrap())
        .unwrap();

    let order: Vec<&str> = plan.selections.iter().map(|s| s.module_id()).collect();
    assert_eq!(order, vec!["Common", "Blog"]);
}
