//! Scenario: Modules come and go
//!
//! Journey: a host runs with several modules; one is removed, one is
//! disabled in configuration, one ships a binary that is not loadable.
//!
//! Success Criteria:
//! - Stored copies of removed and disabled modules are deleted
//! - The dependencies file forgets them
//! - A corrupt binary fails the load with an error naming it

use modhost::domain::ports::DependenciesFolder;
use modhost::infrastructure::TomlDependenciesFolder;
use modhost::LoaderError;

use crate::common::*;
use crate::{assert_not_stored, assert_stored};

#[test]
fn scenario_removed_module_is_deleted_from_store() {
    let env = TestEnv::new();
    env.add_module("Foo", &[]);
    env.add_module("Bar", &[]);
    env.add_binary("Foo", "Foo", 10);
    env.add_binary("Bar", "Bar", 10);
    let host = env.host();
    let use_case = host.rebuild_use_case();
    use_case.rebuild(&host.discover().unwrap()).unwrap();
    assert_stored!(env, "Bar");

    env.remove_module("Bar");
    let (_, report) = use_case.rebuild(&host.discover().unwrap()).unwrap();

    assert_eq!(report.deleted, vec!["Bar".to_string()]);
    assert!(!report.restart_required);
    assert_not_stored!(env, "Bar");
    assert_stored!(env, "Foo");

    let recorded = TomlDependenciesFolder::new(host.dependencies_file())
        .load_descriptors()
        .unwrap();
    let names: Vec<&str> = recorded.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Foo"]);
}

#[test]
fn scenario_disabled_module_is_deactivated() {
    let mut env = TestEnv::new();
    env.add_module("Foo", &[]);
    env.add_binary("Foo", "Foo", 10);
    env.host()
        .rebuild_use_case()
        .rebuild(&env.host().discover().unwrap())
        .unwrap();
    assert_stored!(env, "Foo");

    env.config.modules.disabled = vec!["Foo".to_string()];
    let host = env.host();
    let (plan, report) = host
        .rebuild_use_case()
        .rebuild(&host.discover().unwrap())
        .unwrap();

    assert!(plan.selections.is_empty());
    assert_eq!(report.deleted, vec!["Foo".to_string()]);
    assert_not_stored!(env, "Foo");
}

#[test]
fn scenario_precompiled_loader_disabled_claims_nothing() {
    let mut env = TestEnv::new();
    env.add_module("Foo", &[]);
    env.add_binary("Foo", "Foo", 10);
    env.config.loader.precompiled_disabled = true;
    let host = env.host();

    let reports = host.probe().unwrap();

    assert_eq!(reports.len(), 1);
    assert!(reports[0].claims.is_empty());
}

#[test]
fn scenario_corrupt_binary_fails_load() {
    let env = TestEnv::new();
    env.add_module("Foo", &[]);
    env.add_binary("Foo", "Foo", 10);
    let host = env.host();
    let use_case = host.rebuild_use_case();
    let (plan, _) = use_case.rebuild(&host.discover().unwrap()).unwrap();

    let err = use_case.load(&plan.selections).unwrap_err();

    match err {
        LoaderError::CorruptAssembly { name, .. } => assert_eq!(name, "Foo"),
        other => panic!("expected CorruptAssembly, got {other:?}"),
    }
    assert!(host.loaded_assemblies().is_empty());
}

#[test]
fn scenario_probe_lists_claims_and_references() {
    let env = TestEnv::new();
    env.add_module("Foo", &[]);
    env.add_binary("Foo", "Foo", 10);
    env.add_binary("Foo", "Markdig", 10);
    let host = env.host();

    let reports = host.probe().unwrap();

    assert_eq!(reports[0].module.id, "Foo");
    assert_eq!(reports[0].claims.len(), 1);
    assert_eq!(
        reports[0].claims[0].virtual_path,
        "~/Modules/Foo/bin/Foo.dll"
    );
    let references: Vec<&str> = reports[0]
        .references
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(references, vec!["Markdig"]);
    assert!(host.stored_assemblies().unwrap().is_empty());
}
