//! Scenario: A loaded module's binary is rebuilt
//!
//! Journey: `Foo` was copied and mapped into the host. The developer
//! rebuilds `Foo.dll`. A mapped binary cannot be replaced in place.
//!
//! Success Criteria:
//! - The newer binary is still copied
//! - The rebuild reports that the host must restart
//! - The restart marker is written for the supervisor

use std::fs;

use modhost::domain::entities::LoadedAssembly;
use modhost::domain::value_objects::AssemblyIdentity;
use modhost::infrastructure::host::RestartMarker;

use crate::common::*;

/// Record `name` as mapped, the way the probing folder does after a load
fn mark_loaded(host: &modhost::ModuleHost, name: &str) {
    host.loaded_assemblies().record(LoadedAssembly {
        name: name.to_string(),
        identity: AssemblyIdentity::from_bytes(name, name.as_bytes()),
        location: host.probing_root().join(format!("{name}.dll")),
        exported_types: Vec::new(),
        handle: None,
    });
}

#[test]
fn scenario_newer_binary_of_loaded_module_requires_restart() {
    let env = TestEnv::new();
    env.add_module("Foo", &[]);
    env.add_binary("Foo", "Foo", 10);
    let host = env.host();
    let use_case = host.rebuild_use_case();
    use_case.rebuild(&host.discover().unwrap()).unwrap();
    mark_loaded(&host, "Foo");

    env.add_binary("Foo", "Foo", 20);
    let (plan, report) = use_case.rebuild(&host.discover().unwrap()).unwrap();

    assert!(plan.restart_required());
    assert_eq!(report.copied, vec!["Foo".to_string()]);
    assert!(report.restart_required);
    assert_eq!(report.restart_reasons.len(), 1);
    assert!(report.restart_reasons[0].contains("Foo"));
    assert!(host.host_environment().restart_requested());

    let marker = fs::read_to_string(env.path("App_Data/restart.txt")).unwrap();
    let marker: RestartMarker = toml::from_str(&marker).unwrap();
    assert_eq!(marker.reasons, report.restart_reasons);
}

#[test]
fn scenario_unchanged_loaded_module_needs_no_restart() {
    let env = TestEnv::new();
    env.add_module("Foo", &[]);
    env.add_binary("Foo", "Foo", 10);
    let host = env.host();
    let use_case = host.rebuild_use_case();
    use_case.rebuild(&host.discover().unwrap()).unwrap();
    mark_loaded(&host, "Foo");

    let (_, report) = use_case.rebuild(&host.discover().unwrap()).unwrap();

    assert!(!report.restart_required);
    assert!(!env.path("App_Data/restart.txt").exists());
}

#[test]
fn scenario_removing_a_loaded_module_requires_restart() {
    let env = TestEnv::new();
    env.add_module("Foo", &[]);
    env.add_binary("Foo", "Foo", 10);
    let host = env.host();
    let use_case = host.rebuild_use_case();
    use_case.rebuild(&host.discover().unwrap()).unwrap();
    mark_loaded(&host, "Foo");

    env.remove_module("Foo");
    let (plan, report) = use_case.rebuild(&host.discover().unwrap()).unwrap();

    assert_eq!(plan.removed, vec!["Foo".to_string()]);
    assert_eq!(report.deleted, vec!["Foo".to_string()]);
    assert!(report.restart_required);
}
