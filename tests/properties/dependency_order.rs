//! Property tests for dependency ordering.

use proptest::prelude::*;

use modhost::domain::services::DependencyOrder;
use modhost::ExtensionDescriptor;

/// Acyclic graphs: module `i` may only depend on modules `j < i`.
fn acyclic_modules() -> impl Strategy<Value = Vec<ExtensionDescriptor>> {
    (1usize..12).prop_flat_map(|count| {
        proptest::collection::vec(proptest::collection::vec(any::<prop::sample::Index>(), 0..4), count)
            .prop_map(move |deps| {
                deps.into_iter()
                    .enumerate()
                    .map(|(i, picks)| {
                        let dependencies: Vec<String> = if i == 0 {
                            Vec::new()
                        } else {
                            picks.iter().map(|p| format!("M{}", p.index(i))).collect()
                        };
                        ExtensionDescriptor::new(format!("M{i}"), "~/Modules")
                            .with_dependencies(dependencies)
                    })
                    .rev()
                    .collect()
            })
    })
}

proptest! {
    /// PROPERTY: Every module comes after all of its dependencies.
    #[test]
    fn property_dependencies_come_first(modules in acyclic_modules()) {
        let ordered = DependencyOrder::sort(&modules).unwrap();
        prop_assert_eq!(ordered.len(), modules.len());
        for (pos, module) in ordered.iter().enumerate() {
            for dep in &module.dependencies {
                let dep_pos = ordered.iter().position(|m| &m.id == dep).unwrap();
                prop_assert!(dep_pos < pos, "{} before its dependency {}", module.id, dep);
            }
        }
    }

    /// PROPERTY: Sorting is deterministic regardless of input order.
    #[test]
    fn property_order_ignores_input_order(modules in acyclic_modules()) {
        let mut reversed = modules.clone();
        reversed.reverse();
        let a: Vec<String> = DependencyOrder::sort(&modules).unwrap().into_iter().map(|m| m.id).collect();
        let b: Vec<String> = DependencyOrder::sort(&reversed).unwrap().into_iter().map(|m| m.id).collect();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn cycle_is_an_error() {
    let modules = vec![
        ExtensionDescriptor::new("A", "~/Modules").with_dependencies(["B"]),
        ExtensionDescriptor::new("B", "~/Modules").with_dependencies(["A"]),
    ];
    assert!(DependencyOrder::sort(&modules).is_err());
}
