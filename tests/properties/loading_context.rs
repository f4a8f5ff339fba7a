//! Property tests for the loading context.

use proptest::prelude::*;

use modhost::{ExtensionLoadingContext, LoadingEffect};

#[derive(Debug, Clone)]
enum Op {
    Copy(String, String),
    Delete(String),
    Restart(String),
}

fn name() -> impl Strategy<Value = String> {
    prop_oneof![Just("Foo"), Just("Bar"), Just("Markdig")].prop_map(str::to_string)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (name(), prop_oneof![Just("/a"), Just("/b")]).prop_map(|(n, s)| Op::Copy(n, s.to_string())),
        name().prop_map(Op::Delete),
        name().prop_map(Op::Restart),
    ]
}

fn apply(ops: &[Op]) -> ExtensionLoadingContext {
    let mut ctx = ExtensionLoadingContext::new();
    for op in ops {
        match op {
            Op::Copy(name, source) => {
                ctx.schedule_copy(name.as_str(), source.as_str());
            }
            Op::Delete(name) => {
                ctx.schedule_delete(name.as_str());
            }
            Op::Restart(reason) => ctx.request_restart(reason.as_str()),
        }
    }
    ctx
}

proptest! {
    /// PROPERTY: Once requested, a restart stays requested.
    #[test]
    fn property_restart_is_sticky(
        before in proptest::collection::vec(op(), 0..16),
        after in proptest::collection::vec(op(), 0..16),
    ) {
        let mut ops = before;
        ops.push(Op::Restart("loaded".to_string()));
        ops.extend(after);
        prop_assert!(apply(&ops).restart_required());
    }

    /// PROPERTY: The restart flag is set iff some operation requested it.
    #[test]
    fn property_restart_only_when_requested(ops in proptest::collection::vec(op(), 0..32)) {
        let requested = ops.iter().any(|o| matches!(o, Op::Restart(_)));
        prop_assert_eq!(apply(&ops).restart_required(), requested);
    }

    /// PROPERTY: No copy or delete is ever scheduled twice.
    #[test]
    fn property_copies_and_deletes_are_unique(ops in proptest::collection::vec(op(), 0..32)) {
        let ctx = apply(&ops);
        let effects: Vec<&LoadingEffect> = ctx
            .effects()
            .iter()
            .filter(|e| !matches!(e, LoadingEffect::RequestRestart { .. }))
            .collect();
        for (i, a) in effects.iter().enumerate() {
            for b in &effects[i + 1..] {
                prop_assert_ne!(a, b);
            }
        }
    }
}
