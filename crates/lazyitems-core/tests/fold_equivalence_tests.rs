//! Fold Equivalence Tests
//!
//! Shortcuts taken by the fold must not be observable:
//! - `Remove="@(I)"` clears the list exactly like naming every item
//! - skipping globs removed later yields the same list as expanding them

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use lazyitems_core::{
    EvaluationOptions, InMemoryFileSet, LazyItemEvaluator, OperationDeclaration,
};
use proptest::prelude::*;

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-c]{1,2}\\.(cs|vb|txt)"
}

fn materialized(evaluator: &LazyItemEvaluator) -> (Vec<String>, Vec<String>) {
    let result = evaluator.materialize("I").unwrap();
    (
        result.items.values().into_iter().map(str::to_string).collect(),
        result.removed_globs.into_iter().collect(),
    )
}

proptest! {
    #[test]
    fn self_remove_equals_removing_every_value(
        values in prop::collection::vec(value_strategy(), 0..12),
        tail in prop::collection::vec(value_strategy(), 0..4),
    ) {
        let mut fast = LazyItemEvaluator::new(EvaluationOptions::default());
        let mut general = LazyItemEvaluator::new(EvaluationOptions::default());
        for value in &values {
            fast.declare(OperationDeclaration::include("I", value.as_str())).unwrap();
            general.declare(OperationDeclaration::include("I", value.as_str())).unwrap();
        }

        fast.declare(OperationDeclaration::remove("I", "@(I)")).unwrap();
        if !values.is_empty() {
            general.declare(OperationDeclaration::remove("I", values.join(";"))).unwrap();
        }

        for value in &tail {
            fast.declare(OperationDeclaration::include("I", value.as_str())).unwrap();
            general.declare(OperationDeclaration::include("I", value.as_str())).unwrap();
        }

        prop_assert_eq!(materialized(&fast), materialized(&general));
    }

    #[test]
    fn skipping_removed_globs_is_unobservable(
        files in prop::collection::vec(value_strategy(), 0..10),
        literals in prop::collection::vec(value_strategy(), 0..4),
        remove_cs in any::<bool>(),
        remove_condition in any::<bool>(),
    ) {
        let file_set: InMemoryFileSet = files.iter().cloned().collect();
        let file_set = Arc::new(file_set);

        let run = |skip: bool| {
            let options = EvaluationOptions {
                skip_removed_glob_expansion: skip,
                ..EvaluationOptions::default()
            };
            let mut evaluator = LazyItemEvaluator::new(options).with_glob_expander(file_set.clone());
            let mut include = vec!["*.cs".to_string(), "*.vb".to_string()];
            include.extend(literals.iter().cloned());
            evaluator.declare(OperationDeclaration::include("I", include.join(";"))).unwrap();

            let removed = if remove_cs { "*.cs" } else { "*.txt;a.vb" };
            evaluator
                .declare(OperationDeclaration::remove("I", removed).with_condition(remove_condition))
                .unwrap();
            evaluator.declare(OperationDeclaration::exclude("I", "b*.vb")).unwrap();
            materialized(&evaluator)
        };

        prop_assert_eq!(run(true), run(false));
    }
}
