//! Include / Exclude / Update Tests
//!
//! Scenarios covered:
//!
//! 1. Include adds literals, expanded globs and referenced items in order
//! 2. Include honours its Exclude attribute and declared metadata
//! 3. Exclude filters matches and reports glob impact
//! 4. Update merges metadata in place without touching old snapshots
//! 5. Declaration attribute restrictions

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use common::{evaluator_with, new_evaluator, values};
use lazyitems_core::{
    EvaluationOptions, InMemoryFileSet, Item, ItemEvalError, LazyItemEvaluator,
    OperationDeclaration,
};

fn with_files(files: &[&str]) -> LazyItemEvaluator {
    let files: InMemoryFileSet = files.iter().copied().collect();
    LazyItemEvaluator::new(EvaluationOptions::default()).with_glob_expander(Arc::new(files))
}

#[test]
fn test_include_fragment_order() {
    // GIVEN R = [r1, r2] and files a.cs, b.cs
    let mut evaluator = with_files(&["a.cs", "b.cs", "notes.md"]);
    evaluator.declare(OperationDeclaration::include("R", "r1;r2")).unwrap();

    // WHEN I Include="x;*.cs;@(R)"
    evaluator
        .declare(OperationDeclaration::include("I", "x;*.cs;@(R)"))
        .unwrap();

    // THEN items follow fragment order
    assert_eq!(values(&evaluator, "I"), vec!["x", "a.cs", "b.cs", "r1", "r2"]);
}

#[test]
fn test_include_condition_false_adds_nothing() {
    // GIVEN an evaluator
    let mut evaluator = new_evaluator();

    // WHEN an Include has a false condition
    evaluator
        .declare(OperationDeclaration::include("I", "a;b").with_condition(false))
        .unwrap();

    // THEN the list is empty
    assert!(values(&evaluator, "I").is_empty());
}

#[test]
fn test_include_exclude_attribute() {
    // GIVEN files in two folders
    let mut evaluator = with_files(&["src/a.cs", "src/gen/b.cs", "src/c.cs"]);

    // WHEN including src/**/*.cs excluding the gen folder and one literal
    evaluator
        .declare(
            OperationDeclaration::include("I", "src/**/*.cs;extra.cs")
                .with_exclude("src/gen/**;src/c.cs"),
        )
        .unwrap();

    // THEN excluded candidates never enter the list
    assert_eq!(values(&evaluator, "I"), vec!["src/a.cs", "extra.cs"]);
}

#[test]
fn test_include_copies_and_overrides_metadata() {
    // GIVEN R = [r] with metadata A=1, B=2
    let mut evaluator = new_evaluator();
    evaluator
        .declare(
            OperationDeclaration::include("R", "r")
                .with_metadata("A", "1")
                .with_metadata("B", "2"),
        )
        .unwrap();

    // WHEN I includes @(R) declaring B=3
    evaluator
        .declare(OperationDeclaration::include("I", "@(R)").with_metadata("B", "3"))
        .unwrap();

    // THEN the copy keeps A, takes the declared B and belongs to I
    let result = evaluator.materialize("I").unwrap();
    let item = result.items.get(0).unwrap().item();
    assert_eq!(item.item_type(), "I");
    assert_eq!(item.metadata_value("A"), Some("1"));
    assert_eq!(item.metadata_value("B"), Some("3"));
}

#[test]
fn test_include_self_reference_duplicates() {
    // GIVEN I = [a]
    let mut evaluator = evaluator_with("I", &["a"]);

    // WHEN I Include="@(I)"
    evaluator.declare(OperationDeclaration::include("I", "@(I)")).unwrap();

    // THEN the list holds a twice
    assert_eq!(values(&evaluator, "I"), vec!["a", "a"]);
}

#[test]
fn test_exclude_filters_and_reports_globs() {
    // GIVEN I = [a.cs, b.txt, c.cs]
    let mut evaluator = evaluator_with("I", &["a.cs", "b.txt", "c.cs"]);

    // WHEN Exclude="*.cs"
    evaluator.declare(OperationDeclaration::exclude("I", "*.cs")).unwrap();

    // THEN only b.txt remains and *.cs is glob impact
    let result = evaluator.materialize("I").unwrap();
    assert_eq!(result.items.values(), vec!["b.txt"]);
    assert!(result.removed_globs.contains("*.cs"));
}

#[test]
fn test_exclude_condition_false() {
    // GIVEN I = [a.cs]
    let mut evaluator = evaluator_with("I", &["a.cs"]);

    // WHEN a false-condition Exclude runs
    evaluator
        .declare(OperationDeclaration::exclude("I", "*.cs").with_condition(false))
        .unwrap();

    // THEN nothing changes
    let result = evaluator.materialize("I").unwrap();
    assert_eq!(result.items.values(), vec!["a.cs"]);
    assert!(result.removed_globs.is_empty());
}

#[test]
fn test_update_merges_metadata_in_place() {
    // GIVEN I = [a, b, c] where b has Keep=yes
    let mut evaluator = new_evaluator();
    evaluator.declare(OperationDeclaration::include("I", "a")).unwrap();
    evaluator
        .declare(OperationDeclaration::include("I", "b").with_metadata("Keep", "yes"))
        .unwrap();
    evaluator.declare(OperationDeclaration::include("I", "c")).unwrap();

    // WHEN Update="b" sets Visible=false
    evaluator
        .declare(OperationDeclaration::update("I", "b").with_metadata("Visible", "false"))
        .unwrap();

    // THEN b keeps its position and both metadata entries
    let result = evaluator.materialize("I").unwrap();
    assert_eq!(result.items.values(), vec!["a", "b", "c"]);
    let b = result.items.get(1).unwrap().item();
    assert_eq!(b.metadata_value("Keep"), Some("yes"));
    assert_eq!(b.metadata_value("Visible"), Some("false"));
    assert_eq!(result.items.get(0).unwrap().item().metadata_value("Visible"), None);
}

#[test]
fn test_update_does_not_leak_into_earlier_reference() {
    // GIVEN I = [a] and R copying I before the update
    let mut evaluator = evaluator_with("I", &["a"]);
    evaluator.declare(OperationDeclaration::include("R", "@(I)")).unwrap();

    // WHEN I is updated afterwards
    evaluator
        .declare(OperationDeclaration::update("I", "a").with_metadata("M", "new"))
        .unwrap();

    // THEN R sees the old metadata, I the new
    let r = evaluator.materialize("R").unwrap();
    assert_eq!(r.items.get(0).unwrap().item().metadata_value("M"), None);
    let i = evaluator.materialize("I").unwrap();
    assert_eq!(i.items.get(0).unwrap().item().metadata_value("M"), Some("new"));
}

#[test]
fn test_update_condition_false() {
    // GIVEN I = [a]
    let mut evaluator = evaluator_with("I", &["a"]);

    // WHEN a false-condition Update runs
    evaluator
        .declare(
            OperationDeclaration::update("I", "a")
                .with_metadata("M", "v")
                .with_condition(false),
        )
        .unwrap();

    // THEN metadata is unchanged
    let result = evaluator.materialize("I").unwrap();
    assert_eq!(result.items.get(0).unwrap().item().metadata_value("M"), None);
}

#[test]
fn test_exclude_attribute_only_on_include() {
    // GIVEN an evaluator
    let mut evaluator = new_evaluator();

    // WHEN a Remove carries an Exclude attribute
    let result = evaluator.declare(OperationDeclaration::remove("I", "a").with_exclude("b"));

    // THEN it is rejected as an invalid specification
    let err = result.unwrap_err();
    assert!(matches!(
        &err,
        ItemEvalError::AttributeNotAllowed { attribute, .. } if attribute == "Exclude"
    ));
    assert!(err.is_invalid_specification());
}

#[test]
fn test_empty_item_spec_is_missing_argument() {
    // GIVEN an evaluator
    let mut evaluator = new_evaluator();

    // WHEN the spec is blank
    let result = evaluator.declare(OperationDeclaration::include("I", "  "));

    // THEN MissingArgument
    assert!(matches!(
        result,
        Err(ItemEvalError::MissingArgument { argument }) if argument == "item_spec"
    ));
}

#[test]
fn test_empty_item_type_is_missing_argument() {
    let mut evaluator = new_evaluator();
    let result = evaluator.declare(OperationDeclaration::include("", "a"));
    assert!(matches!(
        result,
        Err(ItemEvalError::MissingArgument { argument }) if argument == "item_type"
    ));
}
