use lazyitems_core::{
    ElementLocation, EvaluationOptions, LazyItemEvaluator, OperationDeclaration,
};

/// Evaluator with default options
#[allow(dead_code)]
pub fn new_evaluator() -> LazyItemEvaluator {
    LazyItemEvaluator::new(EvaluationOptions::default())
}

/// Evaluator whose type `item_type` already holds `values`, one Include each
#[allow(dead_code)]
pub fn evaluator_with(item_type: &str, values: &[&str]) -> LazyItemEvaluator {
    let mut evaluator = new_evaluator();
    for value in values {
        evaluator
            .declare(OperationDeclaration::include(item_type, *value))
            .unwrap();
    }
    evaluator
}

/// Values of the materialized list for `item_type`
#[allow(dead_code)]
pub fn values(evaluator: &LazyItemEvaluator, item_type: &str) -> Vec<String> {
    evaluator
        .materialize(item_type)
        .unwrap()
        .items
        .values()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// A location inside a fake project file
#[allow(dead_code)]
pub fn at_line(line: u32) -> ElementLocation {
    ElementLocation::new("test.proj", line, 5)
}
