//! The engine driven by spark-signals upstreams.

use std::cell::Cell;
use std::rc::Rc;

use serde_json::{Value, json};
use spark_derived_list::{
    DerivedListEngine, DerivedListState, FilterConditions, SignalSource, SourceState, StateSource,
    encode, normalize_query,
};
use spark_signals::signal;

fn items() -> Vec<Value> {
    vec![
        json!({ "id": 1, "extra": "extraValue1" }),
        json!({ "id": 2, "extra": "extraValue2" }),
    ]
}

fn ids(state: &DerivedListState<Value>) -> Vec<i64> {
    state.items().iter().filter_map(|item| item["id"].as_i64()).collect()
}

#[test]
fn signal_writes_recompute_the_list() {
    let conditions = signal(FilterConditions::Uninitialized);
    let query = signal(String::new());
    let source = signal(SourceState::<Value>::Loading);

    let engine = DerivedListEngine::builder()
        .filter_conditions(SignalSource::new(conditions.clone()))
        .search_query(SignalSource::new(query.clone()))
        .item_source(SignalSource::new(source.clone()))
        .search_properties(["extra"])
        .build()
        .unwrap();
    assert_eq!(engine.state(), DerivedListState::NoSourceItems);

    conditions.set(FilterConditions::none_active());
    assert_eq!(engine.state(), DerivedListState::NoSourceItems);

    source.set(SourceState::ready(items()));
    assert_eq!(ids(&engine.state()), vec![1, 2]);

    query.set(normalize_query("VALUE2"));
    assert_eq!(ids(&engine.state()), vec![2]);

    conditions.set(FilterConditions::active([encode("id", "1")]));
    assert_eq!(engine.state(), DerivedListState::ItemEmptyState);
}

#[test]
fn downstream_sees_each_transition_once() {
    let query = SignalSource::from_value(String::new());
    let writer = query.signal();

    let engine = DerivedListEngine::builder()
        .filter_conditions(SignalSource::from_value(FilterConditions::none_active()))
        .search_query(query)
        .item_source(SignalSource::from_value(SourceState::ready(items())))
        .search_properties(["extra"])
        .build()
        .unwrap();

    let seen = Rc::new(Cell::new(0));
    let seen_clone = seen.clone();
    let _render = engine.watch(move || seen_clone.set(seen_clone.get() + 1)).unwrap();

    writer.set("value1".to_string());
    writer.set("value1".to_string());
    writer.set("extra".to_string());

    assert_eq!(seen.get(), 2);
    assert_eq!(ids(&engine.current()), vec![1, 2]);
}
