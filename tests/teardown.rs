//! Teardown against collaborators whose release can fail.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_derived_list::{
    CollaboratorRole, DerivedListEngine, DerivedListState, EngineError, FilterConditions, Listener,
    SourceState, StateSource, Store, Subscription, SubscriptionError,
};

type Items = SourceState<std::collections::HashMap<String, String>>;

/// Wraps a store and fails every unsubscribe, counting the attempts.
struct Sticky<T: Clone + PartialEq + 'static> {
    inner: Store<T>,
    attempts: Rc<Cell<usize>>,
    held: Rc<RefCell<Vec<Subscription>>>,
}

impl<T: Clone + PartialEq + 'static> Sticky<T> {
    fn new(value: T) -> Self {
        Self {
            inner: Store::new(value),
            attempts: Rc::new(Cell::new(0)),
            held: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: Clone + PartialEq + 'static> StateSource<T> for Sticky<T> {
    fn current(&self) -> T {
        self.inner.current()
    }

    fn subscribe(&self, listener: Listener) -> Result<Subscription, SubscriptionError> {
        self.held.borrow_mut().push(self.inner.subscribe(listener)?);
        let attempts = self.attempts.clone();
        Ok(Subscription::new(move || {
            attempts.set(attempts.get() + 1);
            Err(SubscriptionError::Rejected {
                reason: "sticky".to_string(),
            })
        }))
    }
}

#[test]
fn every_release_is_attempted_when_one_fails() {
    let conditions = Store::new(FilterConditions::none_active());
    let query = Sticky::new(String::new());
    let attempts = query.attempts.clone();
    let items = Store::new(Items::ready(vec![]));

    let mut engine = DerivedListEngine::builder()
        .filter_conditions(conditions.clone())
        .search_query(query)
        .item_source(items.clone())
        .build()
        .unwrap();

    let err = engine.dispose().unwrap_err();

    match err {
        EngineError::Teardown { failures } => {
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].role, CollaboratorRole::SearchQuery);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(attempts.get(), 1);
    assert_eq!(conditions.listener_count(), 0);
    assert_eq!(items.listener_count(), 0);

    // The failed subscription is still held and the next dispose retries it.
    assert!(engine.is_attached());
    assert!(matches!(engine.dispose(), Err(EngineError::Teardown { .. })));
    assert_eq!(attempts.get(), 2);
}

/// Rejects the first release, then removes the listener for real.
struct Flaky {
    inner: Store<String>,
}

impl StateSource<String> for Flaky {
    fn current(&self) -> String {
        self.inner.current()
    }

    fn subscribe(&self, listener: Listener) -> Result<Subscription, SubscriptionError> {
        let mut held = Some(self.inner.subscribe(listener)?);
        let mut refused = false;
        Ok(Subscription::new(move || {
            if !refused {
                refused = true;
                return Err(SubscriptionError::Rejected {
                    reason: "busy".to_string(),
                });
            }
            match held.take() {
                Some(subscription) => subscription.unsubscribe(),
                None => Ok(()),
            }
        }))
    }
}

#[test]
fn rejected_release_is_retried_until_the_listener_is_gone() {
    let query = Store::new(String::new());
    let mut engine = DerivedListEngine::builder()
        .filter_conditions(Store::new(FilterConditions::none_active()))
        .search_query(Flaky { inner: query.clone() })
        .item_source(Store::new(Items::Idle))
        .build()
        .unwrap();
    assert_eq!(query.listener_count(), 1);

    assert!(engine.dispose().is_err());
    assert!(engine.is_attached());
    assert_eq!(query.listener_count(), 1);

    assert!(engine.dispose().is_ok());
    assert!(!engine.is_attached());
    assert_eq!(query.listener_count(), 0);
}

#[test]
fn all_failures_are_reported_together() {
    let mut engine = DerivedListEngine::builder()
        .filter_conditions(Sticky::new(FilterConditions::none_active()))
        .search_query(Sticky::new(String::new()))
        .item_source(Sticky::new(Items::Idle))
        .build()
        .unwrap();

    let Err(EngineError::Teardown { failures }) = engine.dispose() else {
        panic!("expected teardown failure");
    };

    let roles: Vec<_> = failures.iter().map(|failure| failure.role).collect();
    assert_eq!(roles, CollaboratorRole::ALL.to_vec());
}

#[test]
fn dropping_the_engine_attempts_release_once() {
    let query = Sticky::new(String::new());
    let attempts = query.attempts.clone();

    let engine = DerivedListEngine::builder()
        .filter_conditions(Store::new(FilterConditions::none_active()))
        .search_query(query)
        .item_source(Store::new(Items::Idle))
        .build()
        .unwrap();
    assert_eq!(engine.state(), DerivedListState::NoSourceItems);

    drop(engine);
    assert_eq!(attempts.get(), 1);
}

#[test]
fn downstream_subscription_survives_engine_drop() {
    let items = Store::new(Items::Idle);
    let engine = DerivedListEngine::builder()
        .filter_conditions(Store::new(FilterConditions::none_active()))
        .search_query(Store::new(String::new()))
        .item_source(items.clone())
        .build()
        .unwrap();

    let fired = Rc::new(Cell::new(0));
    let fired_clone = fired.clone();
    let subscription = engine.watch(move || fired_clone.set(fired_clone.get() + 1)).unwrap();
    drop(engine);

    // Upstream changes no longer reach the dropped engine.
    items.set(Items::ready(vec![Default::default()]));
    assert_eq!(fired.get(), 0);
    assert!(subscription.unsubscribe().is_ok());
}
