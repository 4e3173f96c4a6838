//! Derived List Engine - recompute and publish the filtered, searched list.
//!
//! The engine holds one subscription per collaborator. Every notification,
//! whichever collaborator sent it, funnels into a single recomputation that
//! reads the current value of all three:
//!
//! ```text
//! filter conditions ─┐
//! search query ──────┼─→ guard → filter → search → publish DerivedListState
//! item source ───────┘
//! ```
//!
//! A notification that arrives while a recomputation is running (a
//! downstream listener writing upstream, say) marks the engine dirty; the
//! running pass then loops once more instead of nesting.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, error, trace};

use super::builder::DerivedListEngineBuilder;
use super::handles::EngineSubscriptions;
use crate::condition::FilterConditions;
use crate::config::EngineConfig;
use crate::error::{CollaboratorRole, ConditionKeyError, EngineError, Result, SubscriptionError};
use crate::pipeline;
use crate::source::{ItemSourceState, Listener, StateSource, Store, Subscription};
use crate::types::{DerivedListState, PropertyAccess};

// =============================================================================
// Engine Core
// =============================================================================

/// Shared by the engine handle and (weakly) by the upstream listeners.
pub(crate) struct EngineCore<S: ItemSourceState> {
    filter_conditions: Rc<dyn StateSource<FilterConditions>>,
    search_query: Rc<dyn StateSource<String>>,
    item_source: Rc<dyn StateSource<S>>,
    config: EngineConfig,
    output: Store<DerivedListState<S::Item>>,
    computing: Cell<bool>,
    dirty: Cell<bool>,
    last_error: RefCell<Option<ConditionKeyError>>,
}

/// Clears the computing flag even if a downstream listener panics.
struct ComputingGuard<'a>(&'a Cell<bool>);

impl Drop for ComputingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<S> EngineCore<S>
where
    S: ItemSourceState + 'static,
    S::Item: PropertyAccess + Clone + PartialEq + 'static,
{
    pub(crate) fn new(
        filter_conditions: Rc<dyn StateSource<FilterConditions>>,
        search_query: Rc<dyn StateSource<String>>,
        item_source: Rc<dyn StateSource<S>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            filter_conditions,
            search_query,
            item_source,
            config,
            output: Store::new(DerivedListState::NoSourceItems),
            computing: Cell::new(false),
            dirty: Cell::new(false),
            last_error: RefCell::new(None),
        }
    }

    /// Listener for one collaborator. Holds the core weakly.
    pub(crate) fn listener(self: &Rc<Self>, role: CollaboratorRole) -> Listener {
        let core = Rc::downgrade(self);
        Rc::new(move || {
            if let Some(core) = core.upgrade() {
                core.notify(role);
            }
        })
    }

    pub(crate) fn subscribe_to(
        &self,
        role: CollaboratorRole,
        listener: Listener,
    ) -> std::result::Result<Subscription, SubscriptionError> {
        match role {
            CollaboratorRole::FilterConditions => self.filter_conditions.subscribe(listener),
            CollaboratorRole::SearchQuery => self.search_query.subscribe(listener),
            CollaboratorRole::ItemSource => self.item_source.subscribe(listener),
        }
    }

    pub(crate) fn notify(&self, role: CollaboratorRole) {
        trace!(%role, "upstream changed");
        if let Err(err) = self.drive() {
            error!(%role, error = %err, "derived list not updated");
        }
    }

    /// Recompute until no notification arrived during the pass.
    pub(crate) fn drive(&self) -> std::result::Result<(), ConditionKeyError> {
        if self.computing.replace(true) {
            self.dirty.set(true);
            return Ok(());
        }
        let _guard = ComputingGuard(&self.computing);

        let outcome = loop {
            self.dirty.set(false);
            let outcome = self.compute().map(|next| self.publish(next));
            if !self.dirty.get() {
                break outcome;
            }
        };

        *self.last_error.borrow_mut() = outcome.as_ref().err().cloned();
        outcome
    }

    /// One pass over the current upstream values.
    fn compute(&self) -> std::result::Result<DerivedListState<S::Item>, ConditionKeyError> {
        let conditions = self.filter_conditions.current();
        let Some(active) = conditions.active_conditions() else {
            return Ok(DerivedListState::NoSourceItems);
        };

        let source = self.item_source.current();
        let Some(items) = source.items() else {
            return Ok(DerivedListState::NoSourceItems);
        };

        let query = self.search_query.current();
        let found = pipeline::derive(
            items,
            active,
            &query,
            &self.config.search_properties,
            self.config.value_format,
        )?;

        Ok(DerivedListState::from_items(found.into_iter().cloned().collect()))
    }

    fn publish(&self, next: DerivedListState<S::Item>) {
        let (unchanged, from) = self
            .output
            .with(|current| (*current == next, current.variant_name()));
        if unchanged {
            trace!(state = %next, "derived list unchanged");
            return;
        }

        debug!(from, to = next.variant_name(), items = next.len(), "derived list transition");
        self.output.set(next);
    }

    pub(crate) fn output(&self) -> &Store<DerivedListState<S::Item>> {
        &self.output
    }

    pub(crate) fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub(crate) fn last_error(&self) -> Option<ConditionKeyError> {
        self.last_error.borrow().clone()
    }
}

// =============================================================================
// Engine Handle
// =============================================================================

/// Reactive filtered + searched list over three upstream collaborators.
///
/// Build with [`DerivedListEngine::builder`]. The engine is itself a
/// [`StateSource`], so downstream code subscribes to it the same way it
/// subscribes to its own upstreams.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use spark_derived_list::{
///     DerivedListEngine, DerivedListState, FilterConditions, SourceState, StateSource, Store,
/// };
///
/// let conditions = Store::new(FilterConditions::none_active());
/// let query = Store::new(String::new());
/// let items = Store::new(SourceState::ready(vec![
///     json!({ "name": "extraValue1" }),
///     json!({ "name": "extraValue2" }),
/// ]));
///
/// let mut engine = DerivedListEngine::builder()
///     .filter_conditions(conditions.clone())
///     .search_query(query.clone())
///     .item_source(items.clone())
///     .search_properties(["name"])
///     .build()?;
///
/// let _render = engine.watch(|| { /* re-render */ })?;
/// query.set("value2".into());
/// assert_eq!(
///     engine.state(),
///     DerivedListState::ItemResults(vec![json!({ "name": "extraValue2" })])
/// );
///
/// engine.dispose()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DerivedListEngine<S: ItemSourceState> {
    core: Rc<EngineCore<S>>,
    subscriptions: EngineSubscriptions,
}

impl<S> DerivedListEngine<S>
where
    S: ItemSourceState + 'static,
    S::Item: PropertyAccess + Clone + PartialEq + 'static,
{
    pub fn builder() -> DerivedListEngineBuilder<S> {
        DerivedListEngineBuilder::new()
    }

    pub(crate) fn from_parts(core: Rc<EngineCore<S>>, subscriptions: EngineSubscriptions) -> Self {
        Self { core, subscriptions }
    }

    /// The currently published state.
    pub fn state(&self) -> DerivedListState<S::Item> {
        self.core.output().get()
    }

    /// Run a recomputation now and return its outcome.
    pub fn recompute(&self) -> Result<()> {
        self.core.drive().map_err(EngineError::from)
    }

    /// The fault of the most recent recomputation, if it failed.
    ///
    /// A failed recomputation leaves the previously published state in place.
    pub fn last_error(&self) -> Option<ConditionKeyError> {
        self.core.last_error()
    }

    pub fn config(&self) -> &EngineConfig {
        self.core.config()
    }

    pub fn search_properties(&self) -> &[String] {
        &self.core.config().search_properties
    }

    /// Whether any upstream subscription is still held.
    pub fn is_attached(&self) -> bool {
        self.subscriptions.active_count() > 0
    }

    /// Release all upstream subscriptions.
    ///
    /// Every release is attempted even if one fails; failures are reported
    /// together. Failed subscriptions stay held, so calling this again
    /// retries them. Once everything is released it is a no-op.
    pub fn dispose(&mut self) -> Result<()> {
        let failures = self.subscriptions.release_all();
        if failures.is_empty() {
            debug!("derived list engine disposed");
            Ok(())
        } else {
            Err(EngineError::Teardown { failures })
        }
    }
}

impl<S> StateSource<DerivedListState<S::Item>> for DerivedListEngine<S>
where
    S: ItemSourceState + 'static,
    S::Item: PropertyAccess + Clone + PartialEq + 'static,
{
    fn current(&self) -> DerivedListState<S::Item> {
        self.state()
    }

    fn subscribe(&self, listener: Listener) -> std::result::Result<Subscription, SubscriptionError> {
        self.core.output().subscribe(listener)
    }
}

impl<S: ItemSourceState> Drop for DerivedListEngine<S> {
    fn drop(&mut self) {
        self.subscriptions.close();
    }
}

// =============================================================================
// Tests
// =============================================================================
