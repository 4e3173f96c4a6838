//! Store - a value with an explicit listener registry.
//!
//! Listeners are identified by a monotonically increasing id so a
//! subscription can remove exactly its own entry. The value and the
//! registry live in separate cells: the registry is only borrowed for short
//! bookkeeping and never while a listener runs, so a listener can read the
//! store, set it again, or unsubscribe itself, and releasing a subscription
//! always succeeds.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

use super::{Listener, StateSource, Subscription};
use crate::error::SubscriptionError;

#[derive(Default)]
struct Registry {
    listeners: Vec<(usize, Listener)>,
    next_id: usize,
}

impl Registry {
    fn add(&mut self, listener: Listener) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    fn contains(&self, id: usize) -> bool {
        self.listeners.iter().any(|(listener_id, _)| *listener_id == id)
    }
}

/// Shared, single-threaded state holder. Clones share the same value.
pub struct Store<T> {
    value: Rc<RefCell<T>>,
    registry: Rc<RefCell<Registry>>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            registry: self.registry.clone(),
        }
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Store<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("value", &self.value.borrow())
            .field("listeners", &self.registry.borrow().listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Store<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            registry: Rc::new(RefCell::new(Registry::default())),
        }
    }

    /// Replace the value and notify listeners.
    ///
    /// Setting an equal value is a no-op. Returns whether the value changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }

        let listeners = self.registry.borrow().listeners.clone();
        trace!(listeners = listeners.len(), "store changed");

        for (id, listener) in listeners {
            // Skip listeners removed by an earlier listener in this round.
            if self.registry.borrow().contains(id) {
                listener();
            }
        }
        true
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Borrow the value without cloning it. `f` must not write to the store.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

fn remove_listener(registry: &Weak<RefCell<Registry>>, id: usize) -> Result<(), SubscriptionError> {
    // A dropped store has no listeners left to remove.
    if let Some(registry) = registry.upgrade() {
        registry
            .borrow_mut()
            .listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }
    Ok(())
}

impl<T: Clone + PartialEq + 'static> StateSource<T> for Store<T> {
    fn current(&self) -> T {
        self.get()
    }

    fn subscribe(&self, listener: Listener) -> Result<Subscription, SubscriptionError> {
        let id = self.registry.borrow_mut().add(listener);
        let registry = Rc::downgrade(&self.registry);
        Ok(Subscription::new(move || remove_listener(&registry, id)))
    }
}

// =============================================================================
// Tests
// =============================================================================
