//! State Sources - the collaborator contract.
//!
//! Every upstream producer, and the engine's own output, is a
//! [`StateSource`]: a current-value snapshot plus a subscribe mechanism that
//! calls a [`Listener`] whenever the value changes.
//!
//! - [`Store`] - explicit listener registry, the in-crate collaborator
//! - [`SignalSource`] - adapter over a `spark_signals::Signal`
//! - [`ItemSourceState`] / [`SourceState`] - the "has items" recognizer
//!
//! # Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use spark_derived_list::{StateSource, Store};
//!
//! let query = Store::new(String::new());
//! let calls = Rc::new(Cell::new(0));
//! let counter = calls.clone();
//! let subscription = query.watch(move || counter.set(counter.get() + 1))?;
//!
//! query.set("value2".to_string());
//! subscription.unsubscribe()?;
//! query.set("value3".to_string());
//!
//! assert_eq!(calls.get(), 1);
//! # Ok::<(), spark_derived_list::SubscriptionError>(())
//! ```

mod items;
mod signal;
mod store;

pub use items::{ItemSourceState, SourceState};
pub use signal::SignalSource;
pub use store::Store;

use std::rc::Rc;

use crate::error::SubscriptionError;

/// Change callback. Listeners read the new value through `current()`.
pub type Listener = Rc<dyn Fn()>;

type Release = Box<dyn FnMut() -> Result<(), SubscriptionError>>;

// =============================================================================
// StateSource
// =============================================================================

/// A producer of state and change notifications.
pub trait StateSource<T> {
    /// Snapshot of the value right now.
    fn current(&self) -> T;

    /// Register `listener` to be called after each change.
    fn subscribe(&self, listener: Listener) -> Result<Subscription, SubscriptionError>;

    /// [`subscribe`](StateSource::subscribe) with a plain closure.
    fn watch<F>(&self, listener: F) -> Result<Subscription, SubscriptionError>
    where
        F: Fn() + 'static,
        Self: Sized,
    {
        self.subscribe(Rc::new(listener))
    }
}

impl<T, S: StateSource<T> + ?Sized> StateSource<T> for Rc<S> {
    fn current(&self) -> T {
        (**self).current()
    }

    fn subscribe(&self, listener: Listener) -> Result<Subscription, SubscriptionError> {
        (**self).subscribe(listener)
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// Handle for one registered listener.
///
/// Released explicitly with [`unsubscribe`](Subscription::unsubscribe), or
/// best effort on drop. A failed release keeps the handle active so it can
/// be retried; releasing after success is a no-op.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Release>,
}

impl Subscription {
    /// Wrap the function that undoes a registration.
    pub fn new<F>(release: F) -> Self
    where
        F: FnMut() -> Result<(), SubscriptionError> + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Remove the listener.
    pub fn unsubscribe(mut self) -> Result<(), SubscriptionError> {
        self.release()
    }

    pub(crate) fn release(&mut self) -> Result<(), SubscriptionError> {
        let Some(release) = self.release.as_mut() else {
            return Ok(());
        };
        release()?;
        self.release = None;
        Ok(())
    }

    /// Give up on a subscription whose release already failed, without
    /// attempting it again.
    pub(crate) fn abandon(mut self) {
        self.release = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
