//! SignalSource - expose a `spark_signals::Signal` as a [`StateSource`].
//!
//! One effect per source tracks the signal and mirrors every change into a
//! [`Store`]. Subscribers register on the mirror, and `current()` reads the
//! mirror rather than the signal, so a listener running inside the effect
//! never adds reactive dependencies of its own.
//!
//! ```
//! use spark_signals::signal;
//! use spark_derived_list::{SignalSource, StateSource};
//!
//! let query = signal(String::new());
//! let source = SignalSource::new(query.clone());
//!
//! query.set("value2".to_string());
//! assert_eq!(source.current(), "value2");
//! ```

use spark_signals::{Signal, effect, signal};

use super::{Listener, StateSource, Store, Subscription};
use crate::error::SubscriptionError;

pub struct SignalSource<T: Clone + PartialEq + 'static> {
    signal: Signal<T>,
    mirror: Store<T>,
    stop_effect: Option<Box<dyn FnOnce()>>,
}

impl<T: Clone + PartialEq + 'static> SignalSource<T> {
    /// Start mirroring `signal`.
    pub fn new(signal: Signal<T>) -> Self {
        let mirror = Store::new(signal.get());

        let feed = mirror.clone();
        let watched = signal.clone();
        let stop = effect(move || {
            // Reading the signal here is the only tracked dependency.
            feed.set(watched.get());
        });

        Self {
            signal,
            mirror,
            stop_effect: Some(Box::new(stop)),
        }
    }

    /// Create a fresh signal holding `value` and mirror it.
    pub fn from_value(value: T) -> Self {
        Self::new(signal(value))
    }

    /// The underlying signal, for producers that write to it directly.
    pub fn signal(&self) -> Signal<T> {
        self.signal.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.stop_effect.is_some()
    }

    /// Stop tracking the signal. Later subscribe calls fail with `Closed`.
    pub fn disconnect(&mut self) {
        if let Some(stop) = self.stop_effect.take() {
            stop();
        }
    }
}

impl<T: Clone + PartialEq + 'static> StateSource<T> for SignalSource<T> {
    fn current(&self) -> T {
        self.mirror.get()
    }

    fn subscribe(&self, listener: Listener) -> Result<Subscription, SubscriptionError> {
        if !self.is_connected() {
            return Err(SubscriptionError::Closed);
        }
        self.mirror.subscribe(listener)
    }
}

impl<T: Clone + PartialEq + 'static> Drop for SignalSource<T> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

// =============================================================================
// Tests
// =============================================================================
