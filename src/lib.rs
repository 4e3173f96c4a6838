//! # spark-derived-list
//!
//! Reactive filtered + searchable list state for Rust UIs.
//!
//! Combines three independent upstream sources into one derived list:
//! ```text
//! FilterConditions ─┐
//! search query ─────┼─→ filter → search → DerivedListState
//! item source ──────┘
//! ```
//!
//! The upstream producers are collaborators: the engine reads their current
//! value and reacts to their change notifications, and exposes its own
//! output through the same [`StateSource`] contract. Upstreams can be plain
//! [`Store`]s or [spark-signals](https://crates.io/crates/spark-signals)
//! signals wrapped in a [`SignalSource`].
//!
//! ## Modules
//!
//! - [`types`] - Property values, the item capability, derived state
//! - [`condition`] - Condition key codec and filter-condition state
//! - [`pipeline`] - Filter and search stages
//! - [`source`] - Collaborator contract, `Store`, `SignalSource`
//! - [`engine`] - The derived list engine
//! - [`config`] - Engine configuration
//! - [`error`] - Error types

pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod source;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use condition::{ConditionKey, FilterConditions, SEPARATOR, decode, encode};

pub use config::EngineConfig;

pub use engine::{DerivedListEngine, DerivedListEngineBuilder};

pub use error::{
    CollaboratorRole, ConditionKeyError, EngineError, Result, SubscriptionError, TeardownFailure,
};

pub use pipeline::{derive, filter, normalize_query, search};

pub use source::{
    ItemSourceState, Listener, SignalSource, SourceState, StateSource, Store, Subscription,
};
