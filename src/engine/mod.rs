//! Derived List Engine - reactive wiring around the pipeline.
//!
//! The engine manages:
//! - Builder: collaborator wiring, fail-fast construction
//! - Handles: the three upstream subscriptions and their teardown
//! - Core: guard, recompute, publish
//!
//! # State Machine
//!
//! ```text
//!                 ┌────────────────────────────────────────┐
//!                 ▼                                        │
//! NoSourceItems ──► ItemEmptyState ◄──► ItemResults(items) ─┘
//!       ▲                 │
//!       └─────────────────┘   (any state → any state on each recompute)
//! ```
//!
//! `NoSourceItems` is published while the filter conditions are
//! uninitialized or the item source is not in its "has items" shape.

mod builder;
mod derived_list;
mod handles;

pub use builder::DerivedListEngineBuilder;
pub use derived_list::DerivedListEngine;
