//! Filter conditions - keys and the producer's published state.
//!
//! - [`key`] - Condition Key Codec (`encode` / `decode`)
//! - `state` - [`FilterConditions`] snapshot (uninitialized / initialized)

pub mod key;
mod state;

pub use key::{ConditionKey, SEPARATOR, decode, encode};
pub use state::FilterConditions;
