//! Derivation Pipeline
//!
//! The two pure stages that turn a source list into the published list.
//!
//! ```text
//! source items → filter (active conditions) → search (query) → DerivedListState
//! ```
//!
//! ## Stages
//!
//! 1. **filter** - OR over active condition keys; identity when none are active
//! 2. **search** - lowercase substring over searchable properties; identity
//!    when the query or the property list is empty
//!
//! Both stages borrow items and preserve source order, so each one can only
//! narrow its input:
//! `|search(q, filter(items, C), P)| ≤ |filter(items, C)| ≤ |items|`.

pub mod filter;
pub mod search;

pub use filter::filter;
pub use search::{normalize_query, search};

use std::collections::HashSet;

use crate::condition::ConditionKey;
use crate::error::ConditionKeyError;
use crate::types::{PropertyAccess, ValueFormat};

/// Run both stages: `search(query, filter(items, active), search_properties)`.
///
/// A malformed key in `active` fails the call even when `items` is empty.
pub fn derive<'a, I>(
    items: &'a [I],
    active: &HashSet<ConditionKey>,
    query: &str,
    search_properties: &[String],
    format: ValueFormat,
) -> Result<Vec<&'a I>, ConditionKeyError>
where
    I: PropertyAccess,
{
    let filtered = filter(items, active, format)?;
    Ok(search(query, filtered, search_properties))
}
