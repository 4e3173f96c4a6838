//! Filter Stage - keep items matching any active condition.

use std::collections::HashSet;

use crate::condition::ConditionKey;
use crate::condition::key::decode_str;
use crate::error::ConditionKeyError;
use crate::types::{PropertyAccess, ValueFormat};

/// Reduce `items` to those matching at least one condition in `active`.
///
/// - Empty `active` passes every item through.
/// - A key without a separator aborts the whole call with `MalformedKey`,
///   even if no item would have needed it.
/// - Items missing a referenced property fail that condition only.
///
/// Input order is preserved.
pub fn filter<'a, I, It>(
    items: It,
    active: &HashSet<ConditionKey>,
    format: ValueFormat,
) -> Result<Vec<&'a I>, ConditionKeyError>
where
    I: PropertyAccess + 'a,
    It: IntoIterator<Item = &'a I>,
{
    if active.is_empty() {
        return Ok(items.into_iter().collect());
    }

    let conditions = active
        .iter()
        .map(|key| decode_str(key.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(items
        .into_iter()
        .filter(|item| {
            conditions
                .iter()
                .any(|(property, value)| matches_condition(*item, property, value, format))
        })
        .collect())
}

/// Whether `item[property]` stringifies to `value`.
fn matches_condition<I>(item: &I, property: &str, value: &str, format: ValueFormat) -> bool
where
    I: PropertyAccess + ?Sized,
{
    item.property(property)
        .is_some_and(|actual| format.stringify(&actual) == value)
}

// =============================================================================
// Tests
// =============================================================================
