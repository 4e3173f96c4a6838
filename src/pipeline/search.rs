//! Search Stage - keep items whose searchable text contains the query.

use crate::types::{PropertyAccess, PropertyValue};

/// Lowercase a raw query the way the search stage expects it.
///
/// Query producers call this; [`search`] itself never lowers the query.
pub fn normalize_query(raw: &str) -> String {
    raw.to_lowercase()
}

/// Reduce `items` to those where any property in `search_properties` holds
/// text whose lowercase form contains `query`.
///
/// An empty query, or an empty property list, passes every item through.
/// Non-text values never match. Input order is preserved.
pub fn search<'a, I, It>(query: &str, items: It, search_properties: &[String]) -> Vec<&'a I>
where
    I: PropertyAccess + 'a,
    It: IntoIterator<Item = &'a I>,
{
    if query.is_empty() || search_properties.is_empty() {
        return items.into_iter().collect();
    }

    items
        .into_iter()
        .filter(|item| matches_query(*item, query, search_properties))
        .collect()
}

fn matches_query<I>(item: &I, query: &str, search_properties: &[String]) -> bool
where
    I: PropertyAccess + ?Sized,
{
    search_properties.iter().any(|name| match item.property(name) {
        Some(PropertyValue::Text(text)) => text.to_lowercase().contains(query),
        _ => false,
    })
}

// =============================================================================
// Tests
// =============================================================================
