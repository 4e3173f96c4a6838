//! Core types for spark-derived-list.
//!
//! These types flow through the filter and search stages and define what the
//! engine publishes. Items are opaque to the engine: all it needs is the
//! [`PropertyAccess`] capability to read a named property.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Property Values
// =============================================================================

/// A property value read from an item.
///
/// Text is borrowed where the item can lend it, so reading a property for a
/// comparison does not allocate.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue<'a> {
    Text(Cow<'a, str>),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl<'a> From<&'a str> for PropertyValue<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

// =============================================================================
// Item Capability
// =============================================================================

/// Read access to named properties of an item.
///
/// Returning `None` means the item has no such property. The filter and
/// search stages treat that as a non-match, never as a fault.
pub trait PropertyAccess {
    fn property(&self, name: &str) -> Option<PropertyValue<'_>>;
}

/// JSON objects expose their members. `null`, arrays and nested objects
/// count as absent.
impl PropertyAccess for serde_json::Value {
    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        match self.get(name)? {
            serde_json::Value::String(s) => Some(PropertyValue::Text(Cow::Borrowed(s))),
            serde_json::Value::Bool(b) => Some(PropertyValue::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(PropertyValue::Int)
                .or_else(|| n.as_f64().map(PropertyValue::Float)),
            _ => None,
        }
    }
}

impl PropertyAccess for HashMap<String, String> {
    fn property(&self, name: &str) -> Option<PropertyValue<'_>> {
        self.get(name).map(|s| PropertyValue::Text(Cow::Borrowed(s)))
    }
}

// =============================================================================
// Value Format
// =============================================================================

/// How property values are turned into strings before they are compared
/// with a condition value.
///
/// Condition producers and the filter stage must use the same format; build
/// keys with [`ConditionKey::for_value`](crate::ConditionKey::for_value) to
/// guarantee that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// Booleans are `true` / `false`.
    #[default]
    Plain,
    /// Booleans are `True` / `False`.
    TitleBool,
}

impl ValueFormat {
    /// Stringify a property value.
    pub fn stringify<'v>(&self, value: &'v PropertyValue<'_>) -> Cow<'v, str> {
        match value {
            PropertyValue::Text(text) => Cow::Borrowed(text.as_ref()),
            PropertyValue::Bool(b) => Cow::Borrowed(match (self, b) {
                (Self::Plain, true) => "true",
                (Self::Plain, false) => "false",
                (Self::TitleBool, true) => "True",
                (Self::TitleBool, false) => "False",
            }),
            PropertyValue::Int(n) => Cow::Owned(n.to_string()),
            PropertyValue::Float(n) => Cow::Owned(n.to_string()),
        }
    }
}

// =============================================================================
// Derived State
// =============================================================================

/// The published output of the engine.
///
/// A fresh value is built on every recomputation and fully replaces the
/// previous one.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivedListState<I> {
    /// Upstream data is not ready yet.
    NoSourceItems,
    /// Upstream data is ready but nothing survived the pipeline.
    ItemEmptyState,
    /// Surviving items in source order. Never empty.
    ItemResults(Vec<I>),
}

impl<I> Default for DerivedListState<I> {
    fn default() -> Self {
        Self::NoSourceItems
    }
}

impl<I> DerivedListState<I> {
    /// `ItemEmptyState` for an empty list, `ItemResults` otherwise.
    pub fn from_items(items: Vec<I>) -> Self {
        if items.is_empty() {
            Self::ItemEmptyState
        } else {
            Self::ItemResults(items)
        }
    }

    /// The result items, or an empty slice for the other variants.
    pub fn items(&self) -> &[I] {
        match self {
            Self::ItemResults(items) => items,
            _ => &[],
        }
    }

    /// Number of result items.
    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::NoSourceItems => "NoSourceItems",
            Self::ItemEmptyState => "ItemEmptyState",
            Self::ItemResults(_) => "ItemResults",
        }
    }
}

impl<I> fmt::Display for DerivedListState<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ItemResults(items) => write!(f, "ItemResults({})", items.len()),
            other => f.write_str(other.variant_name()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_property_access() {
        let item = json!({ "id": 7, "name": "Seven", "active": true, "ratio": 0.5, "tags": [] });

        assert_eq!(item.property("id"), Some(PropertyValue::Int(7)));
        assert_eq!(item.property("name"), Some(PropertyValue::from("Seven")));
        assert_eq!(item.property("active"), Some(PropertyValue::Bool(true)));
        assert_eq!(item.property("ratio"), Some(PropertyValue::Float(0.5)));
        assert_eq!(item.property("tags"), None);
        assert_eq!(item.property("missing"), None);
    }

    #[test]
    fn test_json_non_object_has_no_properties() {
        assert_eq!(json!("plain").property("id"), None);
        assert_eq!(json!(null).property("id"), None);
    }

    #[test]
    fn test_map_property_access() {
        let mut item = HashMap::new();
        item.insert("extra".to_string(), "extraValue1".to_string());

        assert_eq!(item.property("extra"), Some(PropertyValue::from("extraValue1")));
        assert_eq!(item.property("id"), None);
    }

    #[test]
    fn test_value_format_booleans() {
        let yes = PropertyValue::Bool(true);
        let no = PropertyValue::Bool(false);

        assert_eq!(ValueFormat::Plain.stringify(&yes), "true");
        assert_eq!(ValueFormat::Plain.stringify(&no), "false");
        assert_eq!(ValueFormat::TitleBool.stringify(&yes), "True");
        assert_eq!(ValueFormat::TitleBool.stringify(&no), "False");
    }

    #[test]
    fn test_value_format_numbers_and_text() {
        let format = ValueFormat::default();

        assert_eq!(format.stringify(&PropertyValue::Int(-3)), "-3");
        assert_eq!(format.stringify(&PropertyValue::Float(1.5)), "1.5");
        assert_eq!(format.stringify(&PropertyValue::from("As Is")), "As Is");
    }

    #[test]
    fn test_derived_state_from_items() {
        let empty: DerivedListState<u32> = DerivedListState::from_items(vec![]);
        assert_eq!(empty, DerivedListState::ItemEmptyState);
        assert_eq!(empty.len(), 0);

        let full = DerivedListState::from_items(vec![1, 2]);
        assert_eq!(full.items(), &[1, 2]);
        assert_eq!(full.to_string(), "ItemResults(2)");
    }

    #[test]
    fn test_derived_state_default() {
        let state: DerivedListState<u32> = DerivedListState::default();
        assert_eq!(state, DerivedListState::NoSourceItems);
        assert!(state.items().is_empty());
    }
}
