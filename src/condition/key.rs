//! Condition Key Codec - `(property, value)` pairs as opaque set members.
//!
//! A key is `property + SEPARATOR + value`. Decoding splits on the first
//! separator, so values may contain it but property names must not.

use serde::{Deserialize, Serialize};

use crate::error::ConditionKeyError;
use crate::types::{PropertyValue, ValueFormat};

/// Joins property name and value inside a key.
pub const SEPARATOR: char = '|';

/// An encoded filter predicate: "property `p` stringifies to `v`".
///
/// Equal keys imply equal `(property, value)` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionKey(String);

impl ConditionKey {
    /// Encode a typed value using the same stringifier the filter stage uses.
    pub fn for_value(property: &str, value: &PropertyValue<'_>, format: ValueFormat) -> Self {
        encode(property, &format.stringify(value))
    }

    /// Wrap a token produced elsewhere. It is only validated by [`decode`].
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Encode `(property, value)` into a key.
pub fn encode(property: &str, value: &str) -> ConditionKey {
    let mut raw = String::with_capacity(property.len() + SEPARATOR.len_utf8() + value.len());
    raw.push_str(property);
    raw.push(SEPARATOR);
    raw.push_str(value);
    ConditionKey(raw)
}

/// Decode a key back into `(property, value)`.
pub fn decode(key: &ConditionKey) -> Result<(String, String), ConditionKeyError> {
    decode_str(key.as_str()).map(|(property, value)| (property.to_string(), value.to_string()))
}

/// Borrowing decode used by the filter stage.
pub(crate) fn decode_str(raw: &str) -> Result<(&str, &str), ConditionKeyError> {
    raw.split_once(SEPARATOR)
        .ok_or_else(|| ConditionKeyError::MalformedKey { key: raw.to_string() })
}

// =============================================================================
// Tests
// =============================================================================
