//! Error types for spark-derived-list.
//!
//! Data shape surprises (missing or mistyped item properties, upstream
//! sources that are not ready) are not errors. Only contract violations are:
//! malformed condition keys, missing collaborators and failed subscriptions.

use std::fmt;

use thiserror::Error;

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// A condition key could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionKeyError {
    #[error("malformed condition key {key:?}: missing separator")]
    MalformedKey { key: String },
}

/// A collaborator refused or lost a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    #[error("state source is closed")]
    Closed,

    #[error("subscription rejected: {reason}")]
    Rejected { reason: String },
}

/// Which upstream collaborator an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollaboratorRole {
    FilterConditions,
    SearchQuery,
    ItemSource,
}

impl CollaboratorRole {
    /// Subscription order used by the engine.
    pub const ALL: [Self; 3] = [Self::FilterConditions, Self::SearchQuery, Self::ItemSource];
}

impl fmt::Display for CollaboratorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FilterConditions => "filter conditions",
            Self::SearchQuery => "search query",
            Self::ItemSource => "item source",
        })
    }
}

/// One subscription that failed to release during teardown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeardownFailure {
    pub role: CollaboratorRole,
    pub source: SubscriptionError,
}

/// Main error type for the derived list engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("missing mandatory collaborator: {role}")]
    MissingCollaborator { role: CollaboratorRole },

    #[error("failed to subscribe to {role}")]
    Subscribe {
        role: CollaboratorRole,
        #[source]
        source: SubscriptionError,
    },

    #[error(transparent)]
    Condition(#[from] ConditionKeyError),

    #[error("failed to release {} subscription(s)", failures.len())]
    Teardown { failures: Vec<TeardownFailure> },

    #[error("invalid engine config: {0}")]
    Config(#[from] serde_json::Error),
}
