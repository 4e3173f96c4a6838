//! Filter conditions as published by the upstream conditions producer.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::key::ConditionKey;

/// Snapshot of the filter-conditions collaborator.
///
/// Until the producer has computed its conditions it publishes
/// `Uninitialized`, and the engine reports
/// [`NoSourceItems`](crate::DerivedListState::NoSourceItems).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterConditions {
    #[default]
    Uninitialized,
    Initialized {
        /// OR-combined predicates. Empty means "no filter".
        active_conditions: HashSet<ConditionKey>,
        /// Values each property can take. Informational; the engine does
        /// not read it.
        available_conditions: BTreeMap<String, BTreeSet<String>>,
    },
}

impl FilterConditions {
    /// Initialized with the given active conditions and nothing available.
    pub fn active<I>(conditions: I) -> Self
    where
        I: IntoIterator<Item = ConditionKey>,
    {
        Self::Initialized {
            active_conditions: conditions.into_iter().collect(),
            available_conditions: BTreeMap::new(),
        }
    }

    /// Initialized with no active conditions.
    pub fn none_active() -> Self {
        Self::active(std::iter::empty())
    }

    /// The active set, or `None` while uninitialized.
    pub fn active_conditions(&self) -> Option<&HashSet<ConditionKey>> {
        match self {
            Self::Initialized {
                active_conditions, ..
            } => Some(active_conditions),
            Self::Uninitialized => None,
        }
    }
}
