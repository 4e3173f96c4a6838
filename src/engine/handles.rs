//! The engine's three upstream subscriptions.

use tracing::warn;

use crate::error::{CollaboratorRole, TeardownFailure};
use crate::source::Subscription;

/// One optional slot per collaborator, so a partially attached engine can
/// be torn down the same way as a fully attached one.
#[derive(Debug, Default)]
pub(crate) struct EngineSubscriptions {
    filter_conditions: Option<Subscription>,
    search_query: Option<Subscription>,
    item_source: Option<Subscription>,
}

impl EngineSubscriptions {
    fn slot(&mut self, role: CollaboratorRole) -> &mut Option<Subscription> {
        match role {
            CollaboratorRole::FilterConditions => &mut self.filter_conditions,
            CollaboratorRole::SearchQuery => &mut self.search_query,
            CollaboratorRole::ItemSource => &mut self.item_source,
        }
    }

    /// Store a subscription. A previous one in the same slot is released.
    pub(crate) fn attach(&mut self, role: CollaboratorRole, subscription: Subscription) {
        *self.slot(role) = Some(subscription);
    }

    pub(crate) fn active_count(&self) -> usize {
        [&self.filter_conditions, &self.search_query, &self.item_source]
            .into_iter()
            .filter(|slot| matches!(slot, Some(subscription) if subscription.is_active()))
            .count()
    }

    /// Release every held subscription. A failure never stops the others
    /// from being attempted, and a subscription that failed stays in its
    /// slot so a later call retries it.
    pub(crate) fn release_all(&mut self) -> Vec<TeardownFailure> {
        let mut failures = Vec::new();

        for role in CollaboratorRole::ALL {
            let slot = self.slot(role);
            if let Some(subscription) = slot {
                if let Err(source) = subscription.release() {
                    warn!(%role, error = %source, "failed to release subscription");
                    failures.push(TeardownFailure { role, source });
                    continue;
                }
            }
            *slot = None;
        }

        failures
    }

    /// Final release: retry whatever is still held once, then let go.
    pub(crate) fn close(&mut self) {
        // Failures are already logged by release_all.
        let _ = self.release_all();
        for role in CollaboratorRole::ALL {
            if let Some(subscription) = self.slot(role).take() {
                subscription.abandon();
            }
        }
    }
}
