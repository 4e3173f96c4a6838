//! Builder for wiring a [`DerivedListEngine`] to its collaborators.

use std::rc::Rc;

use tracing::{debug, error};

use super::derived_list::{DerivedListEngine, EngineCore};
use super::handles::EngineSubscriptions;
use crate::condition::FilterConditions;
use crate::config::EngineConfig;
use crate::error::{CollaboratorRole, EngineError, Result};
use crate::source::{ItemSourceState, StateSource};
use crate::types::{PropertyAccess, ValueFormat};

/// Builder for [`DerivedListEngine`].
///
/// The three collaborators are mandatory; `build()` fails fast with
/// [`EngineError::MissingCollaborator`] when one is absent.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use spark_derived_list::{
///     DerivedListEngine, FilterConditions, SourceState, Store, ValueFormat,
/// };
///
/// let engine = DerivedListEngine::builder()
///     .filter_conditions(Store::new(FilterConditions::Uninitialized))
///     .search_query(Store::new(String::new()))
///     .item_source(Store::new(SourceState::<HashMap<String, String>>::Idle))
///     .search_properties(["name", "extra"])
///     .value_format(ValueFormat::TitleBool)
///     .build()?;
///
/// assert_eq!(engine.search_properties(), ["name", "extra"]);
/// # Ok::<(), spark_derived_list::EngineError>(())
/// ```
pub struct DerivedListEngineBuilder<S> {
    filter_conditions: Option<Rc<dyn StateSource<FilterConditions>>>,
    search_query: Option<Rc<dyn StateSource<String>>>,
    item_source: Option<Rc<dyn StateSource<S>>>,
    config: EngineConfig,
}

impl<S> Default for DerivedListEngineBuilder<S> {
    fn default() -> Self {
        Self {
            filter_conditions: None,
            search_query: None,
            item_source: None,
            config: EngineConfig::default(),
        }
    }
}

impl<S> DerivedListEngineBuilder<S>
where
    S: ItemSourceState + 'static,
    S::Item: PropertyAccess + Clone + PartialEq + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Producer of the active condition set.
    pub fn filter_conditions(mut self, source: impl StateSource<FilterConditions> + 'static) -> Self {
        self.filter_conditions = Some(Rc::new(source));
        self
    }

    /// Producer of the (already lowercased) search query.
    pub fn search_query(mut self, source: impl StateSource<String> + 'static) -> Self {
        self.search_query = Some(Rc::new(source));
        self
    }

    /// Producer of the raw items.
    pub fn item_source(mut self, source: impl StateSource<S> + 'static) -> Self {
        self.item_source = Some(Rc::new(source));
        self
    }

    /// Properties the search stage inspects.
    ///
    /// Default: none (search never filters)
    pub fn search_properties<I, P>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.config = self.config.with_search_properties(properties);
        self
    }

    /// Stringifier for condition values.
    ///
    /// Default: [`ValueFormat::Plain`]
    pub fn value_format(mut self, format: ValueFormat) -> Self {
        self.config.value_format = format;
        self
    }

    /// Replace the whole config.
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Subscribe to all three collaborators and run the first recomputation.
    ///
    /// If a subscription fails, those already acquired are released before
    /// the error is returned.
    pub fn build(self) -> Result<DerivedListEngine<S>> {
        let filter_conditions = self.filter_conditions.ok_or(EngineError::MissingCollaborator {
            role: CollaboratorRole::FilterConditions,
        })?;
        let search_query = self.search_query.ok_or(EngineError::MissingCollaborator {
            role: CollaboratorRole::SearchQuery,
        })?;
        let item_source = self.item_source.ok_or(EngineError::MissingCollaborator {
            role: CollaboratorRole::ItemSource,
        })?;

        let core = Rc::new(EngineCore::new(filter_conditions, search_query, item_source, self.config));

        let mut subscriptions = EngineSubscriptions::default();
        for role in CollaboratorRole::ALL {
            match core.subscribe_to(role, core.listener(role)) {
                Ok(subscription) => subscriptions.attach(role, subscription),
                Err(source) => {
                    subscriptions.close();
                    return Err(EngineError::Subscribe { role, source });
                }
            }
        }

        if let Err(err) = core.drive() {
            error!(error = %err, "initial derived list not computed");
        }

        debug!(
            search_properties = ?core.config().search_properties,
            value_format = ?core.config().value_format,
            state = %core.output().with(|state| state.to_string()),
            "derived list engine attached"
        );

        Ok(DerivedListEngine::from_parts(core, subscriptions))
    }
}
