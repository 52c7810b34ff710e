use tracing::debug;

use crate::filters::{CompositeEventFilter, FilterCriteria, FilterFactory, DEFAULT_FACTORIES};
use crate::models::Event;
use crate::pagination::{PageRequest, PageSlice};
use crate::store::{EventStore, StoreResult};

/// Turns filter criteria into a single AND-composed filter and runs it against
/// an [`EventStore`].
pub struct EventFilterService {
    factories: Vec<FilterFactory>,
}

impl Default for EventFilterService {
    fn default() -> Self {
        Self::new(DEFAULT_FACTORIES.to_vec())
    }
}

impl EventFilterService {
    pub fn new(factories: Vec<FilterFactory>) -> Self {
        Self { factories }
    }

    /// Collects the filters of every factory that applies to `criteria`.
    pub fn build(&self, criteria: &FilterCriteria) -> CompositeEventFilter {
        self.factories
            .iter()
            .filter_map(|factory| factory(criteria))
            .fold(CompositeEventFilter::new(), CompositeEventFilter::with_filter)
    }

    /// Fetches one page of the events matching `criteria`. Filtering happens
    /// inside the store.
    pub async fn filter_events(
        &self,
        store: &dyn EventStore,
        criteria: &FilterCriteria,
        page: PageRequest,
    ) -> StoreResult<PageSlice<Event>> {
        let filter = self.build(criteria);
        debug!(
            filter = %filter.description(),
            page_number = page.page_number,
            page_size = page.page_size,
            "Filtering events"
        );
        store.find_page(&filter, page).await
    }
}
