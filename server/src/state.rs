use std::sync::Arc;

use crate::pagination::PageLinkGenerator;
use crate::services::EventFilterService;
use crate::store::EventStore;

/// Shared, immutable request dependencies.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub filter_service: Arc<EventFilterService>,
    pub page_links: Arc<dyn PageLinkGenerator>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, page_links: Arc<dyn PageLinkGenerator>) -> Self {
        Self {
            store,
            filter_service: Arc::new(EventFilterService::default()),
            page_links,
        }
    }
}
