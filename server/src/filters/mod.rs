pub mod criteria;
pub mod factory;
pub mod mapper;
pub mod predicate;

pub use criteria::{FilterCriteria, LocationCriteria};
pub use factory::{FilterFactory, DEFAULT_FACTORIES};
pub use mapper::{map_filter_request, FilterEventsRequest};
pub use predicate::{CompositeEventFilter, EventFilter};
