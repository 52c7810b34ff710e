pub mod event_filter;

pub use event_filter::EventFilterService;
