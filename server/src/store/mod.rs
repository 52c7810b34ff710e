use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::filters::CompositeEventFilter;
use crate::models::{Event, MarkKind, MarksCount};
use crate::pagination::{PageRequest, PageSlice};

pub mod memory;
pub mod postgres;

pub use memory::MemoryEventStore;
pub use postgres::PgEventStore;

pub type StoreResult<T> = Result<T, sqlx::Error>;

/// Access to events and the marks and subscriptions attached to them.
///
/// Listings are ordered by start date, then id, so that pages are stable.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Applies `filter` inside the store and returns one page of matches.
    async fn find_page(
        &self,
        filter: &CompositeEventFilter,
        page: PageRequest,
    ) -> StoreResult<PageSlice<Event>>;

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Option<Event>>;

    /// Returns `false` when there was nothing to delete.
    async fn delete_event(&self, event_id: Uuid) -> StoreResult<bool>;

    /// Records the user's mark, replacing one of the other kind.
    async fn mark_event(&self, event_id: Uuid, user_id: Uuid, kind: MarkKind) -> StoreResult<()>;

    /// Drops the user's mark if it is of the given kind.
    async fn remove_mark(&self, event_id: Uuid, user_id: Uuid, kind: MarkKind)
        -> StoreResult<()>;

    async fn count_marks(&self, event_id: Uuid) -> StoreResult<MarksCount>;

    /// Subscribes the user, replacing an earlier subscription.
    async fn subscribe(&self, event_id: Uuid, user_id: Uuid, at: DateTime<Utc>)
        -> StoreResult<()>;

    async fn unsubscribe(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<()>;

    async fn count_subscriptions(&self, event_id: Uuid) -> StoreResult<i64>;
}
