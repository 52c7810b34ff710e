//! In-process event store. Filters run as predicates over the stored events.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventStore, StoreResult};
use crate::filters::CompositeEventFilter;
use crate::models::{Event, MarkKind, MarksCount};
use crate::pagination::{PageRequest, PageSlice};

#[derive(Default)]
struct Inner {
    events: HashMap<Uuid, Event>,
    // (event_id, user_id) -> is_like
    marks: HashMap<(Uuid, Uuid), bool>,
    subscriptions: HashMap<(Uuid, Uuid), DateTime<Utc>>,
}

impl Inner {
    fn marks_count(&self, event_id: Uuid) -> MarksCount {
        self.marks
            .iter()
            .filter(|((event, _), _)| *event == event_id)
            .fold(MarksCount::default(), |mut count, (_, is_like)| {
                if *is_like {
                    count.likes += 1;
                } else {
                    count.dislikes += 1;
                }
                count
            })
    }

    fn with_marks(&self, event: &Event) -> Event {
        let count = self.marks_count(event.id);
        Event {
            likes: count.likes,
            dislikes: count.dislikes,
            ..event.clone()
        }
    }
}

#[derive(Default)]
pub struct MemoryEventStore {
    inner: RwLock<Inner>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: impl IntoIterator<Item = Event>) -> Self {
        let events = events.into_iter().map(|e| (e.id, e)).collect();
        Self {
            inner: RwLock::new(Inner {
                events,
                ..Default::default()
            }),
        }
    }

    /// Loads events from a JSON array. Mark counts in the seed are ignored;
    /// the store starts without marks.
    pub fn from_seed_json(json: &str) -> Result<Self, serde_json::Error> {
        let events: Vec<Event> = serde_json::from_str(json)?;
        Ok(Self::with_events(events))
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn find_page(
        &self,
        filter: &CompositeEventFilter,
        page: PageRequest,
    ) -> StoreResult<PageSlice<Event>> {
        let inner = self.inner.read().await;

        let mut matching: Vec<&Event> =
            inner.events.values().filter(|e| filter.matches(e)).collect();
        matching.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));

        Ok(page.window(matching).map(|e| inner.with_marks(e)))
    }

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Option<Event>> {
        let inner = self.inner.read().await;
        Ok(inner.events.get(&event_id).map(|e| inner.with_marks(e)))
    }

    async fn delete_event(&self, event_id: Uuid) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        if inner.events.remove(&event_id).is_none() {
            return Ok(false);
        }
        inner.marks.retain(|(event, _), _| *event != event_id);
        inner.subscriptions.retain(|(event, _), _| *event != event_id);
        Ok(true)
    }

    async fn mark_event(&self, event_id: Uuid, user_id: Uuid, kind: MarkKind) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.marks.insert((event_id, user_id), kind.is_like());
        Ok(())
    }

    async fn remove_mark(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        kind: MarkKind,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.marks.get(&(event_id, user_id)) == Some(&kind.is_like()) {
            inner.marks.remove(&(event_id, user_id));
        }
        Ok(())
    }

    async fn count_marks(&self, event_id: Uuid) -> StoreResult<MarksCount> {
        Ok(self.inner.read().await.marks_count(event_id))
    }

    async fn subscribe(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.subscriptions.insert((event_id, user_id), at);
        Ok(())
    }

    async fn unsubscribe(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        inner.subscriptions.remove(&(event_id, user_id));
        Ok(())
    }

    async fn count_subscriptions(&self, event_id: Uuid) -> StoreResult<i64> {
        let inner = self.inner.read().await;
        let count = inner
            .subscriptions
            .keys()
            .filter(|(event, _)| *event == event_id)
            .count();
        Ok(count as i64)
    }
}
