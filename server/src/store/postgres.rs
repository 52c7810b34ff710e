//! PostgreSQL event store. Filters are rendered into the `WHERE` clause so
//! only matching rows leave the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::{EventStore, StoreResult};
use crate::filters::CompositeEventFilter;
use crate::models::{Event, Location, MarkKind, MarksCount};
use crate::pagination::{PageRequest, PageSlice};

const SELECT_EVENTS: &str = "SELECT e.id, e.owner_id, e.name, e.description, \
     e.latitude, e.longitude, e.start_date, e.end_date, \
     COALESCE((SELECT array_agg(et.tag_id) FROM event_tags et WHERE et.event_id = e.id), '{}') AS tag_ids, \
     (SELECT COUNT(*) FROM marks m WHERE m.event_id = e.id AND m.is_like) AS likes, \
     (SELECT COUNT(*) FROM marks m WHERE m.event_id = e.id AND NOT m.is_like) AS dislikes \
     FROM events e";

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    owner_id: Uuid,
    name: String,
    description: Option<String>,
    latitude: f64,
    longitude: f64,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    tag_ids: Vec<Uuid>,
    likes: i64,
    dislikes: i64,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            description: row.description,
            location: Location::new(row.latitude, row.longitude),
            start_date: row.start_date,
            end_date: row.end_date,
            tag_ids: row.tag_ids,
            likes: row.likes,
            dislikes: row.dislikes,
        }
    }
}

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// `SELECT COUNT(*)` over the filtered events.
fn count_query(filter: &CompositeEventFilter) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT COUNT(*) FROM events e");
    filter.push_where(&mut query);
    query
}

/// One ordered page of the filtered events.
fn page_query(filter: &CompositeEventFilter, page: PageRequest) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(SELECT_EVENTS);
    filter.push_where(&mut query);
    query.push(" ORDER BY e.start_date ASC, e.id ASC LIMIT ");
    query.push_bind(page.limit() as i64);
    query.push(" OFFSET ");
    query.push_bind(page.offset() as i64);
    query
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn find_page(
        &self,
        filter: &CompositeEventFilter,
        page: PageRequest,
    ) -> StoreResult<PageSlice<Event>> {
        let mut count = count_query(filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut query = page_query(filter, page);
        debug!(sql = query.sql(), "Fetching events page");
        let rows: Vec<EventRow> = query.build_query_as().fetch_all(&self.pool).await?;

        Ok(PageSlice {
            items: rows.into_iter().map(Event::from).collect(),
            total_count: total.max(0) as u64,
        })
    }

    async fn get_event(&self, event_id: Uuid) -> StoreResult<Option<Event>> {
        let mut query = QueryBuilder::<Postgres>::new(SELECT_EVENTS);
        query.push(" WHERE e.id = ");
        query.push_bind(event_id);

        let row: Option<EventRow> = query.build_query_as().fetch_optional(&self.pool).await?;
        Ok(row.map(Event::from))
    }

    async fn delete_event(&self, event_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_event(&self, event_id: Uuid, user_id: Uuid, kind: MarkKind) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO marks (event_id, user_id, is_like) VALUES ($1, $2, $3) \
             ON CONFLICT (event_id, user_id) DO UPDATE SET is_like = EXCLUDED.is_like",
        )
        .bind(event_id)
        .bind(user_id)
        .bind(kind.is_like())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove_mark(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        kind: MarkKind,
    ) -> StoreResult<()> {
        sqlx::query("DELETE FROM marks WHERE event_id = $1 AND user_id = $2 AND is_like = $3")
            .bind(event_id)
            .bind(user_id)
            .bind(kind.is_like())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_marks(&self, event_id: Uuid) -> StoreResult<MarksCount> {
        let (likes, dislikes): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE is_like), COUNT(*) FILTER (WHERE NOT is_like) \
             FROM marks WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(MarksCount { likes, dislikes })
    }

    async fn subscribe(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO subscriptions (event_id, user_id, subscribed_at) VALUES ($1, $2, $3) \
             ON CONFLICT (event_id, user_id) DO UPDATE SET subscribed_at = EXCLUDED.subscribed_at",
        )
        .bind(event_id)
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn unsubscribe(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM subscriptions WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_subscriptions(&self, event_id: Uuid) -> StoreResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::EventFilter;

    #[test]
    fn test_page_query_orders_and_windows() {
        let filter = CompositeEventFilter::new().with_filter(EventFilter::OwnedBy(Uuid::new_v4()));
        let query = page_query(&filter, PageRequest::new(2, 10));
        let sql = query.sql();

        assert!(sql.starts_with("SELECT e.id, e.owner_id"));
        assert!(sql.contains(" FROM events e WHERE (e.owner_id = $1)"));
        assert!(sql.ends_with(" ORDER BY e.start_date ASC, e.id ASC LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn test_count_query_shares_the_filter() {
        let filter = CompositeEventFilter::new()
            .with_filter(EventFilter::EndsBefore(Utc::now()));
        let query = count_query(&filter);
        assert_eq!(
            query.sql(),
            "SELECT COUNT(*) FROM events e WHERE (COALESCE(e.end_date, e.start_date) <= $1)"
        );
    }
}
