//! Event filters and their composition.
//!
//! Every [`EventFilter`] can be evaluated two ways: directly against an
//! [`Event`] held in memory, or rendered into a parameterised SQL condition so
//! the database does the filtering. Both renderings must agree.

use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{Event, Location};

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A single-dimension predicate over events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventFilter {
    /// Event lies within `radius_km` of `center`.
    WithinRadius { center: Location, radius_km: f64 },
    /// Event starts at or after the bound.
    StartsAfter(DateTime<Utc>),
    /// Event's effective end is at or before the bound.
    EndsBefore(DateTime<Utc>),
    /// Event belongs to the given owner.
    OwnedBy(Uuid),
    /// Event carries at least one of the tags.
    TaggedWithAny(Vec<Uuid>),
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::WithinRadius { center, radius_km } => {
                great_circle_km(*center, event.location) <= *radius_km
            }
            EventFilter::StartsAfter(bound) => event.start_date >= *bound,
            EventFilter::EndsBefore(bound) => event.effective_end() <= *bound,
            EventFilter::OwnedBy(owner_id) => event.owner_id == *owner_id,
            EventFilter::TaggedWithAny(tag_ids) => {
                event.tag_ids.iter().any(|tag| tag_ids.contains(tag))
            }
        }
    }

    /// Appends this filter as a SQL condition over the `events e` alias.
    pub fn push_condition(&self, query: &mut QueryBuilder<'_, Postgres>) {
        match self {
            EventFilter::WithinRadius { center, radius_km } => {
                query.push("(2 * ");
                query.push_bind(EARTH_RADIUS_KM);
                query.push(" * ASIN(LEAST(1.0, SQRT(POWER(SIN(RADIANS(e.latitude - ");
                query.push_bind(center.latitude);
                query.push(") / 2), 2) + COS(RADIANS(");
                query.push_bind(center.latitude);
                query.push(")) * COS(RADIANS(e.latitude)) * POWER(SIN(RADIANS(e.longitude - ");
                query.push_bind(center.longitude);
                query.push(") / 2), 2))))) <= ");
                query.push_bind(*radius_km);
            }
            EventFilter::StartsAfter(bound) => {
                query.push("e.start_date >= ");
                query.push_bind(*bound);
            }
            EventFilter::EndsBefore(bound) => {
                query.push("COALESCE(e.end_date, e.start_date) <= ");
                query.push_bind(*bound);
            }
            EventFilter::OwnedBy(owner_id) => {
                query.push("e.owner_id = ");
                query.push_bind(*owner_id);
            }
            EventFilter::TaggedWithAny(tag_ids) => {
                query.push(
                    "EXISTS (SELECT 1 FROM event_tags et WHERE et.event_id = e.id AND et.tag_id = ANY(",
                );
                query.push_bind(tag_ids.clone());
                query.push("))");
            }
        }
    }

    pub fn description(&self) -> String {
        match self {
            EventFilter::WithinRadius { center, radius_km } => format!(
                "within({}km of {},{})",
                radius_km, center.latitude, center.longitude
            ),
            EventFilter::StartsAfter(bound) => format!("starts_after({})", bound.to_rfc3339()),
            EventFilter::EndsBefore(bound) => format!("ends_before({})", bound.to_rfc3339()),
            EventFilter::OwnedBy(owner_id) => format!("owned_by({})", owner_id),
            EventFilter::TaggedWithAny(tag_ids) => format!("tagged_with_any({})", tag_ids.len()),
        }
    }
}

/// Haversine distance between two points.
pub fn great_circle_km(a: Location, b: Location) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// AND-composition of event filters. An empty composite accepts everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeEventFilter {
    filters: Vec<EventFilter>,
}

impl CompositeEventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: EventFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn matches(&self, event: &Event) -> bool {
        self.filters.iter().all(|f| f.matches(event))
    }

    /// Appends ` WHERE ...` when there is anything to filter on.
    pub fn push_where(&self, query: &mut QueryBuilder<'_, Postgres>) {
        for (i, filter) in self.filters.iter().enumerate() {
            query.push(if i == 0 { " WHERE (" } else { " AND (" });
            filter.push_condition(query);
            query.push(")");
        }
    }

    pub fn description(&self) -> String {
        if self.filters.is_empty() {
            "composite(empty)".to_string()
        } else {
            let descriptions: Vec<String> = self.filters.iter().map(|f| f.description()).collect();
            format!("composite({})", descriptions.join(" AND "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn event_at(location: Location) -> Event {
        Event {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Meetup".to_string(),
            description: None,
            location,
            start_date: Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
            end_date: None,
            tag_ids: Vec::new(),
            likes: 0,
            dislikes: 0,
        }
    }

    fn sample() -> Event {
        event_at(Location::new(56.8389, 60.6057))
    }

    #[test]
    fn test_great_circle_distance() {
        // Yekaterinburg to Moscow is roughly 1420 km
        let ekb = Location::new(56.8389, 60.6057);
        let msk = Location::new(55.7558, 37.6173);
        let d = great_circle_km(ekb, msk);
        assert!((1400.0..1440.0).contains(&d), "distance was {d}");
        assert_eq!(great_circle_km(ekb, ekb), 0.0);
    }

    #[test]
    fn test_within_radius() {
        let event = sample();
        let nearby = EventFilter::WithinRadius {
            center: Location::new(56.85, 60.60),
            radius_km: 5.0,
        };
        let far = EventFilter::WithinRadius {
            center: Location::new(55.7558, 37.6173),
            radius_km: 100.0,
        };
        assert!(nearby.matches(&event));
        assert!(!far.matches(&event));
    }

    #[test]
    fn test_start_date_bound_is_inclusive() {
        let event = sample();
        assert!(EventFilter::StartsAfter(event.start_date).matches(&event));
        assert!(!EventFilter::StartsAfter(event.start_date + Duration::minutes(1)).matches(&event));
    }

    #[test]
    fn test_end_date_uses_start_when_unset() {
        let mut event = sample();
        let before_start = event.start_date - Duration::hours(1);
        assert!(!EventFilter::EndsBefore(before_start).matches(&event));
        assert!(EventFilter::EndsBefore(event.start_date).matches(&event));

        event.end_date = Some(event.start_date + Duration::hours(3));
        assert!(!EventFilter::EndsBefore(event.start_date + Duration::hours(2)).matches(&event));
        assert!(EventFilter::EndsBefore(event.start_date + Duration::hours(3)).matches(&event));
    }

    #[test]
    fn test_tags_match_on_intersection() {
        let (t1, t2, t3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut event = sample();
        event.tag_ids = vec![t2];

        assert!(EventFilter::TaggedWithAny(vec![t1, t2]).matches(&event));
        assert!(!EventFilter::TaggedWithAny(vec![t1, t3]).matches(&event));

        event.tag_ids.clear();
        assert!(!EventFilter::TaggedWithAny(vec![t1]).matches(&event));
    }

    #[test]
    fn test_empty_composite_matches_everything() {
        let composite = CompositeEventFilter::new();
        assert!(composite.is_empty());
        assert!(composite.matches(&sample()));
        assert_eq!(composite.description(), "composite(empty)");
    }

    #[test]
    fn test_composite_requires_all() {
        let event = sample();
        let composite = CompositeEventFilter::new()
            .with_filter(EventFilter::OwnedBy(event.owner_id))
            .with_filter(EventFilter::StartsAfter(event.start_date + Duration::days(1)));
        assert_eq!(composite.len(), 2);
        assert!(!composite.matches(&event));
    }

    #[test]
    fn test_push_where_renders_conditions() {
        let owner = Uuid::new_v4();
        let composite = CompositeEventFilter::new()
            .with_filter(EventFilter::OwnedBy(owner))
            .with_filter(EventFilter::TaggedWithAny(vec![Uuid::new_v4()]));

        let mut query = QueryBuilder::<Postgres>::new("SELECT e.id FROM events e");
        composite.push_where(&mut query);
        assert_eq!(
            query.sql(),
            "SELECT e.id FROM events e WHERE (e.owner_id = $1) AND (EXISTS (SELECT 1 FROM \
             event_tags et WHERE et.event_id = e.id AND et.tag_id = ANY($2)))"
        );
    }

    fn bind_count(sql: &str) -> usize {
        sql.matches('$').count()
    }

    #[test]
    fn test_push_where_renders_haversine_distance() {
        let event = sample();
        let filter = EventFilter::WithinRadius {
            center: Location::new(56.85, 60.60),
            radius_km: 5.0,
        };
        assert!(filter.matches(&event));

        let mut query = QueryBuilder::<Postgres>::new("SELECT e.id FROM events e");
        CompositeEventFilter::new().with_filter(filter).push_where(&mut query);
        assert_eq!(
            query.sql(),
            "SELECT e.id FROM events e WHERE ((2 * $1 * ASIN(LEAST(1.0, SQRT(\
             POWER(SIN(RADIANS(e.latitude - $2) / 2), 2) + \
             COS(RADIANS($3)) * COS(RADIANS(e.latitude)) * \
             POWER(SIN(RADIANS(e.longitude - $4) / 2), 2))))) <= $5)"
        );
        assert_eq!(bind_count(query.sql()), 5);
    }

    #[test]
    fn test_push_where_renders_start_bound() {
        let event = sample();
        let filter = EventFilter::StartsAfter(event.start_date);
        assert!(filter.matches(&event));

        let mut query = QueryBuilder::<Postgres>::new("SELECT e.id FROM events e");
        CompositeEventFilter::new().with_filter(filter).push_where(&mut query);
        assert_eq!(
            query.sql(),
            "SELECT e.id FROM events e WHERE (e.start_date >= $1)"
        );
        assert_eq!(bind_count(query.sql()), 1);
    }

    #[test]
    fn test_haversine_sql_parentheses_balance() {
        let mut query = QueryBuilder::<Postgres>::new("");
        EventFilter::WithinRadius {
            center: Location::new(0.0, 0.0),
            radius_km: 1.0,
        }
        .push_condition(&mut query);
        let sql = query.sql();
        assert_eq!(sql.matches('(').count(), sql.matches(')').count());
    }

    #[test]
    fn test_push_where_is_noop_when_empty() {
        let mut query = QueryBuilder::<Postgres>::new("SELECT e.id FROM events e");
        CompositeEventFilter::new().push_where(&mut query);
        assert_eq!(query.sql(), "SELECT e.id FROM events e");
    }
}
