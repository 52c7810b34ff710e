//! One factory per filter dimension. A factory looks at the criteria and
//! returns a filter only when its field is set.

use super::criteria::FilterCriteria;
use super::predicate::EventFilter;

pub type FilterFactory = fn(&FilterCriteria) -> Option<EventFilter>;

/// Every dimension the events endpoint can filter on.
pub const DEFAULT_FACTORIES: &[FilterFactory] = &[
    location_filter,
    start_date_filter,
    end_date_filter,
    owner_filter,
    tags_filter,
];

pub fn location_filter(criteria: &FilterCriteria) -> Option<EventFilter> {
    criteria.location.map(|l| EventFilter::WithinRadius {
        center: l.center,
        radius_km: l.radius_km,
    })
}

pub fn start_date_filter(criteria: &FilterCriteria) -> Option<EventFilter> {
    criteria.start_date.map(EventFilter::StartsAfter)
}

pub fn end_date_filter(criteria: &FilterCriteria) -> Option<EventFilter> {
    criteria.end_date.map(EventFilter::EndsBefore)
}

pub fn owner_filter(criteria: &FilterCriteria) -> Option<EventFilter> {
    criteria.owner_id.map(EventFilter::OwnedBy)
}

pub fn tags_filter(criteria: &FilterCriteria) -> Option<EventFilter> {
    if criteria.tag_ids.is_empty() {
        return None;
    }
    Some(EventFilter::TaggedWithAny(
        criteria.tag_ids.iter().copied().collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::criteria::LocationCriteria;
    use crate::models::Location;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_factories_skip_absent_fields() {
        let criteria = FilterCriteria::default();
        for factory in DEFAULT_FACTORIES {
            assert_eq!(factory(&criteria), None);
        }
    }

    #[test]
    fn test_each_factory_reads_its_field() {
        let owner = Uuid::new_v4();
        let tag = Uuid::new_v4();
        let now = Utc::now();
        let criteria = FilterCriteria {
            location: Some(LocationCriteria {
                center: Location::new(1.0, 2.0),
                radius_km: 3.0,
            }),
            start_date: Some(now),
            end_date: Some(now),
            owner_id: Some(owner),
            tag_ids: [tag].into_iter().collect(),
        };

        assert_eq!(
            location_filter(&criteria),
            Some(EventFilter::WithinRadius {
                center: Location::new(1.0, 2.0),
                radius_km: 3.0
            })
        );
        assert_eq!(start_date_filter(&criteria), Some(EventFilter::StartsAfter(now)));
        assert_eq!(end_date_filter(&criteria), Some(EventFilter::EndsBefore(now)));
        assert_eq!(owner_filter(&criteria), Some(EventFilter::OwnedBy(owner)));
        assert_eq!(
            tags_filter(&criteria),
            Some(EventFilter::TaggedWithAny(vec![tag]))
        );
    }
}
