use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::criteria::{FilterCriteria, LocationCriteria};
use crate::models::Location;
use crate::utils::error::FieldErrors;

/// Filter body accepted by `POST /api/events`, as sent by clients.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEventsRequest {
    pub location: Option<Location>,
    pub radius: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<Uuid>,
}

/// Checks a filter request and turns it into [`FilterCriteria`]. All problems
/// are reported together, keyed by request field.
pub fn map_filter_request(request: &FilterEventsRequest) -> Result<FilterCriteria, FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Some(radius) = request.radius {
        if !radius.is_finite() || radius <= 0.0 {
            errors.add("radius", format!("Radius should be positive, but was {radius}"));
        }
    }

    match (request.location, request.radius) {
        (Some(_), None) => errors.add("radius", "Radius is required when location is set"),
        (None, Some(_)) => errors.add("location", "Location is required when radius is set"),
        _ => {}
    }

    if let Some(location) = request.location {
        if !(-90.0..=90.0).contains(&location.latitude) {
            errors.add("location.latitude", "Latitude should be within [-90, 90]");
        }
        if !(-180.0..=180.0).contains(&location.longitude) {
            errors.add("location.longitude", "Longitude should be within [-180, 180]");
        }
    }

    if let (Some(start), Some(end)) = (request.start_date, request.end_date) {
        if start > end {
            errors.add("endDate", "End date should not precede start date");
        }
    }

    errors.into_result()?;

    let location = match (request.location, request.radius) {
        (Some(center), Some(radius_km)) => Some(LocationCriteria { center, radius_km }),
        _ => None,
    };

    Ok(FilterCriteria {
        location,
        start_date: request.start_date,
        end_date: request.end_date,
        owner_id: request.owner_id,
        tag_ids: request.tags.iter().copied().collect::<BTreeSet<_>>(),
    })
}
