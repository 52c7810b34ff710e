use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Location;

/// Centre point plus search radius in kilometres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationCriteria {
    pub center: Location,
    pub radius_km: f64,
}

/// Validated filter for one events query. Every absent field leaves its
/// dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub location: Option<LocationCriteria>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub owner_id: Option<Uuid>,
    pub tag_ids: BTreeSet<Uuid>,
}
