use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: Location,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub dislikes: i64,
}

impl Event {
    /// The moment the event is over: its end date, or its start date when no
    /// end date was set.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.end_date.unwrap_or(self.start_date)
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.effective_end() < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn event(end_date: Option<DateTime<Utc>>) -> Event {
        Event {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Open air".to_string(),
            description: None,
            location: Location::new(56.84, 60.61),
            start_date: Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap(),
            end_date,
            tag_ids: Vec::new(),
            likes: 0,
            dislikes: 0,
        }
    }

    #[test]
    fn test_effective_end_falls_back_to_start() {
        let e = event(None);
        assert_eq!(e.effective_end(), e.start_date);

        let end = Utc.with_ymd_and_hms(2024, 6, 2, 2, 0, 0).unwrap();
        assert_eq!(event(Some(end)).effective_end(), end);
    }

    #[test]
    fn test_has_ended() {
        let e = event(None);
        assert!(e.has_ended(e.start_date + Duration::seconds(1)));
        assert!(!e.has_ended(e.start_date));
    }
}
