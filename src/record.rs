//! Service request records.
//!
//! A record arrives fully formed from the intake workflow: the identifier is
//! assigned once and the priority is already computed from the category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Lifecycle status of a service request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// A geocoded position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// The geocoder reports a failed lookup as (0, 0).
    pub fn is_known(&self) -> bool {
        self.lat != 0.0 || self.lon != 0.0
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn haversine_km(&self, other: &GeoPoint) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// A submitted municipal service request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    id: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Free-text location as entered by the resident.
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<GeoPoint>,
    pub priority: i32,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub status: RequestStatus,
}

impl RequestRecord {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        priority: i32,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            description: String::new(),
            location: String::new(),
            coordinates: None,
            priority,
            submitted_at,
            status: RequestStatus::Pending,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lon: f64) -> Self {
        self.coordinates = Some(GeoPoint::new(lat, lon));
        self
    }

    pub fn with_status(mut self, status: RequestStatus) -> Self {
        self.status = status;
        self
    }

    /// The identifier. There is no setter: identifiers never change.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Coordinates usable for the proximity check, if the lookup succeeded.
    pub fn known_coordinates(&self) -> Option<GeoPoint> {
        self.coordinates.filter(GeoPoint::is_known)
    }

    /// Reject records that must never reach the index or graph.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.id.trim().is_empty() {
            return Err(EngineError::InvalidArgument("request identifier is empty".into()));
        }
        if let Some(point) = self.coordinates {
            if !point.lat.is_finite() || !point.lon.is_finite() {
                return Err(EngineError::InvalidArgument(format!(
                    "request {} has non-finite coordinates",
                    self.id
                )));
            }
            if !(-90.0..=90.0).contains(&point.lat) || !(-180.0..=180.0).contains(&point.lon) {
                return Err(EngineError::InvalidArgument(format!(
                    "request {} coordinates out of range: ({}, {})",
                    self.id, point.lat, point.lon
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_haversine_known_distance() {
        // Cape Town city hall to the V&A waterfront, roughly 2.2 km.
        let a = GeoPoint::new(-33.9253, 18.4239);
        let b = GeoPoint::new(-33.9036, 18.4207);
        let d = a.haversine_km(&b);
        assert!(d > 2.0 && d < 2.6, "unexpected distance {d}");
        assert!(a.haversine_km(&a).abs() < 1e-9);
    }

    #[test]
    fn test_zero_coordinates_are_unknown() {
        let record = RequestRecord::new("R1", "Water", 3, at(8)).with_coordinates(0.0, 0.0);
        assert!(record.known_coordinates().is_none());
    }

    #[test]
    fn test_validate_rejects_blank_id() {
        let record = RequestRecord::new("   ", "Water", 3, at(8));
        assert!(matches!(record.validate(), Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_coordinates() {
        let record = RequestRecord::new("R1", "Water", 3, at(8)).with_coordinates(95.0, 18.0);
        assert!(record.validate().is_err());
        let record = RequestRecord::new("R1", "Water", 3, at(8)).with_coordinates(f64::NAN, 18.0);
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_serde_defaults_optional_fields() {
        let json = r#"{"id":"R9","category":"Roads","priority":2,"submitted_at":"2024-03-01T08:00:00Z"}"#;
        let record: RequestRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id(), "R9");
        assert_eq!(record.status, RequestStatus::Pending);
        assert!(record.coordinates.is_none());
        assert!(record.location.is_empty());
    }
}
