use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

pub mod db;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    #[serde(default)]
    pub schedule: Vec<ScheduleSlot>,
    /// Boundary drawn by the teacher on the map widget. Stored opaquely;
    /// the server never evaluates containment.
    pub geofence: Option<Geofence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Geometry reported by the map widgets, as a tagged union instead of the
/// free-form payloads the clients historically sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geofence {
    /// Closed ring: at least four points, first equal to last.
    Polygon { coordinates: Vec<GeoPoint> },
    /// Center plus radius in meters.
    Circle { center: GeoPoint, radius: f64 },
}
