use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod db;

use crate::data::class::GeoPoint;

/// The enum schema; an older variant of the app stored a bare `present`
/// boolean instead, which is not supported here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    LeftEarly,
}

/// One marking of one student for one calendar day.
///
/// Intended to be unique per (student, class, day), but the store does not
/// enforce that: repeated creates for the same slot yield separate records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    /// Where the student was when the record was taken, if the client sent it.
    pub location: Option<GeoPoint>,
}
