use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Attendance, AttendanceStatus};
use crate::data::class::GeoPoint;
use crate::data::Store;
use crate::util::local_day;

pub mod problem {
    use crate::resp::problem::Problem;
    use rocket::http::Status;

    #[inline]
    pub fn not_found(id: i64) -> Problem {
        Problem::new_untyped(Status::NotFound, "Attendance record doesn't exist.")
            .insert("id", id)
            .clone()
    }

    #[inline]
    pub fn missing_query() -> Problem {
        Problem::new_untyped(Status::BadRequest, "Missing classId or date.")
    }

    #[inline]
    pub fn bad_date(value: impl ToString) -> Problem {
        Problem::new_untyped(Status::BadRequest, "Unparseable date.")
            .insert_str("date", value)
            .to_owned()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCreateData {
    pub student_id: i64,
    pub class_id: i64,
    pub date: DateTime<Utc>,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub location: Option<GeoPoint>,
}

/// Partial update; omitted fields fall back to the stored value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdateData {
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<AttendanceStatus>,
    pub note: Option<String>,
    pub location: Option<GeoPoint>,
}

impl Store {
    /// Stores a record unconditionally. There is no uniqueness check, so two
    /// creates for the same (student, class, day) produce two records.
    pub fn create_attendance(&self, data: AttendanceCreateData) -> Attendance {
        let mut records = self
            .attendance
            .write()
            .expect("attendance table lock poisoned");
        records.insert_with(|id| Attendance {
            id,
            student_id: data.student_id,
            class_id: data.class_id,
            date: data.date,
            status: data.status,
            note: data.note,
            location: data.location,
        })
    }

    /// Last-write-wins shallow merge into an existing record. `None` when
    /// the id is unknown.
    pub fn update_attendance(&self, id: i64, data: AttendanceUpdateData) -> Option<Attendance> {
        let mut records = self
            .attendance
            .write()
            .expect("attendance table lock poisoned");
        let record = records.get_mut(id)?;

        if let Some(student_id) = data.student_id {
            record.student_id = student_id;
        }
        if let Some(class_id) = data.class_id {
            record.class_id = class_id;
        }
        if let Some(date) = data.date {
            record.date = date;
        }
        if let Some(status) = data.status {
            record.status = status;
        }
        if let Some(note) = data.note {
            record.note = Some(note);
        }
        if let Some(location) = data.location {
            record.location = Some(location);
        }

        Some(record.clone())
    }

    /// Records for a class whose date falls on the same local calendar day
    /// as `date`, whatever their time-of-day.
    pub fn attendance_for_class(&self, class_id: i64, date: DateTime<Utc>) -> Vec<Attendance> {
        let day = local_day(date);
        let records = self
            .attendance
            .read()
            .expect("attendance table lock poisoned");
        records
            .values()
            .filter(|a| a.class_id == class_id && local_day(a.date) == day)
            .cloned()
            .collect()
    }

    /// All records for a student, newest date first.
    pub fn attendance_for_student(&self, student_id: i64) -> Vec<Attendance> {
        let records = self
            .attendance
            .read()
            .expect("attendance table lock poisoned");
        let mut found: Vec<Attendance> = records
            .values()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        found
    }
}
