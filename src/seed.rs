use chrono::{NaiveTime, Utc};

use crate::data::attendance::db::AttendanceCreateData;
use crate::data::attendance::AttendanceStatus;
use crate::data::class::db::ClassCreateData;
use crate::data::class::{GeoPoint, Geofence, ScheduleSlot, Weekday};
use crate::data::user::db::UserSignupData;
use crate::data::Store;
use crate::role::Role;

fn slot(day: Weekday, start: (u32, u32), end: (u32, u32)) -> ScheduleSlot {
    ScheduleSlot {
        day,
        start: NaiveTime::from_hms_opt(start.0, start.1, 0).expect("valid start time"),
        end: NaiveTime::from_hms_opt(end.0, end.1, 0).expect("valid end time"),
    }
}

/// Demo data the frontend flows expect: one teacher, their homeroom class
/// with a campus geofence, a few students, and today's markings.
pub fn demo_data(store: &Store) {
    let teacher = store.create_user(UserSignupData {
        name: "Dana Whitfield".to_string(),
        email: "dana.whitfield@rollmate.edu".to_string(),
        role: Role::Teacher,
        class_id: None,
    });

    let class = store.create_class(
        ClassCreateData {
            name: "10A".to_string(),
            description: Some("Homeroom".to_string()),
            schedule: vec![
                slot(Weekday::Monday, (9, 0), (10, 30)),
                slot(Weekday::Wednesday, (9, 0), (10, 30)),
                slot(Weekday::Friday, (13, 0), (14, 30)),
            ],
            geofence: Some(Geofence::Circle {
                center: GeoPoint {
                    lat: 46.4917,
                    lng: -84.3205,
                },
                radius: 500.0,
            }),
        },
        teacher.id,
    );

    let students = ["Ben Okafor", "Cho Park", "Ida Lindqvist"];
    for (i, name) in students.iter().enumerate() {
        let student = store.create_user(UserSignupData {
            name: name.to_string(),
            email: format!("student{}@rollmate.edu", i + 1),
            role: Role::Student,
            class_id: Some(class.id),
        });

        store.create_attendance(AttendanceCreateData {
            student_id: student.id,
            class_id: class.id,
            date: Utc::now(),
            status: AttendanceStatus::Present,
            note: None,
            location: None,
        });
    }

    tracing::info!(
        class = class.id,
        teacher = teacher.id,
        students = students.len(),
        "seeded demo data"
    );
}
