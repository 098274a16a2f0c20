use serde::Deserialize;

use super::{Class, Geofence, ScheduleSlot};
use crate::data::Store;
use crate::resp::problem::Problem;

pub mod problem {
    use crate::resp::problem::Problem;
    use rocket::http::Status;

    #[inline]
    pub fn not_found(id: i64) -> Problem {
        Problem::new_untyped(Status::NotFound, "Class doesn't exist.")
            .insert("id", id)
            .clone()
    }

    #[inline]
    pub fn bad_geofence(detail: impl ToString) -> Problem {
        Problem::new_untyped(Status::BadRequest, "Malformed geofence.")
            .detail(detail)
            .to_owned()
    }
}

fn check_geofence(geofence: &Geofence) -> Result<(), Problem> {
    match geofence {
        Geofence::Polygon { coordinates } => {
            if coordinates.len() < 4 {
                return Err(problem::bad_geofence(
                    "A polygon ring needs at least 4 points.",
                ));
            }
            if coordinates.first() != coordinates.last() {
                return Err(problem::bad_geofence(
                    "A polygon ring must end on its first point.",
                ));
            }
        }
        Geofence::Circle { radius, .. } => {
            if !radius.is_finite() || *radius <= 0.0 {
                return Err(problem::bad_geofence("Circle radius must be positive."));
            }
        }
    }

    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassCreateData {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub schedule: Vec<ScheduleSlot>,
    pub geofence: Option<Geofence>,
}

impl ClassCreateData {
    pub fn validate(&self) -> Result<(), Problem> {
        if let Some(geofence) = &self.geofence {
            check_geofence(geofence)?;
        }
        Ok(())
    }
}

/// Partial update; omitted fields keep their stored value, so a field can't
/// be cleared once set. Teachers mostly send just the geofence.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassUpdateData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub teacher_id: Option<i64>,
    pub schedule: Option<Vec<ScheduleSlot>>,
    pub geofence: Option<Geofence>,
}

impl ClassUpdateData {
    pub fn validate(&self) -> Result<(), Problem> {
        if let Some(geofence) = &self.geofence {
            check_geofence(geofence)?;
        }
        Ok(())
    }
}

impl Store {
    pub fn create_class(&self, data: ClassCreateData, teacher_id: i64) -> Class {
        let mut classes = self.classes.write().expect("class table lock poisoned");
        classes.insert_with(|id| Class {
            id,
            name: data.name,
            description: data.description,
            teacher_id,
            schedule: data.schedule,
            geofence: data.geofence,
        })
    }

    pub fn class(&self, id: i64) -> Option<Class> {
        let classes = self.classes.read().expect("class table lock poisoned");
        classes.get(id).cloned()
    }

    pub fn classes(&self) -> Vec<Class> {
        let classes = self.classes.read().expect("class table lock poisoned");
        classes.values().cloned().collect()
    }

    pub fn update_class(&self, id: i64, data: ClassUpdateData) -> Option<Class> {
        let mut classes = self.classes.write().expect("class table lock poisoned");
        let class = classes.get_mut(id)?;

        if let Some(name) = data.name {
            class.name = name;
        }
        if let Some(description) = data.description {
            class.description = Some(description);
        }
        if let Some(teacher_id) = data.teacher_id {
            class.teacher_id = teacher_id;
        }
        if let Some(schedule) = data.schedule {
            class.schedule = schedule;
        }
        if let Some(geofence) = data.geofence {
            class.geofence = Some(geofence);
        }

        Some(class.clone())
    }

    /// Removes a class. Enrolled users keep their classId and attendance
    /// rows keep pointing at the removed class.
    pub fn delete_class(&self, id: i64) -> bool {
        let mut classes = self.classes.write().expect("class table lock poisoned");
        classes.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::attendance::db::AttendanceCreateData;
    use crate::data::attendance::AttendanceStatus;
    use crate::data::class::GeoPoint;
    use crate::data::user::db::UserSignupData;
    use crate::role::Role;
    use chrono::Utc;

    fn bare_class(name: &str) -> ClassCreateData {
        ClassCreateData {
            name: name.to_string(),
            description: None,
            schedule: vec![],
            geofence: None,
        }
    }

    fn campus_circle() -> Geofence {
        Geofence::Circle {
            center: GeoPoint {
                lat: 46.4917,
                lng: -84.3205,
            },
            radius: 500.0,
        }
    }

    #[test]
    fn first_class_gets_id_one_with_null_description() {
        let store = Store::new();

        let created = store.create_class(bare_class("10A"), 7);

        assert_eq!(created.id, 1);
        assert_eq!(created.name, "10A");
        assert_eq!(created.description, None);
        assert_eq!(created.teacher_id, 7);
        assert!(created.schedule.is_empty());
        assert!(created.geofence.is_none());
    }

    #[test]
    fn update_merges_shallowly_and_keeps_omitted_fields() {
        let store = Store::new();
        let created = store.create_class(
            ClassCreateData {
                description: Some("Homeroom".to_string()),
                ..bare_class("10A")
            },
            7,
        );

        let updated = store
            .update_class(
                created.id,
                ClassUpdateData {
                    name: None,
                    description: None,
                    teacher_id: None,
                    schedule: None,
                    geofence: Some(campus_circle()),
                },
            )
            .expect("class exists");

        assert_eq!(updated.name, "10A");
        assert_eq!(updated.description.as_deref(), Some("Homeroom"));
        assert_eq!(updated.geofence, Some(campus_circle()));
    }

    #[test]
    fn update_of_missing_class_reports_not_found() {
        let store = Store::new();
        let result = store.update_class(
            42,
            ClassUpdateData {
                name: Some("11B".to_string()),
                description: None,
                teacher_id: None,
                schedule: None,
                geofence: None,
            },
        );
        assert!(result.is_none());
    }

    #[test]
    fn deleting_a_class_leaves_students_and_attendance_dangling() {
        let store = Store::new();
        let class = store.create_class(bare_class("10A"), 1);
        let student = store.create_user(UserSignupData {
            name: "ben".to_string(),
            email: "ben@example.com".to_string(),
            role: Role::Student,
            class_id: Some(class.id),
        });
        let record = store.create_attendance(AttendanceCreateData {
            student_id: student.id,
            class_id: class.id,
            date: Utc::now(),
            status: AttendanceStatus::Present,
            note: None,
            location: None,
        });

        assert!(store.delete_class(class.id));
        assert!(store.class(class.id).is_none());

        // No cascade: the foreign keys now dangle.
        let student = store.user(student.id).expect("student still exists");
        assert_eq!(student.class_id, Some(class.id));
        let records = store.attendance_for_student(student.id);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, record.id);
        assert_eq!(records[0].class_id, class.id);
    }

    #[test]
    fn geofence_validation_accepts_closed_rings_only() {
        let ring = |points: Vec<(f64, f64)>| Geofence::Polygon {
            coordinates: points
                .into_iter()
                .map(|(lat, lng)| GeoPoint { lat, lng })
                .collect(),
        };

        let closed = ClassCreateData {
            geofence: Some(ring(vec![
                (0.0, 0.0),
                (0.0, 1.0),
                (1.0, 1.0),
                (0.0, 0.0),
            ])),
            ..bare_class("10A")
        };
        assert!(closed.validate().is_ok());

        let open = ClassCreateData {
            geofence: Some(ring(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])),
            ..bare_class("10A")
        };
        assert!(open.validate().is_err());

        let short = ClassCreateData {
            geofence: Some(ring(vec![(0.0, 0.0), (0.0, 1.0), (0.0, 0.0)])),
            ..bare_class("10A")
        };
        assert!(short.validate().is_err());

        let negative = ClassCreateData {
            geofence: Some(Geofence::Circle {
                center: GeoPoint { lat: 0.0, lng: 0.0 },
                radius: -5.0,
            }),
            ..bare_class("10A")
        };
        assert!(negative.validate().is_err());
    }
}
