use rocket::{Build, Rocket, Route};

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod events;
pub mod students;

use attendance::*;
use auth::*;
use classes::*;
use events::*;
use students::*;

/// Optional `?classId=` filter shared by the list endpoints.
#[derive(Debug, Clone, Copy, FromForm)]
pub struct ClassFilter {
    #[field(name = "classId")]
    pub class_id: Option<i64>,
}

pub fn api() -> Vec<Route> {
    routes![
        auth_me,
        login,
        logout,
        signup,
        class_list,
        class_get,
        class_create,
        class_update,
        class_delete,
        event_list,
        event_create,
        student_list,
        student_create,
        student_delete,
        attendance_query,
        attendance_my,
        attendance_create,
        attendance_update
    ]
}

pub fn mount_api(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket.mount("/api", api())
}
