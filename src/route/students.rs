use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde::Deserialize;

use crate::data::user::db::{problem as user_problem, UserSignupData};
use crate::data::user::User;
use crate::data::Store;
use crate::resp::jwt::{auth_problem, SessionToken};
use crate::resp::problem::Problem;
use crate::role::Role;
use crate::route::ClassFilter;

/// Signup payload narrowed the way the student endpoint expects it:
/// the role is implied and a class is mandatory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreateData {
    pub name: String,
    pub email: String,
    pub class_id: i64,
}

impl StudentCreateData {
    pub fn validate(&self) -> Result<(), Problem> {
        if self.class_id < 1 {
            return Err(user_problem::bad_class_id(self.class_id));
        }
        Ok(())
    }
}

impl From<StudentCreateData> for UserSignupData {
    fn from(data: StudentCreateData) -> Self {
        UserSignupData {
            name: data.name,
            email: data.email,
            role: Role::Student,
            class_id: Some(data.class_id),
        }
    }
}

#[get("/students?<filter..>")]
#[tracing::instrument(skip(store))]
pub fn student_list(filter: ClassFilter, store: &State<Store>) -> Json<Vec<User>> {
    Json(store.students(filter.class_id))
}

#[post("/students", format = "application/json", data = "<student>")]
#[tracing::instrument(skip(store))]
pub fn student_create(
    student: Json<StudentCreateData>,
    auth: SessionToken,
    store: &State<Store>,
) -> Result<Json<User>, Problem> {
    if auth.role < Role::Teacher {
        return Err(auth_problem("Only teachers can enroll students."));
    }
    student.validate()?;

    let signup = UserSignupData::from(student.into_inner());
    signup.validate()?;

    Ok(Json(store.create_user(signup)))
}

/// Idempotent; the student's attendance history is left in place.
#[delete("/students/<id>")]
#[tracing::instrument(skip(store))]
pub fn student_delete(
    id: i64,
    auth: SessionToken,
    store: &State<Store>,
) -> Result<Status, Problem> {
    if auth.role < Role::Teacher {
        return Err(auth_problem("Only teachers can remove students."));
    }

    store.delete_user(id);
    Ok(Status::NoContent)
}
