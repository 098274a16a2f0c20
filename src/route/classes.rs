use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;

use crate::data::class::db::{problem, ClassCreateData, ClassUpdateData};
use crate::data::class::Class;
use crate::data::Store;
use crate::resp::jwt::{auth_problem, SessionToken};
use crate::resp::problem::Problem;
use crate::role::Role;

#[get("/classes")]
#[tracing::instrument(skip(store))]
pub fn class_list(store: &State<Store>) -> Json<Vec<Class>> {
    Json(store.classes())
}

#[get("/classes/<id>")]
#[tracing::instrument(skip(store))]
pub fn class_get(id: i64, store: &State<Store>) -> Result<Json<Class>, Problem> {
    store
        .class(id)
        .map(Json)
        .ok_or_else(|| problem::not_found(id))
}

/// The created class is owned by the calling teacher.
#[post("/classes", format = "application/json", data = "<class>")]
#[tracing::instrument(skip(store))]
pub fn class_create(
    class: Json<ClassCreateData>,
    auth: SessionToken,
    store: &State<Store>,
) -> Result<Json<Class>, Problem> {
    if auth.role < Role::Teacher {
        return Err(auth_problem("Only teachers can create classes."));
    }
    class.validate()?;

    Ok(Json(store.create_class(class.into_inner(), auth.user)))
}

#[patch("/classes/<id>", format = "application/json", data = "<class>")]
#[tracing::instrument(skip(store))]
pub fn class_update(
    id: i64,
    class: Json<ClassUpdateData>,
    auth: SessionToken,
    store: &State<Store>,
) -> Result<Json<Class>, Problem> {
    if auth.role < Role::Teacher {
        return Err(auth_problem("Only teachers can update classes."));
    }
    class.validate()?;

    store
        .update_class(id, class.into_inner())
        .map(Json)
        .ok_or_else(|| problem::not_found(id))
}

/// Idempotent; enrolled students and attendance rows are left dangling.
#[delete("/classes/<id>")]
#[tracing::instrument(skip(store))]
pub fn class_delete(id: i64, auth: SessionToken, store: &State<Store>) -> Result<Status, Problem> {
    if auth.role < Role::Teacher {
        return Err(auth_problem("Only teachers can delete classes."));
    }

    store.delete_class(id);
    Ok(Status::NoContent)
}
