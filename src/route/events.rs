use rocket::serde::json::Json;
use rocket::State;

use crate::data::event::db::EventCreateData;
use crate::data::event::Event;
use crate::data::Store;
use crate::resp::jwt::{auth_problem, SessionToken};
use crate::resp::problem::Problem;
use crate::role::Role;
use crate::route::ClassFilter;

#[get("/events?<filter..>")]
#[tracing::instrument(skip(store))]
pub fn event_list(filter: ClassFilter, store: &State<Store>) -> Json<Vec<Event>> {
    Json(store.events(filter.class_id))
}

#[post("/events", format = "application/json", data = "<event>")]
#[tracing::instrument(skip(store))]
pub fn event_create(
    event: Json<EventCreateData>,
    auth: SessionToken,
    store: &State<Store>,
) -> Result<Json<Event>, Problem> {
    if auth.role < Role::Teacher {
        return Err(auth_problem("Only teachers can create events."));
    }

    Ok(Json(store.create_event(event.into_inner())))
}
