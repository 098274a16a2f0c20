use rocket::http::{Cookie, CookieJar, Status};
use rocket::serde::json::Json;
use rocket::State;

use crate::config::Config;
use crate::data::user::db::problem as user_problem;
use crate::data::user::db::{UserLoginData, UserSignupData};
use crate::data::user::User;
use crate::data::Store;
use crate::resp::jwt::{SessionToken, AUTH_COOKIE_NAME};
use crate::resp::problem::Problem;

#[get("/auth/me")]
#[tracing::instrument(skip(store))]
pub fn auth_me(auth: SessionToken, store: &State<Store>) -> Result<Json<User>, Problem> {
    store
        .user(auth.user)
        .map(Json)
        .ok_or_else(|| user_problem::not_found(auth.user))
}

/// Looks the user up by email and opens a session. Later variants of the app
/// dropped password checks entirely; knowing a registered email is enough.
#[post("/auth/login", format = "application/json", data = "<credentials>")]
#[tracing::instrument(skip(store, cookies, config))]
pub fn login<'a>(
    credentials: Json<UserLoginData>,
    cookies: &'a CookieJar<'_>,
    store: &State<Store>,
    config: &State<Config>,
) -> Result<Json<User>, Problem> {
    let user = store
        .user_by_email(&credentials.email)
        .ok_or_else(user_problem::bad_login)?;

    let token = SessionToken::new(&user);
    cookies.add(token.cookie(config.session_secret.as_bytes())?);

    Ok(Json(user))
}

#[post("/auth/logout")]
#[tracing::instrument(skip(cookies))]
pub fn logout(cookies: &CookieJar<'_>) -> Status {
    cookies.remove(Cookie::build(AUTH_COOKIE_NAME).path("/"));
    Status::NoContent
}

#[post("/auth/signup", format = "application/json", data = "<signup_user>")]
#[tracing::instrument(skip(store, cookies, config))]
pub fn signup<'a>(
    signup_user: Json<UserSignupData>,
    cookies: &'a CookieJar<'_>,
    store: &State<Store>,
    config: &State<Config>,
) -> Result<Json<User>, Problem> {
    signup_user.validate()?;

    let user = store.create_user(signup_user.into_inner());

    let token = SessionToken::new(&user);
    cookies.add(token.cookie(config.session_secret.as_bytes())?);

    Ok(Json(user))
}
