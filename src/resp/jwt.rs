use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::{Cookie, CookieJar, Status};
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};
use rocket::time::OffsetDateTime;
use serde::{Deserialize, Serialize};

use super::util::date_time_as_unix_seconds;
use crate::config::Config;
use crate::data::user::User;
use crate::resp::problem::Problem;
use crate::role::Role;

pub static AUTH_COOKIE_NAME: &str = "rollmate_session";

/// Claims carried by the session cookie: who is logged in and as what role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    #[serde(with = "date_time_as_unix_seconds")]
    iat: DateTime<Utc>,
    #[serde(with = "date_time_as_unix_seconds")]
    exp: DateTime<Utc>,
    pub user: i64,
    pub role: Role,
}

impl SessionToken {
    pub fn new(user: &User) -> SessionToken {
        let now = Utc::now();
        SessionToken {
            iat: now,
            exp: now + Duration::weeks(1),
            user: user.id,
            role: user.role,
        }
    }

    pub fn encode_jwt(
        &self,
        secret: impl AsRef<[u8]>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(secret.as_ref());

        encode(&header, &self, &key)
    }

    pub fn cookie(
        &self,
        secret: impl AsRef<[u8]>,
    ) -> Result<Cookie<'static>, jsonwebtoken::errors::Error> {
        Ok(Cookie::build((AUTH_COOKIE_NAME, self.encode_jwt(secret)?))
            .expires(OffsetDateTime::from_unix_timestamp(self.exp.timestamp()).ok())
            .path("/")
            .http_only(true)
            .build())
    }
}

pub fn auth_problem(detail: impl ToString) -> Problem {
    Problem::new_untyped(Status::Unauthorized, "Unable to authorize user.")
        .detail(detail)
        .clone()
}

pub fn extract_claims(
    cookies: &CookieJar,
    secret: impl AsRef<[u8]>,
) -> Result<SessionToken, Problem> {
    let auth_cookie = cookies.get(AUTH_COOKIE_NAME);
    let token = match auth_cookie {
        Some(jwt) => jwt.value().to_owned(),
        None => {
            return Err(auth_problem("No session cookie."));
        }
    };
    tracing::debug!("extracted session token from cookie");

    match decode::<SessionToken>(
        &token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    {
        Ok(it) => {
            tracing::debug!("decoded session token for user: {}", it.user);

            Ok(it)
        }
        Err(_) => Err(auth_problem("Session cookie was malformed.")),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionToken {
    type Error = Problem;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let config: &Config = req.rocket().state().expect("Config is managed state");

        tracing::trace!("extracting session token from request cookies");
        let claims = match extract_claims(req.cookies(), config.session_secret.as_bytes()) {
            Ok(it) => it,
            Err(e) => {
                tracing::debug!("unable to extract claims from cookies");
                return Outcome::Error((Status::Unauthorized, e));
            }
        };

        Outcome::Success(claims)
    }
}

pub trait HasAuthCookie {
    fn get_auth_cookie(&self, secret: impl AsRef<[u8]>) -> Option<SessionToken>;
}

#[cfg(test)]
impl HasAuthCookie for rocket::local::asynchronous::LocalResponse<'_> {
    fn get_auth_cookie(&self, secret: impl AsRef<[u8]>) -> Option<SessionToken> {
        extract_claims(self.cookies(), secret).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::SubsecRound;

    #[test]
    fn session_token_round_trips() {
        let mut now = Utc::now();
        now = now.round_subsecs(0);

        let token = SessionToken {
            iat: now,
            exp: now + Duration::weeks(1),
            user: 42,
            role: Role::Teacher,
        };

        let secret = b"test-secret";
        let encoded = token
            .encode_jwt(secret)
            .expect("encoding should work for example");

        let decoded: SessionToken = decode(
            &encoded,
            &DecodingKey::from_secret(secret),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .expect("unable to decode encoded token");

        assert_eq!(now, decoded.iat);
        assert_eq!(now + Duration::weeks(1), decoded.exp);
        assert_eq!(decoded.user, 42);
        assert_eq!(decoded.role, Role::Teacher);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let user = User {
            id: 1,
            name: "ada".to_string(),
            email: "ada@example.com".to_string(),
            role: Role::Teacher,
            class_id: None,
        };

        let encoded = SessionToken::new(&user)
            .encode_jwt(b"signing-secret")
            .expect("encoding works");

        let decoded = decode::<SessionToken>(
            &encoded,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(decoded.is_err());
    }
}
