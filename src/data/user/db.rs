use serde::Deserialize;

use super::User;
use crate::data::Store;
use crate::resp::problem::Problem;
use crate::role::Role;

pub mod problem {
    use crate::resp::problem::Problem;
    use rocket::http::Status;

    #[inline]
    pub fn bad_email(email: impl ToString, detail: impl ToString) -> Problem {
        Problem::new_untyped(Status::BadRequest, "Bad email.")
            .insert_str("email", email)
            .detail(detail)
            .to_owned()
    }

    #[inline]
    pub fn bad_name(detail: impl ToString) -> Problem {
        Problem::new_untyped(Status::BadRequest, "Bad name.")
            .detail(detail)
            .to_owned()
    }

    #[inline]
    pub fn bad_class_id(id: i64) -> Problem {
        Problem::new_untyped(Status::BadRequest, "Bad class id.")
            .insert("classId", id)
            .clone()
    }

    #[inline]
    pub fn not_found(id: i64) -> Problem {
        Problem::new_untyped(Status::NotFound, "User doesn't exist.")
            .insert("id", id)
            .clone()
    }

    #[inline]
    pub fn bad_login() -> Problem {
        Problem::new_untyped(Status::Unauthorized, "Invalid credentials.")
    }

    #[inline]
    pub fn no_class_assigned() -> Problem {
        Problem::new_untyped(Status::BadRequest, "No class assigned.")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSignupData {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub class_id: Option<i64>,
}

impl UserSignupData {
    pub fn validate(&self) -> Result<(), Problem> {
        if !self.email.contains('@') {
            return Err(problem::bad_email(
                &self.email,
                "Not a valid e-mail address.",
            ));
        }

        if self.name.trim().is_empty() {
            return Err(problem::bad_name("Name can't be empty."));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserLoginData {
    pub email: String,
}

impl Store {
    pub fn create_user(&self, data: UserSignupData) -> User {
        let mut users = self.users.write().expect("user table lock poisoned");
        users.insert_with(|id| User {
            id,
            name: data.name,
            email: data.email,
            role: data.role,
            class_id: data.class_id,
        })
    }

    pub fn user(&self, id: i64) -> Option<User> {
        let users = self.users.read().expect("user table lock poisoned");
        users.get(id).cloned()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.read().expect("user table lock poisoned");
        users.values().find(|u| u.email == email).cloned()
    }

    /// Users with the student role, optionally narrowed to one class.
    pub fn students(&self, class_id: Option<i64>) -> Vec<User> {
        let users = self.users.read().expect("user table lock poisoned");
        users
            .values()
            .filter(|u| u.role == Role::Student)
            .filter(|u| class_id.is_none() || u.class_id == class_id)
            .cloned()
            .collect()
    }

    /// Removes a user; their attendance records are left in place.
    pub fn delete_user(&self, id: i64) -> bool {
        let mut users = self.users.write().expect("user table lock poisoned");
        users.remove(id).is_some()
    }
}
