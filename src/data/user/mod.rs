use serde::{Deserialize, Serialize};

pub mod db;

use crate::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Class the user belongs to; always `None` for teachers.
    pub class_id: Option<i64>,
}
