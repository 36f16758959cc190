use crate::schema::{roles, users};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use rocket::serde::{Deserialize, Serialize};

use super::deserialize_some;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = roles)]
pub struct NewRole {
    pub name: String,
    pub description: Option<String>,
    pub permissions: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = roles)]
pub struct UpdateRole {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub permissions: Option<Option<String>>,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub email: String,
    pub role_id: Option<i32>,
    pub status: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub role_id: Option<i32>,
    pub status: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = users)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<Option<i32>>,
    pub password: Option<String>,
    pub status: Option<bool>,
    pub updated_at: NaiveDateTime,
}

// Request models for API
#[derive(Deserialize, Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role_id: Option<i32>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub role_id: Option<Option<i32>>,
    pub password: Option<String>,
    pub status: Option<bool>,
}

#[derive(Deserialize, Debug)]
pub struct CreateRoleRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub permissions: Option<Option<String>>,
}

/// Cuts `password` to at most [`MAX_PASSWORD_BYTES`] without splitting a
/// UTF-8 character.
pub fn truncate_password(password: &str) -> &str {
    if password.len() <= MAX_PASSWORD_BYTES {
        return password;
    }

    let mut end = MAX_PASSWORD_BYTES;
    while !password.is_char_boundary(end) {
        end -= 1;
    }
    &password[..end]
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(truncate_password(password), bcrypt::DEFAULT_COST)
}

impl NewRole {
    pub fn new(name: String, description: Option<String>, permissions: Option<String>) -> Self {
        Self {
            name,
            description,
            permissions,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl UpdateRole {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.permissions.is_none()
    }
}

impl From<UpdateRoleRequest> for UpdateRole {
    fn from(request: UpdateRoleRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            permissions: request.permissions,
        }
    }
}

impl NewUser {
    pub fn new(
        username: String,
        password: &str,
        name: String,
        email: String,
        role_id: Option<i32>,
    ) -> Result<Self, bcrypt::BcryptError> {
        let password = hash_password(password)?;
        let now = chrono::Utc::now().naive_utc();

        Ok(Self {
            username,
            password,
            name,
            email,
            role_id,
            status: true,
            created_at: now,
            updated_at: now,
        })
    }
}

impl UpdateUser {
    /// Builds the changeset, hashing the password only when one was supplied.
    pub fn from_request(request: UpdateUserRequest) -> Result<Self, bcrypt::BcryptError> {
        let password = request
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        Ok(Self {
            name: request.name,
            email: request.email,
            role_id: request.role_id,
            password,
            status: request.status,
            updated_at: chrono::Utc::now().naive_utc(),
        })
    }
}

impl User {
    pub fn verify_password(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        bcrypt::verify(truncate_password(password), &self.password)
    }

    pub fn is_active(&self) -> bool {
        self.status
    }
}
