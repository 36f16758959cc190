use super::service::DatabaseService;
use crate::error::ApiError;
use crate::models::{NewRole, NewUser, Role};
use crate::schema::{roles, users};
use diesel::prelude::*;
use log::{error, info};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_ROLE: &str = "admin";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

impl DatabaseService {
    /// Creates the `admin` role and user on first run. Returns `true` when a
    /// user was created.
    pub fn seed_default_admin(&self, admin_password: &str) -> Result<bool, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            let existing_admin = users::table
                .filter(users::username.eq(DEFAULT_ADMIN_USERNAME))
                .select(users::id)
                .first::<i32>(conn)
                .optional()?;

            if existing_admin.is_some() {
                return Ok(false);
            }

            let role_id = match roles::table
                .filter(roles::name.eq(DEFAULT_ADMIN_ROLE))
                .select(roles::id)
                .first::<i32>(conn)
                .optional()?
            {
                Some(role_id) => role_id,
                None => {
                    let role = diesel::insert_into(roles::table)
                        .values(&NewRole::new(
                            DEFAULT_ADMIN_ROLE.to_string(),
                            Some("Administrator".to_string()),
                            Some("*".to_string()),
                        ))
                        .returning(Role::as_returning())
                        .get_result(conn)?;
                    role.id
                }
            };

            // NewUser::new truncates to bcrypt's 72-byte limit before hashing
            let admin = NewUser::new(
                DEFAULT_ADMIN_USERNAME.to_string(),
                admin_password,
                "Administrator".to_string(),
                DEFAULT_ADMIN_EMAIL.to_string(),
                Some(role_id),
            )?;

            diesel::insert_into(users::table)
                .values(&admin)
                .execute(conn)?;

            Ok(true)
        })
    }

    /// Seeds the default administrator, logging instead of failing so the
    /// server can start regardless.
    pub fn ensure_default_admin(&self, admin_password: &str) {
        match self.seed_default_admin(admin_password) {
            Ok(true) => info!("Default administrator account created"),
            Ok(false) => info!("Administrator account already present"),
            Err(e) => error!("Failed to seed administrator account: {e}"),
        }
    }
}
