use super::service::DatabaseService;
use crate::error::ApiError;
use crate::models::{
    CreateRoleRequest, CreateUserRequest, NewRole, NewUser, Role, UpdateRole, UpdateRoleRequest,
    UpdateUser, UpdateUserRequest, User,
};
use crate::schema::{roles, users};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;

fn ensure_role_exists(conn: &mut SqliteConnection, role_id: i32) -> Result<(), ApiError> {
    let found = roles::table
        .find(role_id)
        .select(roles::id)
        .first::<i32>(conn)
        .optional()?;

    match found {
        Some(_) => Ok(()),
        None => Err(ApiError::NotFound("Role not found".to_string())),
    }
}

fn find_user(conn: &mut SqliteConnection, user_id: i32) -> Result<User, ApiError> {
    users::table
        .find(user_id)
        .first::<User>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

fn find_role(conn: &mut SqliteConnection, role_id: i32) -> Result<Role, ApiError> {
    roles::table
        .find(role_id)
        .first::<Role>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))
}

impl DatabaseService {
    /// Creates a user after checking username/email uniqueness and the role
    /// reference. The password is hashed before it reaches the database.
    pub fn create_user(&self, request: CreateUserRequest) -> Result<User, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            let existing_username = users::table
                .filter(users::username.eq(&request.username))
                .select(users::id)
                .first::<i32>(conn)
                .optional()?;

            if existing_username.is_some() {
                return Err(ApiError::Conflict("Username already exists".to_string()));
            }

            let existing_email = users::table
                .filter(users::email.eq(&request.email))
                .select(users::id)
                .first::<i32>(conn)
                .optional()?;

            if existing_email.is_some() {
                return Err(ApiError::Conflict("Email already exists".to_string()));
            }

            if let Some(role_id) = request.role_id {
                ensure_role_exists(conn, role_id)?;
            }

            let new_user = NewUser::new(
                request.username,
                &request.password,
                request.name,
                request.email,
                request.role_id,
            )?;

            let user = diesel::insert_into(users::table)
                .values(&new_user)
                .returning(User::as_returning())
                .get_result(conn)?;

            debug!("User created: {} (id {})", user.username, user.id);
            Ok(user)
        })
    }

    pub fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>, ApiError> {
        let mut conn = self.get_connection()?;

        Ok(users::table
            .order(users::id.asc())
            .offset(skip.max(0))
            .limit(limit.max(0))
            .load::<User>(&mut conn)?)
    }

    pub fn get_user(&self, user_id: i32) -> Result<User, ApiError> {
        let mut conn = self.get_connection()?;
        find_user(&mut conn, user_id)
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>, ApiError> {
        let mut conn = self.get_connection()?;

        Ok(users::table
            .filter(users::username.eq(username))
            .first::<User>(&mut conn)
            .optional()?)
    }

    /// Partial update; only supplied fields change.
    pub fn update_user(&self, user_id: i32, request: UpdateUserRequest) -> Result<User, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            find_user(conn, user_id)?;

            if let Some(email) = &request.email {
                let taken = users::table
                    .filter(users::email.eq(email))
                    .filter(users::id.ne(user_id))
                    .select(users::id)
                    .first::<i32>(conn)
                    .optional()?;

                if taken.is_some() {
                    return Err(ApiError::Conflict("Email already exists".to_string()));
                }
            }

            if let Some(Some(role_id)) = request.role_id {
                ensure_role_exists(conn, role_id)?;
            }

            let changes = UpdateUser::from_request(request)?;

            let user = diesel::update(users::table.find(user_id))
                .set(&changes)
                .returning(User::as_returning())
                .get_result(conn)?;

            debug!("User updated: {} (id {})", user.username, user.id);
            Ok(user)
        })
    }

    pub fn delete_user(&self, user_id: i32) -> Result<(), ApiError> {
        let mut conn = self.get_connection()?;

        let deleted = diesel::delete(users::table.find(user_id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        debug!("User deleted: id {user_id}");
        Ok(())
    }

    // Role operations
    pub fn create_role(&self, request: CreateRoleRequest) -> Result<Role, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            let existing = roles::table
                .filter(roles::name.eq(&request.name))
                .select(roles::id)
                .first::<i32>(conn)
                .optional()?;

            if existing.is_some() {
                return Err(ApiError::Conflict("Role name already exists".to_string()));
            }

            let new_role = NewRole::new(request.name, request.description, request.permissions);

            let role = diesel::insert_into(roles::table)
                .values(&new_role)
                .returning(Role::as_returning())
                .get_result(conn)?;

            debug!("Role created: {} (id {})", role.name, role.id);
            Ok(role)
        })
    }

    pub fn list_roles(&self) -> Result<Vec<Role>, ApiError> {
        let mut conn = self.get_connection()?;
        Ok(roles::table.order(roles::id.asc()).load::<Role>(&mut conn)?)
    }

    pub fn update_role(&self, role_id: i32, request: UpdateRoleRequest) -> Result<Role, ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            let current = find_role(conn, role_id)?;

            if let Some(name) = &request.name {
                let taken = roles::table
                    .filter(roles::name.eq(name))
                    .filter(roles::id.ne(role_id))
                    .select(roles::id)
                    .first::<i32>(conn)
                    .optional()?;

                if taken.is_some() {
                    return Err(ApiError::Conflict("Role name already exists".to_string()));
                }
            }

            let changes = UpdateRole::from(request);
            if changes.is_empty() {
                return Ok(current);
            }

            let role = diesel::update(roles::table.find(role_id))
                .set(&changes)
                .returning(Role::as_returning())
                .get_result(conn)?;

            Ok(role)
        })
    }

    /// Deletes a role that no user references.
    pub fn delete_role(&self, role_id: i32) -> Result<(), ApiError> {
        let mut conn = self.get_connection()?;

        conn.transaction::<_, ApiError, _>(|conn| {
            find_role(conn, role_id)?;

            let user_count: i64 = users::table
                .filter(users::role_id.eq(role_id))
                .count()
                .get_result(conn)?;

            if user_count > 0 {
                return Err(ApiError::Conflict(
                    "Cannot delete role with users".to_string(),
                ));
            }

            diesel::delete(roles::table.find(role_id)).execute(conn)?;

            debug!("Role deleted: id {role_id}");
            Ok(())
        })
    }
}
