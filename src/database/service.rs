use super::connection::{DbConnection, DbPool, create_pool, get_connection_with_retry};
use crate::error::ApiError;

/// Entry point to all persistence operations. Each method checks out its own
/// pooled connection and returns it when the call completes.
///
/// Operations are grouped by resource in sibling modules (`users`, `archives`,
/// `knowledge`, `tags`, `seed`), each adding an `impl DatabaseService` block.
#[derive(Debug)]
pub struct DatabaseService {
    pub pool: DbPool,
}

impl DatabaseService {
    /// Creates a new DatabaseService with an initialized connection pool
    pub fn new(database_url: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = create_pool(database_url)?;
        Ok(Self { pool })
    }

    /// Gets a connection from the pool with retry logic
    pub fn get_connection(&self) -> Result<DbConnection, ApiError> {
        Ok(get_connection_with_retry(&self.pool)?)
    }
}
