//! Database module providing organized access to all database operations
//!
//! This module is organized into several sub-modules:
//! - `connection`: Database connection management and pool configuration
//! - `service`: The `DatabaseService` handle shared through Rocket state
//! - `users`: User and role operations
//! - `archives`: Archive category and archive operations
//! - `categories`: Lookup and cycle checks shared by both category trees
//! - `knowledge`: Knowledge category and article operations
//! - `tags`: Tag usage counting shared by the article operations
//! - `seed`: First-run administrator account

pub mod archives;
mod categories;
pub mod connection;
pub mod knowledge;
pub mod seed;
pub mod service;
pub mod tags;
pub mod users;

pub use connection::{DbConnection, DbPool, MIGRATIONS};
pub use service::DatabaseService;
