//! # Database State
//!
//! Wraps the `Database` handle for commands that persist.
//!
//! `Database` holds a `SqlitePool`, which is already thread-safe, so no lock
//! is needed here.

use storefront_db::Database;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
