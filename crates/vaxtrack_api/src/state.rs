//! Shared handler state.

use crate::error::ApiError;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use vaxtrack_core::RepoResult;

/// One migrated connection shared by every request.
///
/// Each call locks it for exactly one synchronous core operation, so writes
/// are serialized and the guard is never held across an `.await`.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `op` with exclusive access to the connection.
    pub fn with_conn<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> RepoResult<T>,
    {
        let conn = self.conn.lock().map_err(|_| ApiError::LockPoisoned)?;
        op(&*conn).map_err(ApiError::from)
    }
}
