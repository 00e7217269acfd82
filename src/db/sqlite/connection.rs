//! SQLite connection utilities

use rusqlite::Connection;
use std::path::Path;

/// Open the database file, creating its parent directory when missing
pub fn create_connection(path: &Path) -> rusqlite::Result<Connection> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Could not create database directory {:?}: {}", parent, e);
        }
    }

    Connection::open(path)
}
