//! Core data access for customer (`Client`) records stored in SQLite.
//! This crate owns the `clients` schema and its select/insert/delete contract.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{active_log_dir, default_log_level, init_logging, parse_level, LoggingError};
pub use model::client::{Client, ClientId, ClientValidationError};
pub use repo::client_repo::{
    delete_client, insert_client, select_client, ClientRepository, RepoError, RepoResult,
    SqliteClientRepository,
};
pub use service::client_service::ClientService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
