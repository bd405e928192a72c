//! Repository layer: data access contracts and SQLite implementation.
//!
//! # Responsibility
//! - Define the client data access contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Client::validate()` before persistence.
//! - Repository APIs return the semantic `NotFound` error in addition to DB
//!   transport errors.

pub mod client_repo;
