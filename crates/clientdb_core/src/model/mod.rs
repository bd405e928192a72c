//! Domain model for persisted customer records.
//!
//! # Responsibility
//! - Define the canonical `Client` shape shared by repository and callers.
//!
//! # Invariants
//! - A client is identified by a store-assigned `ClientId`.
//! - `ClientId(0)` marks a client that is not (or no longer) persisted.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod client;
