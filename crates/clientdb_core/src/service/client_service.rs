//! Client use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::client::{Client, ClientId};
use crate::repo::client_repo::{ClientRepository, RepoResult};

/// Use-case wrapper over a `ClientRepository`.
pub struct ClientService<R: ClientRepository> {
    repo: R,
}

impl<R: ClientRepository> ClientService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new client from its field values.
    ///
    /// # Contract
    /// - Builds an unsaved client (`id == 0`).
    /// - Returns the store-assigned id.
    pub fn register_client(
        &self,
        fio: impl Into<String>,
        login: impl Into<String>,
        birthday: impl Into<String>,
        email: impl Into<String>,
    ) -> RepoResult<ClientId> {
        let client = Client::new(fio, login, birthday, email);
        self.repo.insert_client(&client)
    }

    /// Inserts a prepared client; any preset id is ignored.
    pub fn insert_client(&self, client: &Client) -> RepoResult<ClientId> {
        self.repo.insert_client(client)
    }

    /// Gets one client by id. Returns `RepoError::NotFound` unchanged.
    pub fn get_client(&self, id: ClientId) -> RepoResult<Client> {
        self.repo.select_client(id)
    }

    /// Hard-deletes a client by id.
    pub fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        self.repo.delete_client(id)
    }
}
