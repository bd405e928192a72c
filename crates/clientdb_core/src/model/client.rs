//! Client domain model.
//!
//! # Responsibility
//! - Define the customer record stored in the `clients` table.
//! - Provide presence checks applied before persistence.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never reused by callers.
//! - `birthday` is kept as an 8-character `YYYYMMDD` string; no calendar
//!   validation is applied.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Primary key of a persisted client.
///
/// `ClientId(0)` is the zero value and never refers to a stored row.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ClientId(pub i64);

impl ClientId {
    /// Returns the raw integer key.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Returns whether this is the zero (unassigned) id.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<i64> for ClientId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Single customer record.
///
/// `Client::default()` is the zero-valued client: `id == 0` and every text
/// field empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Store-assigned primary key; zero until inserted.
    pub id: ClientId,
    /// Full name.
    pub fio: String,
    /// Unique per-user handle.
    pub login: String,
    /// `YYYYMMDD`.
    pub birthday: String,
    /// Contact address.
    pub email: String,
}

/// Presence check failure for client fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyField(&'static str),
}

impl Display for ClientValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "client field `{field}` must not be empty"),
        }
    }
}

impl Error for ClientValidationError {}

impl Client {
    /// Creates an unsaved client (`id == 0`).
    pub fn new(
        fio: impl Into<String>,
        login: impl Into<String>,
        birthday: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: ClientId::default(),
            fio: fio.into(),
            login: login.into(),
            birthday: birthday.into(),
            email: email.into(),
        }
    }

    /// Returns whether this client carries a store-assigned id.
    pub fn is_persisted(&self) -> bool {
        !self.id.is_zero()
    }

    /// Checks that every text field is present.
    ///
    /// Whitespace-only values count as empty. Field order in the error
    /// follows column order: `fio`, `login`, `birthday`, `email`.
    pub fn validate(&self) -> Result<(), ClientValidationError> {
        let fields = [
            ("fio", self.fio.as_str()),
            ("login", self.login.as_str()),
            ("birthday", self.birthday.as_str()),
            ("email", self.email.as_str()),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ClientValidationError::EmptyField(name));
            }
        }
        Ok(())
    }
}
