//! Client repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide select/insert/delete over the `clients` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Client::validate()` before SQL mutations.
//! - A missing row is always reported as `RepoError::NotFound`, never as a
//!   storage error.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Logged events carry ids and row counts only, never client fields.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::client::{Client, ClientId, ClientValidationError};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const CLIENTS_TABLE: &str = "clients";
const CLIENTS_REQUIRED_COLUMNS: &[&str] = &["id", "fio", "login", "birthday", "email"];

const CLIENT_SELECT_SQL: &str = "SELECT
    id,
    fio,
    login,
    birthday,
    email
FROM clients";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for client persistence operations.
///
/// `NotFound` and `Db` are the two outcomes callers usually branch on; the
/// remaining variants fail before or instead of a storage round-trip.
#[derive(Debug)]
pub enum RepoError {
    Validation(ClientValidationError),
    Db(DbError),
    NotFound(ClientId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl RepoError {
    /// Returns whether this error means "no row with that id".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns whether the store rejected a write on a constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_constraint_violation())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "client not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted client data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is older than required {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<ClientValidationError> for RepoError {
    fn from(value: ClientValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Looks up one client by primary key.
///
/// Returns `RepoError::NotFound` when no row matches, including negative
/// and never-assigned ids.
pub fn select_client(conn: &Connection, id: ClientId) -> RepoResult<Client> {
    let client = conn
        .query_row(
            &format!("{CLIENT_SELECT_SQL} WHERE id = ?1;"),
            [id.get()],
            read_client_row,
        )
        .optional()?;

    match client {
        Some(client) => {
            let client = check_client_row(client)?;
            debug!("event=client_select module=repo status=ok id={id}");
            Ok(client)
        }
        None => {
            debug!("event=client_select module=repo status=not_found id={id}");
            Err(RepoError::NotFound(id))
        }
    }
}

/// Persists a new client row and returns the store-assigned id.
///
/// Any `id` already set on `client` is ignored. Constraint violations the
/// store enforces surface as `RepoError::Db`; the base schema itself does
/// not make `login` unique.
pub fn insert_client(conn: &Connection, client: &Client) -> RepoResult<ClientId> {
    client.validate()?;

    conn.execute(
        "INSERT INTO clients (fio, login, birthday, email) VALUES (?1, ?2, ?3, ?4);",
        params![
            client.fio.as_str(),
            client.login.as_str(),
            client.birthday.as_str(),
            client.email.as_str(),
        ],
    )?;

    let id = ClientId(conn.last_insert_rowid());
    debug!("event=client_insert module=repo status=ok id={id}");
    Ok(id)
}

/// Removes the client row with the given id.
///
/// Deleting an id with no matching row returns `RepoError::NotFound`, so a
/// second delete of the same id fails.
pub fn delete_client(conn: &Connection, id: ClientId) -> RepoResult<()> {
    let changed = conn.execute("DELETE FROM clients WHERE id = ?1;", [id.get()])?;

    if changed == 0 {
        debug!("event=client_delete module=repo status=not_found id={id}");
        return Err(RepoError::NotFound(id));
    }

    debug!("event=client_delete module=repo status=ok id={id} rows={changed}");
    Ok(())
}

/// Repository interface for client operations.
pub trait ClientRepository {
    fn insert_client(&self, client: &Client) -> RepoResult<ClientId>;
    fn select_client(&self, id: ClientId) -> RepoResult<Client>;
    fn delete_client(&self, id: ClientId) -> RepoResult<()>;
}

/// SQLite-backed client repository borrowing a caller-owned connection.
#[derive(Debug)]
pub struct SqliteClientRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClientRepository<'conn> {
    /// Wraps a connection after checking that the client schema is in place.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not match what the queries expect.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ClientRepository for SqliteClientRepository<'_> {
    fn insert_client(&self, client: &Client) -> RepoResult<ClientId> {
        insert_client(self.conn, client)
    }

    fn select_client(&self, id: ClientId) -> RepoResult<Client> {
        select_client(self.conn, id)
    }

    fn delete_client(&self, id: ClientId) -> RepoResult<()> {
        delete_client(self.conn, id)
    }
}

fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
        );",
        [CLIENTS_TABLE],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable(CLIENTS_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let columns = stmt
        .query_map([CLIENTS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    if let Some(column) = CLIENTS_REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|required| !columns.iter().any(|name| name == required))
    {
        return Err(RepoError::MissingRequiredColumn {
            table: CLIENTS_TABLE,
            column,
        });
    }

    Ok(())
}

fn read_client_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: ClientId(row.get("id")?),
        fio: row.get("fio")?,
        login: row.get("login")?,
        birthday: row.get("birthday")?,
        email: row.get("email")?,
    })
}

fn check_client_row(client: Client) -> RepoResult<Client> {
    if client.id.get() <= 0 {
        return Err(RepoError::InvalidData(format!(
            "non-positive id `{}` in clients.id",
            client.id
        )));
    }
    client.validate().map_err(|err| {
        RepoError::InvalidData(format!("client {} failed validation: {err}", client.id))
    })?;
    Ok(client)
}
