//! Belief repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide point insert/lookup/update/delete and a sorted full listing
//!   over the `beliefs` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every mutation is a single SQL statement; no multi-row transactions.
//! - Listing order is `created_at DESC`, ties broken by insertion order.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::belief::{Belief, BeliefDraft, BeliefId, BeliefType};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BELIEF_COLUMNS: &str = "id, message, type, date, created_at";
const REQUIRED_COLUMNS: &[&str] = &["seq", "id", "message", "type", "date", "created_at"];
const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for belief persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The storage medium could not be reached at all.
    Unavailable(String),
    NotFound(BeliefId),
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

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::NotFound(id) => write!(f, "belief not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted belief data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
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

/// Repository interface for belief storage.
pub trait BeliefRepository {
    /// Persists a new belief and returns its identifier.
    fn insert_belief(&self, belief: &Belief) -> RepoResult<BeliefId>;
    /// Loads one belief; `NotFound` when absent.
    fn find_belief(&self, id: BeliefId) -> RepoResult<Belief>;
    /// Lists every belief, newest first.
    fn list_beliefs(&self) -> RepoResult<Vec<Belief>>;
    /// Replaces message/type, stamps `date`, and returns the stored row.
    fn update_belief(&self, id: BeliefId, draft: &BeliefDraft, date: NaiveDate)
        -> RepoResult<Belief>;
    /// Hard-deletes one belief; `NotFound` when nothing was removed.
    fn delete_belief(&self, id: BeliefId) -> RepoResult<()>;
}

/// SQLite-backed belief repository.
pub struct SqliteBeliefRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBeliefRepository<'conn> {
    /// Wraps a connection after checking that its schema is fully migrated.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry what this repository reads and writes.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl BeliefRepository for SqliteBeliefRepository<'_> {
    fn insert_belief(&self, belief: &Belief) -> RepoResult<BeliefId> {
        self.conn.execute(
            "INSERT INTO beliefs (id, message, type, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                belief.id.to_string(),
                belief.message.as_str(),
                belief.kind.as_str(),
                format_date(belief.date),
                belief.created_at.timestamp_millis(),
            ],
        )?;

        Ok(belief.id)
    }

    fn find_belief(&self, id: BeliefId) -> RepoResult<Belief> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {BELIEF_COLUMNS} FROM beliefs WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => parse_belief_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn list_beliefs(&self) -> RepoResult<Vec<Belief>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {BELIEF_COLUMNS} FROM beliefs ORDER BY created_at DESC, seq DESC;"
        ))?;

        let mut rows = stmt.query([])?;
        let mut beliefs = Vec::new();
        while let Some(row) = rows.next()? {
            beliefs.push(parse_belief_row(row)?);
        }

        Ok(beliefs)
    }

    fn update_belief(
        &self,
        id: BeliefId,
        draft: &BeliefDraft,
        date: NaiveDate,
    ) -> RepoResult<Belief> {
        let mut stmt = self.conn.prepare(&format!(
            "UPDATE beliefs
             SET
                message = ?1,
                type = ?2,
                date = ?3
             WHERE id = ?4
             RETURNING {BELIEF_COLUMNS};"
        ))?;

        let mut rows = stmt.query(params![
            draft.message.as_str(),
            draft.kind.as_str(),
            format_date(date),
            id.to_string(),
        ])?;
        match rows.next()? {
            Some(row) => parse_belief_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn delete_belief(&self, id: BeliefId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM beliefs WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let table_exists: bool = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'beliefs'
        );",
        [],
        |row| row.get(0),
    )?;
    if !table_exists {
        return Err(RepoError::MissingRequiredTable("beliefs"));
    }

    let mut stmt = conn.prepare("PRAGMA table_info(beliefs);")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;

    for &required in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == required) {
            return Err(RepoError::MissingRequiredColumn {
                table: "beliefs",
                column: required,
            });
        }
    }

    Ok(())
}

fn parse_belief_row(row: &Row<'_>) -> RepoResult<Belief> {
    let id_text: String = row.get("id")?;
    let id = id_text.parse::<BeliefId>().map_err(|_| {
        RepoError::InvalidData(format!("invalid id value `{id_text}` in beliefs.id"))
    })?;

    let type_text: String = row.get("type")?;
    let kind = type_text.parse::<BeliefType>().map_err(|_| {
        RepoError::InvalidData(format!("invalid belief type `{type_text}` in beliefs.type"))
    })?;

    let date_text: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
        RepoError::InvalidData(format!("invalid date `{date_text}` in beliefs.date"))
    })?;

    let created_at_ms: i64 = row.get("created_at")?;
    let created_at = DateTime::<Utc>::from_timestamp_millis(created_at_ms).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid created_at `{created_at_ms}` in beliefs.created_at"
        ))
    })?;

    Ok(Belief {
        id,
        message: row.get("message")?,
        kind,
        date,
        created_at,
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
