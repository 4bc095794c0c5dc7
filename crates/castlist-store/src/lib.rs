//! Castlist Storage Layer
//!
//! Implements the ActorStore trait over SQLite.
//!
//! # Architecture
//!
//! - `users` table with a unique email index (authoritative for
//!   resolve-or-create races)
//! - `actors` table with a composite unique index on
//!   `(user_id, description)` (authoritative for duplicate submissions)
//! - Dynamic filter queries built as parameterized predicate lists
//!
//! # Examples
//!
//! ```no_run
//! use castlist_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for user and actor operations
//! ```

#![warn(missing_docs)]

use castlist_domain::traits::ActorStore;
use castlist_domain::{Actor, ActorDraft, ActorFilter, ActorPage, Gender, User, DEFAULT_PER_PAGE};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Uniqueness violation on (user_id, description)
    #[error("Duplicate description for this user")]
    Duplicate,
}

/// SQLite-based implementation of ActorStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Callers share a store across
/// request handlers by wrapping it in a mutex.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use castlist_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("castlist.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = self
            .conn
            .query_row(
                "SELECT id, email, credential, created_at FROM users WHERE email = ?1",
                params![email],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        credential: row.get(2)?,
                        created_at: row.get::<_, i64>(3)? as u64,
                    })
                },
            )
            .optional()?;

        Ok(user)
    }

    /// Insert an actor row with an explicit creation timestamp
    fn create_actor_at(
        &mut self,
        user_id: i64,
        draft: &ActorDraft,
        created_at: u64,
    ) -> Result<Actor, StoreError> {
        let result = self.conn.execute(
            "INSERT INTO actors (user_id, first_name, last_name, address, gender, description, height, weight, age, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                user_id,
                &draft.first_name,
                &draft.last_name,
                &draft.address,
                draft.gender.map(|g| g.as_str()),
                &draft.description,
                draft.height.map(|v| v as i64),
                draft.weight.map(|v| v as i64),
                draft.age.map(|v| v as i64),
                created_at as i64,
            ],
        );

        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => return Err(StoreError::Duplicate),
            Err(e) => return Err(e.into()),
        }

        let id = self.conn.last_insert_rowid();

        Ok(Actor {
            id,
            user_id,
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            address: draft.address.clone(),
            gender: draft.gender,
            height: draft.height,
            weight: draft.weight,
            age: draft.age,
            description: draft.description.clone(),
            created_at,
        })
    }

    /// Build the WHERE clause and parameter list for a filter
    ///
    /// Values are always bound as parameters, never interpolated into
    /// the SQL text.
    fn filter_predicates(filter: &ActorFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut sql = String::from(" WHERE 1=1");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(user_id) = filter.user_id {
            sql.push_str(" AND user_id = ?");
            params.push(Box::new(user_id));
        }

        if let Some(first_name) = &filter.first_name {
            sql.push_str(" AND first_name LIKE ?");
            params.push(Box::new(format!("%{}%", first_name)));
        }

        if let Some(last_name) = &filter.last_name {
            sql.push_str(" AND last_name LIKE ?");
            params.push(Box::new(format!("%{}%", last_name)));
        }

        if let Some(address) = &filter.address {
            sql.push_str(" AND address LIKE ?");
            params.push(Box::new(format!("%{}%", address)));
        }

        if let Some(gender) = filter.gender {
            sql.push_str(" AND gender = ?");
            params.push(Box::new(gender.as_str().to_string()));
        }

        if let Some(description) = &filter.description {
            sql.push_str(" AND description LIKE ?");
            params.push(Box::new(format!("%{}%", description)));
        }

        if let Some(height) = filter.height {
            sql.push_str(" AND height = ?");
            params.push(Box::new(height as i64));
        }

        if let Some(weight) = filter.weight {
            sql.push_str(" AND weight = ?");
            params.push(Box::new(weight as i64));
        }

        if let Some(age) = filter.age {
            sql.push_str(" AND age = ?");
            params.push(Box::new(age as i64));
        }

        (sql, params)
    }
}

/// Map a full actor row in column order
fn row_to_actor(row: &Row<'_>) -> rusqlite::Result<Actor> {
    let gender: Option<String> = row.get(5)?;

    Ok(Actor {
        id: row.get(0)?,
        user_id: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        address: row.get(4)?,
        gender: gender.as_deref().and_then(Gender::parse),
        description: row.get(6)?,
        height: row.get::<_, Option<i64>>(7)?.map(|v| v as u32),
        weight: row.get::<_, Option<i64>>(8)?.map(|v| v as u32),
        age: row.get::<_, Option<i64>>(9)?.map(|v| v as u32),
        created_at: row.get::<_, i64>(10)? as u64,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

const ACTOR_COLUMNS: &str =
    "id, user_id, first_name, last_name, address, gender, description, height, weight, age, created_at";

impl ActorStore for SqliteStore {
    type Error = StoreError;

    fn get_or_create_user(&mut self, email: &str) -> Result<User, Self::Error> {
        if let Some(user) = self.find_user_by_email(email)? {
            return Ok(user);
        }

        let credential = Uuid::now_v7().to_string();
        let created_at = now_epoch_secs();

        let result = self.conn.execute(
            "INSERT INTO users (email, credential, created_at) VALUES (?1, ?2, ?3)",
            params![email, &credential, created_at as i64],
        );

        match result {
            Ok(_) => Ok(User {
                id: self.conn.last_insert_rowid(),
                email: email.to_string(),
                credential,
                created_at,
            }),
            // A concurrent insert won the race; re-read the winning row
            Err(e) if is_unique_violation(&e) => self
                .find_user_by_email(email)?
                .ok_or_else(|| StoreError::Database(e)),
            Err(e) => Err(e.into()),
        }
    }

    fn create_actor(&mut self, user_id: i64, draft: &ActorDraft) -> Result<Actor, Self::Error> {
        self.create_actor_at(user_id, draft, now_epoch_secs())
    }

    fn has_actor_with_description(
        &self,
        user_id: i64,
        description: &str,
    ) -> Result<bool, Self::Error> {
        let exists: bool = self
            .conn
            .query_row(
                "SELECT 1 FROM actors WHERE user_id = ?1 AND description = ?2",
                params![user_id, description],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

        Ok(exists)
    }

    fn query_actors(&self, filter: &ActorFilter) -> Result<ActorPage, Self::Error> {
        let (where_clause, params) = Self::filter_predicates(filter);
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let total: u64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM actors{}", where_clause),
            &param_refs[..],
            |row| row.get::<_, i64>(0),
        )? as u64;

        let per_page = filter.per_page.unwrap_or(DEFAULT_PER_PAGE).max(1);
        let page = filter.page.unwrap_or(1).max(1);
        let offset = (page as i64 - 1) * per_page as i64;

        let sql = format!(
            "SELECT {} FROM actors{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            ACTOR_COLUMNS, where_clause
        );

        let mut page_params = param_refs;
        let limit = per_page as i64;
        page_params.push(&limit);
        page_params.push(&offset);

        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(&page_params[..], row_to_actor)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ActorPage {
            items,
            total,
            page,
            per_page,
        })
    }
}
