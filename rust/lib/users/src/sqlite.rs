use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::error::UserStoreError;
use crate::model::{NewUser, User};
use crate::traits::UserStore;

/// SqliteUserStore is a UserStore implementation backed by rusqlite
/// (bundled SQLite).
///
/// Rows keep the full record as a JSON `data` column next to the indexed
/// identity columns; `email` and `name` carry UNIQUE constraints so the
/// database arbitrates duplicate registrations.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL UNIQUE,
        data TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_users_email ON users(email)",
    "CREATE INDEX IF NOT EXISTS idx_users_name ON users(name)",
];

impl SqliteUserStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, UserStoreError> {
        let conn = Connection::open(path)
            .map_err(|e| UserStoreError::Storage(e.to_string()))?;

        // Enable WAL mode for better concurrent read performance.
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(|e| UserStoreError::Storage(e.to_string()))?;

        tracing::debug!("opened user store at {}", path.display());
        Self::init(conn)
    }

    /// Create an in-memory store (useful for tests).
    pub fn open_in_memory() -> Result<Self, UserStoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| UserStoreError::Storage(e.to_string()))?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, UserStoreError> {
        for stmt in SCHEMA {
            conn.execute(stmt, [])
                .map_err(|e| UserStoreError::Storage(e.to_string()))?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn find_where(
        &self,
        condition: &str,
        params: &[&dyn rusqlite::types::ToSql],
    ) -> Result<Option<User>, UserStoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| UserStoreError::Storage(e.to_string()))?;

        let sql = format!("SELECT data FROM users WHERE {} LIMIT 1", condition);
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| UserStoreError::Storage(e.to_string()))?;

        let mut rows = stmt
            .query(params)
            .map_err(|e| UserStoreError::Storage(e.to_string()))?;

        match rows.next().map_err(|e| UserStoreError::Storage(e.to_string()))? {
            Some(row) => {
                let data: String = row
                    .get(0)
                    .map_err(|e| UserStoreError::Storage(e.to_string()))?;
                let user = serde_json::from_str(&data)
                    .map_err(|e| UserStoreError::Serialization(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }
}

impl UserStore for SqliteUserStore {
    fn create(&self, input: NewUser) -> Result<User, UserStoreError> {
        let now = chrono::Utc::now().to_rfc3339();
        let user = User {
            id: uuid::Uuid::new_v4().to_string().replace('-', ""),
            email: input.email,
            name: input.name,
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash: input.password_hash,
            role: input.role,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        let data = serde_json::to_string(&user)
            .map_err(|e| UserStoreError::Serialization(e.to_string()))?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| UserStoreError::Storage(e.to_string()))?;

        conn.execute(
            "INSERT INTO users (id, email, name, data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![user.id, user.email, user.name, data, now, now],
        )
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("UNIQUE constraint") {
                UserStoreError::Conflict(msg)
            } else {
                UserStoreError::Storage(msg)
            }
        })?;

        Ok(user)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<User>, UserStoreError> {
        self.find_where("id = ?1", &[&id])
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        self.find_where("email = ?1", &[&email])
    }

    fn find_by_name(&self, name: &str) -> Result<Option<User>, UserStoreError> {
        self.find_where("name = ?1", &[&name])
    }

    fn find_by_email_or_name(
        &self,
        email: &str,
        name: &str,
    ) -> Result<Option<User>, UserStoreError> {
        self.find_where("email = ?1 OR name = ?2", &[&email, &name])
    }
}
