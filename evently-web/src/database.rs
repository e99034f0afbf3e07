//! SQLite-backed storage

use crate::{WebError, WebResult};
use chrono::{DateTime, Utc};
use evently_core::{
    async_trait, conflict_error, not_found_error, DatabaseConfig, ErrorContext, Event, EventId,
    EventStore, EventlyError, EventlyResult, NewEvent, NewRsvp, NewUser, RsvpId, RsvpRecord,
    RsvpStore, User, UserId, UserStore,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use tracing::{debug, error, info};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        is_admin BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        date TEXT NOT NULL,
        location TEXT,
        capacity INTEGER CHECK (capacity IS NULL OR capacity > 0),
        is_public BOOLEAN NOT NULL DEFAULT TRUE,
        requires_admin BOOLEAN NOT NULL DEFAULT FALSE,
        created_by INTEGER,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rsvps (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        event_id INTEGER NOT NULL REFERENCES events(id) ON DELETE CASCADE,
        user_id INTEGER,
        attending BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TEXT NOT NULL
    )
    "#,
    // One record per authenticated identity; anonymous rows (NULL user_id) are exempt
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_rsvps_event_user ON rsvps(event_id, user_id) WHERE user_id IS NOT NULL",
    "CREATE INDEX IF NOT EXISTS idx_rsvps_event ON rsvps(event_id)",
];

const EVENT_COLUMNS: &str =
    "id, title, description, date, location, capacity, is_public, requires_admin, created_by, created_at";
const RSVP_COLUMNS: &str = "id, event_id, user_id, attending, created_at";
const USER_COLUMNS: &str = "id, username, password_hash, is_admin, created_at";

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    id: i64,
    title: String,
    description: Option<String>,
    date: DateTime<Utc>,
    location: Option<String>,
    capacity: Option<i64>,
    is_public: bool,
    requires_admin: bool,
    created_by: Option<i64>,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            date: row.date,
            location: row.location,
            capacity: row.capacity.and_then(|c| u32::try_from(c).ok()),
            is_public: row.is_public,
            requires_admin: row.requires_admin,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct RsvpRow {
    id: i64,
    event_id: i64,
    user_id: Option<i64>,
    attending: bool,
    created_at: DateTime<Utc>,
}

impl From<RsvpRow> for RsvpRecord {
    fn from(row: RsvpRow) -> Self {
        Self {
            id: row.id,
            event_id: row.event_id,
            user_id: row.user_id,
            attending: row.attending,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
            created_at: row.created_at,
        }
    }
}

/// Map a sqlx failure to a storage error tagged with the operation
fn db_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> EventlyError {
    move |e| {
        error!(operation, error = %e, "Database operation failed");
        EventlyError::Storage {
            message: format!("Failed to {}: {}", operation.replace('_', " "), e),
            source: Some(Box::new(e)),
            context: ErrorContext::new("sqlite_storage").with_operation(operation),
        }
    }
}

/// Event, RSVP and user storage on a SQLite pool
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect using the database configuration and create tables
    pub async fn connect(config: &DatabaseConfig) -> WebResult<Self> {
        info!("Connecting to database: {}", config.url);

        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| WebError::Database(format!("Invalid database URL: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Each in-memory connection would otherwise be its own database
        let in_memory = config.url.contains(":memory:");
        let max_connections = if in_memory { 1 } else { config.max_connections };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(if in_memory { None } else { Some(std::time::Duration::from_secs(600)) })
            .max_lifetime(if in_memory { None } else { Some(std::time::Duration::from_secs(1800)) })
            .connect_with(options)
            .await
            .map_err(|e| WebError::Database(format!("Failed to connect to database: {}", e)))?;

        let store = Self::new(pool);
        store.create_tables().await?;

        info!("Database connection established successfully");
        Ok(store)
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create database tables
    pub async fn create_tables(&self) -> WebResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| WebError::Database(format!("Failed to create schema: {}", e)))?;
        }

        debug!("Database schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl EventStore for SqliteStore {
    async fn create_event(&self, event: NewEvent) -> EventlyResult<Event> {
        let query = format!(
            "INSERT INTO events (title, description, date, location, capacity, is_public, requires_admin, created_by, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING {EVENT_COLUMNS}"
        );

        let row: EventRow = sqlx::query_as(&query)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(&event.location)
            .bind(event.capacity.map(i64::from))
            .bind(event.is_public)
            .bind(event.requires_admin)
            .bind(event.created_by)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("create_event"))?;

        debug!(event_id = row.id, "Saved event to SQLite storage");
        Ok(row.into())
    }

    async fn get_event(&self, id: EventId) -> EventlyResult<Option<Event>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?");
        let row: Option<EventRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("load_event"))?;

        Ok(row.map(Into::into))
    }

    async fn list_events(&self) -> EventlyResult<Vec<Event>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events ORDER BY id");
        let rows: Vec<EventRow> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list_events"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl RsvpStore for SqliteStore {
    async fn list_rsvps(&self, event_id: EventId) -> EventlyResult<Vec<RsvpRecord>> {
        let query = format!("SELECT {RSVP_COLUMNS} FROM rsvps WHERE event_id = ? ORDER BY id");
        let rows: Vec<RsvpRow> = sqlx::query_as(&query)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list_rsvps"))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_rsvp(
        &self,
        event_id: EventId,
        user_id: UserId,
    ) -> EventlyResult<Option<RsvpRecord>> {
        let query = format!("SELECT {RSVP_COLUMNS} FROM rsvps WHERE event_id = ? AND user_id = ?");
        let row: Option<RsvpRow> = sqlx::query_as(&query)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find_rsvp"))?;

        Ok(row.map(Into::into))
    }

    async fn insert_rsvp(&self, rsvp: NewRsvp) -> EventlyResult<RsvpRecord> {
        // The upsert only fires for authenticated rows; NULL user ids never conflict
        let query = format!(
            "INSERT INTO rsvps (event_id, user_id, attending, created_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT (event_id, user_id) WHERE user_id IS NOT NULL \
             DO UPDATE SET attending = excluded.attending \
             RETURNING {RSVP_COLUMNS}"
        );

        let row: RsvpRow = sqlx::query_as(&query)
            .bind(rsvp.event_id)
            .bind(rsvp.user_id)
            .bind(rsvp.attending)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("insert_rsvp"))?;

        Ok(row.into())
    }

    async fn set_attending(&self, id: RsvpId, attending: bool) -> EventlyResult<RsvpRecord> {
        let query = format!("UPDATE rsvps SET attending = ? WHERE id = ? RETURNING {RSVP_COLUMNS}");
        let row: Option<RsvpRow> = sqlx::query_as(&query)
            .bind(attending)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("update_rsvp"))?;

        row.map(Into::into)
            .ok_or_else(|| not_found_error!(format!("rsvp {id}"), "sqlite_storage"))
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn create_user(&self, user: NewUser) -> EventlyResult<User> {
        let query = format!(
            "INSERT INTO users (username, password_hash, is_admin, created_at) VALUES (?, ?, ?, ?) \
             RETURNING {USER_COLUMNS}"
        );

        let result: Result<UserRow, sqlx::Error> = sqlx::query_as(&query)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(user.is_admin)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => {
                debug!(user_id = row.id, "User inserted successfully");
                Ok(row.into())
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(conflict_error!("Username already exists", "sqlite_storage"))
            }
            Err(e) => Err(db_error("create_user")(e)),
        }
    }

    async fn find_user_by_id(&self, id: UserId) -> EventlyResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("load_user"))?;

        Ok(row.map(Into::into))
    }

    async fn find_user_by_username(&self, username: &str) -> EventlyResult<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
        let row: Option<UserRow> = sqlx::query_as(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("load_user"))?;

        Ok(row.map(Into::into))
    }
}
