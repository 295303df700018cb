//! SQLite adapters for the profile store and conversation history.

pub mod connection;
pub mod conversation_repository;
pub mod evidence_repository;
pub mod message_index;
pub mod migrations;
pub mod profile_repository;
pub mod signal_repository;

pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig};
pub use conversation_repository::SqliteConversationRepository;
pub use evidence_repository::SqliteEvidenceRepository;
pub use message_index::SqliteMessageIndex;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use profile_repository::SqliteProfileRepository;
pub use signal_repository::SqliteSignalRepository;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Evidence;

/// Parse a UUID string from a SQLite row field.
pub fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Fixed-width RFC3339 so stored timestamps sort lexically.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored enum column, reporting the column on failure.
pub(crate) fn parse_enum<T>(column: &str, raw: &str, parse: fn(&str) -> Option<T>) -> DomainResult<T> {
    parse(raw).ok_or_else(|| DomainError::SerializationError(format!("invalid {column}: {raw}")))
}

/// Insert an evidence row on an open connection or transaction.
pub(crate) async fn insert_evidence(
    conn: &mut sqlx::SqliteConnection,
    evidence: &Evidence,
) -> DomainResult<()> {
    sqlx::query(
        r#"INSERT INTO evidence (id, target_type, target_id, source_message_id, quote, created_at)
           VALUES (?, ?, ?, ?, ?, ?)"#
    )
    .bind(evidence.id.to_string())
    .bind(evidence.target_type.as_str())
    .bind(&evidence.target_id)
    .bind(evidence.source_message_id.to_string())
    .bind(&evidence.quote)
    .bind(format_datetime(&evidence.created_at))
    .execute(conn)
    .await?;
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),
}

/// Open (creating if needed) and migrate the database at `database_url`.
pub async fn initialize_database(database_url: &str, config: Option<PoolConfig>) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(database_url, config).await?;
    let migrator = Migrator::new(pool.clone());
    let applied = migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    if applied > 0 {
        tracing::info!(applied, "Database migrations applied");
    }
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    let migrator = Migrator::new(pool.clone());
    migrator.run_embedded_migrations(all_embedded_migrations()).await?;
    Ok(pool)
}
