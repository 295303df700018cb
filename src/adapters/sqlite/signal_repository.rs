//! SQLite implementation of the SignalRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_datetime, insert_evidence, parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Evidence, Signal};
use crate::domain::ports::SignalRepository;

#[derive(Clone)]
pub struct SqliteSignalRepository {
    pool: SqlitePool,
}

impl SqliteSignalRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SignalRepository for SqliteSignalRepository {
    async fn get_by_dimension(&self, dimension: &str) -> DomainResult<Option<Signal>> {
        let row: Option<SignalRow> = sqlx::query_as("SELECT * FROM signals WHERE dimension = ?")
            .bind(dimension)
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Signal>> {
        let row: Option<SignalRow> = sqlx::query_as("SELECT * FROM signals WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_by_prefix(&self, prefix: &str) -> DomainResult<Vec<Signal>> {
        // substr comparison keeps `_` and `%` in keys literal.
        let rows: Vec<SignalRow> = sqlx::query_as(
            r#"SELECT * FROM signals
               WHERE substr(dimension, 1, length(?1)) = ?1
               ORDER BY confidence DESC, dimension ASC"#
        )
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn save_with_evidence(&self, signal: &Signal, evidence: &Evidence) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO signals (id, dimension, value, confidence, evidence_count, created_at, last_updated)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(dimension) DO UPDATE SET
                   value = excluded.value,
                   confidence = excluded.confidence,
                   evidence_count = excluded.evidence_count,
                   last_updated = excluded.last_updated"#
        )
        .bind(signal.id.to_string())
        .bind(&signal.dimension)
        .bind(&signal.value)
        .bind(signal.confidence)
        .bind(i64::from(signal.evidence_count))
        .bind(format_datetime(&signal.created_at))
        .bind(format_datetime(&signal.last_updated))
        .execute(&mut *tx)
        .await?;

        insert_evidence(&mut tx, evidence).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM signals").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct SignalRow {
    id: String,
    dimension: String,
    value: String,
    confidence: f64,
    evidence_count: i64,
    created_at: String,
    last_updated: String,
}

impl TryFrom<SignalRow> for Signal {
    type Error = DomainError;

    fn try_from(row: SignalRow) -> Result<Self, Self::Error> {
        Ok(Signal {
            id: parse_uuid(&row.id)?,
            dimension: row.dimension,
            value: row.value,
            confidence: row.confidence,
            evidence_count: u32::try_from(row.evidence_count)
                .map_err(|e| DomainError::SerializationError(e.to_string()))?,
            created_at: parse_datetime(&row.created_at)?,
            last_updated: parse_datetime(&row.last_updated)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::domain::models::{EvidenceTarget, Grounding};

    async fn setup_test_repo() -> (SqliteSignalRepository, SqlitePool) {
        let pool = create_migrated_test_pool().await.unwrap();
        (SqliteSignalRepository::new(pool.clone()), pool)
    }

    fn evidence_for(signal: &Signal, quote: &str) -> Evidence {
        Evidence::new(
            EvidenceTarget::Signal,
            signal.id.to_string(),
            &Grounding::new(quote, Uuid::new_v4()),
        )
    }

    #[tokio::test]
    async fn test_save_and_get_signal() {
        let (repo, _) = setup_test_repo().await;
        let signal = Signal::first_observation("risk_tolerance", "low", 0.1);

        repo.save_with_evidence(&signal, &evidence_for(&signal, "I never gamble"))
            .await
            .unwrap();

        let by_dimension = repo.get_by_dimension("risk_tolerance").await.unwrap().unwrap();
        assert_eq!(by_dimension.id, signal.id);
        assert_eq!(by_dimension.value, "low");

        let by_id = repo.get(signal.id).await.unwrap().unwrap();
        assert_eq!(by_id.dimension, "risk_tolerance");
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_dimension() {
        let (repo, pool) = setup_test_repo().await;
        let mut signal = Signal::first_observation("moral.care", "high", 0.1);
        repo.save_with_evidence(&signal, &evidence_for(&signal, "I look after people"))
            .await
            .unwrap();

        signal.observe("very high", 0.1);
        repo.save_with_evidence(&signal, &evidence_for(&signal, "I volunteer every week"))
            .await
            .unwrap();

        let all = repo.list_by_prefix("").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].evidence_count, 2);
        assert_eq!(all[0].value, "very high");

        let (evidence_rows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM evidence")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(evidence_rows, 2);
    }

    #[tokio::test]
    async fn test_list_by_prefix_orders_by_confidence() {
        let (repo, _) = setup_test_repo().await;
        let low = Signal::first_observation("big_five.openness", "high", 0.1);
        let high = Signal::first_observation("big_five.neuroticism", "low", 0.3);
        let other = Signal::first_observation("moral.fairness", "high", 0.4);

        for signal in [&low, &high, &other] {
            repo.save_with_evidence(signal, &evidence_for(signal, "quote")).await.unwrap();
        }

        let big_five = repo.list_by_prefix("big_five.").await.unwrap();
        assert_eq!(big_five.len(), 2);
        assert_eq!(big_five[0].dimension, "big_five.neuroticism");
        assert_eq!(big_five[1].dimension, "big_five.openness");
    }

    #[tokio::test]
    async fn test_prefix_wildcards_are_literal() {
        let (repo, _) = setup_test_repo().await;
        let signal = Signal::first_observation("bigXfive.openness", "high", 0.1);
        repo.save_with_evidence(&signal, &evidence_for(&signal, "quote")).await.unwrap();

        assert!(repo.list_by_prefix("big_five.").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_all() {
        let (repo, _) = setup_test_repo().await;
        let signal = Signal::first_observation("growth_mindset", "growth", 0.1);
        repo.save_with_evidence(&signal, &evidence_for(&signal, "quote")).await.unwrap();

        assert_eq!(repo.delete_all().await.unwrap(), 1);
        assert!(repo.get(signal.id).await.unwrap().is_none());
    }
}
