//! SQLite implementation of the EvidenceRepository.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{insert_evidence, parse_datetime, parse_enum, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Evidence, EvidenceTarget};
use crate::domain::ports::EvidenceRepository;

#[derive(Clone)]
pub struct SqliteEvidenceRepository {
    pool: SqlitePool,
}

impl SqliteEvidenceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EvidenceRepository for SqliteEvidenceRepository {
    async fn append(&self, evidence: &Evidence) -> DomainResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_evidence(&mut conn, evidence).await
    }

    async fn list_for_targets(
        &self,
        target_type: EvidenceTarget,
        target_ids: &[String],
    ) -> DomainResult<Vec<Evidence>> {
        if target_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM evidence WHERE target_type = ");
        builder.push_bind(target_type.as_str());
        builder.push(" AND target_id IN (");
        let mut separated = builder.separated(", ");
        for id in target_ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(") ORDER BY created_at ASC, rowid ASC");

        let rows: Vec<EvidenceRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let result = sqlx::query("DELETE FROM evidence").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[derive(sqlx::FromRow)]
struct EvidenceRow {
    id: String,
    target_type: String,
    target_id: String,
    source_message_id: String,
    quote: String,
    created_at: String,
}

impl TryFrom<EvidenceRow> for Evidence {
    type Error = DomainError;

    fn try_from(row: EvidenceRow) -> Result<Self, Self::Error> {
        Ok(Evidence {
            id: parse_uuid(&row.id)?,
            target_type: parse_enum("target_type", &row.target_type, EvidenceTarget::from_str)?,
            target_id: row.target_id,
            source_message_id: parse_uuid(&row.source_message_id)?,
            quote: row.quote,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::domain::models::Grounding;
    use uuid::Uuid;

    async fn setup_test_repo() -> SqliteEvidenceRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteEvidenceRepository::new(pool)
    }

    #[tokio::test]
    async fn test_list_for_targets_matches_any_id() {
        let repo = setup_test_repo().await;
        let message_id = Uuid::new_v4();
        let signal_id = Uuid::new_v4().to_string();

        let by_id = Evidence::new(EvidenceTarget::Signal, signal_id.clone(), &Grounding::new("first", message_id));
        let by_key = Evidence::new(EvidenceTarget::Signal, "risk_tolerance", &Grounding::new("second", message_id));
        let unrelated = Evidence::new(EvidenceTarget::Signal, "moral.care", &Grounding::new("third", message_id));

        for evidence in [&by_id, &by_key, &unrelated] {
            repo.append(evidence).await.unwrap();
        }

        let found = repo
            .list_for_targets(EvidenceTarget::Signal, &[signal_id, "risk_tolerance".to_string()])
            .await
            .unwrap();
        let quotes: Vec<_> = found.iter().map(|e| e.quote.as_str()).collect();
        assert_eq!(quotes, vec!["first", "second"]);
        assert!(found.iter().all(|e| e.source_message_id == message_id));
    }

    #[tokio::test]
    async fn test_target_type_is_respected() {
        let repo = setup_test_repo().await;
        let grounding = Grounding::new("I value honesty", Uuid::new_v4());
        repo.append(&Evidence::new(EvidenceTarget::Value, "shared-id", &grounding)).await.unwrap();

        let signal_evidence = repo
            .list_for_targets(EvidenceTarget::Signal, &["shared-id".to_string()])
            .await
            .unwrap();
        assert!(signal_evidence.is_empty());
    }

    #[tokio::test]
    async fn test_empty_target_list() {
        let repo = setup_test_repo().await;
        assert!(repo.list_for_targets(EvidenceTarget::Goal, &[]).await.unwrap().is_empty());
    }
}
