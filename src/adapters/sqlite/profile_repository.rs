//! SQLite implementation of the ProfileRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_datetime, insert_evidence, parse_datetime, parse_enum, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    normalize_key, Challenge, ChallengeStatus, Evidence, Goal, GoalStatus, IntentObservation,
    IntentType, MaslowLevel, MaslowObservation, MaslowObservationType, Value, ValueType,
};
use crate::domain::ports::ProfileRepository;

#[derive(Clone)]
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn to_count(raw: i64) -> DomainResult<u32> {
    u32::try_from(raw).map_err(|e| DomainError::SerializationError(e.to_string()))
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn find_value(&self, name: &str) -> DomainResult<Option<Value>> {
        let row: Option<ValueRow> = sqlx::query_as("SELECT * FROM profile_values WHERE name = ?")
            .bind(normalize_key(name))
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn save_value(&self, value: &Value, evidence: &Evidence) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO profile_values (id, name, value_type, confidence, mention_count, first_seen, last_seen)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   value_type = excluded.value_type,
                   confidence = excluded.confidence,
                   mention_count = excluded.mention_count,
                   last_seen = excluded.last_seen"#
        )
        .bind(value.id.to_string())
        .bind(&value.name)
        .bind(value.value_type.as_str())
        .bind(value.confidence)
        .bind(i64::from(value.mention_count))
        .bind(format_datetime(&value.first_seen))
        .bind(format_datetime(&value.last_seen))
        .execute(&mut *tx)
        .await?;

        insert_evidence(&mut tx, evidence).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_values(&self) -> DomainResult<Vec<Value>> {
        let rows: Vec<ValueRow> = sqlx::query_as(
            "SELECT * FROM profile_values ORDER BY confidence DESC, mention_count DESC, name ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_challenge(&self, description: &str) -> DomainResult<Option<Challenge>> {
        let row: Option<ChallengeRow> = sqlx::query_as("SELECT * FROM challenges WHERE normalized = ?")
            .bind(normalize_key(description))
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_challenge(&self, id: Uuid) -> DomainResult<Option<Challenge>> {
        let row: Option<ChallengeRow> = sqlx::query_as("SELECT * FROM challenges WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn save_challenge(&self, challenge: &Challenge, evidence: Option<&Evidence>) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO challenges (id, description, normalized, status, mention_count, first_seen, last_seen)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   status = excluded.status,
                   mention_count = excluded.mention_count,
                   last_seen = excluded.last_seen"#
        )
        .bind(challenge.id.to_string())
        .bind(&challenge.description)
        .bind(normalize_key(&challenge.description))
        .bind(challenge.status.as_str())
        .bind(i64::from(challenge.mention_count))
        .bind(format_datetime(&challenge.first_seen))
        .bind(format_datetime(&challenge.last_seen))
        .execute(&mut *tx)
        .await?;

        if let Some(evidence) = evidence {
            insert_evidence(&mut tx, evidence).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_challenges(&self, status: Option<ChallengeStatus>) -> DomainResult<Vec<Challenge>> {
        let rows: Vec<ChallengeRow> = sqlx::query_as(
            r#"SELECT * FROM challenges
               WHERE ?1 IS NULL OR status = ?1
               ORDER BY mention_count DESC, last_seen DESC"#
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn find_goal(&self, description: &str) -> DomainResult<Option<Goal>> {
        let row: Option<GoalRow> = sqlx::query_as("SELECT * FROM goals WHERE normalized = ?")
            .bind(normalize_key(description))
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_goal(&self, id: Uuid) -> DomainResult<Option<Goal>> {
        let row: Option<GoalRow> = sqlx::query_as("SELECT * FROM goals WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn save_goal(&self, goal: &Goal, evidence: Option<&Evidence>) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO goals (id, description, normalized, status, mention_count, first_seen, last_seen)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(id) DO UPDATE SET
                   status = excluded.status,
                   mention_count = excluded.mention_count,
                   last_seen = excluded.last_seen"#
        )
        .bind(goal.id.to_string())
        .bind(&goal.description)
        .bind(normalize_key(&goal.description))
        .bind(goal.status.as_str())
        .bind(i64::from(goal.mention_count))
        .bind(format_datetime(&goal.first_seen))
        .bind(format_datetime(&goal.last_seen))
        .execute(&mut *tx)
        .await?;

        if let Some(evidence) = evidence {
            insert_evidence(&mut tx, evidence).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_goals(&self) -> DomainResult<Vec<Goal>> {
        let rows: Vec<GoalRow> = sqlx::query_as("SELECT * FROM goals ORDER BY last_seen DESC, rowid DESC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn add_maslow(&self, observation: &MaslowObservation, evidence: &Evidence) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO maslow_observations (id, level, observation_type, description, created_at)
               VALUES (?, ?, ?, ?, ?)"#
        )
        .bind(observation.id.to_string())
        .bind(observation.level.as_str())
        .bind(observation.observation_type.as_str())
        .bind(&observation.description)
        .bind(format_datetime(&observation.created_at))
        .execute(&mut *tx)
        .await?;

        insert_evidence(&mut tx, evidence).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_maslow(&self, limit: Option<usize>) -> DomainResult<Vec<MaslowObservation>> {
        // SQLite treats a negative LIMIT as no limit.
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let rows: Vec<MaslowRow> = sqlx::query_as(
            "SELECT * FROM maslow_observations ORDER BY created_at DESC, rowid DESC LIMIT ?"
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn add_intent(&self, intent: &IntentObservation, evidence: &Evidence) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO intent_observations (id, conversation_id, intent_type, description, created_at)
               VALUES (?, ?, ?, ?, ?)"#
        )
        .bind(intent.id.to_string())
        .bind(intent.conversation_id.to_string())
        .bind(intent.intent_type.as_str())
        .bind(&intent.description)
        .bind(format_datetime(&intent.created_at))
        .execute(&mut *tx)
        .await?;

        insert_evidence(&mut tx, evidence).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn distinct_intent_types(&self) -> DomainResult<Vec<IntentType>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT intent_type FROM intent_observations ORDER BY intent_type"
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|(raw,)| parse_enum("intent_type", raw, IntentType::from_str))
            .collect()
    }

    async fn latest_intent(&self, conversation_id: Uuid) -> DomainResult<Option<IntentObservation>> {
        let row: Option<IntentRow> = sqlx::query_as(
            r#"SELECT * FROM intent_observations WHERE conversation_id = ?
               ORDER BY created_at DESC, rowid DESC LIMIT 1"#
        )
        .bind(conversation_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn delete_all(&self) -> DomainResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut deleted = 0;
        for table in [
            "profile_values",
            "challenges",
            "goals",
            "maslow_observations",
            "intent_observations",
        ] {
            let result = sqlx::query(&format!("DELETE FROM {table}")).execute(&mut *tx).await?;
            deleted += result.rows_affected();
        }
        tx.commit().await?;
        Ok(deleted)
    }
}

#[derive(sqlx::FromRow)]
struct ValueRow {
    id: String,
    name: String,
    value_type: String,
    confidence: f64,
    mention_count: i64,
    first_seen: String,
    last_seen: String,
}

impl TryFrom<ValueRow> for Value {
    type Error = DomainError;

    fn try_from(row: ValueRow) -> Result<Self, Self::Error> {
        Ok(Value {
            id: parse_uuid(&row.id)?,
            name: row.name,
            value_type: parse_enum("value_type", &row.value_type, ValueType::from_str)?,
            confidence: row.confidence,
            mention_count: to_count(row.mention_count)?,
            first_seen: parse_datetime(&row.first_seen)?,
            last_seen: parse_datetime(&row.last_seen)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ChallengeRow {
    id: String,
    description: String,
    status: String,
    mention_count: i64,
    first_seen: String,
    last_seen: String,
}

impl TryFrom<ChallengeRow> for Challenge {
    type Error = DomainError;

    fn try_from(row: ChallengeRow) -> Result<Self, Self::Error> {
        Ok(Challenge {
            id: parse_uuid(&row.id)?,
            description: row.description,
            status: parse_enum("status", &row.status, ChallengeStatus::from_str)?,
            mention_count: to_count(row.mention_count)?,
            first_seen: parse_datetime(&row.first_seen)?,
            last_seen: parse_datetime(&row.last_seen)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct GoalRow {
    id: String,
    description: String,
    status: String,
    mention_count: i64,
    first_seen: String,
    last_seen: String,
}

impl TryFrom<GoalRow> for Goal {
    type Error = DomainError;

    fn try_from(row: GoalRow) -> Result<Self, Self::Error> {
        Ok(Goal {
            id: parse_uuid(&row.id)?,
            description: row.description,
            status: parse_enum("status", &row.status, GoalStatus::from_str)?,
            mention_count: to_count(row.mention_count)?,
            first_seen: parse_datetime(&row.first_seen)?,
            last_seen: parse_datetime(&row.last_seen)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct MaslowRow {
    id: String,
    level: String,
    observation_type: String,
    description: String,
    created_at: String,
}

impl TryFrom<MaslowRow> for MaslowObservation {
    type Error = DomainError;

    fn try_from(row: MaslowRow) -> Result<Self, Self::Error> {
        Ok(MaslowObservation {
            id: parse_uuid(&row.id)?,
            level: parse_enum("level", &row.level, MaslowLevel::from_str)?,
            observation_type: parse_enum(
                "observation_type",
                &row.observation_type,
                MaslowObservationType::from_str,
            )?,
            description: row.description,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct IntentRow {
    id: String,
    conversation_id: String,
    intent_type: String,
    description: String,
    created_at: String,
}

impl TryFrom<IntentRow> for IntentObservation {
    type Error = DomainError;

    fn try_from(row: IntentRow) -> Result<Self, Self::Error> {
        Ok(IntentObservation {
            id: parse_uuid(&row.id)?,
            conversation_id: parse_uuid(&row.conversation_id)?,
            intent_type: parse_enum("intent_type", &row.intent_type, IntentType::from_str)?,
            description: row.description,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
