use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::resume::{Resume, ResumeSummary};
use crate::{Error, Result};

const INIT_SQL: &str = r"
CREATE TABLE IF NOT EXISTS resumes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    data TEXT NOT NULL,
    last_updated TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_resumes_updated ON resumes(last_updated);
";

/// Flat key-value store for finalized resume records, keyed by identifier.
/// The record JSON round-trips unchanged; identifier generation and
/// timestamping happen here, not in the pipeline.
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn open(path: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&format!("sqlite:{path}?mode=rwc"))
            .await?;

        sqlx::query(INIT_SQL).execute(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn open_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        sqlx::query(INIT_SQL).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Persist a record, assigning an identifier when absent and stamping
    /// `last_updated`. Returns the record as stored.
    pub async fn save(&self, mut resume: Resume) -> Result<Resume> {
        let id = *resume.id.get_or_insert_with(Uuid::new_v4);
        let last_updated = Utc::now();
        resume.last_updated = Some(last_updated);

        let data = serde_json::to_string(&resume)?;

        sqlx::query(
            r"
            INSERT INTO resumes (id, name, data, last_updated)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                data = excluded.data,
                last_updated = excluded.last_updated
            ",
        )
        .bind(id.to_string())
        .bind(resume.display_name())
        .bind(data)
        .bind(last_updated.to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::info!(%id, "saved resume");
        Ok(resume)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Resume>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT data FROM resumes WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|(data,)| serde_json::from_str(&data))
            .transpose()
            .map_err(Error::from)
    }

    pub async fn list(&self) -> Result<Vec<ResumeSummary>> {
        let rows: Vec<(String, String, String)> =
            sqlx::query_as("SELECT id, name, last_updated FROM resumes ORDER BY last_updated DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|(id, name, last_updated)| {
                let id = Uuid::parse_str(&id)
                    .map_err(|e| Error::InvalidRecord(format!("bad id {id}: {e}")))?;
                let last_updated = DateTime::parse_from_rfc3339(&last_updated)
                    .map_err(|e| Error::InvalidRecord(format!("bad timestamp: {e}")))?
                    .with_timezone(&Utc);
                Ok(ResumeSummary {
                    id,
                    name,
                    last_updated,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::SkillEntry;

    fn sample_resume() -> Resume {
        let mut resume = Resume::new();
        resume.personal_info.name = Some("Jane Doe".to_string());
        resume.skills.push(SkillEntry::new("Python"));
        resume.languages.push("English".to_string());
        resume
    }

    #[tokio::test]
    async fn test_save_assigns_id_and_timestamp() {
        let storage = Storage::open_memory().await.unwrap();

        let saved = storage.save(sample_resume()).await.unwrap();

        assert!(saved.id.is_some());
        assert!(saved.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_record() {
        let storage = Storage::open_memory().await.unwrap();

        let saved = storage.save(sample_resume()).await.unwrap();
        let loaded = storage.get(saved.id.unwrap()).await.unwrap().unwrap();

        assert_eq!(saved, loaded);
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let storage = Storage::open_memory().await.unwrap();
        let result = storage.get(Uuid::new_v4()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_summaries() {
        let storage = Storage::open_memory().await.unwrap();

        storage.save(sample_resume()).await.unwrap();
        storage.save(Resume::new()).await.unwrap();

        let summaries = storage.list().await.unwrap();

        assert_eq!(summaries.len(), 2);
        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"Jane Doe"));
        assert!(names.contains(&"Unnamed Resume"));
    }

    #[tokio::test]
    async fn test_save_twice_updates_in_place() {
        let storage = Storage::open_memory().await.unwrap();

        let mut saved = storage.save(sample_resume()).await.unwrap();
        saved.personal_info.name = Some("Jane Smith".to_string());
        let updated = storage.save(saved).await.unwrap();

        let summaries = storage.list().await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name, "Jane Smith");
        assert_eq!(summaries[0].id, updated.id.unwrap());
    }
}
