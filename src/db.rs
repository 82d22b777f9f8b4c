use std::path::Path;

use chrono::NaiveDateTime;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow,
};
use sqlx::Row;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{AssessmentRecord, Dimension, NewAssessment, ValidationError};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid assessment: {0}")]
    Invalid(#[from] ValidationError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// File-backed repository of assessment rows.
///
/// Opening a store runs [`Store::initialize`], so a constructed store is
/// always in the ready state unless the table is removed behind its back.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        // Single writer, single connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.initialize().await?;
        debug!(path = %path.display(), "assessment store ready");
        Ok(store)
    }

    /// Creates the `assessments` table when absent. Existing rows are left alone.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS assessments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                department TEXT NOT NULL,
                tech_score REAL,
                culture_score REAL,
                process_score REAL,
                skills_score REAL,
                risk_score REAL,
                timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Validates and appends one assessment, returning its id.
    pub async fn save_assessment(&self, assessment: &NewAssessment) -> Result<i64, StoreError> {
        assessment.validate()?;
        let mut conn = self.pool.acquire().await?;
        let id = insert(&mut *conn, assessment).await?;
        info!(id, department = %assessment.department, "assessment saved");
        Ok(id)
    }

    /// Writes every assessment in one transaction. Nothing is written if
    /// any row fails validation or insertion.
    pub async fn save_batch(&self, assessments: &[NewAssessment]) -> Result<Vec<i64>, StoreError> {
        for assessment in assessments {
            assessment.validate()?;
        }

        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(assessments.len());
        for assessment in assessments {
            ids.push(insert(&mut *tx, assessment).await?);
        }
        tx.commit().await?;

        Ok(ids)
    }

    /// Every stored assessment in insertion order.
    ///
    /// Never fails: an unreadable store is logged and reported as empty,
    /// so callers treat "no data" and "store unavailable" the same way.
    pub async fn load_all(&self) -> Vec<AssessmentRecord> {
        let rows = sqlx::query(
            r#"
            SELECT id, department, tech_score, culture_score, process_score,
                   skills_score, risk_score, timestamp
            FROM assessments
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        let result: Result<Vec<AssessmentRecord>, sqlx::Error> =
            rows.and_then(|rows| rows.iter().map(record_from_row).collect());
        match result {
            Ok(records) => records,
            Err(err) => {
                warn!(error = %err, "assessment store unavailable, returning no rows");
                Vec::new()
            }
        }
    }

    /// Deletes every assessment. Failures are logged, not returned.
    pub async fn clear_all(&self) {
        match sqlx::query("DELETE FROM assessments").execute(&self.pool).await {
            Ok(result) => info!(rows = result.rows_affected(), "assessments cleared"),
            Err(err) => warn!(error = %err, "failed to clear assessments"),
        }
    }

    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

async fn insert(
    conn: &mut SqliteConnection,
    assessment: &NewAssessment,
) -> Result<i64, sqlx::Error> {
    let scores = &assessment.scores;
    let result = sqlx::query(
        r#"
        INSERT INTO assessments
        (department, tech_score, culture_score, process_score, skills_score, risk_score)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&assessment.department)
    .bind(scores.get(Dimension::Tech))
    .bind(scores.get(Dimension::Culture))
    .bind(scores.get(Dimension::Process))
    .bind(scores.get(Dimension::Skills))
    .bind(scores.get(Dimension::Risk))
    .execute(conn)
    .await?;

    Ok(result.last_insert_rowid())
}

fn record_from_row(row: &SqliteRow) -> Result<AssessmentRecord, sqlx::Error> {
    Ok(AssessmentRecord {
        id: row.try_get("id")?,
        department: row.try_get("department")?,
        tech_score: row.try_get("tech_score")?,
        culture_score: row.try_get("culture_score")?,
        process_score: row.try_get("process_score")?,
        skills_score: row.try_get("skills_score")?,
        risk_score: row.try_get("risk_score")?,
        created_at: row.try_get::<NaiveDateTime, _>("timestamp")?,
    })
}
