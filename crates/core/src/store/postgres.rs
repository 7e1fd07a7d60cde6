use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use uuid::Uuid;

use super::{FormStore, StoreError, StoreResult};
use crate::field::id::{FormId, SubmissionId};
use crate::form::model::{Form, StoredForm};
use crate::form::validate::validate_for_save;
use crate::submission::model::{StoredSubmission, Submission, SubmittedValue};

/// PostgreSQL store. Form content and submitted values are JSONB documents.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => StoreError::Network(err.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Invalid(err.to_string())
            }
            other => {
                tracing::error!("database error: {other}");
                StoreError::Server(other.to_string())
            }
        }
    }
}

fn form_from_row(row: &PgRow) -> Result<StoredForm, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let Json(form): Json<Form> = row.try_get("document")?;
    Ok(StoredForm {
        id: FormId::from_uuid(id),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        form,
    })
}

fn submission_from_row(row: &PgRow) -> Result<StoredSubmission, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let form_id: Uuid = row.try_get("form_id")?;
    let Json(submitted_values): Json<Vec<SubmittedValue>> = row.try_get("submitted_values")?;
    let submission_date: DateTime<Utc> = row.try_get("submission_date")?;
    Ok(StoredSubmission {
        id: SubmissionId::from_uuid(id),
        submission_date,
        submission: Submission {
            form_id: FormId::from_uuid(form_id),
            submitted_values,
        },
    })
}

#[async_trait]
impl FormStore for PgStore {
    async fn save_form(&self, form: Form) -> StoreResult<FormId> {
        validate_for_save(&form)?;
        let id = FormId::new();
        sqlx::query(
            "INSERT INTO forms (id, title, document, created_at, updated_at) \
             VALUES ($1, $2, $3, now(), now())",
        )
        .bind(id.as_uuid())
        .bind(&form.title)
        .bind(Json(&form))
        .execute(&self.pool)
        .await?;
        tracing::info!(form_id = %id, "form saved");
        Ok(id)
    }

    async fn get_form(&self, id: FormId) -> StoreResult<StoredForm> {
        let row = sqlx::query(
            "SELECT id, document, created_at, updated_at FROM forms WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?;
        Ok(form_from_row(&row)?)
    }

    async fn update_form(&self, id: FormId, form: Form) -> StoreResult<StoredForm> {
        validate_for_save(&form)?;
        let row = sqlx::query(
            "UPDATE forms SET title = $2, document = $3, updated_at = now() \
             WHERE id = $1 \
             RETURNING id, document, created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(&form.title)
        .bind(Json(&form))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))?;
        tracing::info!(form_id = %id, "form updated");
        Ok(form_from_row(&row)?)
    }

    async fn list_forms(&self) -> StoreResult<Vec<StoredForm>> {
        let rows = sqlx::query(
            "SELECT id, document, created_at, updated_at FROM forms ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| form_from_row(row).map_err(StoreError::from))
            .collect()
    }

    async fn submit_answers(&self, submission: Submission) -> StoreResult<StoredSubmission> {
        let form_id = submission.form_id;
        let exists = sqlx::query("SELECT 1 FROM forms WHERE id = $1")
            .bind(form_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::NotFound(form_id));
        }

        let stored = StoredSubmission::new(submission);
        sqlx::query(
            "INSERT INTO submissions (id, form_id, submitted_values, submission_date) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(stored.id.as_uuid())
        .bind(form_id.as_uuid())
        .bind(Json(&stored.submission.submitted_values))
        .bind(stored.submission_date)
        .execute(&self.pool)
        .await?;
        tracing::info!(form_id = %form_id, submission_id = %stored.id, "answers submitted");
        Ok(stored)
    }

    async fn list_responses(&self, form_id: FormId) -> StoreResult<Vec<StoredSubmission>> {
        let rows = sqlx::query(
            "SELECT id, form_id, submitted_values, submission_date FROM submissions \
             WHERE form_id = $1 ORDER BY submission_date, id",
        )
        .bind(form_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| submission_from_row(row).map_err(StoreError::from))
            .collect()
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
