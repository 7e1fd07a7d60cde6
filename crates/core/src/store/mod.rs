//! Persistence boundary for forms and submissions.
//!
//! Stores never retry and never coordinate concurrent writers: the last
//! write wins. Transport failures are reported separately from caller
//! mistakes so the UI can tell them apart.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::error::ValidationError;
use crate::field::id::{FormId, SubmissionId};
use crate::form::model::{Form, StoredForm};
use crate::submission::model::{StoredSubmission, Submission};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("form not found: {0}")]
    NotFound(FormId),

    #[error("invalid stored document: {0}")]
    Invalid(String),

    #[error("store unreachable: {0}")]
    Network(String),

    #[error("store failure: {0}")]
    Server(String),
}

impl StoreError {
    /// Network or server failure, as opposed to a rejected request.
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Network(_) | StoreError::Server(_))
    }
}

#[async_trait]
pub trait FormStore: Send + Sync {
    /// Persist a new form. Fails with `MissingTitle` before any write.
    async fn save_form(&self, form: Form) -> StoreResult<FormId>;

    async fn get_form(&self, id: FormId) -> StoreResult<StoredForm>;

    /// Replace a stored form's content. Fails with `MissingTitle` before
    /// any write.
    async fn update_form(&self, id: FormId, form: Form) -> StoreResult<StoredForm>;

    /// Every form, oldest first.
    async fn list_forms(&self) -> StoreResult<Vec<StoredForm>>;

    /// Persist a submission for `submission.form_id`.
    async fn submit_answers(&self, submission: Submission) -> StoreResult<StoredSubmission>;

    /// Submissions of a form in submission order. Empty when nobody has
    /// answered yet.
    async fn list_responses(&self, form_id: FormId) -> StoreResult<Vec<StoredSubmission>>;

    /// Reachability check for health probes.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
