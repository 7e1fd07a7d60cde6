use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use super::{FormStore, StoreError, StoreResult};
use crate::field::id::FormId;
use crate::form::model::{Form, StoredForm};
use crate::form::validate::validate_for_save;
use crate::submission::model::{StoredSubmission, Submission};

/// In-memory store (for tests and local development).
#[derive(Debug, Default)]
pub struct MemoryStore {
    forms: RwLock<HashMap<FormId, StoredForm>>,
    responses: RwLock<Vec<StoredSubmission>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormStore for MemoryStore {
    async fn save_form(&self, form: Form) -> StoreResult<FormId> {
        validate_for_save(&form)?;
        let stored = StoredForm::new(FormId::new(), form);
        let id = stored.id;
        self.forms.write().insert(id, stored);
        tracing::info!(form_id = %id, "form saved");
        Ok(id)
    }

    async fn get_form(&self, id: FormId) -> StoreResult<StoredForm> {
        self.forms
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update_form(&self, id: FormId, form: Form) -> StoreResult<StoredForm> {
        validate_for_save(&form)?;
        let mut forms = self.forms.write();
        let stored = forms.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        stored.form = form;
        stored.updated_at = Utc::now();
        tracing::info!(form_id = %id, "form updated");
        Ok(stored.clone())
    }

    async fn list_forms(&self) -> StoreResult<Vec<StoredForm>> {
        let mut forms: Vec<StoredForm> = self.forms.read().values().cloned().collect();
        forms.sort_by_key(|f| f.created_at);
        Ok(forms)
    }

    async fn submit_answers(&self, submission: Submission) -> StoreResult<StoredSubmission> {
        let form_id = submission.form_id;
        if !self.forms.read().contains_key(&form_id) {
            return Err(StoreError::NotFound(form_id));
        }
        let stored = StoredSubmission::new(submission);
        self.responses.write().push(stored.clone());
        tracing::info!(form_id = %form_id, submission_id = %stored.id, "answers submitted");
        Ok(stored)
    }

    async fn list_responses(&self, form_id: FormId) -> StoreResult<Vec<StoredSubmission>> {
        Ok(self
            .responses
            .read()
            .iter()
            .filter(|s| s.submission.form_id == form_id)
            .cloned()
            .collect())
    }
}
