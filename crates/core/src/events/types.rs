use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::id::{FormId, SubmissionId};

/// Events emitted after successful writes to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormEvent {
    FormSaved(FormChange),
    FormUpdated(FormChange),
    SubmissionReceived(SubmissionReceived),
}

impl FormEvent {
    pub fn form_id(&self) -> FormId {
        match self {
            FormEvent::FormSaved(change) | FormEvent::FormUpdated(change) => change.form_id,
            FormEvent::SubmissionReceived(received) => received.form_id,
        }
    }

    /// Wire tag of the event.
    pub fn kind(&self) -> &'static str {
        match self {
            FormEvent::FormSaved(_) => "formSaved",
            FormEvent::FormUpdated(_) => "formUpdated",
            FormEvent::SubmissionReceived(_) => "submissionReceived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormChange {
    pub form_id: FormId,
    pub title: String,
    pub field_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReceived {
    pub form_id: FormId,
    pub submission_id: SubmissionId,
    pub value_count: usize,
    pub timestamp: DateTime<Utc>,
}
