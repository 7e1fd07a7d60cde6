use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::id::{FieldId, FormId, SubmissionId};
use crate::render::answers::AnswerValue;

/// One `(fieldId, value)` pair of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedValue {
    pub field_id: FieldId,
    pub value: AnswerValue,
}

/// Answers of one fill session, joined to form fields by `fieldId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub form_id: FormId,
    #[serde(default)]
    pub submitted_values: Vec<SubmittedValue>,
}

impl Submission {
    /// First value recorded for `id`. Ids compare as strings.
    pub fn value_of(&self, id: &FieldId) -> Option<&AnswerValue> {
        self.submitted_values
            .iter()
            .find(|v| v.field_id.as_str() == id.as_str())
            .map(|v| &v.value)
    }
}

/// A persisted, immutable submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission {
    #[serde(rename = "_id")]
    pub id: SubmissionId,
    pub submission_date: DateTime<Utc>,
    #[serde(flatten)]
    pub submission: Submission,
}

impl StoredSubmission {
    pub fn new(submission: Submission) -> Self {
        Self {
            id: SubmissionId::new(),
            submission_date: Utc::now(),
            submission,
        }
    }
}
