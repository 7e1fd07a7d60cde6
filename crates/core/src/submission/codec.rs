//! Answer state to submission, and submission back to display rows.
//!
//! The on-screen response table and every export read rows produced here,
//! so both always show the same text for the same submission.
use serde::{Deserialize, Serialize};

use super::model::{Submission, SubmittedValue};
use crate::field::id::{FieldId, FormId};
use crate::field::model::Field;
use crate::render::answers::{AnswerState, AnswerValue};

/// Displayed when a submission has no (or an empty) value for a column.
pub const NO_VALUE: &str = "No value provided";
/// Joins checkbox selections into one display string.
pub const LIST_SEPARATOR: &str = ", ";

/// Serialize answer state. One entry per answered field, in answer-state
/// order; unanswered fields produce no entry at all.
pub fn encode(form_id: FormId, answers: &AnswerState) -> Submission {
    let submitted_values = answers
        .iter()
        .map(|(field_id, value)| SubmittedValue {
            field_id: field_id.clone(),
            value: value.clone(),
        })
        .collect();
    Submission {
        form_id,
        submitted_values,
    }
}

/// A labeled column of a response row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub field_id: FieldId,
    pub label: String,
}

impl Column {
    /// Label from the current schema, or `Field {id}` when the field has
    /// since been removed.
    pub fn resolve(field_id: &FieldId, fields: &[Field]) -> Self {
        let label = match find_field(fields, field_id) {
            Some(field) => field.label.clone(),
            None => {
                tracing::debug!(field_id = %field_id, "submitted field missing from current schema");
                drift_label(field_id)
            }
        };
        Self {
            field_id: field_id.clone(),
            label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub field_id: FieldId,
    pub label: String,
    pub value: String,
}

/// One submission flattened to display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabularRow {
    pub cells: Vec<Cell>,
}

impl TabularRow {
    pub fn get(&self, field_id: &FieldId) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| &c.field_id == field_id)
            .map(|c| c.value.as_str())
    }

    pub fn by_label(&self, label: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|c| c.value.as_str())
    }
}

/// Decode one submission against the schema the viewer currently holds.
///
/// Every non-action field of the schema gets a cell, in schema order.
/// Submitted values whose field no longer exists are appended under a
/// `Field {id}` label rather than dropped.
pub fn decode(submission: &Submission, fields: &[Field]) -> TabularRow {
    let mut columns: Vec<Column> = fields
        .iter()
        .filter(|f| !f.is_action())
        .map(|f| Column {
            field_id: f.id.clone(),
            label: f.label.clone(),
        })
        .collect();

    for value in &submission.submitted_values {
        let known = columns
            .iter()
            .any(|c| c.field_id.as_str() == value.field_id.as_str());
        if !known && find_field(fields, &value.field_id).is_none() {
            columns.push(Column::resolve(&value.field_id, fields));
        }
    }

    decode_columns(submission, &columns)
}

/// Decode one submission into the given columns.
pub fn decode_columns(submission: &Submission, columns: &[Column]) -> TabularRow {
    let cells = columns
        .iter()
        .map(|column| Cell {
            field_id: column.field_id.clone(),
            label: column.label.clone(),
            value: display_value(submission.value_of(&column.field_id)),
        })
        .collect();
    TabularRow { cells }
}

/// Display text of a submitted value.
pub fn display_value(value: Option<&AnswerValue>) -> String {
    match value {
        None => NO_VALUE.to_string(),
        Some(AnswerValue::Text(s)) if s.is_empty() => NO_VALUE.to_string(),
        Some(AnswerValue::Text(s)) => s.clone(),
        Some(AnswerValue::Choices(list)) => list.join(LIST_SEPARATOR),
        Some(AnswerValue::Blob(blob)) => blob.handle.clone(),
    }
}

fn find_field<'a>(fields: &'a [Field], id: &FieldId) -> Option<&'a Field> {
    fields.iter().find(|f| f.id.as_str() == id.as_str())
}

fn drift_label(field_id: &FieldId) -> String {
    format!("Field {field_id}")
}
