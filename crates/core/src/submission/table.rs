use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::codec::{decode_columns, Column, TabularRow};
use super::model::StoredSubmission;
use crate::field::id::{FieldId, SubmissionId};
use crate::form::model::Form;

pub const SERIAL_HEADER: &str = "S.No";
pub const DATE_HEADER: &str = "Submission Date";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRow {
    /// 1-based position among the rows of this table.
    pub serial: usize,
    pub submission_id: SubmissionId,
    pub submission_date: DateTime<Utc>,
    pub cells: TabularRow,
}

impl ResponseRow {
    /// Flat record in [`ResponseTable::header`] order.
    pub fn record(&self) -> Vec<String> {
        let mut record = vec![
            self.serial.to_string(),
            self.submission_date.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ];
        record.extend(self.cells.values().map(str::to_string));
        record
    }
}

/// All responses of a form, decoded for display or export.
///
/// Columns are every field id that appears in any submission, in the
/// order first seen, not the form's current field list: older
/// submissions may reference fields that have since been removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTable {
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<ResponseRow>,
}

impl ResponseTable {
    pub fn build(form: &Form, submissions: &[StoredSubmission]) -> Self {
        Self::search(form, submissions, "")
    }

    /// Keep only submissions with a value containing `term`,
    /// case-insensitively. Columns still span every submission.
    pub fn search(form: &Form, submissions: &[StoredSubmission], term: &str) -> Self {
        let columns = columns(form, submissions);
        let term = term.trim().to_lowercase();

        let rows = submissions
            .iter()
            .filter(|s| term.is_empty() || matches_term(s, &term))
            .enumerate()
            .map(|(index, stored)| ResponseRow {
                serial: index + 1,
                submission_id: stored.id,
                submission_date: stored.submission_date,
                cells: decode_columns(&stored.submission, &columns),
            })
            .collect();

        Self {
            title: form.title.clone(),
            columns,
            rows,
        }
    }

    pub fn header(&self) -> Vec<String> {
        let mut header = vec![SERIAL_HEADER.to_string(), DATE_HEADER.to_string()];
        header.extend(self.columns.iter().map(|c| c.label.clone()));
        header
    }
}

fn columns(form: &Form, submissions: &[StoredSubmission]) -> Vec<Column> {
    let mut seen: Vec<&FieldId> = Vec::new();
    for value in submissions
        .iter()
        .flat_map(|s| s.submission.submitted_values.iter())
    {
        if !seen.iter().any(|id| id.as_str() == value.field_id.as_str()) {
            seen.push(&value.field_id);
        }
    }
    seen.into_iter()
        .map(|id| Column::resolve(id, &form.fields))
        .collect()
}

fn matches_term(stored: &StoredSubmission, term: &str) -> bool {
    stored.submission.submitted_values.iter().any(|v| {
        serde_json::to_string(&v.value)
            .map(|json| json.to_lowercase().contains(term))
            .unwrap_or(false)
    })
}
