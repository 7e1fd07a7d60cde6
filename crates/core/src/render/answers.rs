use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::preview::ImagePreview;
use crate::field::id::FieldId;
use crate::field::model::{Field, FieldType};

/// Opaque handle to an uploaded binary (image) held by blob storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobRef {
    #[serde(rename = "blob")]
    pub handle: String,
}

impl BlobRef {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
        }
    }
}

/// The value entered for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Single-valued fields: text, email, phone, url, date, select, radio.
    Text(String),
    /// Checkbox selections in selection order.
    Choices(Vec<String>),
    /// Image uploads.
    Blob(BlobRef),
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        AnswerValue::Text(value)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(value: Vec<String>) -> Self {
        AnswerValue::Choices(value)
    }
}

impl From<BlobRef> for AnswerValue {
    fn from(value: BlobRef) -> Self {
        AnswerValue::Blob(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("field `{field_id}` is a {field_type} field and does not accept a {attempted} answer")]
    WrongControl {
        field_id: FieldId,
        field_type: FieldType,
        attempted: &'static str,
    },
    #[error("`{option}` is not an option of field `{field_id}`")]
    NotAnOption { field_id: FieldId, option: String },
    #[error("`{0}` is not an ISO date (YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("field `{0}` has an unsupported type")]
    Unsupported(FieldId),
}

/// Session-local answers of one fill session, keyed by field identity.
///
/// A field with no entry has not been answered; that is distinct from an
/// entry holding an empty string. Entries iterate in first-answered order.
#[derive(Debug, Clone, Default)]
pub struct AnswerState {
    entries: Vec<(FieldId, AnswerValue)>,
    previews: HashMap<FieldId, ImagePreview>,
}

impl AnswerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: &FieldId) -> Option<&AnswerValue> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &AnswerValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Record `value` for `id`, replacing any earlier answer in place.
    pub fn insert(&mut self, id: FieldId, value: impl Into<AnswerValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((id, value)),
        }
    }

    /// Drop the answer and any staged preview for `id`.
    pub fn remove(&mut self, id: &FieldId) -> Option<AnswerValue> {
        self.previews.remove(id);
        let index = self.entries.iter().position(|(k, _)| k == id)?;
        Some(self.entries.remove(index).1)
    }

    /// Free-text entry for text, textarea, email, phone, url and date fields.
    pub fn set_text(&mut self, field: &Field, value: impl Into<String>) -> Result<(), AnswerError> {
        let value = value.into();
        match field_type(field)? {
            FieldType::Text
            | FieldType::Textarea
            | FieldType::Email
            | FieldType::Phone
            | FieldType::Url => {}
            FieldType::Date => {
                if !value.is_empty() && NaiveDate::parse_from_str(&value, "%Y-%m-%d").is_err() {
                    return Err(AnswerError::InvalidDate(value));
                }
            }
            other => return Err(wrong_control(field, other, "text")),
        }
        self.insert(field.id.clone(), value);
        Ok(())
    }

    /// Single choice for select and radio fields. An empty string clears
    /// the choice back to the placeholder.
    pub fn choose(&mut self, field: &Field, option: &str) -> Result<(), AnswerError> {
        let ty = field_type(field)?;
        if !matches!(ty, FieldType::Select | FieldType::Radio) {
            return Err(wrong_control(field, ty, "single-choice"));
        }
        if !option.is_empty() && !is_option(field, option) {
            return Err(not_an_option(field, option));
        }
        self.insert(field.id.clone(), option);
        Ok(())
    }

    /// Check or uncheck one checkbox option. Checking appends to the end of
    /// the selection if absent; unchecking removes it wherever it sits.
    pub fn toggle(&mut self, field: &Field, option: &str, checked: bool) -> Result<(), AnswerError> {
        let ty = field_type(field)?;
        if ty != FieldType::Checkbox {
            return Err(wrong_control(field, ty, "multi-choice"));
        }
        if !is_option(field, option) {
            return Err(not_an_option(field, option));
        }

        let mut selected = match self.get(&field.id) {
            Some(AnswerValue::Choices(list)) => list.clone(),
            _ => Vec::new(),
        };
        if checked {
            if !selected.iter().any(|s| s == option) {
                selected.push(option.to_string());
            }
        } else {
            selected.retain(|s| s != option);
        }
        self.insert(field.id.clone(), selected);
        Ok(())
    }

    /// Hand an uploaded image to the answer store for image fields.
    pub fn attach_blob(&mut self, field: &Field, blob: BlobRef) -> Result<(), AnswerError> {
        let ty = field_type(field)?;
        if !matches!(ty, FieldType::Image | FieldType::ImageView) {
            return Err(wrong_control(field, ty, "file"));
        }
        self.insert(field.id.clone(), blob);
        Ok(())
    }

    /// Keep a decoded preview for an `image-view` field.
    pub fn stage_preview(&mut self, field: &Field, preview: ImagePreview) -> Result<(), AnswerError> {
        let ty = field_type(field)?;
        if ty != FieldType::ImageView {
            return Err(wrong_control(field, ty, "image preview"));
        }
        self.previews.insert(field.id.clone(), preview);
        Ok(())
    }

    pub fn preview(&self, id: &FieldId) -> Option<&ImagePreview> {
        self.previews.get(id)
    }

    /// Clear every answer and staged preview.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.previews.clear();
    }
}

fn field_type(field: &Field) -> Result<FieldType, AnswerError> {
    field
        .field_type()
        .ok_or_else(|| AnswerError::Unsupported(field.id.clone()))
}

fn is_option(field: &Field, option: &str) -> bool {
    field
        .options()
        .is_some_and(|options| options.iter().any(|o| o == option))
}

fn wrong_control(field: &Field, field_type: FieldType, attempted: &'static str) -> AnswerError {
    AnswerError::WrongControl {
        field_id: field.id.clone(),
        field_type,
        attempted,
    }
}

fn not_an_option(field: &Field, option: &str) -> AnswerError {
    AnswerError::NotAnOption {
        field_id: field.id.clone(),
        option: option.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::FieldPatch;
    use serde_json::json;

    fn checkbox(options: &[&str]) -> Field {
        let mut field = Field::new(FieldType::Checkbox);
        FieldPatch::default()
            .options(options.iter().map(|o| o.to_string()).collect())
            .apply(&mut field)
            .unwrap();
        field
    }

    #[test]
    fn checkbox_keeps_selection_order() {
        let field = checkbox(&["A", "B", "C"]);
        let mut answers = AnswerState::new();
        answers.toggle(&field, "A", true).unwrap();
        answers.toggle(&field, "B", true).unwrap();
        answers.toggle(&field, "A", false).unwrap();
        assert_eq!(answers.get(&field.id), Some(&AnswerValue::Choices(vec!["B".into()])));

        answers.toggle(&field, "C", true).unwrap();
        answers.toggle(&field, "A", true).unwrap();
        answers.toggle(&field, "C", true).unwrap();
        assert_eq!(
            answers.get(&field.id),
            Some(&AnswerValue::Choices(vec!["B".into(), "C".into(), "A".into()]))
        );
    }

    #[test]
    fn checkbox_rejects_foreign_option() {
        let field = checkbox(&["A"]);
        let mut answers = AnswerState::new();
        assert!(matches!(
            answers.toggle(&field, "Z", true),
            Err(AnswerError::NotAnOption { .. })
        ));
        assert!(answers.is_empty());
    }

    #[test]
    fn select_accepts_option_or_empty() {
        let field = Field::new(FieldType::Select);
        let mut answers = AnswerState::new();
        answers.choose(&field, "Option 2").unwrap();
        assert_eq!(answers.get(&field.id), Some(&AnswerValue::from("Option 2")));
        answers.choose(&field, "").unwrap();
        assert_eq!(answers.get(&field.id), Some(&AnswerValue::from("")));
        assert!(answers.choose(&field, "Option 9").is_err());
    }

    #[test]
    fn text_answer_on_choice_field_is_rejected() {
        let field = Field::new(FieldType::Radio);
        let mut answers = AnswerState::new();
        assert!(matches!(
            answers.set_text(&field, "free text"),
            Err(AnswerError::WrongControl { .. })
        ));
    }

    #[test]
    fn date_must_be_iso() {
        let field = Field::new(FieldType::Date);
        let mut answers = AnswerState::new();
        answers.set_text(&field, "2024-06-01").unwrap();
        assert_eq!(
            answers.set_text(&field, "06/01/2024"),
            Err(AnswerError::InvalidDate("06/01/2024".into()))
        );
        assert_eq!(answers.get(&field.id), Some(&AnswerValue::from("2024-06-01")));
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut answers = AnswerState::new();
        answers.insert(FieldId::from("a"), "1");
        answers.insert(FieldId::from("b"), "2");
        answers.insert(FieldId::from("a"), "3");
        let keys: Vec<&str> = answers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(answers.get(&FieldId::from("a")), Some(&AnswerValue::from("3")));
    }

    #[test]
    fn reset_clears_answers_and_previews() {
        let field = Field::new(FieldType::ImageView);
        let mut answers = AnswerState::new();
        answers.attach_blob(&field, BlobRef::new("abc.png")).unwrap();
        answers
            .stage_preview(&field, ImagePreview::from_data_url("data:image/png;base64,AA=="))
            .unwrap();
        answers.reset();
        assert!(answers.is_empty());
        assert!(answers.preview(&field.id).is_none());
    }

    #[test]
    fn remove_clears_preview_without_answer() {
        let field = Field::new(FieldType::ImageView);
        let mut answers = AnswerState::new();
        answers
            .stage_preview(&field, ImagePreview::from_data_url("data:image/png;base64,AA=="))
            .unwrap();

        assert_eq!(answers.remove(&field.id), None);
        assert!(answers.preview(&field.id).is_none());
    }

    #[test]
    fn answer_value_wire_shapes() {
        assert_eq!(serde_json::to_value(AnswerValue::from("x")).unwrap(), json!("x"));
        assert_eq!(
            serde_json::to_value(AnswerValue::from(vec!["o1".to_string()])).unwrap(),
            json!(["o1"])
        );
        let blob: AnswerValue = serde_json::from_value(json!({"blob": "f00.png"})).unwrap();
        assert_eq!(blob, AnswerValue::Blob(BlobRef::new("f00.png")));
    }
}
