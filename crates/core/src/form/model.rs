use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::id::{FieldId, FormId};
use crate::field::model::Field;

/// One buildable, publishable form document.
///
/// `fields` order is authoritative: it is the render and display order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub event_date_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Form {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.iter().find(|f| &f.id == id)
    }

    pub fn position(&self, id: &FieldId) -> Option<usize> {
        self.fields.iter().position(|f| &f.id == id)
    }
}

/// A form as returned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredForm {
    #[serde(rename = "_id")]
    pub id: FormId,
    #[serde(rename = "_createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "_updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub form: Form,
}

impl StoredForm {
    pub fn new(id: FormId, form: Form) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            updated_at: now,
            form,
        }
    }
}
