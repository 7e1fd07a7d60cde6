/// Partial field updates.
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::field::model::Field;

/// Attributes to merge into an existing field. `id` and `type` are not
/// patchable; changing a field's type means removing it and adding a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldPatch {
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// A patch carrying every editable attribute of `field`.
    pub fn from_field(field: &Field) -> Self {
        Self {
            label: Some(field.label.clone()),
            placeholder: Some(field.placeholder.clone()),
            required: Some(field.required),
            options: field.options().map(<[String]>::to_vec),
        }
    }

    /// Check that every attribute in the patch applies to `field`.
    pub fn check(&self, field: &Field) -> Result<(), ValidationError> {
        let Some(ty) = field.field_type() else {
            return Err(ValidationError::UnsupportedField(field.id.clone()));
        };
        if self.options.is_some() && !ty.has_options() {
            return Err(ValidationError::OptionsNotApplicable(ty));
        }
        if self.required == Some(true) && ty.is_action() {
            return Err(ValidationError::RequiredNotApplicable(ty));
        }
        Ok(())
    }

    /// Merge into `field`. Nothing is written unless the whole patch applies.
    pub fn apply(self, field: &mut Field) -> Result<(), ValidationError> {
        self.check(field)?;
        if let Some(label) = self.label {
            field.label = label;
        }
        if let Some(placeholder) = self.placeholder {
            field.placeholder = placeholder;
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let (Some(options), Some(slot)) = (self.options, field.kind.options_mut()) {
            *slot = options;
        }
        Ok(())
    }
}
