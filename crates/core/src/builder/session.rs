use crate::error::ValidationError;
use crate::field::id::FieldId;
use crate::field::model::{Field, FieldType};

use super::patch::FieldPatch;

/// Edit buffer for one field.
///
/// The draft is a clone of the field at the time the session was opened.
/// Changes stay in the draft until [`FormBuilder::save_changes`] commits
/// them; dropping the session cancels the edit.
///
/// [`FormBuilder::save_changes`]: super::FormBuilder::save_changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    field_id: FieldId,
    field_type: FieldType,
    draft: Field,
}

impl EditSession {
    pub(crate) fn open(field: &Field) -> Result<Self, ValidationError> {
        let field_type = field
            .field_type()
            .ok_or_else(|| ValidationError::UnsupportedField(field.id.clone()))?;
        Ok(Self {
            field_id: field.id.clone(),
            field_type,
            draft: field.clone(),
        })
    }

    pub fn field_id(&self) -> &FieldId {
        &self.field_id
    }

    pub fn draft(&self) -> &Field {
        &self.draft
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.draft.label = label.into();
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.draft.placeholder = placeholder.into();
    }

    pub fn set_required(&mut self, required: bool) -> Result<(), ValidationError> {
        if required && self.field_type.is_action() {
            return Err(ValidationError::RequiredNotApplicable(self.field_type));
        }
        self.draft.required = required;
        Ok(())
    }

    /// Append `Option N`, where N is the list length after the append.
    /// Numbering follows the current length, so labels can repeat after a
    /// removal.
    pub fn add_option(&mut self) -> Result<&str, ValidationError> {
        let options = self.options_mut()?;
        options.push(format!("Option {}", options.len() + 1));
        Ok(options.last().map(String::as_str).unwrap_or_default())
    }

    pub fn update_option(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let options = self.options_mut()?;
        let len = options.len();
        let slot = options
            .get_mut(index)
            .ok_or(ValidationError::OptionIndexOutOfRange { index, len })?;
        *slot = value.into();
        Ok(())
    }

    pub fn remove_option(&mut self, index: usize) -> Result<String, ValidationError> {
        let options = self.options_mut()?;
        if index >= options.len() {
            return Err(ValidationError::OptionIndexOutOfRange {
                index,
                len: options.len(),
            });
        }
        Ok(options.remove(index))
    }

    /// The draft as a patch over the committed field.
    pub fn to_patch(&self) -> FieldPatch {
        FieldPatch::from_field(&self.draft)
    }

    fn options_mut(&mut self) -> Result<&mut Vec<String>, ValidationError> {
        let ty = self.field_type;
        self.draft
            .kind
            .options_mut()
            .ok_or(ValidationError::OptionsNotApplicable(ty))
    }
}
