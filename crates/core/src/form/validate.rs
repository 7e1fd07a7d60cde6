/// Form validation before persistence.
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::field::model::FieldKind;
use crate::form::model::Form;

/// A form may be saved once it has a non-blank title. The field list may
/// be empty, but every field in it must have a known type and an id no
/// other field shares.
pub fn validate_for_save(form: &Form) -> Result<(), ValidationError> {
    if form.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    validate_fields(form)
}

/// Field-level checks shared by saving and re-opening a form for editing.
pub fn validate_fields(form: &Form) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(form.fields.len());
    for field in &form.fields {
        if field.kind == FieldKind::Unsupported {
            return Err(ValidationError::UnsupportedField(field.id.clone()));
        }
        if !seen.insert(field.id.as_str()) {
            return Err(ValidationError::DuplicateFieldId(field.id.clone()));
        }
    }
    Ok(())
}
