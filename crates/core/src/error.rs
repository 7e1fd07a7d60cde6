use thiserror::Error;

use crate::field::id::FieldId;
use crate::field::model::FieldType;

/// Caller mistakes. Always raised before any mutation takes place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title is required. Please enter a title for the form")]
    MissingTitle,
    #[error("unknown field type: {0}")]
    UnknownFieldType(String),
    #[error("field type `{0}` does not take options")]
    OptionsNotApplicable(FieldType),
    #[error("field type `{0}` cannot be marked required")]
    RequiredNotApplicable(FieldType),
    #[error("option index {index} out of range for {len} options")]
    OptionIndexOutOfRange { index: usize, len: usize },
    #[error("field `{0}` has an unsupported type")]
    UnsupportedField(FieldId),
    #[error("field id `{0}` is used by more than one field")]
    DuplicateFieldId(FieldId),
}

/// Errors returned by [`FormBuilder`](crate::builder::FormBuilder) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("field not found: {0}")]
    FieldNotFound(FieldId),
}
