//! Form definition, rendering and submission engine.
//!
//! A [`Form`](form::model::Form) is an ordered list of
//! [`Field`](field::model::Field)s. The [`FormBuilder`](builder::FormBuilder)
//! edits it, [`render`](render::render) turns it into fillable controls
//! driven by an [`AnswerState`](render::answers::AnswerState), and the
//! [`submission`] codec converts answers into stored submissions and
//! back into response rows.

pub mod builder;
pub mod error;
pub mod events;
pub mod field;
pub mod form;
pub mod render;
pub mod store;
pub mod submission;

pub use builder::{Direction, FormBuilder};
pub use error::{BuilderError, ValidationError};
pub use field::id::{FieldId, FormId, SubmissionId};
pub use field::model::{Field, FieldKind, FieldType};
pub use form::model::{Form, StoredForm};
pub use render::answers::{AnswerState, AnswerValue, BlobRef};
pub use render::{render, RenderedForm};
pub use store::{FormStore, StoreError, StoreResult};
pub use submission::codec::{decode, encode, TabularRow};
pub use submission::model::{StoredSubmission, Submission, SubmittedValue};
pub use submission::table::ResponseTable;
