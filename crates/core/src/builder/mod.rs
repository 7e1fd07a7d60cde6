//! Mutation API over a form's field sequence.
//!
//! Every operation validates its input before touching the form, so a
//! failed call leaves the field sequence exactly as it was.

pub mod patch;
pub mod session;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BuilderError, ValidationError};
use crate::field::id::FieldId;
use crate::field::model::{Field, FieldType};
use crate::form::model::Form;
use crate::form::validate::{validate_fields, validate_for_save};

pub use patch::FieldPatch;
pub use session::EditSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Owns the form being built or re-edited.
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    form: Form,
}

impl FormBuilder {
    /// Start from an empty, untitled form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-open a fetched form for editing. Refused when a field has an
    /// unknown type or shares its id with another field.
    pub fn from_form(form: Form) -> Result<Self, ValidationError> {
        validate_fields(&form)?;
        Ok(Self { form })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn fields(&self) -> &[Field] {
        &self.form.fields
    }

    pub fn into_form(self) -> Form {
        self.form
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.form.description = description.into();
    }

    pub fn set_event_date_time(&mut self, at: Option<DateTime<Utc>>) {
        self.form.event_date_time = at;
    }

    /// Append a new field. `field_type` must be one of the palette tags.
    pub fn add_field(&mut self, field_type: &str) -> Result<FieldId, BuilderError> {
        let ty: FieldType = field_type.parse()?;
        Ok(self.add_field_of(ty))
    }

    pub fn add_field_of(&mut self, ty: FieldType) -> FieldId {
        let field = Field::new(ty);
        let id = field.id.clone();
        tracing::debug!(field_id = %id, field_type = %ty, "field added");
        self.form.fields.push(field);
        id
    }

    /// Merge `patch` into the field with `id`.
    pub fn update_field(&mut self, id: &FieldId, patch: FieldPatch) -> Result<(), BuilderError> {
        let field = self.field_mut(id)?;
        patch.apply(field)?;
        tracing::debug!(field_id = %id, "field updated");
        Ok(())
    }

    /// Delete the field with `id`. An edit session open on that field is
    /// closed.
    pub fn remove_field(
        &mut self,
        id: &FieldId,
        session: &mut Option<EditSession>,
    ) -> Result<Field, BuilderError> {
        let index = self.index_of(id)?;
        let removed = self.form.fields.remove(index);
        if session.as_ref().is_some_and(|s| s.field_id() == id) {
            *session = None;
        }
        tracing::debug!(field_id = %id, "field removed");
        Ok(removed)
    }

    /// Swap the field with its neighbour. Returns `false` without changing
    /// anything when the field is already at that end.
    pub fn move_field(&mut self, id: &FieldId, direction: Direction) -> Result<bool, BuilderError> {
        let index = self.index_of(id)?;
        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.form.fields.len() => index + 1,
            _ => return Ok(false),
        };
        self.form.fields.swap(index, target);
        tracing::debug!(field_id = %id, ?direction, "field moved");
        Ok(true)
    }

    /// Open an edit buffer on the field with `id`.
    pub fn edit_field(&self, id: &FieldId) -> Result<EditSession, BuilderError> {
        let index = self.index_of(id)?;
        Ok(EditSession::open(&self.form.fields[index])?)
    }

    /// Commit an edit buffer back into the field sequence.
    pub fn save_changes(&mut self, session: &EditSession) -> Result<(), BuilderError> {
        self.update_field(session.field_id(), session.to_patch())
    }

    pub fn validate_for_save(&self) -> Result<(), ValidationError> {
        validate_for_save(&self.form)
    }

    fn index_of(&self, id: &FieldId) -> Result<usize, BuilderError> {
        self.form
            .position(id)
            .ok_or_else(|| BuilderError::FieldNotFound(id.clone()))
    }

    fn field_mut(&mut self, id: &FieldId) -> Result<&mut Field, BuilderError> {
        let index = self.index_of(id)?;
        Ok(&mut self.form.fields[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ids(builder: &FormBuilder) -> Vec<FieldId> {
        builder.fields().iter().map(|f| f.id.clone()).collect()
    }

    #[test]
    fn new_builder_is_empty_and_untitled() {
        let builder = FormBuilder::new();
        assert!(builder.fields().is_empty());
        assert_eq!(builder.form().title, "");
        assert_eq!(builder.validate_for_save(), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn field_ids_stay_unique() {
        let mut builder = FormBuilder::new();
        for ty in FieldType::ALL {
            builder.add_field(ty.as_str()).unwrap();
            builder.add_field(ty.as_str()).unwrap();
        }
        let unique: HashSet<_> = ids(&builder).into_iter().collect();
        assert_eq!(unique.len(), 26);
    }

    #[test]
    fn add_then_remove_restores_sequence() {
        let mut builder = FormBuilder::new();
        builder.add_field("text").unwrap();
        builder.add_field("radio").unwrap();
        let before = builder.fields().to_vec();

        let id = builder.add_field("checkbox").unwrap();
        builder.remove_field(&id, &mut None).unwrap();
        assert_eq!(builder.fields(), &before[..]);
    }

    #[test]
    fn unknown_type_rejected_before_mutation() {
        let mut builder = FormBuilder::new();
        let err = builder.add_field("signature").unwrap_err();
        assert_eq!(
            err,
            BuilderError::Validation(ValidationError::UnknownFieldType("signature".into()))
        );
        assert!(builder.fields().is_empty());
    }

    #[test]
    fn move_at_boundaries_is_noop() {
        let mut builder = FormBuilder::new();
        let a = builder.add_field("text").unwrap();
        let b = builder.add_field("email").unwrap();
        let c = builder.add_field("url").unwrap();

        assert!(!builder.move_field(&a, Direction::Up).unwrap());
        assert!(!builder.move_field(&c, Direction::Down).unwrap());
        assert_eq!(ids(&builder), vec![a.clone(), b.clone(), c.clone()]);

        assert!(builder.move_field(&a, Direction::Down).unwrap());
        assert_eq!(ids(&builder), vec![b.clone(), a.clone(), c.clone()]);
        assert!(builder.move_field(&c, Direction::Up).unwrap());
        assert_eq!(ids(&builder), vec![b, c, a]);
    }

    #[test]
    fn missing_id_reports_not_found_without_mutation() {
        let mut builder = FormBuilder::new();
        builder.add_field("text").unwrap();
        let before = builder.fields().to_vec();
        let ghost = FieldId::from("ghost");

        assert_eq!(
            builder.update_field(&ghost, FieldPatch::default().label("x")),
            Err(BuilderError::FieldNotFound(ghost.clone()))
        );
        assert!(builder.remove_field(&ghost, &mut None).is_err());
        assert!(builder.move_field(&ghost, Direction::Up).is_err());
        assert_eq!(builder.fields(), &before[..]);
    }

    #[test]
    fn update_never_touches_other_fields() {
        let mut builder = FormBuilder::new();
        let a = builder.add_field("text").unwrap();
        let b = builder.add_field("text").unwrap();
        builder
            .update_field(&b, FieldPatch::default().label("Surname").placeholder("Doe"))
            .unwrap();
        assert_eq!(builder.form().field(&a).unwrap().label, "Text Label");
        assert_eq!(builder.form().field(&b).unwrap().label, "Surname");
        assert_eq!(builder.form().field(&b).unwrap().placeholder, "Doe");
    }

    #[test]
    fn removing_edited_field_closes_session() {
        let mut builder = FormBuilder::new();
        let a = builder.add_field("select").unwrap();
        let b = builder.add_field("text").unwrap();

        let mut session = Some(builder.edit_field(&a).unwrap());
        builder.remove_field(&b, &mut session).unwrap();
        assert!(session.is_some());

        builder.remove_field(&a, &mut session).unwrap();
        assert!(session.is_none());
    }

    #[test]
    fn cancelled_session_persists_nothing() {
        let mut builder = FormBuilder::new();
        let id = builder.add_field("checkbox").unwrap();
        let before = builder.fields().to_vec();

        let mut session = builder.edit_field(&id).unwrap();
        session.set_label("Toppings");
        session.add_option().unwrap();
        drop(session);

        assert_eq!(builder.fields(), &before[..]);
    }

    #[test]
    fn save_changes_commits_draft() {
        let mut builder = FormBuilder::new();
        let id = builder.add_field("checkbox").unwrap();

        let mut session = builder.edit_field(&id).unwrap();
        session.set_label("Toppings");
        session.set_required(true).unwrap();
        session.update_option(0, "Cheese").unwrap();
        session.add_option().unwrap();
        builder.save_changes(&session).unwrap();

        let field = builder.form().field(&id).unwrap();
        assert_eq!(field.id, id);
        assert_eq!(field.field_type(), Some(FieldType::Checkbox));
        assert_eq!(field.label, "Toppings");
        assert!(field.required);
        assert_eq!(
            field.options().unwrap(),
            &["Cheese".to_string(), "Option 2".into(), "Option 3".into()][..]
        );
    }

    #[test]
    fn save_changes_after_field_removed_is_not_found() {
        let mut builder = FormBuilder::new();
        let id = builder.add_field("text").unwrap();
        let session = builder.edit_field(&id).unwrap();
        let mut open = None;
        builder.remove_field(&id, &mut open).unwrap();
        assert_eq!(
            builder.save_changes(&session),
            Err(BuilderError::FieldNotFound(id))
        );
    }

    #[test]
    fn reopening_form_with_shared_field_id_is_refused() {
        let mut form = Form::new("Event Signup");
        form.fields = vec![
            Field::with_id(FieldId::from("a"), FieldType::Text),
            Field::with_id(FieldId::from("a"), FieldType::Email),
        ];
        assert_eq!(
            FormBuilder::from_form(form).unwrap_err(),
            ValidationError::DuplicateFieldId(FieldId::from("a"))
        );
    }

    #[test]
    fn reopening_valid_form_keeps_fields() {
        let mut form = Form::new("Event Signup");
        form.fields = vec![Field::with_id(FieldId::from("a"), FieldType::Text)];
        let builder = FormBuilder::from_form(form.clone()).unwrap();
        assert_eq!(builder.form(), &form);
    }
}
