//! Turns a form definition plus the current answers into concrete controls.
//!
//! Rendering is a pure function: it reads the answer state but never
//! modifies or stores it.

pub mod answers;
pub mod preview;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::id::FieldId;
use crate::field::model::{Field, FieldKind};
use crate::form::model::Form;

use answers::{AnswerState, AnswerValue, BlobRef};
use preview::ImagePreview;

const SELECT_PLACEHOLDER: &str = "Select option";
const IMAGE_ACCEPT: &str = "image/*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedForm {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_date_time: Option<DateTime<Utc>>,
    pub fields: Vec<RenderedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    pub field_id: FieldId,
    /// `None` for submit and reset buttons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Shown as mandatory; not enforced at submit time.
    pub required: bool,
    #[serde(flatten)]
    pub control: Control,
}

/// HTML input flavour of a single-line input, which drives the virtual
/// keyboard and browser-side validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Email,
    Tel,
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Control {
    Input {
        input_type: InputType,
        placeholder: String,
        value: String,
    },
    TextArea {
        placeholder: String,
        value: String,
    },
    DatePicker {
        value: String,
    },
    Dropdown {
        placeholder: String,
        options: Vec<ChoiceOption>,
    },
    RadioGroup {
        options: Vec<ChoiceOption>,
    },
    CheckboxGroup {
        options: Vec<ChoiceOption>,
    },
    FilePicker {
        accept: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        selected: Option<BlobRef>,
        /// Set for `image-view` fields once a preview has been staged.
        #[serde(skip_serializing_if = "Option::is_none")]
        preview: Option<ImagePreview>,
        show_preview: bool,
    },
    SubmitButton {
        text: String,
    },
    ResetButton {
        text: String,
    },
}

/// Render `form` against the caller's answer state. Fields of an
/// unrecognized type are skipped.
pub fn render(form: &Form, answers: &AnswerState) -> RenderedForm {
    let fields = form
        .fields
        .iter()
        .filter_map(|field| render_field(field, answers))
        .collect();

    RenderedForm {
        title: form.title.clone(),
        description: Some(form.description.clone()).filter(|d| !d.trim().is_empty()),
        event_date_time: form.event_date_time,
        fields,
    }
}

fn render_field(field: &Field, answers: &AnswerState) -> Option<RenderedField> {
    let answer = answers.get(&field.id);
    let control = match &field.kind {
        FieldKind::Text => input(field, InputType::Text, "Enter text", answer),
        FieldKind::Email => input(field, InputType::Email, "Enter a valid email", answer),
        FieldKind::Phone => input(field, InputType::Tel, "Enter phone number", answer),
        FieldKind::Url => input(field, InputType::Url, "Enter a valid URL", answer),
        FieldKind::Textarea => Control::TextArea {
            placeholder: placeholder_or(field, "Enter your message"),
            value: text_value(answer),
        },
        FieldKind::Date => Control::DatePicker {
            value: text_value(answer),
        },
        FieldKind::Select { options } => Control::Dropdown {
            placeholder: SELECT_PLACEHOLDER.to_string(),
            options: single_choice(options, answer),
        },
        FieldKind::Radio { options } => Control::RadioGroup {
            options: single_choice(options, answer),
        },
        FieldKind::Checkbox { options } => Control::CheckboxGroup {
            options: multi_choice(options, answer),
        },
        FieldKind::Image => file_picker(answer, None, false),
        FieldKind::ImageView => file_picker(answer, answers.preview(&field.id), true),
        FieldKind::Submit => Control::SubmitButton {
            text: "Submit".to_string(),
        },
        FieldKind::Reset => Control::ResetButton {
            text: "Reset".to_string(),
        },
        FieldKind::Unsupported => {
            tracing::debug!(field_id = %field.id, "skipping field of unsupported type");
            return None;
        }
    };

    let is_action = field.is_action();
    Some(RenderedField {
        field_id: field.id.clone(),
        label: (!is_action).then(|| field.label.clone()),
        required: field.required && !is_action,
        control,
    })
}

fn input(field: &Field, input_type: InputType, fallback: &str, answer: Option<&AnswerValue>) -> Control {
    Control::Input {
        input_type,
        placeholder: placeholder_or(field, fallback),
        value: text_value(answer),
    }
}

fn placeholder_or(field: &Field, fallback: &str) -> String {
    if field.placeholder.is_empty() {
        fallback.to_string()
    } else {
        field.placeholder.clone()
    }
}

fn text_value(answer: Option<&AnswerValue>) -> String {
    match answer {
        Some(AnswerValue::Text(s)) => s.clone(),
        _ => String::new(),
    }
}

/// A stored value that is not one of the current options selects nothing.
fn single_choice(options: &[String], answer: Option<&AnswerValue>) -> Vec<ChoiceOption> {
    let chosen = match answer {
        Some(AnswerValue::Text(s)) => Some(s.as_str()),
        _ => None,
    };
    options
        .iter()
        .map(|o| ChoiceOption {
            value: o.clone(),
            selected: chosen == Some(o.as_str()),
        })
        .collect()
}

fn multi_choice(options: &[String], answer: Option<&AnswerValue>) -> Vec<ChoiceOption> {
    let checked: &[String] = match answer {
        Some(AnswerValue::Choices(list)) => list,
        _ => &[],
    };
    options
        .iter()
        .map(|o| ChoiceOption {
            value: o.clone(),
            selected: checked.contains(o),
        })
        .collect()
}

fn file_picker(answer: Option<&AnswerValue>, preview: Option<&ImagePreview>, show_preview: bool) -> Control {
    let selected = match answer {
        Some(AnswerValue::Blob(blob)) => Some(blob.clone()),
        _ => None,
    };
    Control::FilePicker {
        accept: IMAGE_ACCEPT.to_string(),
        selected,
        preview: preview.cloned(),
        show_preview,
    }
}
