use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::id::FieldId;
use crate::error::ValidationError;

/// The closed set of buildable field types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Phone,
    Url,
    Select,
    Radio,
    Checkbox,
    Date,
    Image,
    ImageView,
    Submit,
    Reset,
}

impl FieldType {
    /// Palette order.
    pub const ALL: [FieldType; 13] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Url,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
        FieldType::Image,
        FieldType::ImageView,
        FieldType::Submit,
        FieldType::Reset,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Url => "url",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Image => "image",
            FieldType::ImageView => "image-view",
            FieldType::Submit => "submit",
            FieldType::Reset => "reset",
        }
    }

    /// Type tag with its first letter upper-cased, e.g. `Image-view`.
    pub fn display_name(&self) -> String {
        let tag = self.as_str();
        let mut chars = tag.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// `select`, `radio` and `checkbox` carry an option list.
    pub fn has_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Radio | FieldType::Checkbox)
    }

    /// `submit` and `reset` are actions: no label, never required, no answer.
    pub fn is_action(&self) -> bool {
        matches!(self, FieldType::Submit | FieldType::Reset)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownFieldType(s.to_string()))
    }
}

/// Type-specific payload of a field. Only choice types own an option list.
///
/// Stored forms may contain a type tag this build does not know; such a
/// field loads as [`FieldKind::Unsupported`] so the rest of the form stays
/// usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldKind {
    Text,
    Textarea,
    Email,
    Phone,
    Url,
    Select {
        #[serde(default)]
        options: Vec<String>,
    },
    Radio {
        #[serde(default)]
        options: Vec<String>,
    },
    Checkbox {
        #[serde(default)]
        options: Vec<String>,
    },
    Date,
    Image,
    ImageView,
    Submit,
    Reset,
    #[serde(other)]
    Unsupported,
}

impl FieldKind {
    /// Payload for a freshly created field of `ty`.
    pub fn new(ty: FieldType) -> Self {
        match ty {
            FieldType::Text => FieldKind::Text,
            FieldType::Textarea => FieldKind::Textarea,
            FieldType::Email => FieldKind::Email,
            FieldType::Phone => FieldKind::Phone,
            FieldType::Url => FieldKind::Url,
            FieldType::Select => FieldKind::Select {
                options: default_options(),
            },
            FieldType::Radio => FieldKind::Radio {
                options: default_options(),
            },
            FieldType::Checkbox => FieldKind::Checkbox {
                options: default_options(),
            },
            FieldType::Date => FieldKind::Date,
            FieldType::Image => FieldKind::Image,
            FieldType::ImageView => FieldKind::ImageView,
            FieldType::Submit => FieldKind::Submit,
            FieldType::Reset => FieldKind::Reset,
        }
    }

    /// `None` for [`FieldKind::Unsupported`].
    pub fn field_type(&self) -> Option<FieldType> {
        Some(match self {
            FieldKind::Text => FieldType::Text,
            FieldKind::Textarea => FieldType::Textarea,
            FieldKind::Email => FieldType::Email,
            FieldKind::Phone => FieldType::Phone,
            FieldKind::Url => FieldType::Url,
            FieldKind::Select { .. } => FieldType::Select,
            FieldKind::Radio { .. } => FieldType::Radio,
            FieldKind::Checkbox { .. } => FieldType::Checkbox,
            FieldKind::Date => FieldType::Date,
            FieldKind::Image => FieldType::Image,
            FieldKind::ImageView => FieldType::ImageView,
            FieldKind::Submit => FieldType::Submit,
            FieldKind::Reset => FieldType::Reset,
            FieldKind::Unsupported => return None,
        })
    }

    pub fn options(&self) -> Option<&[String]> {
        match self {
            FieldKind::Select { options }
            | FieldKind::Radio { options }
            | FieldKind::Checkbox { options } => Some(options),
            _ => None,
        }
    }

    pub fn options_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            FieldKind::Select { options }
            | FieldKind::Radio { options }
            | FieldKind::Checkbox { options } => Some(options),
            _ => None,
        }
    }
}

fn default_options() -> Vec<String> {
    vec!["Option 1".to_string(), "Option 2".to_string()]
}

/// One buildable input unit of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub required: bool,
}

impl Field {
    /// Create a field of `ty` with a fresh identity and type defaults.
    pub fn new(ty: FieldType) -> Self {
        Self::with_id(FieldId::generate(), ty)
    }

    /// Create a field with a caller-supplied identity.
    pub fn with_id(id: FieldId, ty: FieldType) -> Self {
        Self {
            id,
            kind: FieldKind::new(ty),
            label: format!("{} Label", ty.display_name()),
            placeholder: String::new(),
            required: false,
        }
    }

    pub fn field_type(&self) -> Option<FieldType> {
        self.kind.field_type()
    }

    pub fn options(&self) -> Option<&[String]> {
        self.kind.options()
    }

    pub fn is_action(&self) -> bool {
        self.field_type().is_some_and(|ty| ty.is_action())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_field_defaults() {
        let field = Field::new(FieldType::Text);
        assert_eq!(field.label, "Text Label");
        assert_eq!(field.placeholder, "");
        assert!(!field.required);
        assert_eq!(field.options(), None);

        let field = Field::new(FieldType::ImageView);
        assert_eq!(field.label, "Image-view Label");
    }

    #[test]
    fn choice_fields_get_two_default_options() {
        for ty in [FieldType::Select, FieldType::Radio, FieldType::Checkbox] {
            let field = Field::new(ty);
            assert_eq!(
                field.options(),
                Some(&["Option 1".to_string(), "Option 2".to_string()][..])
            );
        }
        for ty in FieldType::ALL.into_iter().filter(|ty| !ty.has_options()) {
            assert_eq!(Field::new(ty).options(), None);
        }
    }

    #[test]
    fn parse_field_type() {
        assert_eq!("image-view".parse::<FieldType>().unwrap(), FieldType::ImageView);
        assert_eq!("checkbox".parse::<FieldType>().unwrap(), FieldType::Checkbox);
        assert_eq!(
            "slider".parse::<FieldType>(),
            Err(ValidationError::UnknownFieldType("slider".into()))
        );
    }

    #[test]
    fn field_wire_format() {
        let field = Field::with_id(FieldId::from("f1"), FieldType::Radio);
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "f1",
                "type": "radio",
                "options": ["Option 1", "Option 2"],
                "label": "Radio Label",
                "placeholder": "",
                "required": false,
            })
        );

        let text = serde_json::to_value(Field::with_id(FieldId::from("f2"), FieldType::Text)).unwrap();
        assert!(text.get("options").is_none());
    }

    #[test]
    fn legacy_field_with_empty_options_loads() {
        let field: Field = serde_json::from_value(json!({
            "id": 1718000000123u64,
            "type": "email",
            "label": "Email Label",
            "placeholder": "you@example.com",
            "options": [],
            "required": true,
        }))
        .unwrap();
        assert_eq!(field.id.as_str(), "1718000000123");
        assert_eq!(field.kind, FieldKind::Email);
        assert!(field.required);
    }

    #[test]
    fn unknown_type_loads_as_unsupported() {
        let field: Field = serde_json::from_value(json!({
            "id": "x",
            "type": "signature",
            "label": "Sign here",
        }))
        .unwrap();
        assert_eq!(field.kind, FieldKind::Unsupported);
        assert_eq!(field.field_type(), None);
    }
}
