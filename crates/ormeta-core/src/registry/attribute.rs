//! Attribute descriptors declared by entity managers.

use serde::{Deserialize, Serialize};

/// Kind of value an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// Free text.
    Text,
    /// Numeric value.
    Number,
    /// Boolean flag.
    Boolean,
    /// Calendar date.
    Date,
    /// Date and time of day.
    DateTime,
    /// Structured object.
    Object,
    /// List of values.
    Array,
    /// Anything else (identifiers, enums, references). Carries no cast.
    ///
    /// Kind names not listed above also parse as `Other`.
    #[serde(other)]
    Other,
}

impl AttributeKind {
    /// Check if this kind is a date or date-time.
    pub fn is_temporal(&self) -> bool {
        matches!(self, AttributeKind::Date | AttributeKind::DateTime)
    }
}

/// An attribute declared on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDescriptor {
    /// Attribute name.
    pub name: String,
    /// Value kind.
    pub kind: AttributeKind,
    /// Whether the attribute may be mass-assigned.
    #[serde(default)]
    pub fillable: bool,
    /// Whether the attribute is left out of serialized output.
    #[serde(default)]
    pub hidden: bool,
    /// Format for date and date-time attributes.
    #[serde(default, rename = "format", skip_serializing_if = "Option::is_none")]
    pub date_format: Option<String>,
}

impl AttributeDescriptor {
    /// Create an attribute that is neither fillable nor hidden.
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fillable: false,
            hidden: false,
            date_format: None,
        }
    }

    /// Create a text attribute.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Text)
    }

    /// Create a number attribute.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Number)
    }

    /// Create a boolean attribute.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Boolean)
    }

    /// Create a date attribute with the given format.
    pub fn date(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Date).with_format(format)
    }

    /// Create a date-time attribute with the given format.
    pub fn date_time(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::DateTime).with_format(format)
    }

    /// Mark as fillable.
    pub fn fillable(mut self) -> Self {
        self.fillable = true;
        self
    }

    /// Mark as hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Set the date format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_builder() {
        let attr = AttributeDescriptor::text("name").fillable();

        assert_eq!(attr.name, "name");
        assert_eq!(attr.kind, AttributeKind::Text);
        assert!(attr.fillable);
        assert!(!attr.hidden);
        assert!(attr.date_format.is_none());
    }

    #[test]
    fn test_date_attribute() {
        let attr = AttributeDescriptor::date_time("created_at", "Y-m-d H:i:s").hidden();

        assert!(attr.kind.is_temporal());
        assert!(attr.hidden);
        assert_eq!(attr.date_format.as_deref(), Some("Y-m-d H:i:s"));
    }

    #[test]
    fn test_deserialize_from_config() {
        let attr: AttributeDescriptor = serde_json::from_str(
            r#"{"name": "shipped_on", "kind": "date", "fillable": true, "format": "d/m/Y"}"#,
        )
        .unwrap();

        assert_eq!(attr.kind, AttributeKind::Date);
        assert!(attr.fillable);
        assert!(!attr.hidden);
        assert_eq!(attr.date_format.as_deref(), Some("d/m/Y"));

        let kind: AttributeKind = serde_json::from_str(r#""datetime""#).unwrap();
        assert_eq!(kind, AttributeKind::DateTime);
    }

    #[test]
    fn test_unlisted_kind_is_other() {
        for name in ["email", "enum", "id", "longtext", "belongs-to"] {
            let kind: AttributeKind = serde_json::from_str(&format!("\"{name}\"")).unwrap();
            assert_eq!(kind, AttributeKind::Other);
        }

        let attr: AttributeDescriptor =
            serde_json::from_str(r#"{"name": "email", "kind": "email", "hidden": true}"#).unwrap();
        assert_eq!(attr.kind, AttributeKind::Other);
        assert!(attr.hidden);
    }
}
