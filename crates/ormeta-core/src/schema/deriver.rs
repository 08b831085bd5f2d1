//! Persistence schema derived from attribute metadata.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::registry::{AttributeDescriptor, AttributeKind, EntityRegistry};

/// Format used for date attributes that declare none.
pub const DEFAULT_DATE_FORMAT: &str = "Y-m-d";

/// Format used for date-time attributes that declare none.
pub const DEFAULT_DATE_TIME_FORMAT: &str = "Y-m-d H:i:s";

/// How a raw stored value is coerced into a typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastRule {
    /// Decoded object.
    Object,
    /// Decoded list.
    Array,
    /// Boolean.
    Boolean,
    /// Date with the given format.
    Date(String),
    /// Date-time with the given format.
    DateTime(String),
    /// Floating point number.
    Float,
    /// String.
    String,
}

impl CastRule {
    /// Cast rule for an attribute, or `None` for kinds that carry no cast.
    pub fn for_attribute(attribute: &AttributeDescriptor) -> Option<Self> {
        let format = |default: &str| {
            attribute
                .date_format
                .clone()
                .unwrap_or_else(|| default.to_string())
        };

        match attribute.kind {
            AttributeKind::Object => Some(CastRule::Object),
            AttributeKind::Array => Some(CastRule::Array),
            AttributeKind::Boolean => Some(CastRule::Boolean),
            AttributeKind::Date => Some(CastRule::Date(format(DEFAULT_DATE_FORMAT))),
            AttributeKind::DateTime => {
                Some(CastRule::DateTime(format(DEFAULT_DATE_TIME_FORMAT)))
            }
            AttributeKind::Number => Some(CastRule::Float),
            AttributeKind::Text => Some(CastRule::String),
            AttributeKind::Other => None,
        }
    }
}

impl fmt::Display for CastRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastRule::Object => write!(f, "object"),
            CastRule::Array => write!(f, "array"),
            CastRule::Boolean => write!(f, "boolean"),
            CastRule::Date(format) => write!(f, "date:{format}"),
            CastRule::DateTime(format) => write!(f, "datetime:{format}"),
            CastRule::Float => write!(f, "float"),
            CastRule::String => write!(f, "string"),
        }
    }
}

impl Serialize for CastRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Writable fields, hidden fields and casts of an entity.
///
/// A schema is never edited after derivation; refreshing produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedSchema {
    /// Table backing the entity.
    pub table: String,
    /// Attributes that may be mass-assigned.
    pub fillable: BTreeSet<String>,
    /// Attributes left out of serialized output.
    pub hidden: BTreeSet<String>,
    /// Cast rule per attribute.
    pub casts: BTreeMap<String, CastRule>,
}

impl DerivedSchema {
    /// Derive a schema from a table name and attribute list.
    pub fn from_attributes(table: impl Into<String>, attributes: &[AttributeDescriptor]) -> Self {
        let fillable = attributes
            .iter()
            .filter(|a| a.fillable)
            .map(|a| a.name.clone())
            .collect();

        let hidden = attributes
            .iter()
            .filter(|a| a.hidden)
            .map(|a| a.name.clone())
            .collect();

        let casts = attributes
            .iter()
            .filter_map(|a| CastRule::for_attribute(a).map(|rule| (a.name.clone(), rule)))
            .collect();

        Self {
            table: table.into(),
            fillable,
            hidden,
            casts,
        }
    }

    /// Check if an attribute is fillable.
    pub fn is_fillable(&self, attribute: &str) -> bool {
        self.fillable.contains(attribute)
    }

    /// Check if an attribute is hidden.
    pub fn is_hidden(&self, attribute: &str) -> bool {
        self.hidden.contains(attribute)
    }

    /// Cast rule for an attribute.
    pub fn cast_for(&self, attribute: &str) -> Option<&CastRule> {
        self.casts.get(attribute)
    }

    /// Casts rendered as rule strings (`"date:Y-m-d"`, `"float"`, ...).
    pub fn cast_strings(&self) -> BTreeMap<String, String> {
        self.casts
            .iter()
            .map(|(name, rule)| (name.clone(), rule.to_string()))
            .collect()
    }
}

/// Derives schemas for registered entities.
#[derive(Debug, Clone)]
pub struct SchemaDeriver {
    registry: Arc<EntityRegistry>,
}

impl SchemaDeriver {
    /// Create a deriver over a loaded registry.
    pub fn new(registry: Arc<EntityRegistry>) -> Self {
        Self { registry }
    }

    /// Derive the schema of an entity from its manager's attributes.
    pub fn derive(&self, entity: &str) -> Result<DerivedSchema> {
        let descriptor = self.registry.find_by_name(entity)?;
        let attributes = descriptor.manager().attributes();
        Ok(DerivedSchema::from_attributes(descriptor.table(), &attributes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EntityConfig, PackageConfig, RegistryConfig};
    use crate::registry::ManagerFactories;

    fn sample_attributes() -> Vec<AttributeDescriptor> {
        vec![
            AttributeDescriptor::text("name").fillable(),
            AttributeDescriptor::number("total").fillable(),
            AttributeDescriptor::boolean("paid"),
            AttributeDescriptor::new("meta", AttributeKind::Object),
            AttributeDescriptor::new("tags", AttributeKind::Array),
            AttributeDescriptor::date("due_on", "d/m/Y"),
            AttributeDescriptor::date_time("placed_at", "Y-m-d H:i"),
            AttributeDescriptor::new("customer_id", AttributeKind::Other).fillable(),
            AttributeDescriptor::text("secret").hidden(),
        ]
    }

    #[test]
    fn test_fillable_and_hidden() {
        let schema = DerivedSchema::from_attributes("orders", &sample_attributes());

        assert_eq!(schema.table, "orders");
        assert_eq!(
            schema.fillable.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["customer_id", "name", "total"]
        );
        assert!(schema.is_hidden("secret"));
        assert!(!schema.is_hidden("name"));
        assert_eq!(schema.hidden.len(), 1);
    }

    #[test]
    fn test_casts_by_kind() {
        let schema = DerivedSchema::from_attributes("orders", &sample_attributes());
        let casts = schema.cast_strings();

        assert_eq!(casts["name"], "string");
        assert_eq!(casts["total"], "float");
        assert_eq!(casts["paid"], "boolean");
        assert_eq!(casts["meta"], "object");
        assert_eq!(casts["tags"], "array");
        assert_eq!(casts["due_on"], "date:d/m/Y");
        assert_eq!(casts["placed_at"], "datetime:Y-m-d H:i");
        assert_eq!(casts["secret"], "string");
    }

    #[test]
    fn test_other_kind_has_no_cast() {
        let schema = DerivedSchema::from_attributes("orders", &sample_attributes());

        assert!(schema.cast_for("customer_id").is_none());
        assert!(!schema.casts.contains_key("customer_id"));
        assert_eq!(schema.casts.len(), 8);
    }

    #[test]
    fn test_date_casts_end_with_declared_format() {
        let attributes = sample_attributes();
        let schema = DerivedSchema::from_attributes("orders", &attributes);

        for attribute in attributes.iter().filter(|a| a.kind.is_temporal()) {
            let rule = schema.cast_for(&attribute.name).unwrap().to_string();
            let format = attribute.date_format.as_deref().unwrap();
            assert!(rule.ends_with(&format!(":{format}")), "{rule}");
        }
    }

    #[test]
    fn test_date_format_defaults() {
        let schema = DerivedSchema::from_attributes(
            "events",
            &[
                AttributeDescriptor::new("day", AttributeKind::Date),
                AttributeDescriptor::new("at", AttributeKind::DateTime),
            ],
        );

        assert_eq!(schema.cast_for("day"), Some(&CastRule::Date("Y-m-d".into())));
        assert_eq!(
            schema.cast_for("at").map(ToString::to_string).as_deref(),
            Some("datetime:Y-m-d H:i:s")
        );
    }

    #[test]
    fn test_order_independent() {
        let mut reversed = sample_attributes();
        reversed.reverse();

        assert_eq!(
            DerivedSchema::from_attributes("orders", &sample_attributes()),
            DerivedSchema::from_attributes("orders", &reversed)
        );
    }

    #[test]
    fn test_serialize_casts_as_strings() {
        let schema = DerivedSchema::from_attributes(
            "orders",
            &[AttributeDescriptor::date("due_on", "Y-m-d")],
        );
        let json = serde_json::to_value(&schema).unwrap();

        assert_eq!(json["casts"]["due_on"], "date:Y-m-d");
        assert_eq!(json["table"], "orders");
    }

    #[test]
    fn test_derive_through_registry() {
        let config = RegistryConfig::new().with_package(
            PackageConfig::new("shop").with_entity(
                EntityConfig::new("order", "shop::Order", "orders", "shop::OrderManager")
                    .with_attributes(sample_attributes()),
            ),
        );
        let registry =
            Arc::new(EntityRegistry::from_config(&config, &ManagerFactories::new()).unwrap());
        let deriver = SchemaDeriver::new(registry);

        let schema = deriver.derive("order").unwrap();
        assert_eq!(schema, DerivedSchema::from_attributes("orders", &sample_attributes()));

        assert!(deriver.derive("ghost").unwrap_err().is_not_found());
    }
}
