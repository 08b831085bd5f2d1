//! Output formatters.

use clap::ValueEnum;
use comfy_table::Table;
use ormeta_core::{DerivedSchema, EntityRegistry, UnresolvedReference};
use serde_json::{json, Value};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable tables
    Text,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format the entity listing of a registry.
    fn format_entities(&self, registry: &EntityRegistry) -> String;

    /// Format a derived schema.
    fn format_schema(&self, entity: &str, schema: &DerivedSchema) -> String;

    /// Format `(original, rewritten)` column pairs and unresolved qualifiers.
    fn format_rewrites(
        &self,
        rewrites: &[(String, String)],
        unresolved: &[UnresolvedReference],
    ) -> String;

    /// Format a morph allow-list key.
    fn format_morph_key(&self, entity: &str, attribute: &str, key: &str) -> String;

    /// Format an error message.
    fn format_error(&self, error: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Text formatter using comfy-table.
pub struct TextFormatter;

impl Formatter for TextFormatter {
    fn format_entities(&self, registry: &EntityRegistry) -> String {
        if registry.is_empty() {
            return "No entities".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec!["Package", "Entity", "Table", "Model", "Manager"]);
        for entity in registry.iter() {
            table.add_row(vec![
                entity.package(),
                entity.name(),
                entity.table(),
                entity.model().as_str(),
                entity.manager_type().as_str(),
            ]);
        }
        table.to_string()
    }

    fn format_schema(&self, entity: &str, schema: &DerivedSchema) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Attribute", "Fillable", "Hidden", "Cast"]);

        let mut attributes: Vec<&String> = schema
            .fillable
            .iter()
            .chain(&schema.hidden)
            .chain(schema.casts.keys())
            .collect();
        attributes.sort_unstable();
        attributes.dedup();

        for attribute in attributes {
            let cast = schema
                .cast_for(attribute)
                .map(ToString::to_string)
                .unwrap_or_default();
            table.add_row(vec![
                attribute.clone(),
                yes_no(schema.is_fillable(attribute)).to_string(),
                yes_no(schema.is_hidden(attribute)).to_string(),
                cast,
            ]);
        }

        format!("Entity: {entity} (table {})\n{table}", schema.table)
    }

    fn format_rewrites(
        &self,
        rewrites: &[(String, String)],
        unresolved: &[UnresolvedReference],
    ) -> String {
        let mut lines: Vec<String> = rewrites
            .iter()
            .map(|(original, rewritten)| format!("{original} -> {rewritten}"))
            .collect();
        lines.extend(unresolved.iter().map(|u| format!("warning: {u}")));
        lines.join("\n")
    }

    fn format_morph_key(&self, _entity: &str, _attribute: &str, key: &str) -> String {
        key.to_string()
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_entities(&self, registry: &EntityRegistry) -> String {
        let mut packages = serde_json::Map::new();
        for package in registry.list_packages() {
            let entities: Vec<Value> = registry
                .iter()
                .filter(|e| e.package() == package.as_str())
                .map(|e| {
                    json!({
                        "name": e.name(),
                        "table": e.table(),
                        "model": e.model(),
                        "manager": e.manager_type(),
                    })
                })
                .collect();
            packages.insert(package.clone(), Value::Array(entities));
        }
        pretty(&Value::Object(packages))
    }

    fn format_schema(&self, _entity: &str, schema: &DerivedSchema) -> String {
        serde_json::to_string_pretty(schema).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_rewrites(
        &self,
        rewrites: &[(String, String)],
        unresolved: &[UnresolvedReference],
    ) -> String {
        let columns: Vec<Value> = rewrites
            .iter()
            .map(|(original, rewritten)| json!({ "column": original, "rewritten": rewritten }))
            .collect();
        pretty(&json!({ "columns": columns, "unresolved": unresolved }))
    }

    fn format_morph_key(&self, entity: &str, attribute: &str, key: &str) -> String {
        pretty(&json!({ "entity": entity, "attribute": attribute, "key": key }))
    }

    fn format_error(&self, error: &str) -> String {
        json!({ "error": error }).to_string()
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
