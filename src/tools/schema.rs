//! Declared tool input schemas and their discovery projection

use serde_json::{Map, Value, json};

/// Kind of value a field accepts
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free text
    String,
    /// Smartsheet object id (64-bit integer, accepted as number or numeric string)
    Id,
    /// Number with optional inclusive bounds
    Number {
        /// Lower bound
        min: Option<f64>,
        /// Upper bound
        max: Option<f64>,
    },
    /// Boolean flag
    Boolean,
    /// JSON array (or a JSON string encoding one)
    Array,
    /// One of a fixed set of strings
    Enum(Vec<&'static str>),
}

/// Schema of one named tool argument
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Accepted kind
    pub kind: FieldKind,
    /// Human-readable description
    pub description: Option<&'static str>,
    /// Whether callers may omit the field
    pub optional: bool,
}

impl FieldSchema {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            description: None,
            optional: false,
        }
    }

    /// String field
    #[must_use]
    pub fn string() -> Self {
        Self::of(FieldKind::String)
    }

    /// Object id field
    #[must_use]
    pub fn id() -> Self {
        Self::of(FieldKind::Id)
    }

    /// Number field with inclusive bounds
    #[must_use]
    pub fn bounded(min: f64, max: f64) -> Self {
        Self::of(FieldKind::Number {
            min: Some(min),
            max: Some(max),
        })
    }

    /// Boolean field
    #[must_use]
    pub fn boolean() -> Self {
        Self::of(FieldKind::Boolean)
    }

    /// Array field
    #[must_use]
    pub fn array() -> Self {
        Self::of(FieldKind::Array)
    }

    /// Enumerated string field
    #[must_use]
    pub fn one_of(values: &[&'static str]) -> Self {
        Self::of(FieldKind::Enum(values.to_vec()))
    }

    /// Attach a description
    #[must_use]
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Mark the field as optional
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Ordered set of named fields a tool accepts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSchema {
    fields: Vec<(&'static str, FieldSchema)>,
}

impl ToolSchema {
    /// Empty schema (tool takes no arguments)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field
    #[must_use]
    pub fn field(mut self, name: &'static str, schema: FieldSchema) -> Self {
        self.fields.push((name, schema));
        self
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &FieldSchema)> {
        self.fields.iter().map(|(name, schema)| (*name, schema))
    }

    /// Project to the simplified JSON Schema published for discovery.
    ///
    /// Lossy by design of the discovery format: every field carrying a
    /// description becomes a required `string` property, fields without one
    /// are dropped, and kinds, bounds, enums and optionality are discarded.
    #[must_use]
    pub fn to_discovery_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for (name, field) in self.fields() {
            let Some(description) = field.description else {
                continue;
            };
            properties.insert(
                name.to_string(),
                json!({ "type": "string", "description": description }),
            );
            required.push(Value::String(name.to_string()));
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_schema_projects_to_empty_object() {
        assert_eq!(
            ToolSchema::new().to_discovery_schema(),
            json!({"type": "object", "properties": {}, "required": []})
        );
    }

    #[test]
    fn described_fields_become_required_strings() {
        let schema = ToolSchema::new()
            .field("sheetId", FieldSchema::id().describe("The sheet"))
            .field(
                "pageSize",
                FieldSchema::bounded(1.0, 500.0)
                    .optional()
                    .describe("Rows per page"),
            )
            .field(
                "level",
                FieldSchema::one_of(&["a", "b"]).optional().describe("Level"),
            );

        assert_eq!(
            schema.to_discovery_schema(),
            json!({
                "type": "object",
                "properties": {
                    "sheetId": {"type": "string", "description": "The sheet"},
                    "pageSize": {"type": "string", "description": "Rows per page"},
                    "level": {"type": "string", "description": "Level"}
                },
                "required": ["sheetId", "pageSize", "level"]
            })
        );
    }

    #[test]
    fn undescribed_fields_are_dropped() {
        let schema = ToolSchema::new()
            .field("hidden", FieldSchema::boolean())
            .field("query", FieldSchema::string().describe("Search text"));
        let projected = schema.to_discovery_schema();
        assert!(projected["properties"].get("hidden").is_none());
        assert_eq!(projected["required"], json!(["query"]));
    }

    #[test]
    fn fields_keep_declaration_order() {
        let schema = ToolSchema::new()
            .field("b", FieldSchema::string())
            .field("a", FieldSchema::string());
        let names: Vec<_> = schema.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
