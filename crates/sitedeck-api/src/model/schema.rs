// ── Schema document ──
//
// The JSON-Schema subset the service emits for its configuration models.
// Loosely typed on purpose: the editor turns it into a closed set of field
// descriptors and rejects anything it does not understand.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Machine-readable description of a configuration object.
///
/// `properties` keeps the server's declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertySchema>,
    #[serde(default)]
    pub required: Vec<String>,
    /// Shared definitions referenced via `$ref: "#/$defs/<name>"`.
    #[serde(rename = "$defs", default, skip_serializing_if = "IndexMap::is_empty")]
    pub defs: IndexMap<String, PropertySchema>,
}

impl SchemaDocument {
    pub fn is_required(&self, field: &str) -> bool {
        self.required.iter().any(|r| r == field)
    }

    /// Follow a local `$ref` to its definition.
    pub fn resolve<'a>(&'a self, prop: &'a PropertySchema) -> &'a PropertySchema {
        prop.reference
            .as_deref()
            .and_then(|r| r.strip_prefix("#/$defs/"))
            .and_then(|name| self.defs.get(name))
            .unwrap_or(prop)
    }
}

/// The `type` keyword: a single name or a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeSpec {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Single(name) => vec![name.as_str()],
            Self::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// One property of a [`SchemaDocument`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_spec: Option<TypeSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<PropertySchema>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub write_only: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_pydantic_style_schema_in_order() {
        // Parsed from text: `json!` would sort the keys.
        let doc: SchemaDocument = serde_json::from_str(
            r#"{
                "title": "SiteConfig",
                "type": "object",
                "properties": {
                    "id": { "type": "string", "title": "Id" },
                    "captcha_image_selector": {
                        "anyOf": [{ "type": "string" }, { "type": "null" }],
                        "default": null
                    },
                    "subscription_url_type": { "type": "string", "enum": ["input", "copy"] }
                },
                "required": ["id", "subscription_url_type"]
            }"#,
        )
        .unwrap();

        let names: Vec<_> = doc.properties.keys().map(String::as_str).collect();
        assert_eq!(names, ["id", "captcha_image_selector", "subscription_url_type"]);
        assert!(doc.is_required("id"));
        assert!(!doc.is_required("captcha_image_selector"));
        assert_eq!(doc.properties["captcha_image_selector"].any_of.len(), 2);
    }

    #[test]
    fn resolves_local_refs() {
        let doc: SchemaDocument = serde_json::from_value(json!({
            "properties": { "kind": { "$ref": "#/$defs/Kind" } },
            "$defs": { "Kind": { "type": "string", "enum": ["a", "b"] } }
        }))
        .unwrap();
        let resolved = doc.resolve(&doc.properties["kind"]);
        assert_eq!(resolved.enum_values.as_ref().map(Vec::len), Some(2));
    }
}
