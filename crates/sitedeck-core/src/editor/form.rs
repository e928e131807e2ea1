// ── Structured-form descriptors ──
//
// A schema document is turned into a closed set of field kinds. Anything
// outside that set is rejected when the form is built, never rendered as
// a guess.

use serde_json::Value;
use sitedeck_api::{PropertySchema, SchemaDocument};

use crate::error::CoreError;

/// Fields that are always treated as secrets, whatever the schema says.
pub const SECRET_FIELDS: &[&str] = &["password", "openrouter_api_key"];

/// Display order of the site form. Schema fields not listed here follow
/// in the order the service declares them.
pub const SITE_FIELD_ORDER: &[&str] = &[
    "id",
    "name",
    "product_url",
    "username",
    "password",
    "login_wait_selector",
    "post_login_wait_selector",
    "username_selector",
    "password_selector",
    "login_button_selector",
    "captcha_image_selector",
    "captcha_input_selector",
    "captcha_retry_count",
    "subscription_label_selector",
    "subscription_group_selector",
    "subscription_url_type",
    "subscription_url_selector",
    "subscription_url_attribute",
    "subscription_name_pattern",
    "subscription_url_retry_count",
    "subscription_url_retry_delay_ms",
    "post_login_delay_ms",
    "content_validation",
];

/// Mask shown in place of a secret value.
pub const SECRET_MASK: &str = "****";

/// The kinds of field the form view knows how to render and coerce.
#[derive(Debug, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "camelCase")]
pub enum FieldKind {
    String,
    SecretString,
    Integer { minimum: Option<i64> },
    Boolean,
    #[strum(to_string = "enum")]
    Enum(Vec<String>),
    NullableString,
}

/// One renderable form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: FieldKind,
    pub required: bool,
    pub read_only: bool,
}

impl FormField {
    /// Coerce raw form input into the JSON value stored for this field.
    ///
    /// The error string is shown next to the field.
    pub fn parse_input(&self, raw: &str) -> Result<Value, String> {
        match &self.kind {
            FieldKind::String | FieldKind::SecretString => {
                if self.required && raw.trim().is_empty() {
                    Err(format!("{} cannot be empty", self.title))
                } else {
                    Ok(Value::String(raw.to_owned()))
                }
            }
            FieldKind::NullableString => {
                if raw.trim().is_empty() {
                    Ok(Value::Null)
                } else {
                    Ok(Value::String(raw.to_owned()))
                }
            }
            FieldKind::Integer { minimum } => {
                let n: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| format!("{} must be an integer", self.title))?;
                match minimum {
                    Some(min) if n < *min => {
                        Err(format!("{} must be at least {min}", self.title))
                    }
                    _ => Ok(Value::from(n)),
                }
            }
            FieldKind::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
                "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
                _ => Err(format!("{} must be true or false", self.title)),
            },
            FieldKind::Enum(values) => {
                let raw = raw.trim();
                if values.iter().any(|v| v == raw) {
                    Ok(Value::String(raw.to_owned()))
                } else {
                    Err(format!("{} must be one of: {}", self.title, values.join(", ")))
                }
            }
        }
    }

    /// Render a stored value for display. Secrets are masked unless
    /// `reveal` is set; empty secrets stay empty.
    pub fn display_value(&self, value: &Value, reveal: bool) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) if self.is_secret() && !reveal && !s.is_empty() => {
                SECRET_MASK.to_owned()
            }
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_secret(&self) -> bool {
        self.kind == FieldKind::SecretString
    }
}

/// Ordered field descriptors for one configuration type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDescriptor {
    fields: Vec<FormField>,
}

impl FormDescriptor {
    /// Build descriptors from a schema document, listing `order` first.
    ///
    /// Fails on the first property whose kind is not supported.
    pub fn from_schema(doc: &SchemaDocument, order: &[&str]) -> Result<Self, CoreError> {
        let mut names: Vec<&str> = order
            .iter()
            .copied()
            .filter(|name| doc.properties.contains_key(*name))
            .collect();
        for name in doc.properties.keys() {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }

        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            let Some(prop) = doc.properties.get(name) else {
                continue;
            };
            let resolved = doc.resolve(prop);
            let kind = classify(name, resolved, doc)?;
            fields.push(FormField {
                name: name.to_owned(),
                title: prop
                    .title
                    .clone()
                    .or_else(|| resolved.title.clone())
                    .unwrap_or_else(|| name.to_owned()),
                description: prop
                    .description
                    .clone()
                    .or_else(|| resolved.description.clone()),
                kind,
                required: doc.is_required(name),
                read_only: prop.read_only || resolved.read_only,
            });
        }
        Ok(Self { fields })
    }

    /// Descriptors for the site form.
    pub fn for_site(doc: &SchemaDocument) -> Result<Self, CoreError> {
        Self::from_schema(doc, SITE_FIELD_ORDER)
    }

    /// Descriptors for the global form, in schema order.
    pub fn for_global(doc: &SchemaDocument) -> Result<Self, CoreError> {
        Self::from_schema(doc, &[])
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Mark a field read-only (the `id` of a persisted site).
    pub fn lock(&mut self, name: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.read_only = true;
        }
    }
}

// ── Classification ───────────────────────────────────────────────────

fn classify(name: &str, prop: &PropertySchema, doc: &SchemaDocument) -> Result<FieldKind, CoreError> {
    if let Some(values) = &prop.enum_values {
        return values
            .iter()
            .map(|v| v.as_str().map(String::from))
            .collect::<Option<Vec<_>>>()
            .map(FieldKind::Enum)
            .ok_or_else(|| unsupported(name, "non-string enum"));
    }

    if !prop.any_of.is_empty() {
        let (nulls, others): (Vec<&PropertySchema>, Vec<&PropertySchema>) = prop
            .any_of
            .iter()
            .map(|p| doc.resolve(p))
            .partition(|p| type_names(p) == ["null"]);
        return match (nulls.len(), others.as_slice()) {
            (1, [inner]) if type_names(inner) == ["string"] && inner.enum_values.is_none() => {
                Ok(FieldKind::NullableString)
            }
            _ => Err(unsupported(name, "anyOf combination")),
        };
    }

    let mut types = type_names(prop);
    types.sort_unstable();
    match types.as_slice() {
        ["string"] => {
            let secret = prop.format.as_deref() == Some("password")
                || prop.write_only
                || SECRET_FIELDS.contains(&name);
            Ok(if secret {
                FieldKind::SecretString
            } else {
                FieldKind::String
            })
        }
        ["null", "string"] => Ok(FieldKind::NullableString),
        ["integer"] => Ok(FieldKind::Integer {
            minimum: prop.minimum.map(integer_bound),
        }),
        ["boolean"] => Ok(FieldKind::Boolean),
        [] => Err(unsupported(name, "untyped property")),
        other => Err(unsupported(name, &other.join("|"))),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn integer_bound(minimum: f64) -> i64 {
    minimum.ceil() as i64
}

fn type_names(prop: &PropertySchema) -> Vec<&str> {
    prop.type_spec.as_ref().map(|t| t.names()).unwrap_or_default()
}

fn unsupported(name: &str, kind: &str) -> CoreError {
    CoreError::UnsupportedField {
        name: name.to_owned(),
        kind: kind.to_owned(),
    }
}
