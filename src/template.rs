//! Interpolation of `{{ ... }}` / `{% ... %}` templates embedded in block content.

use minijinja::Environment;
use serde_json::Value;
use thiserror::Error;

/// Openers that mark a string as a template
pub const MARKERS: [&str; 2] = ["{{", "{%"];

/// Substring test only; the engine decides whether the template is well formed
pub fn has_markers(s: &str) -> bool {
    MARKERS.iter().any(|m| s.contains(m))
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct TemplateError {
    pub message: String,
}

impl TemplateError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Renders a template string against a data context
pub trait TemplateEngine {
    fn render(&self, template: &str, data: &Value) -> Result<String, TemplateError>;
}

/// Default engine. Undefined variables render as empty strings and output is
/// never auto-escaped.
pub struct JinjaEngine {
    env: Environment<'static>,
}

impl JinjaEngine {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }
}

impl Default for JinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for JinjaEngine {
    fn render(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        self.env
            .render_str(template, data)
            .map_err(|e| TemplateError::new(e.to_string()))
    }
}

/// Parses the caller's template data, which must be a JSON object. Blank
/// input yields an empty object.
pub fn parse_template_data(raw: Option<&str>) -> Result<Value, TemplateError> {
    let Some(json) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Value::Object(Default::default()));
    };
    let value: Value =
        serde_json::from_str(json).map_err(|e| TemplateError::new(e.to_string()))?;
    if !value.is_object() {
        return Err(TemplateError::new(format!(
            "expected a JSON object, got {}",
            json_type_name(&value)
        )));
    }
    Ok(value)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
