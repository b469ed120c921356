//! Webhook body templating.
//!
//! Rendering is a two-stage pipeline: placeholder substitution, then an
//! attempt to read the substituted text as JSON. Neither stage can fail; the
//! result says which form the body ended up in.

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::warn;

/// The body produced by [`render`].
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBody {
    /// The body is a JSON value and is sent as its JSON text.
    Structured(Value),
    /// The substituted template was not JSON and is sent verbatim.
    Raw(String),
}

impl RenderedBody {
    /// The bytes that go on the wire.
    pub fn to_wire(&self) -> String {
        match self {
            RenderedBody::Structured(value) => value.to_string(),
            RenderedBody::Raw(text) => text.clone(),
        }
    }
}

fn placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").expect("placeholder pattern is valid")
    })
}

/// Replaces every `{{identifier}}` in `template` with the matching variable.
///
/// Unknown identifiers resolve to the empty string. String values are
/// inserted as-is; any other JSON value is inserted as its JSON text.
pub fn substitute(template: &str, vars: &Map<String, Value>) -> String {
    placeholder()
        .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        })
        .into_owned()
}

/// Renders the outbound webhook body.
///
/// Without a template the whole variable map is the body.
pub fn render(template: Option<&str>, vars: &Map<String, Value>) -> RenderedBody {
    let Some(template) = template.filter(|t| !t.trim().is_empty()) else {
        return RenderedBody::Structured(Value::Object(vars.clone()));
    };

    let rendered = substitute(template, vars);
    match serde_json::from_str::<Value>(&rendered) {
        Ok(value) => RenderedBody::Structured(value),
        Err(_) => RenderedBody::Raw(rendered),
    }
}

/// Extra headers parsed from a JSON object, in the order they were given.
pub type HeaderSet = Vec<(String, String)>;

/// Parses the user-supplied extra headers.
///
/// Anything other than a JSON object is dropped with a warning so the
/// delivery can proceed with the default headers only.
pub fn parse_headers(raw: Option<&str>) -> HeaderSet {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return HeaderSet::new();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                (name, value)
            })
            .collect(),
        Ok(_) => {
            warn!("webhook headers must be a JSON object, ignoring");
            HeaderSet::new()
        }
        Err(e) => {
            warn!(error = %e, "webhook headers are not valid JSON, ignoring");
            HeaderSet::new()
        }
    }
}
