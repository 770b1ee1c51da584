//! Parse an extracted payload and check it against its expected shape
//!
//! Validation decides once whether the payload is a success shape or an
//! explicit provider refusal (`{"error": "..."}`); downstream code only ever
//! sees the typed result.

use crate::error::IngestError;
use crate::extract::ExtractedPayload;
use crate::types::{PayloadShape, ShapeSpec};
use serde_json::{Map, Value};
use tracing::debug;

/// Outcome of a successful parse
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedPayload<T> {
    /// Payload matched the expected shape
    Success(T),
    /// Provider explicitly declined to answer
    UpstreamError(String),
}

impl<T> ParsedPayload<T> {
    /// Fold an upstream refusal into [`IngestError::UpstreamReported`]
    pub fn into_result(self) -> Result<T, IngestError> {
        match self {
            ParsedPayload::Success(payload) => Ok(payload),
            ParsedPayload::UpstreamError(reason) => Err(IngestError::UpstreamReported(reason)),
        }
    }
}

/// Parse and shape-check `extracted` into `T`
///
/// # Errors
///
/// - `MalformedJson` when the text is not JSON (with a bounded excerpt)
/// - `UnexpectedShape` when it is JSON but not an object of the required shape
pub fn parse_payload<T: PayloadShape>(
    extracted: &ExtractedPayload,
) -> Result<ParsedPayload<T>, IngestError> {
    let text = extracted.as_str();
    let value: Value =
        serde_json::from_str(text).map_err(|e| IngestError::malformed(text, e.to_string()))?;

    let object = match value {
        Value::Object(object) => object,
        other => {
            return Err(IngestError::UnexpectedShape(format!(
                "expected a JSON object, got {}",
                json_type(&other)
            )))
        }
    };

    if let Some(reason) = upstream_error(&object) {
        debug!("Provider reported error: {}", reason);
        return Ok(ParsedPayload::UpstreamError(reason));
    }

    check_shape(&object, &T::SHAPE)?;

    let payload = serde_json::from_value(Value::Object(object))?;
    Ok(ParsedPayload::Success(payload))
}

/// Parse, shape-check and fold upstream refusals into an error
pub fn validate<T: PayloadShape>(extracted: &ExtractedPayload) -> Result<T, IngestError> {
    parse_payload(extracted)?.into_result()
}

/// Check the required keys of `object` against `spec`
///
/// Arity is not enforced: a list may hold fewer items than requested.
pub fn check_shape(object: &Map<String, Value>, spec: &ShapeSpec) -> Result<(), IngestError> {
    match spec {
        ShapeSpec::List { key, item_fields } => {
            let items = object
                .get(*key)
                .ok_or_else(|| IngestError::UnexpectedShape(format!("missing '{}' array", key)))?
                .as_array()
                .ok_or_else(|| IngestError::UnexpectedShape(format!("'{}' is not an array", key)))?;

            for (idx, item) in items.iter().enumerate() {
                let item = item.as_object().ok_or_else(|| {
                    IngestError::UnexpectedShape(format!("{}[{}] is not an object", key, idx))
                })?;
                if let Some(field) = missing_field(item, item_fields) {
                    return Err(IngestError::UnexpectedShape(format!(
                        "{}[{}] is missing '{}'",
                        key, idx, field
                    )));
                }
            }
            Ok(())
        }
        ShapeSpec::Object { fields } => match missing_field(object, fields) {
            Some(field) => Err(IngestError::UnexpectedShape(format!("missing '{}'", field))),
            None => Ok(()),
        },
    }
}

fn upstream_error(object: &Map<String, Value>) -> Option<String> {
    match object.get("error")? {
        Value::Null => None,
        Value::String(reason) => Some(reason.clone()),
        other => Some(other.to_string()),
    }
}

/// First required field that is absent, null or a blank string
fn missing_field(object: &Map<String, Value>, fields: &[&'static str]) -> Option<&'static str> {
    fields.iter().copied().find(|field| match object.get(*field) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
