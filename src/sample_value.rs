//! Sample literals for path parameters.
//!
//! Every placeholder in a candidate template is filled with a value that the
//! routing layer will accept for its declared type before the candidate is
//! dispatched. The table is fixed so two runs over the same model produce the
//! same URIs; the only exception is `guid`, which is freshly generated.
//!
//! There is no catch-all. A (kind, format) pair missing from the table is an
//! error, since a plausible but wrong literal would make a real route look
//! absent.

use crate::edm::SchemaKind;
use base64::Engine;
use thiserror::Error;

pub const SAMPLE_STRING: &str = "sample";
pub const SAMPLE_INTEGER: &str = "42";
pub const SAMPLE_FLOAT: &str = "3.14";
pub const SAMPLE_DECIMAL: &str = "123.45";
pub const SAMPLE_DATE: &str = "2024-01-15";
pub const SAMPLE_DATE_TIME: &str = "2024-01-15T10:30:00Z";
const SAMPLE_BINARY: &[u8] = b"sample";

/// No literal exists for the requested (kind, format) pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no sample literal for kind '{kind}' with format '{}'", format.as_deref().unwrap_or("<none>"))]
pub struct UnsupportedSample {
    pub kind: SchemaKind,
    pub format: Option<String>,
}

/// Produce a URI-ready sample literal.
///
/// String and enum literals come back single-quoted (`'sample'`,
/// `'ValueOne'`); the binder merges them with any quotes already present in
/// the template. `enum_members` is only consulted for string kinds.
pub fn sample_value(
    kind: SchemaKind,
    format: Option<&str>,
    enum_members: &[String],
) -> Result<String, UnsupportedSample> {
    let value = match (kind, format) {
        (SchemaKind::String, None) => match enum_members.first() {
            Some(member) => quote(member),
            None => quote(SAMPLE_STRING),
        },
        (SchemaKind::String, Some("guid")) => uuid::Uuid::new_v4().to_string(),
        (SchemaKind::String, Some("date")) => SAMPLE_DATE.to_string(),
        (SchemaKind::String, Some("date-time")) => SAMPLE_DATE_TIME.to_string(),
        (SchemaKind::String, Some("binary")) => {
            base64::engine::general_purpose::STANDARD.encode(SAMPLE_BINARY)
        }
        (SchemaKind::Boolean, None) => "true".to_string(),
        (SchemaKind::Integer, None | Some("int32") | Some("int64")) => SAMPLE_INTEGER.to_string(),
        (SchemaKind::Number, None | Some("float") | Some("double")) => SAMPLE_FLOAT.to_string(),
        (SchemaKind::Number, Some("decimal")) => SAMPLE_DECIMAL.to_string(),
        (SchemaKind::Array, _) => "[]".to_string(),
        (kind, format) => {
            return Err(UnsupportedSample {
                kind,
                format: format.map(str::to_string),
            })
        }
    };
    Ok(value)
}

fn quote(inner: &str) -> String {
    format!("'{}'", inner.replace('\'', "''"))
}
