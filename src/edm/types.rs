use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// EDM primitive types understood by the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    SByte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    String,
    Guid,
    Date,
    DateTimeOffset,
    TimeOfDay,
    Duration,
    Binary,
}

impl PrimitiveType {
    const ALL: [PrimitiveType; 16] = [
        PrimitiveType::Boolean,
        PrimitiveType::Byte,
        PrimitiveType::SByte,
        PrimitiveType::Int16,
        PrimitiveType::Int32,
        PrimitiveType::Int64,
        PrimitiveType::Single,
        PrimitiveType::Double,
        PrimitiveType::Decimal,
        PrimitiveType::String,
        PrimitiveType::Guid,
        PrimitiveType::Date,
        PrimitiveType::DateTimeOffset,
        PrimitiveType::TimeOfDay,
        PrimitiveType::Duration,
        PrimitiveType::Binary,
    ];

    /// The unqualified EDM name, e.g. `Int32`.
    pub fn edm_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Byte => "Byte",
            PrimitiveType::SByte => "SByte",
            PrimitiveType::Int16 => "Int16",
            PrimitiveType::Int32 => "Int32",
            PrimitiveType::Int64 => "Int64",
            PrimitiveType::Single => "Single",
            PrimitiveType::Double => "Double",
            PrimitiveType::Decimal => "Decimal",
            PrimitiveType::String => "String",
            PrimitiveType::Guid => "Guid",
            PrimitiveType::Date => "Date",
            PrimitiveType::DateTimeOffset => "DateTimeOffset",
            PrimitiveType::TimeOfDay => "TimeOfDay",
            PrimitiveType::Duration => "Duration",
            PrimitiveType::Binary => "Binary",
        }
    }

    pub fn from_edm_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.edm_name() == name)
    }

    /// Documentation (kind, format) pair for this primitive.
    pub fn schema(self) -> (SchemaKind, Option<&'static str>) {
        match self {
            PrimitiveType::Byte
            | PrimitiveType::SByte
            | PrimitiveType::Int16
            | PrimitiveType::Int32 => (SchemaKind::Integer, Some("int32")),
            PrimitiveType::Int64 => (SchemaKind::Integer, Some("int64")),
            PrimitiveType::Single => (SchemaKind::Number, Some("float")),
            PrimitiveType::Double => (SchemaKind::Number, Some("double")),
            PrimitiveType::Decimal => (SchemaKind::Number, Some("decimal")),
            PrimitiveType::Boolean => (SchemaKind::Boolean, None),
            PrimitiveType::String => (SchemaKind::String, None),
            PrimitiveType::Guid => (SchemaKind::String, Some("guid")),
            PrimitiveType::Date => (SchemaKind::String, Some("date")),
            PrimitiveType::DateTimeOffset => (SchemaKind::String, Some("date-time")),
            PrimitiveType::Binary => (SchemaKind::String, Some("binary")),
            PrimitiveType::TimeOfDay => (SchemaKind::String, Some("time")),
            PrimitiveType::Duration => (SchemaKind::String, Some("duration")),
        }
    }

    /// Canonical implementation type name for this primitive.
    pub fn impl_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "bool",
            PrimitiveType::Byte => "u8",
            PrimitiveType::SByte => "i8",
            PrimitiveType::Int16 => "i16",
            PrimitiveType::Int32 => "i32",
            PrimitiveType::Int64 => "i64",
            PrimitiveType::Single => "f32",
            PrimitiveType::Double => "f64",
            PrimitiveType::Decimal => "Decimal",
            PrimitiveType::String => "String",
            PrimitiveType::Guid => "Uuid",
            PrimitiveType::Date => "NaiveDate",
            PrimitiveType::DateTimeOffset => "DateTime<Utc>",
            PrimitiveType::TimeOfDay => "NaiveTime",
            PrimitiveType::Duration => "Duration",
            PrimitiveType::Binary => "Vec<u8>",
        }
    }

    /// Map an implementation-level scalar type name onto its EDM primitive.
    ///
    /// Used for attribute-routed actions, whose placeholders are typed by the
    /// action signature rather than by the model.
    pub fn from_impl_name(name: &str) -> Option<Self> {
        let short = unqualified(name.trim());
        let p = match short.as_str() {
            "bool" => PrimitiveType::Boolean,
            "u8" => PrimitiveType::Byte,
            "i8" => PrimitiveType::SByte,
            "i16" => PrimitiveType::Int16,
            "i32" | "u16" => PrimitiveType::Int32,
            "i64" | "u32" | "u64" => PrimitiveType::Int64,
            "f32" => PrimitiveType::Single,
            "f64" => PrimitiveType::Double,
            "Decimal" => PrimitiveType::Decimal,
            "String" | "str" | "&str" => PrimitiveType::String,
            "Uuid" => PrimitiveType::Guid,
            "NaiveDate" => PrimitiveType::Date,
            "OffsetDateTime" => PrimitiveType::DateTimeOffset,
            t if t == "DateTime" || t.starts_with("DateTime<") => PrimitiveType::DateTimeOffset,
            "NaiveTime" => PrimitiveType::TimeOfDay,
            "Duration" => PrimitiveType::Duration,
            "Vec<u8>" | "Bytes" => PrimitiveType::Binary,
            _ => return None,
        };
        Some(p)
    }
}

/// Drop module paths from every path in a type name, generic arguments
/// included: `chrono::DateTime<chrono::Utc>` becomes `DateTime<Utc>`.
fn unqualified(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut start = 0;
    for (i, c) in name.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '&') {
            out.push_str(last_segment(&name[start..i]));
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    out.push_str(last_segment(&name[start..]));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

/// Coarse documentation kind of a value, mirroring JSON-schema `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SchemaKind::String => "string",
            SchemaKind::Integer => "integer",
            SchemaKind::Number => "number",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Array => "array",
            SchemaKind::Object => "object",
        };
        f.write_str(s)
    }
}

/// A reference to a type in the resource model.
///
/// Textual form follows the EDM conventions: `Edm.Int32`,
/// `Default.Product`, `Collection(Default.Product)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdmTypeRef {
    Primitive(PrimitiveType),
    /// Qualified name of an entity, complex or enum type.
    Named(String),
    Collection(Box<EdmTypeRef>),
}

impl EdmTypeRef {
    pub fn primitive(p: PrimitiveType) -> Self {
        EdmTypeRef::Primitive(p)
    }

    pub fn named(name: impl Into<String>) -> Self {
        EdmTypeRef::Named(name.into())
    }

    pub fn collection(inner: EdmTypeRef) -> Self {
        EdmTypeRef::Collection(Box::new(inner))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, EdmTypeRef::Collection(_))
    }

    /// The element type of a collection, or the type itself.
    pub fn element(&self) -> &EdmTypeRef {
        match self {
            EdmTypeRef::Collection(inner) => inner.element(),
            other => other,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            EdmTypeRef::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            EdmTypeRef::Named(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for EdmTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdmTypeRef::Primitive(p) => write!(f, "Edm.{}", p.edm_name()),
            EdmTypeRef::Named(n) => f.write_str(n),
            EdmTypeRef::Collection(inner) => write!(f, "Collection({inner})"),
        }
    }
}

/// Error returned when a type reference does not follow the EDM grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRefParseError(pub String);

impl fmt::Display for TypeRefParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid type reference '{}'", self.0)
    }
}

impl std::error::Error for TypeRefParseError {}

impl FromStr for EdmTypeRef {
    type Err = TypeRefParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(inner) = s
            .strip_prefix("Collection(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Ok(EdmTypeRef::collection(inner.parse()?));
        }
        if let Some(name) = s.strip_prefix("Edm.") {
            return PrimitiveType::from_edm_name(name)
                .map(EdmTypeRef::Primitive)
                .ok_or_else(|| TypeRefParseError(s.to_string()));
        }
        let valid = !s.is_empty()
            && s.contains('.')
            && s
                .split('.')
                .all(|part| !part.is_empty() && part.chars().all(|c| c.is_alphanumeric() || c == '_'));
        if valid {
            Ok(EdmTypeRef::Named(s.to_string()))
        } else {
            Err(TypeRefParseError(s.to_string()))
        }
    }
}

impl Serialize for EdmTypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EdmTypeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Split a qualified name into (namespace, name).
pub fn split_qualified(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => (&name[..idx], &name[idx + 1..]),
        None => ("", name),
    }
}
