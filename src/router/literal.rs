//! Typed URI literals.
//!
//! A captured path value only binds an action parameter when it parses as
//! the parameter's declared type. When it does not, the router keeps looking
//! for another route.

use crate::edm::{EdmModel, PrimitiveType};
use crate::type_resolver::{strip_option, TypeMap};
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE: Lazy<Regex> = Lazy::new(|| compile(r"^\d{4}-\d{2}-\d{2}$"));
static DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    compile(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:\d{2})$")
});
static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| compile(r"^\d{2}:\d{2}(:\d{2}(\.\d+)?)?$"));
static DURATION: Lazy<Regex> = Lazy::new(|| {
    compile(r"^(duration)?'?-?P(\d+D)?(T(\d+H)?(\d+M)?(\d+(\.\d+)?S)?)?'?$")
});
static DECIMAL: Lazy<Regex> = Lazy::new(|| compile(r"^-?\d+(\.\d+)?$"));
static ENUM_LITERAL: Lazy<Regex> = Lazy::new(|| compile(r"^(?:([A-Za-z_][\w.]*))?'([^']*)'$"));

#[allow(clippy::expect_used)]
fn compile(pattern: &'static str) -> Regex {
    Regex::new(pattern).expect("literal regex should be valid")
}

/// Lookups needed to type-check enum literals.
pub(crate) struct LiteralContext<'a> {
    pub model: &'a EdmModel,
    pub types: &'a TypeMap,
}

/// Whether `raw` (already percent-decoded) is a valid literal of `type_name`.
pub(crate) fn accepts(raw: &str, type_name: &str, ctx: &LiteralContext<'_>) -> bool {
    let type_name = strip_option(type_name.trim());
    if let Some(p) = PrimitiveType::from_impl_name(type_name) {
        return accepts_primitive(raw, p);
    }
    let Some(model_type) = ctx.types.model_type_of(type_name) else {
        return false;
    };
    if let Some(p) = model_type.as_primitive() {
        return accepts_primitive(raw, p);
    }
    match model_type.as_named().and_then(|n| ctx.model.enum_type(n)) {
        Some(e) => {
            let qualified = ctx.model.qualify(&e.name);
            let Some(caps) = ENUM_LITERAL.captures(raw) else {
                return false;
            };
            let prefix_ok = caps
                .get(1)
                .map_or(true, |ns| ctx.model.qualify(ns.as_str()) == qualified);
            let member_ok = caps
                .get(2)
                .is_some_and(|m| e.members.iter().any(|member| member == m.as_str()));
            prefix_ok && member_ok
        }
        None => false,
    }
}

fn accepts_primitive(raw: &str, p: PrimitiveType) -> bool {
    match p {
        PrimitiveType::Boolean => raw == "true" || raw == "false",
        PrimitiveType::Byte => raw.parse::<u8>().is_ok(),
        PrimitiveType::SByte => raw.parse::<i8>().is_ok(),
        PrimitiveType::Int16 => raw.parse::<i16>().is_ok(),
        PrimitiveType::Int32 => raw.parse::<i32>().is_ok(),
        PrimitiveType::Int64 => raw.parse::<i64>().is_ok(),
        PrimitiveType::Single | PrimitiveType::Double => {
            raw.parse::<f64>().is_ok_and(f64::is_finite)
        }
        PrimitiveType::Decimal => DECIMAL.is_match(raw),
        PrimitiveType::String => is_quoted_string(raw),
        PrimitiveType::Guid => uuid::Uuid::parse_str(raw).is_ok(),
        PrimitiveType::Date => DATE.is_match(raw),
        PrimitiveType::DateTimeOffset => DATE_TIME.is_match(raw),
        PrimitiveType::TimeOfDay => TIME_OF_DAY.is_match(raw),
        PrimitiveType::Duration => DURATION.is_match(raw),
        PrimitiveType::Binary => {
            let body = raw
                .strip_prefix("binary'")
                .and_then(|s| s.strip_suffix('\''))
                .unwrap_or(raw);
            base64::engine::general_purpose::STANDARD.decode(body).is_ok()
                || base64::engine::general_purpose::URL_SAFE.decode(body).is_ok()
        }
    }
}

/// `'...'` where every inner quote is doubled.
fn is_quoted_string(raw: &str) -> bool {
    let Some(inner) = raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) else {
        return false;
    };
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\'' && chars.next() != Some('\'') {
            return false;
        }
    }
    true
}
