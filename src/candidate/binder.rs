//! URI template binding.
//!
//! Substitutes `{name}` placeholders with sample literals. Quoted literals
//! (`'sample'`) are merged with quotes the template already carries around
//! the placeholder, so `state='{state}'` binds to `state='sample'` rather
//! than `state=''sample''`. `{{` and `}}` stand for literal braces.

use crate::error::{ExplorerError, Result};
use std::collections::HashMap;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplatePart<'a> {
    Literal(&'a str),
    /// An escaped brace (`{{` or `}}`).
    Brace(char),
    Placeholder(&'a str),
}

/// Split a template into literals and placeholders.
pub fn parse_template(template: &str) -> Result<Vec<TemplatePart<'_>>> {
    let mut parts = Vec::new();
    let bytes = template.as_bytes();
    let mut literal_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'}' if bytes.get(i + 1) == Some(&bytes[i]) => {
                if literal_start < i {
                    parts.push(TemplatePart::Literal(&template[literal_start..i]));
                }
                parts.push(TemplatePart::Brace(bytes[i] as char));
                i += 2;
                literal_start = i;
            }
            b'{' => {
                if literal_start < i {
                    parts.push(TemplatePart::Literal(&template[literal_start..i]));
                }
                let close = template[i + 1..]
                    .find('}')
                    .ok_or_else(|| ExplorerError::malformed(template, "unterminated placeholder"))?;
                let name = &template[i + 1..i + 1 + close];
                if name.is_empty() || name.contains('{') {
                    return Err(ExplorerError::malformed(
                        template,
                        format!("invalid placeholder '{{{name}}}'"),
                    ));
                }
                parts.push(TemplatePart::Placeholder(name));
                i += close + 2;
                literal_start = i;
            }
            b'}' => {
                return Err(ExplorerError::malformed(template, "unmatched '}'"));
            }
            _ => i += 1,
        }
    }
    if literal_start < bytes.len() {
        parts.push(TemplatePart::Literal(&template[literal_start..]));
    }
    Ok(parts)
}

/// Placeholder names in order of appearance.
pub fn placeholders(template: &str) -> Result<Vec<String>> {
    Ok(parse_template(template)?
        .into_iter()
        .filter_map(|part| match part {
            TemplatePart::Placeholder(name) => Some(name.to_string()),
            _ => None,
        })
        .collect())
}

/// Bind a template to a concrete, percent-encoded path.
///
/// Every placeholder must have a value; an unbound placeholder is a
/// [`ExplorerError::MalformedTemplate`].
pub fn bind_uri(template: &str, values: &HashMap<String, String>) -> Result<String> {
    let parts = parse_template(template)?;
    let mut uri = String::with_capacity(template.len() + 16);
    for (idx, part) in parts.iter().enumerate() {
        match part {
            TemplatePart::Literal(text) => uri.push_str(text),
            TemplatePart::Brace(c) => uri.push(*c),
            TemplatePart::Placeholder(name) => {
                let value = values.get(*name).ok_or_else(|| {
                    ExplorerError::malformed(template, format!("no value bound for '{{{name}}}'"))
                })?;
                let quoted_in_template = ends_with_quote(parts.get(idx.wrapping_sub(1)))
                    && starts_with_quote(parts.get(idx + 1));
                match unquote(value) {
                    Some(inner) => {
                        let encoded = encode_quoted(&inner);
                        if quoted_in_template {
                            uri.push_str(&encoded);
                        } else {
                            uri.push('\'');
                            uri.push_str(&encoded);
                            uri.push('\'');
                        }
                    }
                    None => uri.push_str(&urlencoding::encode(value)),
                }
            }
        }
    }
    Ok(uri)
}

fn ends_with_quote(part: Option<&TemplatePart<'_>>) -> bool {
    matches!(part, Some(TemplatePart::Literal(text)) if text.ends_with('\''))
}

fn starts_with_quote(part: Option<&TemplatePart<'_>>) -> bool {
    matches!(part, Some(TemplatePart::Literal(text)) if text.starts_with('\''))
}

/// Strip the outer quotes of a quoted literal and undo `''` escaping.
fn unquote(value: &str) -> Option<String> {
    let inner = value.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}

fn encode_quoted(inner: &str) -> String {
    urlencoding::encode(&inner.replace('\'', "''")).into_owned()
}
