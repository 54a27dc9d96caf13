//! Request and response media types.
//!
//! Each [`MediaFormatter`] says which implementation types it can read from
//! a request body and write to a response. The explorer asks the
//! [`FormatterRegistry`] once per description.

use crate::edm::PrimitiveType;
use crate::type_resolver::strip_option;

pub trait MediaFormatter: Send + Sync {
    fn media_types(&self) -> &[&'static str];
    fn can_read(&self, type_name: &str) -> bool;
    fn can_write(&self, type_name: &str) -> bool;
}

/// `application/json` for anything with a body.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFormatter;

impl MediaFormatter for JsonFormatter {
    fn media_types(&self) -> &[&'static str] {
        &["application/json"]
    }

    fn can_read(&self, type_name: &str) -> bool {
        has_body(type_name)
    }

    fn can_write(&self, type_name: &str) -> bool {
        has_body(type_name)
    }
}

fn has_body(type_name: &str) -> bool {
    let t = type_name.trim();
    !t.is_empty() && t != "()"
}

/// `text/plain` for scalar values.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextFormatter;

impl MediaFormatter for PlainTextFormatter {
    fn media_types(&self) -> &[&'static str] {
        &["text/plain"]
    }

    fn can_read(&self, type_name: &str) -> bool {
        PrimitiveType::from_impl_name(strip_option(type_name.trim())) == Some(PrimitiveType::String)
    }

    fn can_write(&self, type_name: &str) -> bool {
        PrimitiveType::from_impl_name(strip_option(type_name.trim()))
            .is_some_and(|p| p != PrimitiveType::Binary)
    }
}

pub struct FormatterRegistry {
    formatters: Vec<Box<dyn MediaFormatter>>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
            .with(Box::new(JsonFormatter))
            .with(Box::new(PlainTextFormatter))
    }
}

impl FormatterRegistry {
    /// Registry with no formatters.
    pub fn new() -> Self {
        Self {
            formatters: Vec::new(),
        }
    }

    pub fn with(mut self, formatter: Box<dyn MediaFormatter>) -> Self {
        self.formatters.push(formatter);
        self
    }

    /// Media types that can carry a request body of `type_name`, in registration order.
    pub fn readable(&self, type_name: &str) -> Vec<String> {
        self.collect(|f| f.can_read(type_name))
    }

    /// Media types a response of `type_name` can be written as.
    pub fn writable(&self, type_name: &str) -> Vec<String> {
        self.collect(|f| f.can_write(type_name))
    }

    fn collect<F>(&self, accept: F) -> Vec<String>
    where
        F: Fn(&dyn MediaFormatter) -> bool,
    {
        let mut out: Vec<String> = Vec::new();
        for f in self.formatters.iter().filter(|f| accept(f.as_ref())) {
            for m in f.media_types() {
                if !out.iter().any(|seen| seen.as_str() == *m) {
                    out.push((*m).to_string());
                }
            }
        }
        out
    }
}
