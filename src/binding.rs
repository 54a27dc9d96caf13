//! Flat records describing a verified action.
//!
//! An [`ActionBinding`] is what the routing oracle hands back once a
//! synthetic request lands on a real action: who owns it, which verbs it
//! answers, and its real parameter list.

use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an action parameter takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterSource {
    /// Captured from the request path.
    Uri,
    /// Deserialized from the request body.
    Body,
    /// A catch-all bag holding every body member by name.
    Bag,
    /// Injected by the framework (query options, context objects).
    #[default]
    None,
}

impl fmt::Display for ParameterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterSource::Uri => "uri",
            ParameterSource::Body => "body",
            ParameterSource::Bag => "bag",
            ParameterSource::None => "none",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionParameter {
    pub name: String,
    /// Implementation type name, e.g. `i32` or `Product`.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub source: ParameterSource,
}

impl ActionParameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, source: ParameterSource) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBinding {
    pub controller: String,
    pub action: String,
    #[serde(with = "serde_methods")]
    pub verbs: Vec<Method>,
    pub parameters: Vec<ActionParameter>,
    /// Declared return type of the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Documented response type when the declared one is opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl ActionBinding {
    /// Identity of the action, `Controller.action`.
    pub fn id(&self) -> String {
        format!("{}.{}", self.controller, self.action)
    }

    pub fn supports(&self, method: &Method) -> bool {
        self.verbs.iter().any(|v| v == method)
    }

    pub fn parameter(&self, name: &str) -> Option<&ActionParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn has_parameter_bag(&self) -> bool {
        self.parameters.iter().any(|p| p.source == ParameterSource::Bag)
    }
}

/// Serialize an HTTP method as its upper-case name.
pub mod serde_method {
    use http::Method;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(method: &Method, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(method.as_str())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Method, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.to_ascii_uppercase()
            .parse::<Method>()
            .map_err(serde::de::Error::custom)
    }
}

/// Serialize a list of HTTP methods as upper-case names.
pub mod serde_methods {
    use http::Method;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(methods: &[Method], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(methods.len()))?;
        for m in methods {
            seq.serialize_element(m.as_str())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Method>, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names
            .into_iter()
            .map(|s| {
                s.to_ascii_uppercase()
                    .parse::<Method>()
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
