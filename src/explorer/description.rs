use crate::binding::{serde_method, ActionBinding};
use crate::candidate::{ParameterLocation, TemplateKind};
use crate::resolver::ParameterDescription;
use http::Method;
use serde::{Deserialize, Serialize};

/// What an action answers with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseDescription {
    /// Declared return type, or the documented success type when the action declares none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    /// Documented type for actions whose declared return type is opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl ResponseDescription {
    /// The type a client actually receives.
    pub fn effective_type(&self) -> Option<&str> {
        self.response_type
            .as_deref()
            .or(self.declared_type.as_deref())
    }
}

/// One verified (verb, path, action) triple, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDescription {
    #[serde(with = "serde_method")]
    pub method: Method,
    /// Route template without the leading `/`.
    pub relative_path: String,
    pub route_name: String,
    /// Entity set, operation import or controller the route belongs to.
    pub group: String,
    pub kind: TemplateKind,
    pub action: ActionBinding,
    pub parameters: Vec<ParameterDescription>,
    pub response: ResponseDescription,
    pub supported_request_formats: Vec<String>,
    pub supported_response_formats: Vec<String>,
}

impl ApiDescription {
    /// `GET Customers({Id})`
    pub fn id(&self) -> String {
        format!("{} {}", self.method, self.relative_path)
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDescription> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &ParameterDescription> {
        self.parameters.iter().filter(move |p| p.location == location)
    }

    /// Identity used to drop duplicates: verb, normalized path and action.
    pub(crate) fn dedupe_key(&self) -> (String, String, String) {
        (
            self.method.to_string(),
            normalize_path(&self.relative_path),
            self.action.id(),
        )
    }
}

/// Case-folded path with empty argument lists removed, so
/// `Products/Default.Top()` and `products/default.top` compare equal.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.strip_suffix("()").unwrap_or(s).to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("/")
}
