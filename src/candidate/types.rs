use crate::edm::{EdmModel, EdmTypeRef, PrimitiveType, SchemaKind};
use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker prefix on the description of a parameter that carries an entity key.
pub const KEY_LOOKUP_PREFIX: &str = "key: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "Path"),
            ParameterLocation::Query => write!(f, "Query"),
            ParameterLocation::Header => write!(f, "Header"),
            ParameterLocation::Body => write!(f, "Body"),
        }
    }
}

/// Documented shape of a parameter or response value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSchema {
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Model type this schema was derived from, if any.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<EdmTypeRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_members: Vec<String>,
    /// Members of a JSON body object (action parameters).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<ParameterSkeleton>,
}

impl ParamSchema {
    pub fn scalar(kind: SchemaKind, format: Option<&str>) -> Self {
        Self {
            kind,
            format: format.map(str::to_string),
            type_ref: None,
            enum_members: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn primitive(p: PrimitiveType) -> Self {
        let (kind, format) = p.schema();
        Self {
            type_ref: Some(EdmTypeRef::Primitive(p)),
            ..Self::scalar(kind, format)
        }
    }

    /// Schema for an arbitrary model type.
    ///
    /// Enums document as strings listing their members; entity and complex
    /// types as objects; collections as arrays.
    pub fn for_type(model: &EdmModel, type_ref: &EdmTypeRef) -> Self {
        let mut schema = match type_ref {
            EdmTypeRef::Primitive(p) => return Self::primitive(*p),
            EdmTypeRef::Collection(_) => Self::scalar(SchemaKind::Array, None),
            EdmTypeRef::Named(name) => match model.enum_type(name) {
                Some(e) => Self {
                    enum_members: e.members.clone(),
                    ..Self::scalar(SchemaKind::String, None)
                },
                None => Self::scalar(SchemaKind::Object, None),
            },
        };
        schema.type_ref = Some(type_ref.clone());
        schema
    }

    /// A JSON object whose members are the given parameters.
    pub fn object(properties: Vec<ParameterSkeleton>) -> Self {
        Self {
            properties,
            ..Self::scalar(SchemaKind::Object, None)
        }
    }

    pub fn is_enum(&self) -> bool {
        !self.enum_members.is_empty()
    }
}

/// A parameter as documented by a template generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSkeleton {
    pub name: String,
    pub location: ParameterLocation,
    pub schema: ParamSchema,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ParameterSkeleton {
    pub fn new(
        name: impl Into<String>,
        location: ParameterLocation,
        schema: ParamSchema,
        required: bool,
    ) -> Self {
        Self {
            name: name.into(),
            location,
            schema,
            required,
            description: None,
        }
    }

    /// Required path parameter holding (part of) an entity key.
    pub fn key(name: impl Into<String>, schema: ParamSchema) -> Self {
        let name = name.into();
        Self {
            description: Some(format!("{KEY_LOOKUP_PREFIX}{name}")),
            ..Self::new(name, ParameterLocation::Path, schema, true)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_key_lookup(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| d.starts_with(KEY_LOOKUP_PREFIX))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSkeleton {
    /// HTTP status, or `None` for the `default` response.
    pub status: Option<u16>,
    pub description: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_ref: Option<EdmTypeRef>,
}

impl ResponseSkeleton {
    pub fn status(status: u16, description: impl Into<String>, type_ref: Option<EdmTypeRef>) -> Self {
        Self {
            status: Some(status),
            description: description.into(),
            type_ref,
        }
    }

    pub fn default_error() -> Self {
        Self {
            status: None,
            description: "Unexpected error".to_string(),
            type_ref: None,
        }
    }
}

/// Skeletal description of one verb on a candidate template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSkeleton {
    pub parameters: Vec<ParameterSkeleton>,
    pub responses: Vec<ResponseSkeleton>,
}

impl OperationSkeleton {
    pub fn path_parameters(&self) -> impl Iterator<Item = &ParameterSkeleton> {
        self.parameters
            .iter()
            .filter(|p| p.location == ParameterLocation::Path)
    }

    pub fn body_parameter(&self) -> Option<&ParameterSkeleton> {
        self.parameters
            .iter()
            .find(|p| p.location == ParameterLocation::Body)
    }

    /// First 2xx response.
    pub fn success_response(&self) -> Option<&ResponseSkeleton> {
        self.responses
            .iter()
            .find(|r| r.status.is_some_and(|s| (200..300).contains(&s)))
    }
}

/// Which model construct (or registry) produced a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    EntitySet,
    Entity,
    Navigation,
    OperationImport,
    BoundOperation,
    Attribute,
    Custom,
}

/// A candidate route produced speculatively, before verification.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    /// Template with `{name}` placeholders, always starting with `/`.
    pub template: String,
    pub route_name: String,
    /// Logical owner: entity set, operation import or controller name.
    pub group: String,
    pub kind: TemplateKind,
    /// Verbs in generation order.
    pub operations: Vec<(Method, OperationSkeleton)>,
}

impl PathTemplate {
    pub fn new(
        template: impl Into<String>,
        route_name: impl Into<String>,
        group: impl Into<String>,
        kind: TemplateKind,
    ) -> Self {
        Self {
            template: template.into(),
            route_name: route_name.into(),
            group: group.into(),
            kind,
            operations: Vec::new(),
        }
    }

    pub fn with_operation(mut self, method: Method, operation: OperationSkeleton) -> Self {
        self.operations.push((method, operation));
        self
    }

    pub fn operation(&self, method: &Method) -> Option<&OperationSkeleton> {
        self.operations
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, op)| op)
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.operations.iter().map(|(m, _)| m)
    }
}
