use super::CandidateSource;
use crate::binding::serde_method;
use crate::candidate::{
    placeholders, OperationSkeleton, ParamSchema, ParameterLocation, ParameterSkeleton,
    PathTemplate, ResponseSkeleton, TemplateKind,
};
use crate::config::normalize_prefix;
use crate::edm::{EdmModel, EdmTypeRef};
use crate::error::{ExplorerError, Result};
use http::Method;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomParameter {
    pub name: String,
    pub location: ParameterLocation,
    #[serde(rename = "type")]
    pub type_ref: EdmTypeRef,
    /// Defaults to `true` for path and body parameters, `false` otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl CustomParameter {
    fn is_required(&self) -> bool {
        self.required.unwrap_or(matches!(
            self.location,
            ParameterLocation::Path | ParameterLocation::Body
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOperation {
    #[serde(with = "serde_method")]
    pub method: Method,
    #[serde(default)]
    pub parameters: Vec<CustomParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<EdmTypeRef>,
}

/// A hand-declared route outside the model's conventions.
///
/// ```
/// use edm_explorer::edm::{EdmTypeRef, PrimitiveType};
/// use edm_explorer::generator::CustomRoute;
/// use http::Method;
///
/// let route = CustomRoute::new("/Reports({year})")
///     .operation(Method::GET)
///     .path_parameter("year", EdmTypeRef::primitive(PrimitiveType::Int32))
///     .returns(EdmTypeRef::primitive(PrimitiveType::String));
/// assert_eq!(route.operations.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomRoute {
    /// Template relative to the route prefix.
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub operations: Vec<CustomOperation>,
}

impl CustomRoute {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            group: None,
            operations: Vec::new(),
        }
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Start a new verb; following parameter calls apply to it.
    pub fn operation(mut self, method: Method) -> Self {
        self.operations.push(CustomOperation {
            method,
            parameters: Vec::new(),
            returns: None,
        });
        self
    }

    pub fn path_parameter(self, name: impl Into<String>, type_ref: EdmTypeRef) -> Self {
        self.parameter(name, ParameterLocation::Path, type_ref)
    }

    pub fn query_parameter(self, name: impl Into<String>, type_ref: EdmTypeRef) -> Self {
        self.parameter(name, ParameterLocation::Query, type_ref)
    }

    pub fn body_parameter(self, name: impl Into<String>, type_ref: EdmTypeRef) -> Self {
        self.parameter(name, ParameterLocation::Body, type_ref)
    }

    pub fn returns(mut self, type_ref: EdmTypeRef) -> Self {
        if let Some(op) = self.operations.last_mut() {
            op.returns = Some(type_ref);
        }
        self
    }

    fn parameter(
        mut self,
        name: impl Into<String>,
        location: ParameterLocation,
        type_ref: EdmTypeRef,
    ) -> Self {
        if let Some(op) = self.operations.last_mut() {
            op.parameters.push(CustomParameter {
                name: name.into(),
                location,
                type_ref,
                required: None,
            });
        }
        self
    }

    /// First template segment with any parenthesized part removed.
    fn default_group(&self) -> String {
        let first = self
            .template
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();
        first.split('(').next().unwrap_or(first).to_string()
    }
}

/// Candidate source over hand-declared routes.
pub struct CustomRouteRegistry {
    model: Arc<EdmModel>,
    routes: Vec<CustomRoute>,
    route_prefix: String,
    route_name: String,
}

impl CustomRouteRegistry {
    pub fn new(
        model: Arc<EdmModel>,
        routes: Vec<CustomRoute>,
        route_prefix: &str,
        route_name: impl Into<String>,
    ) -> Self {
        Self {
            model,
            routes,
            route_prefix: normalize_prefix(route_prefix),
            route_name: route_name.into(),
        }
    }

    pub fn register(&mut self, route: CustomRoute) {
        self.routes.push(route);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn candidate(&self, route: &CustomRoute) -> Result<PathTemplate> {
        let template = format!(
            "{}/{}",
            self.route_prefix,
            route.template.trim_start_matches('/')
        );
        let names = placeholders(&template)?;
        let group = route.group.clone().unwrap_or_else(|| route.default_group());
        let mut candidate = PathTemplate::new(&template, &self.route_name, group, TemplateKind::Custom);

        for op in &route.operations {
            if let Some(missing) = names.iter().find(|n| {
                !op.parameters
                    .iter()
                    .any(|p| p.location == ParameterLocation::Path && &p.name == *n)
            }) {
                return Err(ExplorerError::malformed(
                    &template,
                    format!("{} has no path parameter for placeholder '{missing}'", op.method),
                ));
            }
            let parameters = op
                .parameters
                .iter()
                .map(|p| {
                    ParameterSkeleton::new(
                        &p.name,
                        p.location,
                        ParamSchema::for_type(&self.model, &p.type_ref),
                        p.is_required(),
                    )
                })
                .collect();
            let success = match &op.returns {
                Some(t) => ResponseSkeleton::status(200, "OK", Some(t.clone())),
                None => ResponseSkeleton::status(204, "Empty response", None),
            };
            candidate = candidate.with_operation(
                op.method.clone(),
                OperationSkeleton {
                    parameters,
                    responses: vec![success, ResponseSkeleton::default_error()],
                },
            );
        }
        Ok(candidate)
    }
}

impl CandidateSource for CustomRouteRegistry {
    fn name(&self) -> &'static str {
        "custom"
    }

    fn candidates(&self) -> Result<Vec<PathTemplate>> {
        let out = self
            .routes
            .iter()
            .map(|r| self.candidate(r))
            .collect::<Result<Vec<_>>>()?;
        info!(source = self.name(), templates = out.len(), "Custom templates registered");
        Ok(out)
    }
}
