use super::CandidateSource;
use crate::binding::ParameterSource;
use crate::candidate::{
    placeholders, OperationSkeleton, ParamSchema, ParameterLocation, ParameterSkeleton,
    PathTemplate, ResponseSkeleton, TemplateKind,
};
use crate::config::normalize_prefix;
use crate::edm::{EdmModel, PrimitiveType};
use crate::error::Result;
use crate::router::{ControllerTable, RoutedAction};
use crate::type_resolver::TypeMap;
use std::sync::Arc;
use tracing::info;

/// Candidate source over actions that declare their own route.
pub struct AttributeRouteRegistry {
    model: Arc<EdmModel>,
    types: TypeMap,
    actions: Vec<RoutedAction>,
    route_prefix: String,
    route_name: String,
}

impl AttributeRouteRegistry {
    pub fn from_table(
        model: Arc<EdmModel>,
        table: &ControllerTable,
        route_prefix: &str,
        route_name: impl Into<String>,
    ) -> Self {
        let actions = table
            .routed_actions()
            .into_iter()
            .filter(|a| a.attribute_routed)
            .collect();
        Self {
            model,
            types: table.type_map(),
            actions,
            route_prefix: normalize_prefix(route_prefix),
            route_name: route_name.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn schema_for(&self, type_name: &str) -> ParamSchema {
        match self.types.model_type_of(type_name) {
            Some(t) => ParamSchema::for_type(&self.model, &t),
            None => ParamSchema::primitive(PrimitiveType::String),
        }
    }

    fn candidate(&self, routed: &RoutedAction) -> Result<PathTemplate> {
        let binding = &routed.binding;
        let template = format!(
            "{}/{}",
            self.route_prefix,
            routed.route.trim_start_matches('/')
        );
        let in_path = placeholders(&template)?;

        let mut parameters = Vec::with_capacity(binding.parameters.len());
        for p in &binding.parameters {
            let location = if in_path.contains(&p.name) {
                ParameterLocation::Path
            } else if p.source == ParameterSource::Body {
                ParameterLocation::Body
            } else {
                continue;
            };
            parameters.push(ParameterSkeleton::new(
                &p.name,
                location,
                self.schema_for(&p.type_name),
                true,
            ));
        }
        // placeholders with no matching action parameter still need a value
        for name in &in_path {
            if !parameters.iter().any(|p| &p.name == name) {
                parameters.push(ParameterSkeleton::new(
                    name,
                    ParameterLocation::Path,
                    ParamSchema::primitive(PrimitiveType::String),
                    true,
                ));
            }
        }

        let returns = binding
            .response_type
            .as_deref()
            .or(binding.return_type.as_deref());
        let success = match returns {
            Some(t) => ResponseSkeleton::status(200, "OK", self.types.model_type_of(t)),
            None => ResponseSkeleton::status(204, "Empty response", None),
        };

        let mut candidate = PathTemplate::new(
            template,
            &self.route_name,
            &binding.controller,
            TemplateKind::Attribute,
        );
        for verb in &binding.verbs {
            candidate = candidate.with_operation(
                verb.clone(),
                OperationSkeleton {
                    parameters: parameters.clone(),
                    responses: vec![success.clone(), ResponseSkeleton::default_error()],
                },
            );
        }
        Ok(candidate)
    }
}

impl CandidateSource for AttributeRouteRegistry {
    fn name(&self) -> &'static str {
        "attribute"
    }

    fn candidates(&self) -> Result<Vec<PathTemplate>> {
        let out = self
            .actions
            .iter()
            .map(|a| self.candidate(a))
            .collect::<Result<Vec<_>>>()?;
        info!(source = self.name(), templates = out.len(), "Attribute templates collected");
        Ok(out)
    }
}
