use super::strategy::{Resolution, ResolutionInput, ResolutionStrategy, STRATEGIES};
use crate::binding::{ActionBinding, ParameterSource};
use crate::candidate::{ParamSchema, ParameterLocation, ParameterSkeleton};
use crate::error::Result;
use crate::type_resolver::TypeResolver;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Where a described parameter came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterOrigin {
    /// Bound to a real action parameter.
    Bound {
        parameter: String,
        #[serde(rename = "type")]
        type_name: String,
        source: ParameterSource,
    },
    /// Documented only; the action has no counterpart.
    Synthetic,
}

/// One parameter of a final API description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescription {
    /// Documented name, also for key lookups bound through `key`.
    pub name: String,
    pub location: ParameterLocation,
    #[serde(rename = "type")]
    pub type_name: String,
    pub schema: ParamSchema,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub origin: ParameterOrigin,
    pub strategy: ResolutionStrategy,
}

impl ParameterDescription {
    pub fn is_synthetic(&self) -> bool {
        matches!(self.origin, ParameterOrigin::Synthetic)
    }
}

/// Binds documented parameters to a verified action's real parameters.
pub struct ParameterResolver<'a> {
    types: &'a TypeResolver,
}

impl<'a> ParameterResolver<'a> {
    pub fn new(types: &'a TypeResolver) -> Self {
        Self { types }
    }

    /// Resolve every documented parameter of one operation.
    ///
    /// When the action collects its body into a parameter bag, a documented
    /// body object is described member by member instead. The output never
    /// names the same real parameter twice, nor the same name twice.
    pub fn resolve(
        &self,
        documented: &[ParameterSkeleton],
        binding: &ActionBinding,
    ) -> Result<Vec<ParameterDescription>> {
        let expanded = expand_bag_body(documented, binding);
        let mut out: Vec<ParameterDescription> = Vec::with_capacity(expanded.len());
        let mut bound: HashSet<String> = HashSet::new();
        let mut names: HashSet<String> = HashSet::new();

        for (position, doc) in expanded.iter().enumerate() {
            let description = self.resolve_one(doc, position, binding)?;
            if let ParameterOrigin::Bound { parameter, .. } = &description.origin {
                if !bound.insert(parameter.clone()) {
                    debug!(
                        action = %binding.id(),
                        parameter = %description.name,
                        real = %parameter,
                        "Real parameter already described"
                    );
                    continue;
                }
            }
            if !names.insert(description.name.to_ascii_lowercase()) {
                continue;
            }
            out.push(description);
        }
        Ok(out)
    }

    fn resolve_one(
        &self,
        doc: &ParameterSkeleton,
        position: usize,
        binding: &ActionBinding,
    ) -> Result<ParameterDescription> {
        let input = ResolutionInput {
            documented: doc,
            position,
            binding,
        };
        for (strategy, apply) in STRATEGIES {
            if let Resolution::Matched(real) = apply(&input) {
                return Ok(ParameterDescription {
                    name: doc.name.clone(),
                    location: doc.location,
                    type_name: real.type_name.clone(),
                    schema: doc.schema.clone(),
                    required: doc.required,
                    documentation: doc.description.clone(),
                    origin: ParameterOrigin::Bound {
                        parameter: real.name.clone(),
                        type_name: real.type_name.clone(),
                        source: real.source,
                    },
                    strategy,
                });
            }
        }

        let type_name = match &doc.schema.type_ref {
            Some(t) => self.types.display_name(t)?,
            None => doc.schema.kind.to_string(),
        };
        Ok(ParameterDescription {
            name: doc.name.clone(),
            location: doc.location,
            type_name,
            schema: doc.schema.clone(),
            required: doc.required,
            documentation: doc.description.clone(),
            origin: ParameterOrigin::Synthetic,
            strategy: ResolutionStrategy::Synthetic,
        })
    }
}

fn expand_bag_body(documented: &[ParameterSkeleton], binding: &ActionBinding) -> Vec<ParameterSkeleton> {
    if !binding.has_parameter_bag() {
        return documented.to_vec();
    }
    let mut out = Vec::with_capacity(documented.len());
    for doc in documented {
        if doc.location == ParameterLocation::Body && !doc.schema.properties.is_empty() {
            out.extend(doc.schema.properties.iter().cloned());
        } else {
            out.push(doc.clone());
        }
    }
    out
}
