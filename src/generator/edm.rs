use super::CandidateSource;
use crate::candidate::{
    OperationSkeleton, ParamSchema, ParameterLocation, ParameterSkeleton, PathTemplate,
    ResponseSkeleton, TemplateKind,
};
use crate::config::{normalize_prefix, ExplorerConfig};
use crate::edm::{
    split_qualified, EdmModel, EdmTypeRef, EntitySet, EntityType, Operation, OperationKind,
    OperationParameter, PrimitiveType,
};
use crate::error::Result;
use http::Method;
use std::sync::Arc;
use tracing::{debug, info};

/// Knobs that shape generated templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Normalized prefix: `""` or `/segment`.
    pub route_prefix: String,
    pub route_name: String,
    pub enum_prefix_free: bool,
    pub include_navigation_properties: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        Self::from(&ExplorerConfig::default())
    }
}

impl From<&ExplorerConfig> for TemplateOptions {
    fn from(config: &ExplorerConfig) -> Self {
        Self {
            route_prefix: normalize_prefix(&config.route_prefix),
            route_name: config.route_name.clone(),
            enum_prefix_free: config.enum_prefix_free,
            include_navigation_properties: config.include_navigation_properties,
        }
    }
}

/// Emits every template the resource model could expose.
pub struct EdmTemplateGenerator {
    model: Arc<EdmModel>,
    options: TemplateOptions,
}

impl EdmTemplateGenerator {
    pub fn new(model: Arc<EdmModel>, options: TemplateOptions) -> Self {
        Self { model, options }
    }

    fn template(&self, path: &str, group: &str, kind: TemplateKind) -> PathTemplate {
        PathTemplate::new(
            format!("{}/{}", self.options.route_prefix, path),
            &self.options.route_name,
            group,
            kind,
        )
    }

    /// Placeholder for a value of `type_ref`, with the quoting its literal needs.
    fn placeholder(&self, name: &str, type_ref: &EdmTypeRef) -> String {
        if type_ref.as_primitive() == Some(PrimitiveType::String) {
            return format!("'{{{name}}}'");
        }
        match self.model.enum_of(type_ref) {
            Some(_) if self.options.enum_prefix_free => format!("'{{{name}}}'"),
            Some(e) => format!("{}'{{{name}}}'", self.model.qualify(&e.name)),
            None => format!("{{{name}}}"),
        }
    }

    /// Key segment and key parameters, in key declaration order.
    fn key_segment(&self, entity: &EntityType) -> (String, Vec<ParameterSkeleton>) {
        let keys = self.model.key_properties(entity);
        let params = keys
            .iter()
            .map(|p| ParameterSkeleton::key(&p.name, ParamSchema::for_type(&self.model, &p.type_ref)))
            .collect();
        let inner = match keys.as_slice() {
            [single] => self.placeholder(&single.name, &single.type_ref),
            _ => keys
                .iter()
                .map(|p| format!("{}={}", p.name, self.placeholder(&p.name, &p.type_ref)))
                .collect::<Vec<_>>()
                .join(","),
        };
        (format!("({inner})"), params)
    }

    fn entity_ref(&self, entity: &EntityType) -> EdmTypeRef {
        EdmTypeRef::named(self.model.qualify(&entity.name))
    }

    fn entity_body(&self, entity: &EntityType) -> ParameterSkeleton {
        let (_, local) = split_qualified(&entity.name);
        ParameterSkeleton::new(
            local,
            ParameterLocation::Body,
            ParamSchema::for_type(&self.model, &self.entity_ref(entity)),
            true,
        )
    }

    fn entity_set_routes(&self, set: &EntitySet, entity: &EntityType, out: &mut Vec<PathTemplate>) {
        let entity_ref = self.entity_ref(entity);

        let list = OperationSkeleton {
            parameters: list_query_options(),
            responses: vec![
                ResponseSkeleton::status(200, "OK", Some(EdmTypeRef::collection(entity_ref.clone()))),
                ResponseSkeleton::default_error(),
            ],
        };
        let create = OperationSkeleton {
            parameters: vec![self.entity_body(entity)],
            responses: vec![
                ResponseSkeleton::status(201, "Created", Some(entity_ref.clone())),
                ResponseSkeleton::default_error(),
            ],
        };
        out.push(
            self.template(&set.name, &set.name, TemplateKind::EntitySet)
                .with_operation(Method::GET, list)
                .with_operation(Method::POST, create),
        );

        let (key_segment, key_params) = self.key_segment(entity);
        let single_path = format!("{}{}", set.name, key_segment);

        let mut get_params = key_params.clone();
        get_params.extend(single_query_options());
        let get = OperationSkeleton {
            parameters: get_params,
            responses: vec![
                ResponseSkeleton::status(200, "OK", Some(entity_ref.clone())),
                ResponseSkeleton::default_error(),
            ],
        };
        let mut update_params = key_params.clone();
        update_params.push(self.entity_body(entity));
        let update = OperationSkeleton {
            parameters: update_params,
            responses: empty_responses(),
        };
        let mut delete_params = key_params.clone();
        delete_params.push(
            ParameterSkeleton::new(
                "If-Match",
                ParameterLocation::Header,
                ParamSchema::primitive(PrimitiveType::String),
                false,
            )
            .with_description("ETag of the entity to delete"),
        );
        let delete = OperationSkeleton {
            parameters: delete_params,
            responses: empty_responses(),
        };
        out.push(
            self.template(&single_path, &set.name, TemplateKind::Entity)
                .with_operation(Method::GET, get)
                .with_operation(Method::PATCH, update.clone())
                .with_operation(Method::PUT, update)
                .with_operation(Method::DELETE, delete),
        );

        if self.options.include_navigation_properties {
            for nav in &entity.navigation_properties {
                let mut parameters = key_params.clone();
                if nav.type_ref.is_collection() {
                    parameters.extend(list_query_options());
                } else {
                    parameters.extend(single_query_options());
                }
                let op = OperationSkeleton {
                    parameters,
                    responses: vec![
                        ResponseSkeleton::status(200, "OK", Some(nav.type_ref.clone())),
                        ResponseSkeleton::default_error(),
                    ],
                };
                out.push(
                    self.template(
                        &format!("{single_path}/{}", nav.name),
                        &set.name,
                        TemplateKind::Navigation,
                    )
                    .with_operation(Method::GET, op),
                );
            }
        }
    }

    /// Path suffix and parameters for an operation's declared parameters.
    ///
    /// Functions carry scalar parameters inline (`(a={a},b='{b}')`) and
    /// structured ones through `@alias` query parameters. Actions take one
    /// JSON body object.
    fn operation_suffix(&self, op: &Operation) -> (String, Vec<ParameterSkeleton>) {
        let declared = op.declared_parameters();
        match op.kind {
            OperationKind::Function => {
                let mut params = Vec::with_capacity(declared.len());
                let mut inline = Vec::with_capacity(declared.len());
                for p in declared {
                    let schema = ParamSchema::for_type(&self.model, &p.type_ref);
                    if self.is_inline(&p.type_ref) {
                        inline.push(format!("{}={}", p.name, self.placeholder(&p.name, &p.type_ref)));
                        params.push(ParameterSkeleton::new(&p.name, ParameterLocation::Path, schema, true));
                    } else {
                        inline.push(format!("{0}=@{0}", p.name));
                        params.push(ParameterSkeleton::new(
                            format!("@{}", p.name),
                            ParameterLocation::Query,
                            schema,
                            !p.nullable,
                        ));
                    }
                }
                if op.return_type.as_ref().is_some_and(|t| self.is_entity_collection(t)) {
                    params.extend(list_query_options());
                }
                (format!("({})", inline.join(",")), params)
            }
            OperationKind::Action => {
                if declared.is_empty() {
                    return (String::new(), Vec::new());
                }
                (String::new(), vec![self.action_body(declared)])
            }
        }
    }

    fn action_body(&self, declared: &[OperationParameter]) -> ParameterSkeleton {
        let properties: Vec<ParameterSkeleton> = declared
            .iter()
            .map(|p| {
                ParameterSkeleton::new(
                    &p.name,
                    ParameterLocation::Body,
                    ParamSchema::for_type(&self.model, &p.type_ref),
                    !p.nullable,
                )
            })
            .collect();
        let required = declared.iter().any(|p| !p.nullable);
        ParameterSkeleton::new(
            "parameters",
            ParameterLocation::Body,
            ParamSchema::object(properties),
            required,
        )
    }

    fn is_inline(&self, type_ref: &EdmTypeRef) -> bool {
        type_ref.as_primitive().is_some() || self.model.enum_of(type_ref).is_some()
    }

    fn is_entity_collection(&self, type_ref: &EdmTypeRef) -> bool {
        type_ref.is_collection()
            && type_ref
                .element()
                .as_named()
                .is_some_and(|n| self.model.entity_type(n).is_some())
    }

    fn operation_responses(&self, op: &Operation) -> Vec<ResponseSkeleton> {
        let success = match (op.kind, &op.return_type) {
            (_, Some(t)) => ResponseSkeleton::status(200, "OK", Some(t.clone())),
            (OperationKind::Function, None) => ResponseSkeleton::status(200, "OK", None),
            (OperationKind::Action, None) => ResponseSkeleton::status(204, "Empty response", None),
        };
        vec![success, ResponseSkeleton::default_error()]
    }

    fn operation_method(op: &Operation) -> Method {
        match op.kind {
            OperationKind::Function => Method::GET,
            OperationKind::Action => Method::POST,
        }
    }

    fn import_routes(&self, out: &mut Vec<PathTemplate>) {
        for import in self.model.operation_imports() {
            let Some(op) = self.model.import_target(import) else {
                debug!(import = %import.name, operation = %import.operation, "Operation import has no unbound target");
                continue;
            };
            let (suffix, parameters) = self.operation_suffix(op);
            let skeleton = OperationSkeleton {
                parameters,
                responses: self.operation_responses(op),
            };
            out.push(
                self.template(
                    &format!("{}{}", import.name, suffix),
                    &import.name,
                    TemplateKind::OperationImport,
                )
                .with_operation(Self::operation_method(op), skeleton),
            );
        }
    }

    fn bound_routes(&self, out: &mut Vec<PathTemplate>) {
        for op in self.model.operations().iter().filter(|op| op.bound) {
            let targets = self.model.binding_targets(op);
            if targets.is_empty() {
                debug!(operation = %op.name, "Bound operation matches no entity set");
                continue;
            }
            let qualified = self.model.qualified_operation_name(op);
            let (suffix, op_params) = self.operation_suffix(op);
            for (set, to_collection) in targets {
                let Some(entity) = self.model.entity_type_of(set) else {
                    continue;
                };
                let (base, mut parameters) = if to_collection {
                    (set.name.clone(), Vec::new())
                } else {
                    let (key_segment, key_params) = self.key_segment(entity);
                    (format!("{}{}", set.name, key_segment), key_params)
                };
                parameters.extend(op_params.iter().cloned());
                let skeleton = OperationSkeleton {
                    parameters,
                    responses: self.operation_responses(op),
                };
                out.push(
                    self.template(
                        &format!("{base}/{qualified}{suffix}"),
                        &set.name,
                        TemplateKind::BoundOperation,
                    )
                    .with_operation(Self::operation_method(op), skeleton),
                );
            }
        }
    }
}

impl CandidateSource for EdmTemplateGenerator {
    fn name(&self) -> &'static str {
        "edm"
    }

    fn candidates(&self) -> Result<Vec<PathTemplate>> {
        let mut out = Vec::new();
        for set in self.model.entity_sets() {
            match self.model.entity_type_of(set) {
                Some(entity) => self.entity_set_routes(set, entity, &mut out),
                None => debug!(entity_set = %set.name, "Entity set has no entity type"),
            }
        }
        self.import_routes(&mut out);
        self.bound_routes(&mut out);

        info!(
            source = self.name(),
            route_name = %self.options.route_name,
            route_prefix = %self.options.route_prefix,
            templates = out.len(),
            "Model templates generated"
        );
        Ok(out)
    }
}

fn query_option(name: &str, p: PrimitiveType, description: &str) -> ParameterSkeleton {
    ParameterSkeleton::new(name, ParameterLocation::Query, ParamSchema::primitive(p), false)
        .with_description(description)
}

/// `$expand` and `$select`.
pub(crate) fn single_query_options() -> Vec<ParameterSkeleton> {
    vec![
        query_option("$expand", PrimitiveType::String, "Expand related entities"),
        query_option("$select", PrimitiveType::String, "Select properties to be returned"),
    ]
}

/// The full set of query options a collection accepts.
pub(crate) fn list_query_options() -> Vec<ParameterSkeleton> {
    let mut options = single_query_options();
    options.extend([
        query_option("$filter", PrimitiveType::String, "Filter items by property values"),
        query_option("$orderby", PrimitiveType::String, "Order items by property values"),
        query_option("$top", PrimitiveType::Int32, "Show only the first n items"),
        query_option("$skip", PrimitiveType::Int32, "Skip the first n items"),
        query_option("$count", PrimitiveType::Boolean, "Include count of items"),
    ]);
    options
}

fn empty_responses() -> Vec<ResponseSkeleton> {
    vec![
        ResponseSkeleton::status(204, "Empty response", None),
        ResponseSkeleton::default_error(),
    ]
}
