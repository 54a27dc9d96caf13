use super::description::{ApiDescription, ResponseDescription};
use crate::binding::{ActionBinding, ParameterSource};
use crate::candidate::{OperationSkeleton, ParameterLocation, PathTemplate};
use crate::config::ExplorerConfig;
use crate::dispatcher::{RequestContext, RouteVerifier, RoutingOracle, VerifiedRoute};
use crate::edm::EdmModel;
use crate::error::{ExplorerError, Result};
use crate::formatter::FormatterRegistry;
use crate::generator::{
    AttributeRouteRegistry, CandidateSource, CustomRouteRegistry, EdmTemplateGenerator,
    TemplateOptions,
};
use crate::resolver::{ParameterDescription, ParameterResolver};
use crate::router::{ControllerRouter, ControllerTable};
use crate::type_resolver::{TypeMap, TypeResolver};
use arc_swap::ArcSwapOption;
use http::Method;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info};

/// One (candidate, verb) pair awaiting verification.
struct WorkItem<'a> {
    candidate: &'a PathTemplate,
    method: &'a Method,
    operation: &'a OperationSkeleton,
}

/// Discovers the routes a service really exposes and describes them.
///
/// [`generate`](Self::generate) computes the description set on first call
/// and hands out the same `Arc` until [`invalidate`](Self::invalidate).
pub struct ApiExplorer {
    model: Arc<EdmModel>,
    config: ExplorerConfig,
    sources: Vec<Box<dyn CandidateSource>>,
    verifier: RouteVerifier,
    formatters: FormatterRegistry,
    types: TypeMap,
    cache: ArcSwapOption<Vec<ApiDescription>>,
    generation_lock: Mutex<()>,
    generations: AtomicU64,
}

impl ApiExplorer {
    pub fn builder(model: Arc<EdmModel>) -> ApiExplorerBuilder {
        ApiExplorerBuilder::new(model)
    }

    /// Explorer over a model and a controller table, routed in process.
    pub fn from_documents(
        model: Arc<EdmModel>,
        table: &ControllerTable,
        config: ExplorerConfig,
    ) -> Result<Self> {
        let router = ControllerRouter::from_config(table, &config)?;
        let attribute = AttributeRouteRegistry::from_table(
            Arc::clone(&model),
            table,
            &config.route_prefix,
            &config.route_name,
        );
        Self::builder(model)
            .config(config)
            .type_map(table.type_map())
            .oracle(Arc::new(router))
            .source(Box::new(attribute))
            .build()
    }

    pub fn model(&self) -> &EdmModel {
        &self.model
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Every candidate from every source, unverified.
    pub fn candidates(&self) -> Result<Vec<PathTemplate>> {
        let mut out = Vec::new();
        for source in &self.sources {
            out.extend(source.candidates()?);
        }
        Ok(out)
    }

    /// The verified description set, computed at most once per cache lifetime.
    pub fn generate(&self) -> Result<Arc<Vec<ApiDescription>>> {
        if let Some(cached) = self.cache.load_full() {
            return Ok(cached);
        }
        let _guard = self
            .generation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(cached) = self.cache.load_full() {
            return Ok(cached);
        }
        let fresh = Arc::new(self.compute()?);
        self.cache.store(Some(Arc::clone(&fresh)));
        self.generations.fetch_add(1, Ordering::SeqCst);
        Ok(fresh)
    }

    /// Drop the cached set; the next `generate` recomputes from scratch.
    pub fn invalidate(&self) {
        let _guard = self
            .generation_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.cache.store(None);
        debug!("Description cache invalidated");
    }

    /// How many times the set has been computed.
    pub fn generation(&self) -> u64 {
        self.generations.load(Ordering::SeqCst)
    }

    fn compute(&self) -> Result<Vec<ApiDescription>> {
        let started = Instant::now();
        let candidates = self.candidates()?;
        let work: Vec<WorkItem<'_>> = candidates
            .iter()
            .flat_map(|candidate| {
                candidate
                    .operations
                    .iter()
                    .map(move |(method, operation)| WorkItem {
                        candidate,
                        method,
                        operation,
                    })
            })
            .collect();

        // per-run cache, shared by every worker
        let types = TypeResolver::new(Arc::clone(&self.model), self.types.clone());
        let described = self.process_all(&work, &types)?;

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(described.len());
        let mut absent = 0usize;
        let mut duplicates = 0usize;
        for description in described {
            let Some(description) = description else {
                absent += 1;
                continue;
            };
            if !seen.insert(description.dedupe_key()) {
                duplicates += 1;
                debug!(description = %description.id(), action = %description.action.id(), "Duplicate description dropped");
                continue;
            }
            out.push(description);
        }

        info!(
            candidates = candidates.len(),
            checked = work.len(),
            absent,
            duplicates,
            descriptions = out.len(),
            type_lookups = types.computed(),
            parallelism = self.config.parallelism,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "API descriptions generated"
        );
        Ok(out)
    }

    /// Verify and describe every item, keeping item order.
    fn process_all(
        &self,
        work: &[WorkItem<'_>],
        types: &TypeResolver,
    ) -> Result<Vec<Option<ApiDescription>>> {
        let workers = self.config.parallelism.clamp(1, work.len().max(1));
        if workers == 1 {
            return work.iter().map(|item| self.process(item, types)).collect();
        }

        let chunk = work.len().div_ceil(workers);
        let parts: Vec<Result<Vec<Option<ApiDescription>>>> = std::thread::scope(|scope| {
            let handles: Vec<_> = work
                .chunks(chunk)
                .map(|part| {
                    scope.spawn(move || {
                        part.iter()
                            .map(|item| self.process(item, types))
                            .collect::<Result<Vec<_>>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect()
        });

        let mut out = Vec::with_capacity(work.len());
        for part in parts {
            out.extend(part?);
        }
        Ok(out)
    }

    fn process(&self, item: &WorkItem<'_>, types: &TypeResolver) -> Result<Option<ApiDescription>> {
        let Some(route) = self
            .verifier
            .verify_or_fault(item.candidate, item.method, item.operation)?
        else {
            return Ok(None);
        };
        self.describe(item, &route, types).map(Some)
    }

    fn describe(
        &self,
        item: &WorkItem<'_>,
        route: &VerifiedRoute,
        types: &TypeResolver,
    ) -> Result<ApiDescription> {
        let binding = route.binding.as_ref();
        let parameters = ParameterResolver::new(types).resolve(&item.operation.parameters, binding)?;

        let declared_type = match &binding.return_type {
            Some(t) => Some(t.clone()),
            None => match item
                .operation
                .success_response()
                .and_then(|r| r.type_ref.as_ref())
            {
                Some(t) => Some(types.display_name(t)?),
                None => None,
            },
        };
        let response = ResponseDescription {
            declared_type,
            response_type: binding.response_type.clone(),
            documentation: binding.documentation.clone(),
        };

        let supported_request_formats = request_body_type(binding, &parameters)
            .map(|t| self.formatters.readable(t))
            .unwrap_or_default();
        let supported_response_formats = response
            .effective_type()
            .map(|t| self.formatters.writable(t))
            .unwrap_or_default();

        Ok(ApiDescription {
            method: item.method.clone(),
            relative_path: item.candidate.template.trim_start_matches('/').to_string(),
            route_name: item.candidate.route_name.clone(),
            group: item.candidate.group.clone(),
            kind: item.candidate.kind,
            action: binding.clone(),
            parameters,
            response,
            supported_request_formats,
            supported_response_formats,
        })
    }
}

/// Type the request body is read into: the action's own body or bag
/// parameter, else the first documented body parameter.
fn request_body_type<'a>(
    binding: &'a ActionBinding,
    parameters: &'a [ParameterDescription],
) -> Option<&'a str> {
    binding
        .parameters
        .iter()
        .find(|p| matches!(p.source, ParameterSource::Body | ParameterSource::Bag))
        .map(|p| p.type_name.as_str())
        .or_else(|| {
            parameters
                .iter()
                .find(|p| p.location == ParameterLocation::Body)
                .map(|p| p.type_name.as_str())
        })
}

/// Assembles an [`ApiExplorer`].
pub struct ApiExplorerBuilder {
    model: Arc<EdmModel>,
    config: ExplorerConfig,
    oracle: Option<Arc<dyn RoutingOracle>>,
    types: TypeMap,
    sources: Vec<Box<dyn CandidateSource>>,
    formatters: FormatterRegistry,
}

impl ApiExplorerBuilder {
    pub fn new(model: Arc<EdmModel>) -> Self {
        Self {
            model,
            config: ExplorerConfig::default(),
            oracle: None,
            types: TypeMap::new(),
            sources: Vec::new(),
            formatters: FormatterRegistry::default(),
        }
    }

    pub fn config(mut self, config: ExplorerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn oracle(mut self, oracle: Arc<dyn RoutingOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn type_map(mut self, types: TypeMap) -> Self {
        self.types = types;
        self
    }

    /// Extra candidate source, consulted after the model and before custom routes.
    pub fn source(mut self, source: Box<dyn CandidateSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn formatters(mut self, formatters: FormatterRegistry) -> Self {
        self.formatters = formatters;
        self
    }

    pub fn build(self) -> Result<ApiExplorer> {
        let oracle = self.oracle.ok_or_else(|| ExplorerError::Config {
            message: "no routing oracle configured".to_string(),
        })?;
        let service_root = self.config.service_root_url()?;
        let options = TemplateOptions::from(&self.config);
        let context = RequestContext {
            route_name: options.route_name.clone(),
            route_prefix: options.route_prefix.clone(),
            model: Arc::clone(&self.model),
        };

        let mut sources: Vec<Box<dyn CandidateSource>> = Vec::with_capacity(self.sources.len() + 2);
        sources.push(Box::new(EdmTemplateGenerator::new(Arc::clone(&self.model), options)));
        sources.extend(self.sources);
        if !self.config.custom_routes.is_empty() {
            sources.push(Box::new(CustomRouteRegistry::new(
                Arc::clone(&self.model),
                self.config.custom_routes.clone(),
                &self.config.route_prefix,
                &self.config.route_name,
            )));
        }

        info!(
            sources = ?sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            service_root = %service_root,
            route_prefix = %self.config.route_prefix,
            parallelism = self.config.parallelism,
            "API explorer configured"
        );

        Ok(ApiExplorer {
            verifier: RouteVerifier::new(oracle, service_root, context),
            model: self.model,
            config: self.config,
            sources,
            formatters: self.formatters,
            types: self.types,
            cache: ArcSwapOption::empty(),
            generation_lock: Mutex::new(()),
            generations: AtomicU64::new(0),
        })
    }
}
