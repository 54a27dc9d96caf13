use super::literal::{accepts, LiteralContext};
use super::radix::{RadixRouter, RouteEntry};
use super::table::ControllerTable;
use crate::binding::ActionBinding;
use crate::config::{normalize_prefix, ExplorerConfig};
use crate::dispatcher::{OracleResponse, RoutingOracle, SyntheticRequest};
use crate::edm::EdmModel;
use crate::error::Result;
use crate::type_resolver::TypeMap;
use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of captured path values before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured path values, name → raw decoded literal.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// A request path matched to an action.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub binding: Arc<ActionBinding>,
    pub route: String,
    pub path_params: ParamVec,
}

impl RouteMatch {
    /// Last captured value named `name`.
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Result of looking up one request.
#[derive(Debug, Clone)]
pub enum RouteLookup {
    Matched(RouteMatch),
    /// The path exists but no action on it answers the verb.
    MethodNotAllowed,
    NotFound,
    /// The path cannot be routed at all (undecodable percent-encoding).
    BadRequest(String),
}

/// In-process routing oracle over a controller table.
///
/// Matches a request path segment by segment, type-checks every captured
/// value against the action parameter it binds, and picks the first action
/// on the matched path that answers the request verb.
#[derive(Debug, Clone)]
pub struct ControllerRouter {
    radix: RadixRouter,
    types: TypeMap,
    base_path: String,
}

impl ControllerRouter {
    /// Build a router whose routes all live under `base_path`.
    pub fn new(table: &ControllerTable, base_path: &str) -> Result<Self> {
        let base_path = normalize_prefix(base_path);
        let mut radix = RadixRouter::default();
        let actions = table.routed_actions();
        let mut summary = Vec::with_capacity(actions.len().min(10));
        for routed in actions {
            let route = format!("{}/{}", base_path, routed.route.trim_start_matches('/'));
            if summary.len() < 10 {
                summary.push(format!("{} -> {}", route, routed.binding.id()));
            }
            radix.insert(RouteEntry {
                binding: Arc::new(routed.binding),
                route,
            })?;
        }

        info!(
            routes_count = radix.len(),
            base_path = %base_path,
            routes_summary = ?summary,
            "Controller routing table loaded"
        );

        Ok(Self {
            radix,
            types: table.type_map(),
            base_path,
        })
    }

    /// Build a router for the base path the explorer configuration implies:
    /// the service root's own path followed by the route prefix.
    pub fn from_config(table: &ControllerTable, config: &ExplorerConfig) -> Result<Self> {
        let root = config.service_root_url()?;
        let base = format!(
            "{}{}",
            root.path().trim_end_matches('/'),
            config.normalized_prefix()
        );
        Self::new(table, &base)
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn type_map(&self) -> &TypeMap {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.radix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Route a percent-encoded request path.
    pub fn route(&self, method: &Method, path: &str, model: &EdmModel) -> RouteLookup {
        let mut segments = Vec::new();
        for raw in path.split('/').filter(|s| !s.is_empty()) {
            match urlencoding::decode(raw) {
                Ok(decoded) => segments.push(decoded.into_owned()),
                Err(e) => {
                    return RouteLookup::BadRequest(format!("invalid percent-encoding in '{raw}': {e}"))
                }
            }
        }

        let ctx = LiteralContext {
            model,
            types: &self.types,
        };
        let mut path_matched = false;
        let mut chosen: Option<(Arc<ActionBinding>, String)> = None;
        let captures = self.radix.search(&segments, &mut |routes, captures| {
            for entry in routes {
                let typed = captures.iter().all(|(name, value)| {
                    entry
                        .binding
                        .parameter(name)
                        .is_some_and(|p| accepts(value, &p.type_name, &ctx))
                });
                if !typed {
                    continue;
                }
                path_matched = true;
                if entry.binding.supports(method) {
                    chosen = Some((Arc::clone(&entry.binding), entry.route.clone()));
                    return true;
                }
            }
            false
        });

        match (captures, chosen) {
            (Some(path_params), Some((binding, route))) => {
                debug!(
                    method = %method,
                    path = %path,
                    action = %binding.id(),
                    route = %route,
                    path_params = ?path_params,
                    "Route matched"
                );
                RouteLookup::Matched(RouteMatch {
                    binding,
                    route,
                    path_params,
                })
            }
            _ if path_matched => RouteLookup::MethodNotAllowed,
            _ => RouteLookup::NotFound,
        }
    }
}

impl RoutingOracle for ControllerRouter {
    fn resolve(&self, request: &SyntheticRequest) -> OracleResponse {
        match self.route(&request.method, request.path(), &request.context.model) {
            RouteLookup::Matched(m) => OracleResponse::Resolved {
                binding: m.binding,
                path_params: m.path_params,
            },
            RouteLookup::MethodNotAllowed => OracleResponse::method_not_allowed(format!(
                "{} not allowed on {}",
                request.method,
                request.path()
            )),
            RouteLookup::NotFound => {
                OracleResponse::not_found(format!("no route for {}", request.path()))
            }
            RouteLookup::BadRequest(message) => OracleResponse::bad_request(message),
        }
    }
}
