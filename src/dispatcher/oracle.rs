use crate::binding::ActionBinding;
use crate::edm::EdmModel;
use crate::ids::RequestId;
use crate::router::ParamVec;
use http::{Method, StatusCode};
use std::sync::Arc;

/// Routing context a synthetic request carries in place of a live host.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub route_name: String,
    /// Normalized route prefix, `""` or `/segment`.
    pub route_prefix: String,
    pub model: Arc<EdmModel>,
}

/// A request built for verification only. Never leaves the process.
#[derive(Debug, Clone)]
pub struct SyntheticRequest {
    pub request_id: RequestId,
    pub method: Method,
    /// Absolute URI under the service root.
    pub uri: url::Url,
    /// Template the URI was bound from.
    pub template: String,
    pub context: Arc<RequestContext>,
}

impl SyntheticRequest {
    pub fn path(&self) -> &str {
        self.uri.path()
    }
}

/// What a routing oracle says about a synthetic request.
#[derive(Debug, Clone)]
pub enum OracleResponse {
    /// The request lands on a real action.
    Resolved {
        binding: Arc<ActionBinding>,
        path_params: ParamVec,
    },
    /// The request was rejected with an HTTP status.
    Rejected { status: StatusCode, message: String },
}

impl OracleResponse {
    pub fn not_found(message: impl Into<String>) -> Self {
        OracleResponse::Rejected {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        OracleResponse::Rejected {
            status: StatusCode::METHOD_NOT_ALLOWED,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        OracleResponse::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

/// The routing and action-selection pipeline, seen as a black box.
///
/// Implementations must be deterministic for a fixed model and request and
/// must not let one call affect another.
pub trait RoutingOracle: Send + Sync {
    fn resolve(&self, request: &SyntheticRequest) -> OracleResponse;
}
