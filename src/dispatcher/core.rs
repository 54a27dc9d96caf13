use super::oracle::{OracleResponse, RequestContext, RoutingOracle, SyntheticRequest};
use crate::binding::ActionBinding;
use crate::candidate::{bind_uri, OperationSkeleton, PathTemplate};
use crate::error::{ExplorerError, Result};
use crate::ids::RequestId;
use crate::router::ParamVec;
use crate::sample_value::sample_value;
use http::{Method, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, debug_span, error};

/// Outcome of verifying one (template, verb) pair.
#[derive(Debug, Clone)]
pub enum DispatchOutcome {
    Resolved(VerifiedRoute),
    /// The oracle answered 404 or 405. The candidate is simply not a route.
    ExpectedAbsence { status: StatusCode },
    /// Any other rejection. Indicates a broken candidate, not a missing route.
    Fault {
        status: StatusCode,
        message: String,
        uri: String,
    },
}

/// A candidate confirmed by the oracle.
#[derive(Debug, Clone)]
pub struct VerifiedRoute {
    pub binding: Arc<ActionBinding>,
    pub path_params: ParamVec,
    pub uri: String,
}

/// Builds synthetic requests for candidates and pushes them through an oracle.
pub struct RouteVerifier {
    oracle: Arc<dyn RoutingOracle>,
    service_root: url::Url,
    context: Arc<RequestContext>,
}

impl RouteVerifier {
    pub fn new(oracle: Arc<dyn RoutingOracle>, service_root: url::Url, context: RequestContext) -> Self {
        Self {
            oracle,
            service_root,
            context: Arc::new(context),
        }
    }

    /// Bind every path parameter of `operation` to a sample literal.
    pub fn synthesize(
        &self,
        candidate: &PathTemplate,
        method: &Method,
        operation: &OperationSkeleton,
    ) -> Result<SyntheticRequest> {
        let mut values = HashMap::new();
        for param in operation.path_parameters() {
            let schema = &param.schema;
            let value = sample_value(schema.kind, schema.format.as_deref(), &schema.enum_members)
                .map_err(|e| ExplorerError::Synthesis {
                    parameter: param.name.clone(),
                    template: candidate.template.clone(),
                    kind: e.kind.to_string(),
                    format: e.format,
                })?;
            values.insert(param.name.clone(), value);
        }
        let bound = bind_uri(&candidate.template, &values)?;

        let mut uri = self.service_root.clone();
        let base = self.service_root.path().trim_end_matches('/');
        uri.set_path(&format!("{base}{bound}"));

        Ok(SyntheticRequest {
            request_id: RequestId::new(),
            method: method.clone(),
            uri,
            template: candidate.template.clone(),
            context: Arc::clone(&self.context),
        })
    }

    /// Synthesize, dispatch and classify one (template, verb) pair.
    pub fn verify(
        &self,
        candidate: &PathTemplate,
        method: &Method,
        operation: &OperationSkeleton,
    ) -> Result<DispatchOutcome> {
        let request = self.synthesize(candidate, method, operation)?;
        let span = debug_span!(
            "verify",
            request_id = %request.request_id,
            method = %method,
            template = %candidate.template,
        );
        let _guard = span.enter();

        let outcome = match self.oracle.resolve(&request) {
            OracleResponse::Resolved {
                binding,
                path_params,
            } => {
                debug!(
                    uri = %request.uri,
                    action = %binding.id(),
                    path_params = ?path_params,
                    "Candidate resolved"
                );
                DispatchOutcome::Resolved(VerifiedRoute {
                    binding,
                    path_params,
                    uri: request.uri.to_string(),
                })
            }
            OracleResponse::Rejected { status, message }
                if status == StatusCode::NOT_FOUND || status == StatusCode::METHOD_NOT_ALLOWED =>
            {
                debug!(uri = %request.uri, status = status.as_u16(), reason = %message, "Candidate is not a route");
                DispatchOutcome::ExpectedAbsence { status }
            }
            OracleResponse::Rejected { status, message } => {
                error!(uri = %request.uri, status = status.as_u16(), reason = %message, "Dispatch fault");
                DispatchOutcome::Fault {
                    status,
                    message,
                    uri: request.uri.to_string(),
                }
            }
        };
        Ok(outcome)
    }

    /// Like [`verify`](Self::verify), with faults turned into errors.
    pub fn verify_or_fault(
        &self,
        candidate: &PathTemplate,
        method: &Method,
        operation: &OperationSkeleton,
    ) -> Result<Option<VerifiedRoute>> {
        match self.verify(candidate, method, operation)? {
            DispatchOutcome::Resolved(route) => Ok(Some(route)),
            DispatchOutcome::ExpectedAbsence { .. } => Ok(None),
            DispatchOutcome::Fault {
                status,
                message,
                uri,
            } => Err(ExplorerError::DispatchFault {
                method: method.to_string(),
                uri,
                template: candidate.template.clone(),
                status: status.as_u16(),
                message,
            }),
        }
    }
}
