use super::*;
use crate::candidate::{OperationSkeleton, ParamSchema, ParameterSkeleton, PathTemplate, TemplateKind};
use crate::edm::{PrimitiveType, SchemaKind};
use crate::error::ExplorerError;
use crate::router::ControllerRouter;
use crate::testing::{catalog_controllers, catalog_model};
use http::{Method, StatusCode};
use std::sync::{Arc, Mutex};

fn context() -> RequestContext {
    RequestContext {
        route_name: "odata".into(),
        route_prefix: String::new(),
        model: catalog_model(),
    }
}

fn verifier() -> RouteVerifier {
    let router = ControllerRouter::new(&catalog_controllers(), "").unwrap();
    RouteVerifier::new(
        Arc::new(router),
        url::Url::parse("http://localhost").unwrap(),
        context(),
    )
}

fn keyed(template: &str, schema: ParamSchema) -> (PathTemplate, OperationSkeleton) {
    let op = OperationSkeleton {
        parameters: vec![ParameterSkeleton::key("Id", schema)],
        responses: Vec::new(),
    };
    let t = PathTemplate::new(template, "odata", "Test", TemplateKind::Entity)
        .with_operation(Method::GET, op.clone());
    (t, op)
}

#[test]
fn test_resolved_candidate() {
    let (t, op) = keyed("/Customers({Id})", ParamSchema::primitive(PrimitiveType::Int32));
    match verifier().verify(&t, &Method::GET, &op).unwrap() {
        DispatchOutcome::Resolved(route) => {
            assert_eq!(route.binding.id(), "Customers.get");
            assert_eq!(route.uri, "http://localhost/Customers(42)");
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[test]
fn test_missing_route_is_expected_absence() {
    let (t, op) = keyed("/Discontinued({Id})", ParamSchema::primitive(PrimitiveType::Int32));
    assert!(matches!(
        verifier().verify(&t, &Method::GET, &op).unwrap(),
        DispatchOutcome::ExpectedAbsence { status } if status == StatusCode::NOT_FOUND
    ));
    assert!(verifier().verify_or_fault(&t, &Method::GET, &op).unwrap().is_none());
}

#[test]
fn test_wrong_verb_is_expected_absence() {
    let (t, op) = keyed("/Customers({Id})", ParamSchema::primitive(PrimitiveType::Int32));
    assert!(matches!(
        verifier().verify(&t, &Method::POST, &op).unwrap(),
        DispatchOutcome::ExpectedAbsence { status } if status == StatusCode::METHOD_NOT_ALLOWED
    ));
}

#[test]
fn test_unsupported_sample_is_synthesis_error() {
    let (t, op) = keyed(
        "/Shifts({Id})",
        ParamSchema::scalar(SchemaKind::String, Some("duration")),
    );
    match verifier().verify(&t, &Method::GET, &op) {
        Err(ExplorerError::Synthesis {
            parameter, template, ..
        }) => {
            assert_eq!(parameter, "Id");
            assert_eq!(template, "/Shifts({Id})");
        }
        other => panic!("expected synthesis error, got {other:?}"),
    }
}

struct FaultingOracle;

impl RoutingOracle for FaultingOracle {
    fn resolve(&self, _request: &SyntheticRequest) -> OracleResponse {
        OracleResponse::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".into(),
        }
    }
}

#[test]
fn test_other_status_is_a_fault() {
    let verifier = RouteVerifier::new(
        Arc::new(FaultingOracle),
        url::Url::parse("http://localhost").unwrap(),
        context(),
    );
    let (t, op) = keyed("/Customers({Id})", ParamSchema::primitive(PrimitiveType::Int32));
    assert!(matches!(
        verifier.verify(&t, &Method::GET, &op).unwrap(),
        DispatchOutcome::Fault { .. }
    ));
    match verifier.verify_or_fault(&t, &Method::GET, &op) {
        Err(ExplorerError::DispatchFault { status, uri, .. }) => {
            assert_eq!(status, 500);
            assert_eq!(uri, "http://localhost/Customers(42)");
        }
        other => panic!("expected dispatch fault, got {other:?}"),
    }
}

struct RecordingOracle {
    seen: Mutex<Vec<String>>,
}

impl RoutingOracle for RecordingOracle {
    fn resolve(&self, request: &SyntheticRequest) -> OracleResponse {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(request.uri.to_string());
        }
        OracleResponse::not_found("recorded")
    }
}

#[test]
fn test_service_root_path_is_kept() {
    let oracle = Arc::new(RecordingOracle {
        seen: Mutex::new(Vec::new()),
    });
    let verifier = RouteVerifier::new(
        Arc::clone(&oracle) as Arc<dyn RoutingOracle>,
        url::Url::parse("http://localhost:8080/svc/").unwrap(),
        context(),
    );
    let (t, op) = keyed("/Tags({Id})", ParamSchema::primitive(PrimitiveType::String));
    verifier.verify(&t, &Method::GET, &op).unwrap();
    let seen = oracle.seen.lock().unwrap();
    assert_eq!(seen.as_slice(), ["http://localhost:8080/svc/Tags('sample')"]);
}

#[test]
fn test_unbound_placeholder_fails_before_dispatch() {
    let oracle = Arc::new(RecordingOracle {
        seen: Mutex::new(Vec::new()),
    });
    let verifier = RouteVerifier::new(
        Arc::clone(&oracle) as Arc<dyn RoutingOracle>,
        url::Url::parse("http://localhost").unwrap(),
        context(),
    );
    let op = OperationSkeleton {
        parameters: Vec::new(),
        responses: Vec::new(),
    };
    let t = PathTemplate::new("/Customers({Id})", "odata", "Customers", TemplateKind::Entity)
        .with_operation(Method::GET, op.clone());
    assert!(matches!(
        verifier.verify(&t, &Method::GET, &op),
        Err(ExplorerError::MalformedTemplate { .. })
    ));
    assert!(oracle.seen.lock().unwrap().is_empty());
}
