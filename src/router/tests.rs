use super::{ActionDef, ControllerDef, ControllerRouter, RouteLookup};
use crate::testing::{catalog_controllers, catalog_model};
use http::Method;

fn router() -> ControllerRouter {
    ControllerRouter::new(&catalog_controllers(), "").unwrap()
}

fn action_for(method: Method, path: &str) -> Option<String> {
    match router().route(&method, path, &catalog_model()) {
        RouteLookup::Matched(m) => Some(m.binding.id()),
        _ => None,
    }
}

#[test]
fn test_entity_set_and_key_routes() {
    assert_eq!(action_for(Method::GET, "/Customers").as_deref(), Some("Customers.list"));
    assert_eq!(action_for(Method::POST, "/Customers").as_deref(), Some("Customers.create"));
    assert_eq!(action_for(Method::GET, "/Customers(42)").as_deref(), Some("Customers.get"));
    assert_eq!(action_for(Method::PUT, "/Customers(42)").as_deref(), Some("Customers.update"));
    assert_eq!(action_for(Method::DELETE, "/Customers(42)").as_deref(), Some("Customers.delete"));
}

#[test]
fn test_captured_values_are_exposed() {
    match router().route(&Method::GET, "/Customers(42)", &catalog_model()) {
        RouteLookup::Matched(m) => assert_eq!(m.get_path_param("key"), Some("42")),
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn test_wrong_verb_is_method_not_allowed() {
    assert!(matches!(
        router().route(&Method::DELETE, "/Customers", &catalog_model()),
        RouteLookup::MethodNotAllowed
    ));
}

#[test]
fn test_unknown_path_is_not_found() {
    assert!(matches!(
        router().route(&Method::GET, "/Discontinued(42)", &catalog_model()),
        RouteLookup::NotFound
    ));
}

#[test]
fn test_value_of_wrong_type_does_not_bind() {
    assert!(matches!(
        router().route(&Method::GET, "/Customers('abc')", &catalog_model()),
        RouteLookup::NotFound
    ));
}

#[test]
fn test_bound_function_with_quoted_parameter() {
    assert_eq!(
        action_for(Method::GET, "/Products(42)/Default.CalculateTax(state='sample')").as_deref(),
        Some("Products.calculate_tax")
    );
    // unquoted string literal is not a string
    assert_eq!(
        action_for(Method::GET, "/Products(42)/Default.CalculateTax(state=sample)"),
        None
    );
}

#[test]
fn test_percent_encoded_values_are_decoded() {
    assert_eq!(
        action_for(Method::GET, "/Tags('O%27%27Brien%20Jr')").as_deref(),
        Some("Tags.get")
    );
}

#[test]
fn test_enum_keys_in_both_quoting_modes() {
    assert_eq!(action_for(Method::GET, "/Paints('Red')").as_deref(), Some("Paints.get"));
    assert_eq!(
        action_for(Method::GET, "/Paints(Default.Color'Red')").as_deref(),
        Some("Paints.get")
    );
    assert_eq!(action_for(Method::GET, "/Paints('Purple')"), None);
}

#[test]
fn test_composite_key_route() {
    assert_eq!(
        action_for(Method::GET, "/OrderLines(OrderId=42,Line=42)").as_deref(),
        Some("OrderLines.get")
    );
}

fn with_literal_brace_route() -> ControllerRouter {
    let mut table = catalog_controllers();
    table.controllers.push(ControllerDef {
        name: "Raw".into(),
        actions: vec![ActionDef {
            name: "get".into(),
            verbs: vec![Method::GET],
            route: "Raw{{x}}".into(),
            parameters: Vec::new(),
            returns: None,
            response_type: None,
            documentation: None,
            attribute_routed: false,
        }],
    });
    ControllerRouter::new(&table, "").unwrap()
}

#[test]
fn test_escaped_braces_match_a_static_segment() {
    match with_literal_brace_route().route(&Method::GET, "/Raw%7Bx%7D", &catalog_model()) {
        RouteLookup::Matched(m) => {
            assert_eq!(m.binding.id(), "Raw.get");
            assert!(m.path_params.is_empty());
        }
        other => panic!("expected a match, got {other:?}"),
    }
}

#[test]
fn test_encoded_placeholder_text_does_not_bind() {
    assert!(matches!(
        router().route(&Method::GET, "/Customers(%7BId%7D)", &catalog_model()),
        RouteLookup::NotFound
    ));
}

#[test]
fn test_invalid_utf8_encoding_is_bad_request() {
    assert!(matches!(
        router().route(&Method::GET, "/Tags('%FF')", &catalog_model()),
        RouteLookup::BadRequest(_)
    ));
}

#[test]
fn test_base_path_is_honoured() {
    let router = ControllerRouter::new(&catalog_controllers(), "odata/").unwrap();
    assert_eq!(router.base_path(), "/odata");
    assert!(matches!(
        router.route(&Method::GET, "/odata/Customers", &catalog_model()),
        RouteLookup::Matched(_)
    ));
    assert!(matches!(
        router.route(&Method::GET, "/Customers", &catalog_model()),
        RouteLookup::NotFound
    ));
}
