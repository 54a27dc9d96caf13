use super::*;
use crate::candidate::{ParameterLocation, TemplateKind};
use crate::edm::{EdmTypeRef, PrimitiveType, SchemaKind};
use crate::error::ExplorerError;
use crate::testing::{catalog_controllers, catalog_model};
use http::Method;

fn generate(options: TemplateOptions) -> Vec<PathTemplate> {
    EdmTemplateGenerator::new(catalog_model(), options)
        .candidates()
        .unwrap()
}

fn templates(candidates: &[PathTemplate]) -> Vec<&str> {
    candidates.iter().map(|c| c.template.as_str()).collect()
}

fn find<'a>(candidates: &'a [PathTemplate], template: &str) -> &'a PathTemplate {
    candidates
        .iter()
        .find(|c| c.template == template)
        .unwrap_or_else(|| panic!("no candidate {template} in {:?}", templates(candidates)))
}

#[test]
fn test_entity_set_routes() {
    let out = generate(TemplateOptions::default());
    let list = find(&out, "/Customers");
    assert_eq!(list.kind, TemplateKind::EntitySet);
    assert_eq!(list.group, "Customers");
    assert_eq!(list.route_name, "odata");
    assert_eq!(list.methods().cloned().collect::<Vec<_>>(), vec![Method::GET, Method::POST]);

    let get = list.operation(&Method::GET).unwrap();
    let names: Vec<&str> = get.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["$expand", "$select", "$filter", "$orderby", "$top", "$skip", "$count"]
    );
    assert_eq!(
        get.success_response().unwrap().type_ref,
        Some(EdmTypeRef::collection(EdmTypeRef::named("Default.Customer")))
    );

    let create = list.operation(&Method::POST).unwrap();
    assert_eq!(create.success_response().unwrap().status, Some(201));
    assert_eq!(create.body_parameter().unwrap().name, "Customer");
}

#[test]
fn test_single_entity_routes() {
    let out = generate(TemplateOptions::default());
    let single = find(&out, "/Customers({Id})");
    assert_eq!(
        single.methods().cloned().collect::<Vec<_>>(),
        vec![Method::GET, Method::PATCH, Method::PUT, Method::DELETE]
    );
    let key = single.operation(&Method::GET).unwrap().parameters[0].clone();
    assert!(key.is_key_lookup());
    assert_eq!(key.schema.kind, SchemaKind::Integer);

    let delete = single.operation(&Method::DELETE).unwrap();
    assert!(delete
        .parameters
        .iter()
        .any(|p| p.name == "If-Match" && p.location == ParameterLocation::Header && !p.required));
    assert_eq!(delete.success_response().unwrap().status, Some(204));
}

#[test]
fn test_string_and_enum_keys_are_quoted() {
    let out = generate(TemplateOptions::default());
    find(&out, "/Tags('{Name}')");
    find(&out, "/Paints(Default.Color'{Tint}')");

    let prefix_free = generate(TemplateOptions {
        enum_prefix_free: true,
        ..TemplateOptions::default()
    });
    let paints = find(&prefix_free, "/Paints('{Tint}')");
    let key = &paints.operation(&Method::GET).unwrap().parameters[0];
    assert_eq!(key.schema.enum_members, vec!["Red", "Green", "Blue"]);
}

#[test]
fn test_composite_key_follows_key_declaration_order() {
    let out = generate(TemplateOptions::default());
    let lines = find(&out, "/OrderLines(OrderId={OrderId},Line={Line})");
    let keys: Vec<&str> = lines
        .operation(&Method::GET)
        .unwrap()
        .path_parameters()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(keys, vec!["OrderId", "Line"]);
}

#[test]
fn test_bound_function_fans_out_per_entity_set() {
    let out = generate(TemplateOptions::default());
    for set in ["Products", "Discontinued"] {
        let t = find(&out, &format!("/{set}({{Id}})/Default.CalculateTax(state='{{state}}')"));
        assert_eq!(t.kind, TemplateKind::BoundOperation);
        assert_eq!(t.group, set);
        let op = t.operation(&Method::GET).unwrap();
        let params: Vec<&str> = op.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(params, vec!["Id", "state"]);
        assert_eq!(
            op.success_response().unwrap().type_ref,
            Some(EdmTypeRef::primitive(PrimitiveType::Double))
        );
    }
    find(&out, "/Products/Default.MostExpensive()");
    find(&out, "/Discontinued/Default.MostExpensive()");
}

#[test]
fn test_bound_action_takes_a_body_object() {
    let out = generate(TemplateOptions::default());
    let rate = find(&out, "/Products({Id})/Default.Rate");
    let op = rate.operation(&Method::POST).unwrap();
    let body = op.body_parameter().unwrap();
    assert!(body.required);
    let members: Vec<(&str, bool)> = body
        .schema
        .properties
        .iter()
        .map(|p| (p.name.as_str(), p.required))
        .collect();
    assert_eq!(members, vec![("rating", true), ("comment", false), ("reviewer", false)]);
    assert_eq!(op.success_response().unwrap().status, Some(204));
}

#[test]
fn test_operation_without_targets_yields_nothing() {
    let out = generate(TemplateOptions::default());
    assert!(!out.iter().any(|c| c.template.contains("Ship")));
}

#[test]
fn test_operation_imports() {
    let out = generate(TemplateOptions::default());
    let top = find(&out, "/GetTopProducts(count={count})");
    assert_eq!(top.kind, TemplateKind::OperationImport);
    let op = top.operation(&Method::GET).unwrap();
    assert!(op.parameters.iter().any(|p| p.name == "$top"));

    let reset = find(&out, "/ResetData");
    let op = reset.operation(&Method::POST).unwrap();
    assert!(op.parameters.is_empty());
    assert_eq!(op.success_response().unwrap().status, Some(204));
}

#[test]
fn test_navigation_routes_are_opt_in() {
    let out = generate(TemplateOptions::default());
    assert!(!templates(&out).contains(&"/Customers({Id})/Orders"));

    let out = generate(TemplateOptions {
        include_navigation_properties: true,
        ..TemplateOptions::default()
    });
    let nav = find(&out, "/Customers({Id})/Orders");
    assert_eq!(nav.kind, TemplateKind::Navigation);
}

#[test]
fn test_route_prefix_applies_to_every_template() {
    let out = generate(TemplateOptions {
        route_prefix: "/odata".into(),
        ..TemplateOptions::default()
    });
    assert!(out.iter().all(|c| c.template.starts_with("/odata/")));
}

#[test]
fn test_attribute_routes_come_from_the_controller_table() {
    let registry =
        AttributeRouteRegistry::from_table(catalog_model(), &catalog_controllers(), "", "odata");
    assert_eq!(registry.len(), 1);
    let out = registry.candidates().unwrap();
    let summary = find(&out, "/Reports/Summary({year})");
    assert_eq!(summary.kind, TemplateKind::Attribute);
    assert_eq!(summary.group, "Reports");
    let op = summary.operation(&Method::GET).unwrap();
    assert_eq!(op.parameters[0].location, ParameterLocation::Path);
    assert_eq!(op.parameters[0].schema.kind, SchemaKind::Integer);
    assert_eq!(
        op.success_response().unwrap().type_ref,
        Some(EdmTypeRef::primitive(PrimitiveType::String))
    );
}

#[test]
fn test_custom_routes() {
    let route = CustomRoute::new("Reports({year})/Top")
        .operation(Method::GET)
        .path_parameter("year", EdmTypeRef::primitive(PrimitiveType::Int32))
        .query_parameter("limit", EdmTypeRef::primitive(PrimitiveType::Int32));
    let registry = CustomRouteRegistry::new(catalog_model(), vec![route], "api", "odata");
    let out = registry.candidates().unwrap();
    let t = find(&out, "/api/Reports({year})/Top");
    assert_eq!(t.group, "Reports");
    let op = t.operation(&Method::GET).unwrap();
    assert!(op.parameters[0].required);
    assert!(!op.parameters[1].required);
    assert_eq!(op.success_response().unwrap().status, Some(204));
}

#[test]
fn test_custom_route_needs_a_parameter_per_placeholder() {
    let route = CustomRoute::new("/Reports({year})").operation(Method::GET);
    let registry = CustomRouteRegistry::new(catalog_model(), vec![route], "", "odata");
    assert!(matches!(
        registry.candidates(),
        Err(ExplorerError::MalformedTemplate { .. })
    ));
}

#[test]
fn test_custom_routes_deserialize_from_config() {
    let yaml = r#"
template: /Health
group: Diagnostics
operations:
  - method: get
    returns: Edm.String
"#;
    let route: CustomRoute = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(route.group.as_deref(), Some("Diagnostics"));
    assert_eq!(route.operations[0].method, Method::GET);
}
