//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::edm::{load_model_from_str, DocumentFormat, EdmModel};
use crate::router::{load_controller_table_from_str, ControllerTable};
use std::sync::Arc;

pub const CATALOG_MODEL: &str = r#"
namespace: Default
enum_types:
  - name: Color
    members: [Red, Green, Blue]
entity_types:
  - name: Customer
    keys: [Id]
    properties:
      - { name: Id, type: Edm.Int32, nullable: false }
      - { name: Name, type: Edm.String }
    navigation_properties:
      - { name: Orders, type: Collection(Default.Order) }
  - name: Order
    keys: [Id]
    properties:
      - { name: Id, type: Edm.Int32, nullable: false }
      - { name: Total, type: Edm.Decimal }
  - name: Product
    keys: [Id]
    properties:
      - { name: Id, type: Edm.Int32, nullable: false }
      - { name: Name, type: Edm.String }
      - { name: Price, type: Edm.Double }
  - name: OrderLine
    keys: [OrderId, Line]
    properties:
      - { name: Line, type: Edm.Int32, nullable: false }
      - { name: OrderId, type: Edm.Int32, nullable: false }
  - name: Paint
    keys: [Tint]
    properties:
      - { name: Tint, type: Default.Color, nullable: false }
  - name: Tag
    keys: [Name]
    properties:
      - { name: Name, type: Edm.String, nullable: false }
entity_sets:
  - { name: Customers, entity_type: Default.Customer }
  - { name: Orders, entity_type: Default.Order }
  - { name: Products, entity_type: Default.Product }
  - { name: Discontinued, entity_type: Default.Product }
  - { name: OrderLines, entity_type: Default.OrderLine }
  - { name: Paints, entity_type: Default.Paint }
  - { name: Tags, entity_type: Default.Tag }
operations:
  - name: CalculateTax
    kind: function
    bound: true
    parameters:
      - { name: product, type: Default.Product, nullable: false }
      - { name: state, type: Edm.String }
    return_type: Edm.Double
  - name: Rate
    kind: action
    bound: true
    parameters:
      - { name: product, type: Default.Product, nullable: false }
      - { name: rating, type: Edm.Int32, nullable: false }
      - { name: comment, type: Edm.String }
      - { name: reviewer, type: Edm.String }
  - name: MostExpensive
    kind: function
    bound: true
    parameters:
      - { name: products, type: Collection(Default.Product), nullable: false }
    return_type: Default.Product
  - name: Ship
    kind: action
    bound: true
    parameters:
      - { name: shipment, type: Default.Shipment, nullable: false }
  - name: GetTopProducts
    kind: function
    parameters:
      - { name: count, type: Edm.Int32, nullable: false }
    return_type: Collection(Default.Product)
  - name: ResetData
    kind: action
operation_imports:
  - { name: GetTopProducts, operation: GetTopProducts }
  - { name: ResetData, operation: ResetData }
"#;

pub const CATALOG_CONTROLLERS: &str = r#"
types:
  Customer: Default.Customer
  Order: Default.Order
  Product: Default.Product
  OrderLine: Default.OrderLine
  Paint: Default.Paint
  Tag: Default.Tag
  Color: Default.Color
controllers:
  - name: Customers
    actions:
      - name: list
        verbs: [GET]
        route: Customers
        parameters:
          - { name: options, type: QueryOptions }
        returns: Vec<Customer>
      - name: create
        verbs: [POST]
        route: Customers
        parameters:
          - { name: customer, type: Customer, source: body }
        returns: Customer
      - name: get
        verbs: [GET]
        route: Customers({key})
        parameters:
          - { name: key, type: i32, source: uri }
          - { name: options, type: QueryOptions }
        returns: Customer
        documentation: Fetch one customer
      - name: update
        verbs: [PATCH, PUT]
        route: Customers({key})
        parameters:
          - { name: key, type: i32, source: uri }
          - { name: delta, type: Delta<Customer>, source: body }
        returns: HttpResponse
      - name: delete
        verbs: [DELETE]
        route: Customers({key})
        parameters:
          - { name: key, type: i32, source: uri }
        returns: HttpResponse
  - name: Products
    actions:
      - name: list
        verbs: [GET]
        route: Products
        parameters:
          - { name: options, type: QueryOptions }
        returns: Vec<Product>
      - name: get
        verbs: [GET]
        route: Products({key})
        parameters:
          - { name: key, type: i32, source: uri }
        returns: HttpResponse
        response_type: Product
      - name: calculate_tax
        verbs: [GET]
        route: Products({key})/Default.CalculateTax(state={state})
        parameters:
          - { name: key, type: i32, source: uri }
          - { name: state, type: String, source: uri }
        returns: f64
      - name: rate
        verbs: [POST]
        route: Products({key})/Default.Rate
        parameters:
          - { name: key, type: i32, source: uri }
          - { name: parameters, type: ActionParameters, source: bag }
      - name: most_expensive
        verbs: [GET]
        route: Products/Default.MostExpensive()
        returns: Product
  - name: OrderLines
    actions:
      - name: get
        verbs: [GET]
        route: OrderLines(OrderId={keyOrderId},Line={keyLine})
        parameters:
          - { name: keyOrderId, type: i32, source: uri }
          - { name: keyLine, type: i32, source: uri }
        returns: OrderLine
  - name: Paints
    actions:
      - name: get
        verbs: [GET]
        route: Paints({key})
        parameters:
          - { name: key, type: Color, source: uri }
        returns: Paint
  - name: Tags
    actions:
      - name: get
        verbs: [GET]
        route: Tags({key})
        parameters:
          - { name: key, type: String, source: uri }
        returns: Tag
  - name: Service
    actions:
      - name: top_products
        verbs: [GET]
        route: GetTopProducts(count={count})
        parameters:
          - { name: count, type: i32, source: uri }
        returns: Vec<Product>
      - name: reset
        verbs: [POST]
        route: ResetData
  - name: Reports
    actions:
      - name: summary
        verbs: [GET]
        route: Reports/Summary({year})
        parameters:
          - { name: year, type: i32, source: uri }
        returns: String
        documentation: Yearly summary
        attribute_routed: true
"#;

pub fn catalog_model() -> Arc<EdmModel> {
    Arc::new(load_model_from_str(CATALOG_MODEL, DocumentFormat::Yaml).unwrap())
}

pub fn catalog_controllers() -> ControllerTable {
    load_controller_table_from_str(CATALOG_CONTROLLERS, DocumentFormat::Yaml).unwrap()
}
