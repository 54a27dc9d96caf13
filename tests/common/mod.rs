#![allow(dead_code)]

pub mod documents {
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    pub const SHOP_MODEL: &str = r#"
namespace: Shop
enum_types:
  - name: Size
    members: [Small, Large]
entity_types:
  - name: Customer
    keys: [Id]
    properties:
      - { name: Id, type: Edm.Int64, nullable: false }
      - { name: Name, type: Edm.String }
  - name: Order
    keys: [Id]
    properties:
      - { name: Id, type: Edm.Guid, nullable: false }
      - { name: Total, type: Edm.Decimal }
    navigation_properties:
      - { name: Lines, type: Collection(Shop.Line) }
      - { name: Buyer, type: Shop.Customer }
  - name: Line
    keys: [OrderId, Number]
    properties:
      - { name: Number, type: Edm.Int32, nullable: false }
      - { name: OrderId, type: Edm.Guid, nullable: false }
  - name: Shirt
    keys: [Size]
    properties:
      - { name: Size, type: Shop.Size, nullable: false }
entity_sets:
  - { name: Customers, entity_type: Shop.Customer }
  - { name: VipCustomers, entity_type: Shop.Customer }
  - { name: Orders, entity_type: Shop.Order }
  - { name: Lines, entity_type: Shop.Line }
  - { name: Shirts, entity_type: Shop.Shirt }
operations:
  - name: Discount
    kind: function
    bound: true
    parameters:
      - { name: customer, type: Shop.Customer, nullable: false }
      - { name: code, type: Edm.String }
    return_type: Edm.Decimal
  - name: Review
    kind: action
    bound: true
    parameters:
      - { name: customer, type: Shop.Customer, nullable: false }
      - { name: stars, type: Edm.Int32, nullable: false }
      - { name: text, type: Edm.String }
      - { name: author, type: Edm.String }
  - name: Audit
    kind: action
    bound: true
    parameters:
      - { name: warehouse, type: Shop.Warehouse, nullable: false }
  - name: Search
    kind: function
    parameters:
      - { name: term, type: Edm.String, nullable: false }
    return_type: Collection(Shop.Customer)
  - name: Recalculate
    kind: action
operation_imports:
  - { name: Search, operation: Search }
  - { name: Recalculate, operation: Recalculate }
"#;

    pub const SHOP_CONTROLLERS: &str = r#"{
  "types": {
    "Customer": "Shop.Customer",
    "Order": "Shop.Order",
    "Line": "Shop.Line",
    "Shirt": "Shop.Shirt",
    "Size": "Shop.Size"
  },
  "controllers": [
    {
      "name": "Customers",
      "actions": [
        { "name": "list", "verbs": ["GET"], "route": "Customers",
          "parameters": [{ "name": "options", "type": "QueryOptions" }],
          "returns": "Vec<Customer>" },
        { "name": "get", "verbs": ["GET"], "route": "Customers({key})",
          "parameters": [{ "name": "key", "type": "i64", "source": "uri" }],
          "returns": "Customer" },
        { "name": "discount", "verbs": ["GET"], "route": "Customers({key})/Shop.Discount(code={code})",
          "parameters": [
            { "name": "key", "type": "i64", "source": "uri" },
            { "name": "code", "type": "String", "source": "uri" }
          ],
          "returns": "Decimal" },
        { "name": "review", "verbs": ["POST"], "route": "Customers({key})/Shop.Review",
          "parameters": [
            { "name": "key", "type": "i64", "source": "uri" },
            { "name": "parameters", "type": "ActionParameters", "source": "bag" }
          ] }
      ]
    },
    {
      "name": "Orders",
      "actions": [
        { "name": "get", "verbs": ["GET"], "route": "Orders({key})",
          "parameters": [{ "name": "key", "type": "Uuid", "source": "uri" }],
          "returns": "Order" },
        { "name": "lines", "verbs": ["GET"], "route": "Orders({key})/Lines",
          "parameters": [{ "name": "key", "type": "Uuid", "source": "uri" }],
          "returns": "Vec<Line>" }
      ]
    },
    {
      "name": "Lines",
      "actions": [
        { "name": "get", "verbs": ["GET"], "route": "Lines(OrderId={keyOrderId},Number={keyNumber})",
          "parameters": [
            { "name": "keyOrderId", "type": "Uuid", "source": "uri" },
            { "name": "keyNumber", "type": "i32", "source": "uri" }
          ],
          "returns": "Line" }
      ]
    },
    {
      "name": "Shirts",
      "actions": [
        { "name": "get", "verbs": ["GET"], "route": "Shirts({key})",
          "parameters": [{ "name": "key", "type": "Size", "source": "uri" }],
          "returns": "Shirt" }
      ]
    },
    {
      "name": "Search",
      "actions": [
        { "name": "run", "verbs": ["GET"], "route": "Search(term={term})",
          "parameters": [{ "name": "term", "type": "String", "source": "uri" }],
          "returns": "Vec<Customer>" }
      ]
    },
    {
      "name": "Health",
      "actions": [
        { "name": "ping", "verbs": ["GET"], "route": "health/{probe}",
          "parameters": [{ "name": "probe", "type": "String", "source": "uri" }],
          "returns": "String", "attribute_routed": true }
      ]
    }
  ]
}"#;

    /// Model, controller table and (optionally) an explorer config in one temp dir.
    pub struct ShopDocuments {
        pub dir: TempDir,
        pub model: PathBuf,
        pub controllers: PathBuf,
    }

    impl ShopDocuments {
        pub fn write() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let model = dir.path().join("shop.yaml");
            let controllers = dir.path().join("controllers.json");
            std::fs::write(&model, SHOP_MODEL).unwrap();
            std::fs::write(&controllers, SHOP_CONTROLLERS).unwrap();
            Self {
                dir,
                model,
                controllers,
            }
        }

        /// Drop an `edm-explorer.<ext>` file next to the model.
        pub fn with_config(self, ext: &str, content: &str) -> Self {
            std::fs::write(self.config_path(ext), content).unwrap();
            self
        }

        pub fn config_path(&self, ext: &str) -> PathBuf {
            self.dir.path().join(format!("edm-explorer.{ext}"))
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }
    }
}

pub mod explorer {
    use edm_explorer::config::{resolve_config, ExplorerConfig};
    use edm_explorer::{load_controller_table, load_model, ApiDescription, ApiExplorer};
    use std::sync::Arc;

    use super::documents::ShopDocuments;

    pub fn shop_explorer(docs: &ShopDocuments, config: ExplorerConfig) -> ApiExplorer {
        let model = Arc::new(load_model(&docs.model).unwrap());
        let table = load_controller_table(&docs.controllers).unwrap();
        ApiExplorer::from_documents(model, &table, config).unwrap()
    }

    /// Explorer configured the way the CLI would: config file, then environment.
    pub fn shop_explorer_from_disk(docs: &ShopDocuments) -> ApiExplorer {
        let config = resolve_config(None, &docs.model).unwrap();
        shop_explorer(docs, config)
    }

    pub fn find<'a>(descriptions: &'a [ApiDescription], id: &str) -> Option<&'a ApiDescription> {
        descriptions.iter().find(|d| d.id() == id)
    }
}
