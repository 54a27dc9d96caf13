//! Controller action tables.
//!
//! The table is the routing layer's view of the service: controllers, the
//! actions they own, the route template each action answers on, and the
//! implementation types that stand for model types.
//!
//! ```yaml
//! types:
//!   Product: Default.Product
//!   Color: Default.Color
//! controllers:
//!   - name: Products
//!     actions:
//!       - name: get_by_key
//!         verbs: [GET]
//!         route: Products({key})
//!         parameters:
//!           - { name: key, type: i32, source: uri }
//!           - { name: options, type: QueryOptions }
//!         returns: Product
//! ```

use crate::binding::{serde_methods, ActionBinding, ActionParameter, ParameterSource};
use crate::candidate::placeholders;
use crate::edm::{DocumentFormat, EdmTypeRef};
use crate::error::{fail_if_issues, ModelError, ValidationIssue};
use crate::type_resolver::TypeMap;
use anyhow::Context;
use http::Method;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerTable {
    /// Implementation type → model type.
    #[serde(default)]
    pub types: BTreeMap<String, EdmTypeRef>,
    #[serde(default)]
    pub controllers: Vec<ControllerDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerDef {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDef {
    pub name: String,
    #[serde(with = "serde_methods")]
    pub verbs: Vec<Method>,
    /// Route template relative to the route prefix.
    pub route: String,
    #[serde(default)]
    pub parameters: Vec<ActionParameter>,
    #[serde(default)]
    pub returns: Option<String>,
    #[serde(default)]
    pub response_type: Option<String>,
    #[serde(default)]
    pub documentation: Option<String>,
    /// The action declares its own route and should be documented from it.
    #[serde(default)]
    pub attribute_routed: bool,
}

/// An action together with the route it answers on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedAction {
    pub binding: ActionBinding,
    pub route: String,
    pub attribute_routed: bool,
}

impl ControllerTable {
    pub fn type_map(&self) -> TypeMap {
        self.types
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Flatten controllers into routed actions, in declaration order.
    pub fn routed_actions(&self) -> Vec<RoutedAction> {
        self.controllers
            .iter()
            .flat_map(|controller| {
                controller.actions.iter().map(move |action| RoutedAction {
                    binding: ActionBinding {
                        controller: controller.name.clone(),
                        action: action.name.clone(),
                        verbs: action.verbs.clone(),
                        parameters: action.parameters.clone(),
                        return_type: action.returns.clone(),
                        response_type: action.response_type.clone(),
                        documentation: action.documentation.clone(),
                    },
                    route: action.route.clone(),
                    attribute_routed: action.attribute_routed,
                })
            })
            .collect()
    }

    pub fn action_count(&self) -> usize {
        self.controllers.iter().map(|c| c.actions.len()).sum()
    }

    /// Check every route parses and every placeholder names a `uri` parameter.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();
        for controller in &self.controllers {
            for action in &controller.actions {
                let location = format!("Action {}.{}", controller.name, action.name);
                if !seen.insert((controller.name.as_str(), action.name.as_str())) {
                    issues.push(ValidationIssue::new(
                        &location,
                        "DuplicateAction",
                        "action declared more than once",
                    ));
                }
                if action.verbs.is_empty() {
                    issues.push(ValidationIssue::new(&location, "NoVerbs", "action declares no HTTP verbs"));
                }
                match placeholders(&action.route) {
                    Err(e) => issues.push(ValidationIssue::new(&location, "MalformedRoute", e.to_string())),
                    Ok(names) => {
                        for name in names {
                            let bound = action
                                .parameters
                                .iter()
                                .any(|p| p.name == name && p.source == ParameterSource::Uri);
                            if !bound {
                                issues.push(ValidationIssue::new(
                                    &location,
                                    "UnboundPlaceholder",
                                    format!("placeholder '{{{name}}}' has no uri parameter"),
                                ));
                            }
                        }
                    }
                }
            }
        }
        fail_if_issues(issues)
    }
}

/// Parse and validate a controller table held in memory.
pub fn load_controller_table_from_str(
    content: &str,
    format: DocumentFormat,
) -> anyhow::Result<ControllerTable> {
    let table: ControllerTable = crate::edm::parse_document(content, format)
        .context("failed to parse controller table")?;
    table.validate()?;
    Ok(table)
}

/// Load and validate a controller table from disk.
pub fn load_controller_table(path: impl AsRef<Path>) -> anyhow::Result<ControllerTable> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read controller table: {}", path.display()))?;
    let table = load_controller_table_from_str(&content, DocumentFormat::from_path(path))
        .with_context(|| format!("invalid controller table: {}", path.display()))?;
    info!(
        path = %path.display(),
        controllers = table.controllers.len(),
        actions = table.action_count(),
        types = table.types.len(),
        "Controller table loaded"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
types:
  Product: Default.Product
controllers:
  - name: Products
    actions:
      - name: list
        verbs: [GET]
        route: Products
        parameters:
          - { name: options, type: QueryOptions }
        returns: Vec<Product>
      - name: get_by_key
        verbs: [get]
        route: Products({key})
        parameters:
          - { name: key, type: i32, source: uri }
        returns: Product
        documentation: Fetch one product
"#;

    #[test]
    fn loads_and_flattens() {
        let table = load_controller_table_from_str(TABLE, DocumentFormat::Yaml).unwrap();
        let actions = table.routed_actions();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1].binding.id(), "Products.get_by_key");
        assert_eq!(actions[1].binding.verbs, vec![Method::GET]);
        assert_eq!(actions[1].binding.documentation.as_deref(), Some("Fetch one product"));
        assert_eq!(
            table.type_map().model_type_of("Product"),
            Some(EdmTypeRef::named("Default.Product"))
        );
    }

    #[test]
    fn placeholder_without_uri_parameter_is_rejected() {
        let doc = TABLE.replace("source: uri", "source: body");
        let err = load_controller_table_from_str(&doc, DocumentFormat::Yaml).unwrap_err();
        assert!(format!("{err:#}").contains("UnboundPlaceholder"));
    }

    #[test]
    fn malformed_route_is_rejected() {
        let doc = TABLE.replace("Products({key})", "Products({key)");
        let err = load_controller_table_from_str(&doc, DocumentFormat::Yaml).unwrap_err();
        assert!(format!("{err:#}").contains("MalformedRoute"));
    }
}
