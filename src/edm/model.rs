use super::types::{split_qualified, EdmTypeRef};
use crate::error::{fail_if_issues, ModelError, ValidationIssue};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: EdmTypeRef,
    #[serde(default = "default_true")]
    pub nullable: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, type_ref: EdmTypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
            nullable: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationProperty {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: EdmTypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    pub name: String,
    /// Key property names in declaration order.
    pub keys: Vec<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub navigation_properties: Vec<NavigationProperty>,
}

impl EntityType {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexType {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    pub name: String,
    /// Element type, qualified (`Default.Product`) or relative to the model namespace.
    pub entity_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Function,
    Action,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: EdmTypeRef,
    #[serde(default = "default_true")]
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    /// Defaults to the model namespace.
    #[serde(default)]
    pub namespace: Option<String>,
    pub kind: OperationKind,
    #[serde(default)]
    pub bound: bool,
    /// For bound operations the first parameter is the binding parameter.
    #[serde(default)]
    pub parameters: Vec<OperationParameter>,
    #[serde(default)]
    pub return_type: Option<EdmTypeRef>,
}

impl Operation {
    /// Parameters that appear in a request, i.e. without the binding parameter.
    pub fn declared_parameters(&self) -> &[OperationParameter] {
        if self.bound {
            self.parameters.get(1..).unwrap_or(&[])
        } else {
            &self.parameters
        }
    }

    pub fn binding_parameter(&self) -> Option<&OperationParameter> {
        if self.bound {
            self.parameters.first()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationImport {
    pub name: String,
    /// The unbound operation exposed at the service root.
    pub operation: String,
}

/// Read-only snapshot of a resource model for one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdmModel {
    pub namespace: String,
    pub enum_types: Vec<EnumType>,
    pub complex_types: Vec<ComplexType>,
    pub entity_types: Vec<EntityType>,
    pub entity_sets: Vec<EntitySet>,
    pub operations: Vec<Operation>,
    pub operation_imports: Vec<OperationImport>,
}

impl EdmModel {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    /// Qualify a name relative to the model namespace.
    pub fn qualify(&self, name: &str) -> String {
        if name.contains('.') || self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.namespace, name)
        }
    }

    fn matches_local(&self, qualified_or_bare: &str, local: &str) -> bool {
        self.qualify(qualified_or_bare) == self.qualify(local)
    }

    pub fn entity_sets(&self) -> &[EntitySet] {
        &self.entity_sets
    }

    pub fn entity_set(&self, name: &str) -> Option<&EntitySet> {
        self.entity_sets.iter().find(|s| s.name == name)
    }

    pub fn entity_type(&self, name: &str) -> Option<&EntityType> {
        self.entity_types
            .iter()
            .find(|t| self.matches_local(name, &t.name))
    }

    pub fn entity_type_of(&self, set: &EntitySet) -> Option<&EntityType> {
        self.entity_type(&set.entity_type)
    }

    pub fn enum_type(&self, name: &str) -> Option<&EnumType> {
        self.enum_types
            .iter()
            .find(|t| self.matches_local(name, &t.name))
    }

    pub fn complex_type(&self, name: &str) -> Option<&ComplexType> {
        self.complex_types
            .iter()
            .find(|t| self.matches_local(name, &t.name))
    }

    /// Enum type behind a type reference, if it names one.
    pub fn enum_of(&self, type_ref: &EdmTypeRef) -> Option<&EnumType> {
        type_ref.as_named().and_then(|n| self.enum_type(n))
    }

    /// Key properties of an entity type, always in key declaration order.
    pub fn key_properties<'a>(&self, entity: &'a EntityType) -> Vec<&'a Property> {
        entity
            .keys
            .iter()
            .filter_map(|k| entity.property(k))
            .collect()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn operation_imports(&self) -> &[OperationImport] {
        &self.operation_imports
    }

    pub fn operation_namespace<'a>(&'a self, op: &'a Operation) -> &'a str {
        op.namespace.as_deref().unwrap_or(&self.namespace)
    }

    /// Namespace-qualified operation name used in bound-operation segments.
    pub fn qualified_operation_name(&self, op: &Operation) -> String {
        let ns = self.operation_namespace(op);
        if ns.is_empty() {
            op.name.clone()
        } else {
            format!("{ns}.{}", op.name)
        }
    }

    pub fn operation(&self, name: &str) -> Option<&Operation> {
        let (ns, local) = split_qualified(name);
        self.operations.iter().find(|op| {
            op.name == local && (ns.is_empty() || self.operation_namespace(op) == ns)
        })
    }

    /// The operation exposed by an import, if it exists and is unbound.
    pub fn import_target(&self, import: &OperationImport) -> Option<&Operation> {
        self.operation(&import.operation).filter(|op| !op.bound)
    }

    /// Entity sets a bound operation applies to.
    ///
    /// Returns each matching set with `true` when the binding is to the
    /// collection rather than a single entity. A binding type that matches no
    /// set yields an empty list.
    pub fn binding_targets(&self, op: &Operation) -> Vec<(&EntitySet, bool)> {
        let Some(binding) = op.binding_parameter() else {
            return Vec::new();
        };
        let to_collection = binding.type_ref.is_collection();
        let Some(element) = binding.type_ref.element().as_named() else {
            return Vec::new();
        };
        let element = self.qualify(element);
        self.entity_sets
            .iter()
            .filter(|set| self.qualify(&set.entity_type) == element)
            .map(|set| (set, to_collection))
            .collect()
    }

    /// Check the structural invariants the template generator relies on.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut issues = Vec::new();

        for entity in &self.entity_types {
            let location = format!("EntityType {}", entity.name);
            if entity.keys.is_empty() {
                issues.push(ValidationIssue::new(
                    &location,
                    "MissingKey",
                    "entity type declares no key properties",
                ));
            }
            for key in &entity.keys {
                if entity.property(key).is_none() {
                    issues.push(ValidationIssue::new(
                        &location,
                        "UnknownKeyProperty",
                        format!("key '{key}' is not a declared property"),
                    ));
                }
            }
        }

        let mut seen = HashSet::new();
        for set in &self.entity_sets {
            let location = format!("EntitySet {}", set.name);
            if !seen.insert(set.name.as_str()) {
                issues.push(ValidationIssue::new(
                    &location,
                    "DuplicateEntitySet",
                    "entity set name declared more than once",
                ));
            }
            if self.entity_type_of(set).is_none() {
                issues.push(ValidationIssue::new(
                    &location,
                    "UnknownType",
                    format!("entity type '{}' not found", set.entity_type),
                ));
            }
        }

        for op in &self.operations {
            if op.bound && op.parameters.is_empty() {
                issues.push(ValidationIssue::new(
                    format!("Operation {}", op.name),
                    "MissingBindingParameter",
                    "bound operation declares no binding parameter",
                ));
            }
        }

        for import in &self.operation_imports {
            let location = format!("OperationImport {}", import.name);
            match self.operation(&import.operation) {
                None => issues.push(ValidationIssue::new(
                    &location,
                    "UnknownOperation",
                    format!("operation '{}' not found", import.operation),
                )),
                Some(op) if op.bound => issues.push(ValidationIssue::new(
                    &location,
                    "BoundImport",
                    format!("operation '{}' is bound and cannot be imported", import.operation),
                )),
                Some(_) => {}
            }
        }

        fail_if_issues(issues)
    }
}
