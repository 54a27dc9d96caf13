use super::model::EdmModel;
use anyhow::Context;
use std::path::Path;

/// Document encodings accepted for model and controller documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the encoding from a file extension; anything that is not YAML is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse a document of either encoding into `T`.
pub fn parse_document<T: serde::de::DeserializeOwned>(
    content: &str,
    format: DocumentFormat,
) -> anyhow::Result<T> {
    let value = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
        DocumentFormat::Json => serde_json::from_str(content)?,
    };
    Ok(value)
}

/// Parse and validate a model document held in memory.
pub fn load_model_from_str(content: &str, format: DocumentFormat) -> anyhow::Result<EdmModel> {
    let model: EdmModel = parse_document(content, format).context("failed to parse model document")?;
    model.validate()?;
    Ok(model)
}

/// Load and validate a model document from disk.
pub fn load_model(path: impl AsRef<Path>) -> anyhow::Result<EdmModel> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read model document: {}", path.display()))?;
    let model = load_model_from_str(&content, DocumentFormat::from_path(path))
        .with_context(|| format!("invalid model document: {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        namespace = %model.namespace,
        entity_sets = model.entity_sets.len(),
        operations = model.operations.len(),
        operation_imports = model.operation_imports.len(),
        "Resource model loaded"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm::{EdmTypeRef, OperationKind, PrimitiveType};

    const MODEL: &str = r#"
namespace: Default
enum_types:
  - name: Color
    members: [Red, Green]
entity_types:
  - name: Product
    keys: [Id]
    properties:
      - { name: Id, type: Edm.Int32, nullable: false }
      - { name: Name, type: Edm.String }
      - { name: Tint, type: Default.Color }
entity_sets:
  - { name: Products, entity_type: Default.Product }
operations:
  - name: CalculateTax
    kind: function
    bound: true
    parameters:
      - { name: product, type: Default.Product }
      - { name: state, type: Edm.String }
    return_type: Edm.Double
"#;

    #[test]
    fn loads_yaml_model() {
        let model = load_model_from_str(MODEL, DocumentFormat::Yaml).unwrap();
        assert_eq!(model.namespace, "Default");
        let product = model.entity_type("Product").unwrap();
        assert_eq!(product.keys, vec!["Id".to_string()]);
        assert!(!product.property("Id").unwrap().nullable);
        assert!(product.property("Name").unwrap().nullable);
        let op = &model.operations()[0];
        assert_eq!(op.kind, OperationKind::Function);
        assert_eq!(op.return_type, Some(EdmTypeRef::primitive(PrimitiveType::Double)));
        assert_eq!(op.declared_parameters().len(), 1);
    }

    #[test]
    fn rejects_invalid_type_reference() {
        let doc = MODEL.replace("Edm.Double", "Edm.Float128");
        assert!(load_model_from_str(&doc, DocumentFormat::Yaml).is_err());
    }

    #[test]
    fn rejects_model_that_fails_validation() {
        let doc = MODEL.replace("keys: [Id]", "keys: []");
        let err = load_model_from_str(&doc, DocumentFormat::Yaml).unwrap_err();
        assert!(format!("{err:#}").contains("MissingKey"));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("m.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("m.json")), DocumentFormat::Json);
    }
}
