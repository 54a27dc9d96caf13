//! Model type ↔ implementation type mapping.
//!
//! A controller table declares which implementation types stand for which
//! model types (`Product: Default.Product`). [`TypeResolver`] answers the
//! reverse question, "which implementation type documents this model type",
//! and memoizes the answer per model type. Each key is computed at most once
//! even when several verification workers ask for it at the same time.

use crate::edm::{EdmModel, EdmTypeRef, PrimitiveType};
use crate::error::{ExplorerError, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Implementation type name → model type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMap {
    entries: BTreeMap<String, EdmTypeRef>,
}

impl TypeMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, impl_type: impl Into<String>, model_type: EdmTypeRef) {
        self.entries.insert(impl_type.into(), model_type);
    }

    pub fn with(mut self, impl_type: impl Into<String>, model_type: EdmTypeRef) -> Self {
        self.insert(impl_type, model_type);
        self
    }

    /// Model type an implementation type stands for.
    ///
    /// Declared entries win; otherwise scalar names map onto primitives and
    /// `Vec<T>` onto collections.
    pub fn model_type_of(&self, impl_type: &str) -> Option<EdmTypeRef> {
        let impl_type = strip_option(impl_type.trim());
        if let Some(t) = self.entries.get(impl_type) {
            return Some(t.clone());
        }
        if let Some(p) = PrimitiveType::from_impl_name(impl_type) {
            return Some(EdmTypeRef::Primitive(p));
        }
        let inner = impl_type.strip_prefix("Vec<")?.strip_suffix('>')?;
        self.model_type_of(inner).map(EdmTypeRef::collection)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &EdmTypeRef)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, EdmTypeRef)> for TypeMap {
    fn from_iter<I: IntoIterator<Item = (String, EdmTypeRef)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Strip one `Option<...>` wrapper.
pub(crate) fn strip_option(type_name: &str) -> &str {
    type_name
        .strip_prefix("Option<")
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(type_name)
}

/// Cached outcome: the chosen implementation type, or every candidate when ambiguous.
type Resolution = std::result::Result<Option<String>, Vec<String>>;

/// Memoizing model type → implementation type resolver.
pub struct TypeResolver {
    model: Arc<EdmModel>,
    map: TypeMap,
    cache: DashMap<EdmTypeRef, Resolution>,
    computed: AtomicUsize,
}

impl TypeResolver {
    pub fn new(model: Arc<EdmModel>, map: TypeMap) -> Self {
        Self {
            model,
            map,
            cache: DashMap::new(),
            computed: AtomicUsize::new(0),
        }
    }

    pub fn type_map(&self) -> &TypeMap {
        &self.map
    }

    /// Implementation type documenting `model_type`.
    ///
    /// `Ok(None)` when nothing maps to it; [`ExplorerError::AmbiguousTypeMapping`]
    /// when more than one implementation type does.
    pub fn resolve(&self, model_type: &EdmTypeRef) -> Result<Option<String>> {
        let resolution = match self.cache.entry(model_type.clone()) {
            Entry::Occupied(e) => e.get().clone(),
            Entry::Vacant(e) => {
                let computed = self.compute(model_type);
                self.computed.fetch_add(1, Ordering::Relaxed);
                e.insert(computed.clone());
                computed
            }
        };
        resolution.map_err(|candidates| ExplorerError::AmbiguousTypeMapping {
            model_type: model_type.to_string(),
            candidates,
        })
    }

    /// Implementation type name for display: the mapped type, or the model type itself.
    pub fn display_name(&self, model_type: &EdmTypeRef) -> Result<String> {
        Ok(self
            .resolve(model_type)?
            .unwrap_or_else(|| model_type.to_string()))
    }

    /// Number of distinct model types resolved so far.
    pub fn computed(&self) -> usize {
        self.computed.load(Ordering::Relaxed)
    }

    fn compute(&self, model_type: &EdmTypeRef) -> Resolution {
        if let EdmTypeRef::Collection(inner) = model_type {
            return self
                .compute(inner)
                .map(|found| found.map(|t| format!("Vec<{t}>")));
        }
        let target = self.qualified(model_type);
        let mut candidates: Vec<String> = self
            .map
            .iter()
            .filter(|(_, t)| self.qualified(t) == target)
            .map(|(name, _)| name.clone())
            .collect();
        let found = match candidates.len() {
            0 => model_type.as_primitive().map(|p| p.impl_name().to_string()),
            1 => candidates.pop(),
            _ => return Err(candidates),
        };
        debug!(model_type = %model_type, impl_type = ?found, "Resolved implementation type");
        Ok(found)
    }

    fn qualified(&self, t: &EdmTypeRef) -> EdmTypeRef {
        match t {
            EdmTypeRef::Named(n) => EdmTypeRef::Named(self.model.qualify(n)),
            EdmTypeRef::Collection(inner) => EdmTypeRef::collection(self.qualified(inner)),
            other => other.clone(),
        }
    }
}
