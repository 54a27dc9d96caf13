//! # Resource Model
//!
//! A read-only snapshot of the entity data model an API is built on: entity
//! types with ordered keys, entity sets, enum and complex types, bound and
//! unbound operations, and operation imports.
//!
//! The snapshot is loaded from a YAML or JSON document and validated once;
//! every later stage of a generation run only queries it.
//!
//! ```rust,ignore
//! use edm_explorer::edm::load_model;
//!
//! let model = load_model("model.yaml")?;
//! for set in model.entity_sets() {
//!     let entity = model.entity_type_of(set).expect("validated");
//!     println!("{} keyed by {:?}", set.name, entity.keys);
//! }
//! ```

mod load;
mod model;
mod types;

pub use load::*;
pub use model::*;
pub use types::*;
