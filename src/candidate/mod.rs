//! # Candidates
//!
//! A [`PathTemplate`] is a route the model *could* expose: a template with
//! `{name}` placeholders plus, per HTTP verb, the parameters and responses a
//! generator documented for it. Candidates are produced speculatively and
//! never mutated; the dispatcher decides which ones are real.
//!
//! [`binder`] turns a template and a set of sample literals into a concrete
//! request path.

pub mod binder;
mod types;

pub use binder::{bind_uri, placeholders};
pub use types::*;
