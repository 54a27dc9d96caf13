//! # Template Generators
//!
//! Generators turn a source of route knowledge into [`PathTemplate`]
//! candidates. Three sources feed the same candidate shape:
//!
//! - [`EdmTemplateGenerator`] walks the resource model and emits every
//!   structurally plausible entity-set, entity, navigation, operation-import
//!   and bound-operation template.
//! - [`AttributeRouteRegistry`] emits the templates controller actions
//!   declare for themselves.
//! - [`CustomRouteRegistry`] emits routes declared by hand, in code or in the
//!   explorer configuration.
//!
//! None of them checks that a route is real. That is the dispatcher's job.
//!
//! ## Template Shapes
//!
//! ```text
//! /Customers                                         GET (list), POST
//! /Customers({Id})                                   GET, PATCH, PUT, DELETE
//! /OrderLines(OrderId={OrderId},Line={Line})         composite key
//! /Paints(Default.Color'{Tint}')                     enum key
//! /Products({Id})/Default.CalculateTax(state='{state}')
//! /GetTopProducts(count={count})                     function import
//! /ResetData                                         action import, JSON body
//! ```
//!
//! [`PathTemplate`]: crate::candidate::PathTemplate

mod attribute;
mod custom;
mod edm;
#[cfg(test)]
mod tests;

pub use attribute::AttributeRouteRegistry;
pub use custom::{CustomOperation, CustomParameter, CustomRoute, CustomRouteRegistry};
pub use edm::{EdmTemplateGenerator, TemplateOptions};

use crate::candidate::PathTemplate;
use crate::error::Result;

/// A producer of candidate templates.
pub trait CandidateSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// All candidates this source knows about, in a stable order.
    fn candidates(&self) -> Result<Vec<PathTemplate>>;
}
