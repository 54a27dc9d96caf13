//! # Router Module
//!
//! The in-process routing oracle: a [`ControllerRouter`] built from a
//! [`ControllerTable`] answers the question "which action would this request
//! reach" without a network stack.
//!
//! ## Overview
//!
//! - Route templates are split into segments and stored in a radix tree.
//!   Static segments match exactly; segments with placeholders
//!   (`Products({key})`, `Default.Tax(state={state})`) compile into anchored
//!   regexes.
//! - Captured values are percent-decoded and must parse as the bound action
//!   parameter's declared type (`i32`, quoted `String`, enum literal, ...).
//!   If they do not, the search backtracks into the next branch.
//! - A path that matches with no action for the verb is a 405; no match at
//!   all is a 404; an unbound `{placeholder}` or undecodable segment is a 400.
//!
//! ## Example
//!
//! ```rust,ignore
//! use edm_explorer::router::{load_controller_table, ControllerRouter, RouteLookup};
//! use http::Method;
//!
//! let table = load_controller_table("controllers.yaml")?;
//! let router = ControllerRouter::new(&table, "/odata")?;
//! if let RouteLookup::Matched(m) = router.route(&Method::GET, "/odata/Products(42)", &model) {
//!     println!("{} key={:?}", m.binding.id(), m.get_path_param("key"));
//! }
//! ```

mod core;
mod literal;
mod radix;
mod table;
#[cfg(test)]
mod tests;

pub use core::{ControllerRouter, ParamVec, RouteLookup, RouteMatch, MAX_INLINE_PARAMS};
pub use table::{
    load_controller_table, load_controller_table_from_str, ActionDef, ControllerDef,
    ControllerTable, RoutedAction,
};
