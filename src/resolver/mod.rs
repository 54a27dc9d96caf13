//! # Parameter Resolution
//!
//! A verified candidate carries two parameter lists: what the template
//! generator documented, and what the action really accepts. The resolver
//! reconciles them with an ordered chain of strategies:
//!
//! 1. **By name**: case-insensitive match on the parameter name
//! 2. **Key convention**: a documented key lookup binds to `key` or
//!    `key<Name>`, keeping its documented name
//! 3. **Positional**: the real parameter at the same ordinal, except for
//!    query options
//!
//! A documented parameter no strategy binds is still described, as a
//! synthetic parameter whose type comes from the [`TypeResolver`].
//!
//! [`TypeResolver`]: crate::type_resolver::TypeResolver

mod core;
mod strategy;

pub use core::{ParameterDescription, ParameterOrigin, ParameterResolver};
pub use strategy::{
    by_name, key_convention, positional, Resolution, ResolutionInput, ResolutionStrategy,
    Strategy, STRATEGIES,
};
