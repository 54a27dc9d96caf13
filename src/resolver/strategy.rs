use crate::binding::{ActionBinding, ActionParameter, ParameterSource};
use crate::candidate::{ParameterLocation, ParameterSkeleton};
use serde::{Deserialize, Serialize};

/// Which rule bound a documented parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStrategy {
    ByName,
    KeyConvention,
    Positional,
    Synthetic,
}

/// What a strategy sees.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionInput<'a> {
    pub documented: &'a ParameterSkeleton,
    /// Ordinal of the documented parameter in its operation.
    pub position: usize,
    pub binding: &'a ActionBinding,
}

impl<'a> ResolutionInput<'a> {
    /// Real parameters that can stand for one documented parameter.
    fn named_parameters(&self) -> impl Iterator<Item = &'a ActionParameter> {
        self.binding
            .parameters
            .iter()
            .filter(|p| p.source != ParameterSource::Bag)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Matched(&'a ActionParameter),
    NoMatch,
}

impl<'a> From<Option<&'a ActionParameter>> for Resolution<'a> {
    fn from(found: Option<&'a ActionParameter>) -> Self {
        found.map_or(Resolution::NoMatch, Resolution::Matched)
    }
}

pub type Strategy = for<'a> fn(&ResolutionInput<'a>) -> Resolution<'a>;

/// Strategies in priority order. When none matches, the parameter becomes synthetic.
pub const STRATEGIES: [(ResolutionStrategy, Strategy); 3] = [
    (ResolutionStrategy::ByName, by_name),
    (ResolutionStrategy::KeyConvention, key_convention),
    (ResolutionStrategy::Positional, positional),
];

/// Case-insensitive name match.
pub fn by_name<'a>(input: &ResolutionInput<'a>) -> Resolution<'a> {
    let name = &input.documented.name;
    input
        .named_parameters()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .into()
}

/// A key lookup binds to the generic `key` parameter, or `key<Name>` for
/// one part of a composite key.
pub fn key_convention<'a>(input: &ResolutionInput<'a>) -> Resolution<'a> {
    if !input.documented.is_key_lookup() {
        return Resolution::NoMatch;
    }
    let prefixed = format!("key{}", input.documented.name);
    input
        .named_parameters()
        .find(|p| p.name.eq_ignore_ascii_case(&prefixed))
        .or_else(|| {
            input
                .named_parameters()
                .find(|p| p.name.eq_ignore_ascii_case("key"))
        })
        .into()
}

/// Same ordinal, for anything that is not a query option.
pub fn positional<'a>(input: &ResolutionInput<'a>) -> Resolution<'a> {
    if input.documented.location == ParameterLocation::Query {
        return Resolution::NoMatch;
    }
    input.named_parameters().nth(input.position).into()
}
