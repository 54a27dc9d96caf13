//! Segment tree for action routes.
//!
//! Routes are split on `/` and stored one segment per level:
//! - Static segments (`Products`, `Default.MostExpensive()`) match exactly
//! - Pattern segments mix literals and placeholders (`Products({key})`,
//!   `Default.Tax(state={state})`) and are matched with an anchored regex
//!
//! Search backtracks: a leaf is offered to a visitor together with the values
//! captured on the way down, and if the visitor rejects it the search tries
//! the next branch. This is how a captured value that does not parse as the
//! action's parameter type falls through to another route.

use super::core::ParamVec;
use crate::binding::ActionBinding;
use crate::candidate::binder::{parse_template, TemplatePart};
use crate::error::{ExplorerError, Result};
use regex::Regex;
use std::sync::Arc;

/// An action stored at a leaf.
#[derive(Debug)]
pub(crate) struct RouteEntry {
    pub binding: Arc<ActionBinding>,
    /// Full route template including the base path.
    pub route: String,
}

/// A segment containing at least one placeholder.
#[derive(Debug, Clone)]
struct SegmentPattern {
    source: String,
    regex: Regex,
    names: Vec<Arc<str>>,
}

/// Compiled form of one route segment.
enum Segment {
    Static(String),
    Pattern(SegmentPattern),
}

fn compile_segment(segment: &str, route: &str) -> Result<Segment> {
    let parts = parse_template(segment).map_err(|_| ExplorerError::malformed(route, "invalid segment"))?;
    if !parts.iter().any(|p| matches!(p, TemplatePart::Placeholder(_))) {
        let text = parts
            .iter()
            .map(|p| match p {
                TemplatePart::Literal(t) => (*t).to_string(),
                TemplatePart::Brace(c) => c.to_string(),
                TemplatePart::Placeholder(_) => String::new(),
            })
            .collect();
        return Ok(Segment::Static(text));
    }

    let mut pattern = String::with_capacity(segment.len() + 8);
    pattern.push('^');
    let mut names = Vec::new();
    for part in &parts {
        match part {
            TemplatePart::Literal(t) => pattern.push_str(&regex::escape(t)),
            TemplatePart::Brace(c) => pattern.push_str(&regex::escape(&c.to_string())),
            TemplatePart::Placeholder(name) => {
                pattern.push_str("(.+?)");
                names.push(Arc::from(*name));
            }
        }
    }
    pattern.push('$');
    let regex = Regex::new(&pattern)
        .map_err(|e| ExplorerError::malformed(route, format!("segment '{segment}': {e}")))?;
    Ok(Segment::Pattern(SegmentPattern {
        source: segment.to_string(),
        regex,
        names,
    }))
}

#[derive(Debug, Clone, Default)]
struct RadixNode {
    segment: String,
    pattern: Option<SegmentPattern>,
    routes: Vec<Arc<RouteEntry>>,
    children: Vec<RadixNode>,
    pattern_children: Vec<RadixNode>,
}

impl RadixNode {
    fn insert(&mut self, segments: &[&str], entry: Arc<RouteEntry>) -> Result<()> {
        let Some((first, remaining)) = segments.split_first() else {
            self.routes.push(entry);
            return Ok(());
        };

        match compile_segment(first, &entry.route)? {
            Segment::Static(text) => {
                if let Some(child) = self.children.iter_mut().find(|c| c.segment == text) {
                    return child.insert(remaining, entry);
                }
                let mut child = RadixNode {
                    segment: text,
                    ..Default::default()
                };
                child.insert(remaining, entry)?;
                self.children.push(child);
            }
            Segment::Pattern(pattern) => {
                if let Some(child) = self
                    .pattern_children
                    .iter_mut()
                    .find(|c| c.pattern.as_ref().is_some_and(|p| p.source == pattern.source))
                {
                    return child.insert(remaining, entry);
                }
                let mut child = RadixNode {
                    segment: pattern.source.clone(),
                    pattern: Some(pattern),
                    ..Default::default()
                };
                child.insert(remaining, entry)?;
                self.pattern_children.push(child);
            }
        }
        Ok(())
    }

    /// Depth-first search; returns `true` as soon as `visit` accepts a leaf.
    fn search<F>(&self, segments: &[String], captures: &mut ParamVec, visit: &mut F) -> bool
    where
        F: FnMut(&[Arc<RouteEntry>], &ParamVec) -> bool,
    {
        let Some((segment, remaining)) = segments.split_first() else {
            return !self.routes.is_empty() && visit(&self.routes, captures);
        };

        for child in &self.children {
            if child.segment == *segment && child.search(remaining, captures, visit) {
                return true;
            }
        }

        for child in &self.pattern_children {
            let Some(pattern) = &child.pattern else {
                continue;
            };
            let Some(caps) = pattern.regex.captures(segment) else {
                continue;
            };
            let mark = captures.len();
            for (idx, name) in pattern.names.iter().enumerate() {
                let value = caps.get(idx + 1).map(|m| m.as_str()).unwrap_or_default();
                captures.push((Arc::clone(name), value.to_string()));
            }
            if child.search(remaining, captures, visit) {
                return true;
            }
            // Backtrack
            captures.truncate(mark);
        }

        false
    }

    fn count(&self) -> usize {
        self.routes.len()
            + self.children.iter().map(RadixNode::count).sum::<usize>()
            + self.pattern_children.iter().map(RadixNode::count).sum::<usize>()
    }
}

/// Route tree over decoded path segments.
#[derive(Debug, Clone, Default)]
pub(crate) struct RadixRouter {
    root: RadixNode,
}

impl RadixRouter {
    pub fn insert(&mut self, entry: RouteEntry) -> Result<()> {
        let route = entry.route.clone();
        let segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
        self.root.insert(&segments, Arc::new(entry))
    }

    pub fn search<F>(&self, segments: &[String], visit: &mut F) -> Option<ParamVec>
    where
        F: FnMut(&[Arc<RouteEntry>], &ParamVec) -> bool,
    {
        let mut captures = ParamVec::new();
        self.root
            .search(segments, &mut captures, visit)
            .then_some(captures)
    }

    pub fn len(&self) -> usize {
        self.root.count()
    }
}
