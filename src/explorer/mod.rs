//! # API Explorer
//!
//! Ties the pipeline together:
//!
//! ```text
//! CandidateSource ─► PathTemplate ─► RouteVerifier ─► VerifiedRoute
//!                                        │                 │
//!                                  (404/405: dropped)      ▼
//!                                          ParameterResolver + FormatterRegistry
//!                                                          │
//!                                                          ▼
//!                                                   ApiDescription
//! ```
//!
//! Candidates are verified independently, optionally on several worker
//! threads, and reassembled in candidate order before duplicates are
//! dropped, so the first-seen description always wins. Any synthesis
//! error, ambiguous type mapping or dispatch fault aborts the whole run.

mod core;
mod description;

pub use core::{ApiExplorer, ApiExplorerBuilder};
pub use description::{normalize_path, ApiDescription, ResponseDescription};
