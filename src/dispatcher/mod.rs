//! # Route Verification
//!
//! Every candidate verb goes through the same small state machine:
//!
//! ```text
//! Candidate → RequestSynthesized → Dispatched → { Resolved | ExpectedAbsence | Fault }
//! ```
//!
//! 1. **Synthesize**: each path parameter gets a sample literal and the
//!    template is bound into an absolute URI under the service root.
//! 2. **Dispatch**: the [`SyntheticRequest`] goes to a [`RoutingOracle`].
//!    No network stack is involved; the request carries the model and route
//!    metadata the oracle needs.
//! 3. **Classify**: a resolved action is a confirmed route; a 404 or 405 is
//!    an expected absence and is dropped quietly (most candidates end here);
//!    anything else is a fault and stops the run, because it means the
//!    candidate itself was broken.
//!
//! Each verification runs in its own `verify` span tagged with the request
//! id, so the log of one candidate can be pulled out of a parallel run.

mod core;
mod oracle;
#[cfg(test)]
mod tests;

pub use core::{DispatchOutcome, RouteVerifier, VerifiedRoute};
pub use oracle::{OracleResponse, RequestContext, RoutingOracle, SyntheticRequest};
