//! # EDM Explorer
//!
//! **edm-explorer** discovers which routes an entity-data-model (OData-style)
//! service really exposes and describes each of them for a documentation
//! renderer.
//!
//! ## Overview
//!
//! The resource model says what *could* be routed: every entity set, key
//! lookup, navigation, operation import and bound operation. The routing
//! layer says what *is* routed. The explorer generates every plausible
//! candidate from the model, sends a synthetic request for each one through
//! the routing layer, and keeps only the candidates that land on a real
//! action. Each survivor becomes an [`ApiDescription`] carrying its
//! parameters, response type and supported media types.
//!
//! ## Architecture
//!
//! - **[`edm`]** - Resource model snapshot, type references, document loading
//! - **[`generator`]** - Candidate sources: model templates, attribute routes, custom routes
//! - **[`candidate`]** - Candidate records and the URI template binder
//! - **[`sample_value`]** - Sample literals for path placeholders
//! - **[`dispatcher`]** - Route verification against a [`RoutingOracle`]
//! - **[`router`]** - In-process routing oracle over a controller action table
//! - **[`resolver`]** - Documented-to-real parameter binding strategies
//! - **[`type_resolver`]** - Model type to implementation type mapping
//! - **[`formatter`]** - Request/response media type negotiation
//! - **[`explorer`]** - The memoized `generate()` entry point
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Explorer as ApiExplorer
//!     participant Gen as CandidateSource
//!     participant Verifier as RouteVerifier
//!     participant Oracle as RoutingOracle
//!     participant Resolver as ParameterResolver
//!
//!     Caller->>Explorer: generate()
//!     Explorer->>Gen: candidates()
//!     Gen-->>Explorer: Vec<PathTemplate>
//!     loop every (template, verb)
//!         Explorer->>Verifier: verify_or_fault(template, verb)
//!         Verifier->>Oracle: resolve(SyntheticRequest)
//!         Oracle-->>Verifier: Resolved | 404 | 405 | fault
//!         Verifier-->>Explorer: Option<VerifiedRoute>
//!         Explorer->>Resolver: resolve(documented, binding)
//!     end
//!     Explorer-->>Caller: Arc<Vec<ApiDescription>>
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use edm_explorer::{load_controller_table, load_model, ApiExplorer, ExplorerConfig};
//! use std::sync::Arc;
//!
//! let model = Arc::new(load_model("catalog.yaml")?);
//! let table = load_controller_table("controllers.yaml")?;
//! let explorer = ApiExplorer::from_documents(model, &table, ExplorerConfig::default())?;
//! for d in explorer.generate()?.iter() {
//!     println!("{} -> {}", d.id(), d.action.id());
//! }
//! ```
//!
//! ## Configuration
//!
//! See [`config`] for the file format and `EDMX_*` environment overrides,
//! and [`logging`] for log output settings.

pub mod binding;
pub mod candidate;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod edm;
pub mod error;
pub mod explorer;
pub mod formatter;
pub mod generator;
pub mod ids;
pub mod logging;
pub mod resolver;
pub mod router;
pub mod sample_value;
pub mod type_resolver;

#[cfg(test)]
mod testing;

pub use config::{load_config, resolve_config, ExplorerConfig};
pub use dispatcher::{DispatchOutcome, RoutingOracle};
pub use edm::{load_model, EdmModel, EdmTypeRef};
pub use error::{ExplorerError, Result};
pub use explorer::{ApiDescription, ApiExplorer};
pub use router::{load_controller_table, ControllerRouter, ControllerTable};
