//! # CLI Module
//!
//! Command line front end for the explorer, shipped as the `edm-explorer`
//! binary.
//!
//! ## Commands
//!
//! ### `describe`
//!
//! Verify every candidate route against a controller table and print the
//! resulting API descriptions:
//!
//! ```bash
//! edm-explorer describe --model catalog.yaml --controllers controllers.yaml --format json
//! ```
//!
//! ### `templates`
//!
//! Print every candidate template without verifying it:
//!
//! ```bash
//! edm-explorer templates --model catalog.yaml
//! ```
//!
//! ### `validate`
//!
//! Check a model document (and optionally a controller table) and list every
//! issue found. Exits non-zero when there are issues:
//!
//! ```bash
//! edm-explorer validate --model catalog.yaml --controllers controllers.yaml
//! ```
//!
//! An `edm-explorer.{yaml,toml,json}` file next to the model is picked up
//! automatically; `--config` overrides it. `EDMX_*` variables override both.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run_cli, Cli, Commands, OutputFormat};
