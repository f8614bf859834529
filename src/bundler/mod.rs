//! Bundler contract
//!
//! The bundler itself is external. This module pins down what it is handed
//! and how it must read it: rules run `pre`, then `normal`, then `post`
//! (stable within a stage), each matching rule's transform chain runs in
//! listed order, and plugins are consumed in listed order.

mod dry_run;
mod plan;

pub use dry_run::{DryRunBundler, DryRunReport, FilePlan, DEFAULT_FILENAME};
pub use plan::RulePlan;

use buildparts_model::Configuration;

/// Errors a bundler may raise while consuming a configuration
#[derive(Debug, thiserror::Error)]
pub enum BundleError {
    #[error("invalid rule pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Something that consumes a resolved configuration.
pub trait Bundler {
    type Output;

    fn bundle(&self, config: &Configuration) -> Result<Self::Output, BundleError>;
}
