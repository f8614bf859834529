//! Layered build-configuration model.
//!
//! Fragments are partial, immutable configuration values. The merge engine
//! folds an ordered sequence of them into one [`Configuration`] with explicit
//! per-field semantics:
//!
//! - Mappings (`entry`): key union, later value wins per key
//! - Scalars and records (`context`, `output.*`, `devServer.*`): last setter wins
//! - Sequences (`rules`, `plugins`): concatenation in fragment order

mod error;
mod fragment;
mod merge;
mod rule;

pub use error::MergeError;
pub use fragment::{
    Configuration, DevServer, Entry, Fragment, Output, Settings, StatsLevel, DEFAULT_ENTRY_NAME,
};
pub use merge::{merge, overlay};
pub use rule::{Plugin, Rule, Stage, TransformStep};
