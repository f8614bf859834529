//! buildparts - compose bundler configuration from small fragments
//!
//! Independent parts each contribute a partial configuration. The selector
//! picks the parts for the runtime mode, fragment files may add more, and
//! the merge engine folds them into one configuration for the bundler.

pub mod bundler;
pub mod config;
pub mod env;
pub mod parts;
pub mod pipeline;

pub use buildparts_model::{
    merge, Configuration, DevServer, Entry, Fragment, MergeError, Output, Plugin, Rule, Settings,
    Stage, StatsLevel, TransformStep,
};
pub use config::{Layout, ResolvedConfig};
pub use env::{select, Ambient, Environment, Mode};
pub use parts::PartError;
pub use pipeline::{assemble, AssembleError, BuildRequest};
