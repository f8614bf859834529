//! Configuration assembly pipeline
//!
//! - Select the part fragments for the mode
//! - Load fragment files, appended after the parts in the order given
//! - Merge everything into one configuration
//! - Wrap it in the resolved envelope
//!
//! Every fragment is built before the merge starts, so a bad option or a
//! broken file aborts assembly without producing a partial configuration.

use buildparts_model::{merge, MergeError};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{FragmentFile, FragmentFileError, Layout, ResolvedConfig, SourceRecord};
use crate::env::{self, Ambient, Mode};
use crate::parts::PartError;

/// Assembly errors
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error(transparent)]
    Part(#[from] PartError),

    #[error(transparent)]
    FragmentFile(#[from] FragmentFileError),

    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Inputs for one assembly run
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub mode: Mode,
    pub ambient: Ambient,
    pub layout: Layout,

    /// Fragment files merged after the selected parts
    pub fragment_files: Vec<PathBuf>,
}

/// Assemble the resolved configuration for a request.
pub fn assemble(request: &BuildRequest) -> Result<ResolvedConfig, AssembleError> {
    let mut fragments = env::select(request.mode, &request.ambient, &request.layout)?;
    let mut sources: Vec<SourceRecord> = fragments
        .iter()
        .map(|f| SourceRecord::part(f.source.clone()))
        .collect();

    for path in &request.fragment_files {
        let file = FragmentFile::load(path)?;
        sources.push(SourceRecord::file(file.fragment.source.clone(), file.digest));
        fragments.push(file.fragment);
    }

    let config = merge(&fragments)?;

    tracing::info!(
        mode = %request.mode,
        fragments = fragments.len(),
        "assembled configuration"
    );

    Ok(ResolvedConfig::new(request.mode, config, sources))
}
