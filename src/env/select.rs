//! Fragment selection per mode

use buildparts_model::Fragment;

use super::{Ambient, Mode};
use crate::config::Layout;
use crate::parts::{self, DevServerOptions, LintOptions, PartError};

/// Pick the ordered fragment sequence for a mode.
///
/// - production: base, then lint that fails the build on errors
/// - development: base, dev-server (ambient host/port), then warn-only lint
///
/// Production ignores the ambient settings entirely.
pub fn select(mode: Mode, ambient: &Ambient, layout: &Layout) -> Result<Vec<Fragment>, PartError> {
    let base = parts::base(&layout.base_options())?;

    let fragments = match mode {
        Mode::Production => vec![
            base,
            parts::lint_js(&LintOptions {
                paths: layout.lint_paths(),
                emit_warnings_only: false,
            })?,
        ],
        Mode::Development => vec![
            base,
            parts::dev_server(&DevServerOptions {
                host: ambient.host.clone(),
                port: ambient.port,
            })?,
            parts::lint_js(&LintOptions {
                paths: layout.lint_paths(),
                emit_warnings_only: true,
            })?,
        ],
    };

    tracing::debug!(
        %mode,
        sources = ?fragments.iter().map(|f| f.source.as_str()).collect::<Vec<_>>(),
        "selected fragments"
    );

    Ok(fragments)
}
