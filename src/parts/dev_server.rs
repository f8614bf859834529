//! Dev-server part

use buildparts_model::{DevServer, Fragment, StatsLevel};

use super::PartError;

const CONCERN: &str = "dev-server";

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "localhost";

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// Options for [`dev_server`]. Unset values fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DevServerOptions {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Build the dev-server fragment.
///
/// Serves inline with a live-reload client and only reports errors on the
/// console to keep output short.
pub fn dev_server(options: &DevServerOptions) -> Result<Fragment, PartError> {
    let host = match &options.host {
        Some(host) if host.trim().is_empty() => {
            return Err(PartError::invalid(CONCERN, "host", "host must not be empty"));
        }
        Some(host) => host.trim().to_string(),
        None => DEFAULT_HOST.to_string(),
    };

    let port = match options.port {
        Some(0) => return Err(PartError::invalid(CONCERN, "port", "port must be non-zero")),
        Some(port) => port,
        None => DEFAULT_PORT,
    };

    Ok(Fragment::new("parts::dev_server").with_dev_server(DevServer {
        host: Some(host),
        port: Some(port),
        inline: Some(true),
        compress: None,
        hot: None,
        stats: Some(StatsLevel::ErrorsOnly),
    }))
}
