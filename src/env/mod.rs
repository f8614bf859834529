//! Runtime environment and fragment selection
//!
//! The mode token and the ambient host/port are read once at startup. The
//! selector turns them into an ordered fragment sequence; it never merges.

mod select;

pub use select::select;

use serde::Serialize;
use std::fmt;

use crate::parts::PartError;

/// Variables consulted for the mode token, first match wins.
pub const MODE_VARS: &[&str] = &["BUILDPARTS_MODE", "NODE_ENV"];

/// Variable holding the dev-server host.
pub const HOST_VAR: &str = "HOST";

/// Variable holding the dev-server port.
pub const PORT_VAR: &str = "PORT";

/// Build mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    /// `"production"` selects production; any other token is development.
    pub fn from_token(token: &str) -> Self {
        if token == "production" {
            Self::Production
        } else {
            Self::Development
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Ambient dev-server settings, either of which may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ambient {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Everything read from the process environment.
///
/// `PORT` is kept raw; it is parsed only when a development build needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    pub mode: Mode,
    pub host: Option<String>,
    pub port: Option<String>,
}

impl Environment {
    /// Read the process environment.
    pub fn from_process() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through a lookup function. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = MODE_VARS
            .iter()
            .find_map(|key| read(*key))
            .map(|token| Mode::from_token(&token))
            .unwrap_or_default();

        Self {
            mode,
            host: read(HOST_VAR),
            port: read(PORT_VAR),
        }
    }

    /// Ambient settings for `mode`, with explicit values taking precedence.
    ///
    /// Production ignores host and port, so a malformed `PORT` only fails a
    /// development build that has no explicit port.
    pub fn ambient(
        &self,
        mode: Mode,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<Ambient, PartError> {
        let port = match (port, self.port.as_deref()) {
            (Some(port), _) => Some(port),
            (None, Some(raw)) if mode == Mode::Development => Some(parse_port(raw)?),
            _ => None,
        };

        Ok(Ambient {
            host: host.or_else(|| self.host.clone()),
            port,
        })
    }
}

/// Parse a port number from its textual form.
pub fn parse_port(raw: &str) -> Result<u16, PartError> {
    raw.trim().parse::<u16>().map_err(|e| {
        PartError::invalid("ambient", "PORT", format!("'{}' is not a valid port: {}", raw, e))
    })
}
