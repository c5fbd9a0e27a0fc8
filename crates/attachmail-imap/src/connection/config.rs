//! Connection configuration types.

use crate::{Error, Result};

/// Connection security mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// No encryption (port 143). Only for local testing.
    None,
    /// TLS from the start (port 993).
    #[default]
    Implicit,
}

impl Security {
    /// Returns the default port for this security mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::None => 143,
            Self::Implicit => 993,
        }
    }
}

/// IMAP connection configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
}

impl Config {
    /// Creates a configuration with implicit TLS on port 993.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Security::Implicit.default_port(),
            security: Security::Implicit,
        }
    }

    /// Parses a `host` or `host:port` server string, using implicit TLS.
    ///
    /// # Errors
    ///
    /// Returns an error if the host is empty or the port is not a number.
    pub fn from_server(server: &str) -> Result<Self> {
        let server = server.trim();
        let (host, port) = match server.rsplit_once(':') {
            // An IPv6 literal without a port has more than one colon.
            Some((host, port)) if !host.contains(':') => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| Error::InvalidServer(server.to_string()))?;
                (host, Some(port))
            }
            _ => (server, None),
        };

        if host.is_empty() {
            return Err(Error::InvalidServer(server.to_string()));
        }

        let mut config = Self::new(host);
        if let Some(port) = port {
            config.port = port;
        }
        Ok(config)
    }

    /// Sets the security mode, resetting the port to that mode's default.
    #[must_use]
    pub const fn with_security(mut self, security: Security) -> Self {
        self.security = security;
        self.port = security.default_port();
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}
