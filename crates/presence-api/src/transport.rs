// Transport configuration for building reqwest::Client instances.
//
// Session auth requires cookies, so the cookie store is always enabled.
// Controllers in the field overwhelmingly run self-signed certificates,
// which is why certificate verification is a first-class toggle.

use std::time::Duration;

use crate::error::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport settings shared by every request the client makes.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Verify the controller's TLS certificate. Off accepts any cert.
    pub verify_ssl: bool,
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            verify_ssl: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .cookie_store(true)
            .user_agent(concat!("presence-api/", env!("CARGO_PKG_VERSION")));

        if !self.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder.build().map_err(Error::Transport)
    }
}
