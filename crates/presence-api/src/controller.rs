// Legacy API HTTP client
//
// Wraps `reqwest::Client` with UniFi-specific URL construction and envelope
// unwrapping, trimmed to the two operations a presence poller needs: login
// and the connected-client list. The login endpoint sets a session cookie in
// the client's jar; subsequent requests use that cookie automatically.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{ClientRecord, LegacyResponse};
use crate::transport::TransportConfig;

/// Connection settings for a standalone UniFi controller.
///
/// Mirrors the controller's connection tuple: host, credentials, port, API
/// version, site, and certificate verification.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub host: String,
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    /// Legacy API version; only "v4" and "v5" are supported.
    pub version: String,
    pub site_id: String,
    pub verify_ssl: bool,
}

impl ControllerConfig {
    /// The controller root URL: `https://{host}:{port}`.
    pub fn base_url(&self) -> Result<Url, Error> {
        Url::parse(&format!("https://{}:{}", self.host, self.port)).map_err(Error::InvalidUrl)
    }
}

/// Authenticated handle to a UniFi controller's legacy API.
///
/// Construction and login are one step: [`Controller::connect`] makes exactly
/// one login attempt and fails with [`Error::Authentication`] if the
/// controller rejects the credentials.
#[derive(Debug)]
pub struct Controller {
    http: reqwest::Client,
    base_url: Url,
    site: String,
}

impl Controller {
    /// Connect and authenticate against `https://{host}:{port}`.
    pub async fn connect(config: &ControllerConfig) -> Result<Self, Error> {
        let base_url = config.base_url()?;
        Self::connect_url(base_url, config).await
    }

    /// Connect and authenticate at an explicit base URL.
    ///
    /// Use this when the controller sits behind a reverse proxy or a
    /// non-standard scheme/port layout; `config.host` and `config.port` are
    /// ignored in favor of `base_url`.
    pub async fn connect_url(base_url: Url, config: &ControllerConfig) -> Result<Self, Error> {
        let login_path = match config.version.as_str() {
            "v4" | "v5" => "api/login",
            other => return Err(Error::UnsupportedVersion(other.to_owned())),
        };

        let transport = TransportConfig {
            verify_ssl: config.verify_ssl,
            ..TransportConfig::default()
        };
        let http = transport.build_client()?;

        let url = base_url.join(login_path).map_err(Error::InvalidUrl)?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": config.username,
            "password": config.password.expose_secret(),
        });

        let resp = http.post(url).json(&body).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        debug!(site = %config.site_id, "login successful");
        Ok(Self {
            http,
            base_url,
            site: config.site_id.clone(),
        })
    }

    /// The current site identifier.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List all currently connected clients (stations).
    ///
    /// `GET /api/s/{site}/stat/sta`
    pub async fn list_clients(&self) -> Result<Vec<ClientRecord>, Error> {
        let url = self.site_url("stat/sta")?;
        debug!("listing connected clients");
        self.get(url).await
    }

    /// Build a site-scoped URL: `{base}/api/s/{site}/{path}`
    fn site_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(&format!("api/s/{}/{path}", self.site))
            .map_err(Error::InvalidUrl)
    }

    /// Send a GET request and unwrap the legacy envelope.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        parse_envelope(resp).await
    }
}

/// The first 200 characters of a response body, for error messages.
/// Truncates on a char boundary; bodies aren't guaranteed to be ASCII.
fn body_preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Parse the `{ meta, data }` envelope, returning `data` on success
/// or an `Error::Api` if `meta.rc != "ok"`.
async fn parse_envelope<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: "session expired or invalid credentials".into(),
        });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Api {
            message: format!("HTTP {status}: {}", body_preview(&body)),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    let envelope: LegacyResponse<T> = serde_json::from_str(&body).map_err(|e| {
        let preview = body_preview(&body);
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })?;

    match envelope.meta.rc.as_str() {
        "ok" => Ok(envelope.data),
        _ => Err(Error::Api {
            message: envelope
                .meta
                .msg
                .unwrap_or_else(|| format!("rc={}", envelope.meta.rc)),
        }),
    }
}
