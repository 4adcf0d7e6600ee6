// Legacy API response types
//
// Every legacy endpoint wraps its payload in the `{ meta, data }` envelope.
// Fields use `#[serde(default)]` liberally because the API is inconsistent
// about field presence across firmware versions.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard UniFi legacy API response envelope.
///
/// ```json
/// { "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }
/// ```
#[derive(Debug, Deserialize)]
pub struct LegacyResponse<T> {
    pub meta: Meta,
    pub data: Vec<T>,
}

/// Metadata from the legacy envelope. `rc` == `"ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Client (Station) ─────────────────────────────────────────────────

/// Connected client from `stat/sta`.
///
/// Only the MAC is guaranteed; everything else depends on what the client
/// advertised and how long the controller has known it. `name` is the
/// admin-assigned alias, `hostname` is what the device reported via DHCP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRecord {
    pub mac: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ip: Option<String>,
    /// Epoch seconds of the controller's last sighting.
    #[serde(default)]
    pub last_seen: Option<i64>,
    #[serde(default)]
    pub is_wired: Option<bool>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
