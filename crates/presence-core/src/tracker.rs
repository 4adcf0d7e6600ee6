// Scanner factory
//
// Translates a validated tracker config into a connected scanner. This is
// the setup boundary the hub calls once: controller rejections become a
// definite "no scanner" result, not an error, so the hub can report a
// failed platform setup without unwinding.

use tracing::warn;
use url::Url;

use presence_api::{Controller, Error};

use crate::config::TrackerConfig;
use crate::scanner::UnifiScanner;

/// Connect to the controller and build a scanner.
///
/// Makes exactly one controller construction attempt. If the controller
/// rejects it (bad credentials, API error), returns `Ok(None)` — the
/// definite failure signal the hub expects. Transport and parse failures
/// propagate as `Err`.
pub async fn get_scanner(config: &TrackerConfig) -> Result<Option<UnifiScanner<Controller>>, Error> {
    let ctrl_config = config.controller_config();
    let base_url = ctrl_config.base_url()?;
    get_scanner_at(config, base_url).await
}

/// [`get_scanner`] against an explicit base URL (reverse-proxied
/// controllers, non-standard scheme/port layouts).
pub async fn get_scanner_at(
    config: &TrackerConfig,
    base_url: Url,
) -> Result<Option<UnifiScanner<Controller>>, Error> {
    let ctrl_config = config.controller_config();

    let controller = match Controller::connect_url(base_url, &ctrl_config).await {
        Ok(controller) => controller,
        Err(e) if e.is_api_error() => {
            warn!(error = %e, "failed to connect to unifi controller");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let scanner = UnifiScanner::new(controller, config.consider_home).await?;
    Ok(Some(scanner))
}
