// presence-core: device-presence adapter for UniFi controllers.
//
// Validates the hub's platform configuration, connects to the controller,
// and answers "which MACs are home" from a per-poll snapshot of the
// connected-client list. The hub owns scheduling and the consider-home
// away-transition logic; this crate owns one snapshot and two queries.

pub mod config;
pub mod scanner;
pub mod tracker;

pub use config::{ConfigError, RawTrackerConfig, TrackerConfig, DEFAULT_CONSIDER_HOME};
pub use scanner::{ClientSource, DeviceScanner, UnifiScanner};
pub use tracker::{get_scanner, get_scanner_at};
