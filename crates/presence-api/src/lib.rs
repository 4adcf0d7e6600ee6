// presence-api: Minimal async client for the UniFi controller legacy API.
//
// Covers exactly what a presence poller needs: cookie-session login at
// construction time and the connected-client list (`stat/sta`). Commands,
// stats, and event surfaces are deliberately absent.

pub mod controller;
pub mod error;
pub mod models;
pub mod transport;

pub use controller::{Controller, ControllerConfig};
pub use error::Error;
pub use models::ClientRecord;
pub use transport::TransportConfig;
