// Presence scanner
//
// Polls the controller's client list and keeps the latest snapshot, keyed
// by MAC. The snapshot is replaced wholesale on every successful poll; a
// poll the controller rejects keeps the previous one. Staleness handling
// lives in the hub — the scanner reports exactly what the controller said
// at the last successful poll.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use presence_api::{ClientRecord, Controller, Error};

/// The controller-client seam: anything that can produce the current
/// connected-client list.
pub trait ClientSource {
    /// Fetch the current client list from the controller.
    fn get_clients(&self) -> impl Future<Output = Result<Vec<ClientRecord>, Error>> + Send;
}

impl ClientSource for Controller {
    async fn get_clients(&self) -> Result<Vec<ClientRecord>, Error> {
        self.list_clients().await
    }
}

/// The capability set the hub's generic tracker loop drives.
pub trait DeviceScanner {
    /// MAC addresses present in the current snapshot.
    fn scan_devices(&self) -> Vec<String>;

    /// Display name for a known MAC: the admin-assigned `name` if set,
    /// else the DHCP `hostname`, else `None`. Unknown MACs are `None`,
    /// never an error.
    fn get_device_name(&self, mac: &str) -> Option<&str>;
}

/// Presence scanner over a UniFi controller.
///
/// Construction performs one poll so the instance is populated (or
/// empty-but-ready, if the controller rejected that first poll) before
/// first use.
pub struct UnifiScanner<C> {
    source: C,
    consider_home: Duration,
    clients: HashMap<String, ClientRecord>,
}

impl<C: ClientSource> UnifiScanner<C> {
    /// Create a scanner bound to `source` and poll it once.
    ///
    /// An API-class rejection of that first poll is swallowed (the scanner
    /// starts empty); any other error propagates.
    pub async fn new(source: C, consider_home: Duration) -> Result<Self, Error> {
        let mut scanner = Self {
            source,
            consider_home,
            clients: HashMap::new(),
        };
        scanner.update().await?;
        Ok(scanner)
    }

    /// Refresh the snapshot from the controller.
    ///
    /// On success the snapshot is replaced wholesale. If the controller
    /// rejects the request the previous snapshot is kept and `Ok` is
    /// returned; the hub's next scheduled poll is the retry. Transport and
    /// parse failures propagate.
    pub async fn update(&mut self) -> Result<(), Error> {
        match self.source.get_clients().await {
            Ok(clients) => {
                debug!(count = clients.len(), "refreshed client snapshot");
                self.clients = clients.into_iter().map(|c| (c.mac.clone(), c)).collect();
                Ok(())
            }
            Err(e) if e.is_api_error() => {
                warn!(error = %e, "failed to scan clients; keeping previous snapshot");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// The configured consider-home window, for the hub's away-transition
    /// logic. The scanner itself never filters by it.
    pub fn consider_home(&self) -> Duration {
        self.consider_home
    }
}

impl<C> DeviceScanner for UnifiScanner<C> {
    fn scan_devices(&self) -> Vec<String> {
        self.clients.keys().cloned().collect()
    }

    fn get_device_name(&self, mac: &str) -> Option<&str> {
        let client = self.clients.get(mac)?;
        client.name.as_deref().or(client.hostname.as_deref())
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::DEFAULT_CONSIDER_HOME;

    /// Scripted client source: pops one response per poll, counting calls.
    struct MockSource {
        responses: Mutex<Vec<Result<Vec<ClientRecord>, Error>>>,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn new(responses: Vec<Result<Vec<ClientRecord>, Error>>) -> Self {
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ClientSource for &MockSource {
        async fn get_clients(&self) -> Result<Vec<ClientRecord>, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn record(mac: &str, hostname: Option<&str>, name: Option<&str>) -> ClientRecord {
        ClientRecord {
            mac: mac.to_owned(),
            hostname: hostname.map(str::to_owned),
            name: name.map(str::to_owned),
            ip: None,
            last_seen: Some(1_504_786_810),
            is_wired: None,
            extra: serde_json::Map::new(),
        }
    }

    fn api_error() -> Error {
        Error::Api {
            message: "api.err.ServerBusy".into(),
        }
    }

    #[tokio::test]
    async fn construction_polls_exactly_once() {
        let source = MockSource::new(vec![Ok(vec![record("123", None, None)])]);

        let scanner = UnifiScanner::new(&source, DEFAULT_CONSIDER_HOME).await.unwrap();

        assert_eq!(source.calls(), 1);
        assert_eq!(scanner.consider_home(), DEFAULT_CONSIDER_HOME);
    }

    #[tokio::test]
    async fn scan_devices_returns_all_macs() {
        let source = MockSource::new(vec![Ok(vec![
            record("123", None, None),
            record("234", None, None),
        ])]);

        let scanner = UnifiScanner::new(&source, DEFAULT_CONSIDER_HOME).await.unwrap();

        let devices: HashSet<String> = scanner.scan_devices().into_iter().collect();
        let expected: HashSet<String> = ["123", "234"].iter().map(|s| (*s).to_owned()).collect();
        assert_eq!(devices, expected);

        // No implicit re-poll on scan.
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn device_name_prefers_name_over_hostname() {
        let source = MockSource::new(vec![Ok(vec![
            record("123", Some("foobar"), None),
            record("234", Some("nice-hostname"), Some("Nice Name")),
            record("456", None, None),
        ])]);

        let scanner = UnifiScanner::new(&source, DEFAULT_CONSIDER_HOME).await.unwrap();

        assert_eq!(scanner.get_device_name("123"), Some("foobar"));
        assert_eq!(scanner.get_device_name("234"), Some("Nice Name"));
        assert_eq!(scanner.get_device_name("456"), None);
        assert_eq!(scanner.get_device_name("unknown"), None);
    }

    #[tokio::test]
    async fn first_poll_api_error_leaves_scanner_empty() {
        let source = MockSource::new(vec![Err(api_error())]);

        let scanner = UnifiScanner::new(&source, Duration::from_secs(180)).await.unwrap();

        assert!(scanner.scan_devices().is_empty());
        assert_eq!(scanner.get_device_name("123"), None);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_snapshot() {
        let source = MockSource::new(vec![
            Ok(vec![record("123", None, None)]),
            Err(api_error()),
        ]);

        let mut scanner = UnifiScanner::new(&source, DEFAULT_CONSIDER_HOME).await.unwrap();
        scanner.update().await.unwrap();

        assert_eq!(scanner.scan_devices(), vec!["123".to_owned()]);
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn successful_refresh_replaces_snapshot_wholesale() {
        let source = MockSource::new(vec![
            Ok(vec![record("123", None, None), record("234", None, None)]),
            Ok(vec![record("234", None, None)]),
        ]);

        let mut scanner = UnifiScanner::new(&source, DEFAULT_CONSIDER_HOME).await.unwrap();
        scanner.update().await.unwrap();

        assert_eq!(scanner.scan_devices(), vec!["234".to_owned()]);
    }

    #[tokio::test]
    async fn non_api_error_propagates_from_construction() {
        let source = MockSource::new(vec![Err(Error::Deserialization {
            message: "expected value".into(),
            body: "not json".into(),
        })]);

        let result = UnifiScanner::new(&source, DEFAULT_CONSIDER_HOME).await;

        assert!(
            matches!(result, Err(Error::Deserialization { .. })),
            "expected Deserialization error to escape"
        );
    }
}
