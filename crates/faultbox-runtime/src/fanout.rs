//! Loopback client that floods this service with blocking requests.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fires internal `block-thread` requests back at the local server so the
/// remaining request workers pile up on the shared lock.
#[derive(Debug, Clone)]
pub struct FanOut {
    client: reqwest::Client,
    base_url: String,
}

impl FanOut {
    /// `base_url` is the server root, e.g. `http://127.0.0.1:8080`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one internal blocking request.
    pub fn block_url(&self, seconds: u64) -> String {
        format!(
            "{}/api/test/block-thread?seconds={seconds}&internal=true",
            self.base_url
        )
    }

    /// Per-request timeout: the hold time plus a margin, at least 5 s.
    pub fn request_timeout(seconds: u64) -> Duration {
        Duration::from_secs(seconds.saturating_add(5).max(5))
    }

    /// Spawn `count` requests. Failures are only logged.
    ///
    /// The handles may be dropped; the requests keep running detached.
    pub fn spawn_block_requests(&self, count: usize, seconds: u64) -> Vec<JoinHandle<()>> {
        let url = self.block_url(seconds);
        let timeout = Self::request_timeout(seconds);

        (1..=count)
            .map(|n| {
                let client = self.client.clone();
                let url = url.clone();
                tokio::spawn(async move {
                    debug!(request = n, url = %url, "Sending internal block request");
                    match client.post(&url).timeout(timeout).send().await {
                        Ok(resp) => debug!(request = n, status = %resp.status(), "Internal block request finished"),
                        Err(e) => error!(request = n, error = %e, "Internal block request failed"),
                    }
                })
            })
            .collect()
    }
}
