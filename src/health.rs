//! Availability probe for the remote enrichment service.
//!
//! Enhanced-mode runs consult an auxiliary search-augmentation service.
//! Its health endpoint must not be hammered: the probe performs at most
//! one real check per interval and serves the cached verdict in between.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default minimum interval between real health checks.
const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(60);

/// Cached verdict from the last real check.
struct ProbeState {
    available: bool,
    checked_at: Option<Instant>,
}

/// Best-effort, interval-cached availability probe.
pub struct HealthProbe {
    client: reqwest::Client,
    endpoint: String,
    interval: Duration,
    state: Mutex<ProbeState>,
}

impl HealthProbe {
    /// Create a probe for a health endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            interval: DEFAULT_CHECK_INTERVAL,
            state: Mutex::new(ProbeState {
                available: false,
                checked_at: None,
            }),
        }
    }

    /// Set the minimum interval between real checks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Whether the service is available.
    ///
    /// Performs a real HTTP check at most once per interval; calls inside
    /// the window return the last verdict. A failed request counts as
    /// unavailable and is cached like any other verdict.
    pub async fn is_available(&self) -> bool {
        let mut state = self.state.lock().await;

        if let Some(checked_at) = state.checked_at {
            if checked_at.elapsed() < self.interval {
                return state.available;
            }
        }

        let available = match self.client.get(&self.endpoint).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "health check failed");
                false
            }
        };

        debug!(endpoint = %self.endpoint, available, "health check performed");
        state.available = available;
        state.checked_at = Some(Instant::now());
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_reports_unavailable() {
        // Reserved TEST-NET address, nothing listens there.
        let probe = HealthProbe::new("http://192.0.2.1:9/health");
        assert!(!probe.is_available().await);
    }

    #[tokio::test]
    async fn test_verdict_cached_within_interval() {
        let probe = HealthProbe::new("http://192.0.2.1:9/health")
            .with_interval(Duration::from_secs(3600));

        let first = probe.is_available().await;
        let start = Instant::now();
        let second = probe.is_available().await;

        assert_eq!(first, second);
        // The second call must not have performed a real (5s-timeout) check.
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
