use bravepipe_core::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Mutex;
use url::Url;

/// Minimum wall-clock gap between two accepted calls to the same endpoint.
pub const MIN_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, Clone, Default)]
struct EndpointTracker {
    last_call_ms: u64,
    call_count: u64,
}

/// Per-endpoint call-rate limiter.
///
/// Owned and injected rather than process-global: production code and tests
/// each construct their own instance, and `reset` restores the empty state
/// without a process restart. Trackers are created lazily with
/// `last_call_ms = 0` and live as long as the limiter does.
#[derive(Debug, Default)]
pub struct RateLimiter {
    trackers: Mutex<BTreeMap<String, EndpointTracker>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit or reject a call to `endpoint` at wall-clock time `now_ms`.
    ///
    /// The read of the previous call time and the commit of the new one
    /// happen under a single lock hold; a suspension point between them
    /// would let two in-flight calls both pass the check.
    pub fn check(&self, endpoint: &str, now_ms: u64) -> Result<()> {
        let mut trackers = self.trackers.lock().unwrap_or_else(|e| e.into_inner());
        let tracker = trackers.entry(endpoint.to_string()).or_default();
        if now_ms.saturating_sub(tracker.last_call_ms) < MIN_INTERVAL_MS {
            return Err(Error::RateLimited {
                endpoint: endpoint.to_string(),
            });
        }
        tracker.last_call_ms = now_ms;
        tracker.call_count += 1;
        Ok(())
    }

    /// Accepted-call count for `endpoint` (0 if never seen).
    pub fn call_count(&self, endpoint: &str) -> u64 {
        self.trackers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(endpoint)
            .map(|t| t.call_count)
            .unwrap_or(0)
    }

    /// Drop all trackers, restoring the just-constructed state.
    pub fn reset(&self) {
        self.trackers
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Derive the rate-limit bucket key for a request URL: the last two
/// non-empty path segments joined by `/`. Query strings do not participate,
/// so `web/search?q=a` and `web/search?q=b` share one budget.
pub fn endpoint_id(url: &Url) -> String {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();
    let start = segments.len().saturating_sub(2);
    segments[start..].join("/")
}
