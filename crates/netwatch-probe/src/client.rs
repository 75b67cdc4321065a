// Connectivity probe HTTP client
//
// Wraps `reqwest::Client` with the two measurements netwatch needs: a
// concurrent HEAD round against a fixed endpoint set, and a single
// download speed test. Nothing here touches shared monitor state.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::report::{ReachabilityReport, SpeedSample, duration_ms, throughput_mbps};
use crate::transport::TransportConfig;

const CACHE_BUST_PARAM: &str = "_nw";

/// Targets for the heavier download speed test.
#[derive(Debug, Clone)]
pub struct SpeedTestTarget {
    /// HEAD-probed first to measure round-trip latency.
    pub latency_url: Url,
    /// Fixed-size payload (order of 100 KB).
    pub download_url: Url,
    pub timeout: Duration,
}

/// HTTP client performing reachability rounds and speed tests.
///
/// Cheaply cloneable; clones share the in-flight guard, so at most one
/// reachability round runs at a time across all of them.
#[derive(Debug, Clone)]
pub struct ProbeClient {
    http: reqwest::Client,
    endpoints: Arc<[Url]>,
    speed_test: SpeedTestTarget,
    in_flight: Arc<AtomicBool>,
}

impl ProbeClient {
    /// Create a probe client from a `TransportConfig`.
    pub fn new(
        endpoints: Vec<Url>,
        speed_test: SpeedTestTarget,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, endpoints, speed_test))
    }

    /// Create a probe client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        endpoints: Vec<Url>,
        speed_test: SpeedTestTarget,
    ) -> Self {
        Self {
            http,
            endpoints: endpoints.into(),
            speed_test,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The configured reachability endpoints.
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    /// Whether a reachability round is currently running.
    pub fn is_probing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one reachability round against every endpoint concurrently.
    ///
    /// Returns `None` without touching the network if another round is
    /// already in flight. Any completed response counts as a success,
    /// whatever its status code; only transport errors and timeouts count
    /// as losses.
    pub async fn check_reachability(&self) -> Option<ReachabilityReport> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            trace!("reachability round already in flight, skipping");
            return None;
        };

        let started = Instant::now();
        let mut pending: FuturesUnordered<_> = self
            .endpoints
            .iter()
            .map(|endpoint| {
                let request = self.http.head(cache_busted(endpoint));
                async move { (endpoint, request.send().await) }
            })
            .collect();

        let mut successes = 0usize;
        let mut first_success: Option<Duration> = None;
        while let Some((endpoint, result)) = pending.next().await {
            match result {
                Ok(resp) => {
                    successes += 1;
                    let elapsed = *first_success.get_or_insert_with(|| started.elapsed());
                    trace!(
                        endpoint = %endpoint,
                        status = resp.status().as_u16(),
                        first_ms = duration_ms(elapsed),
                        "probe endpoint reachable"
                    );
                }
                Err(e) => {
                    debug!(endpoint = %endpoint, error = %e, "probe endpoint unreachable");
                }
            }
        }

        let latency = first_success.unwrap_or_else(|| started.elapsed());
        let report = ReachabilityReport::from_counts(successes, self.endpoints.len(), latency);
        debug!(
            latency_ms = report.latency_ms,
            reliability = report.reliability_pct,
            successes,
            total = report.total,
            "reachability round complete"
        );
        Some(report)
    }

    /// Measure round-trip latency, then download the reference payload.
    pub async fn speed_test(&self) -> Result<SpeedSample, Error> {
        let target = &self.speed_test;
        let timeout_secs = target.timeout.as_secs();

        let started = Instant::now();
        self.http
            .head(cache_busted(&target.latency_url))
            .timeout(target.timeout)
            .send()
            .await
            .map_err(|e| Error::from_send(e, timeout_secs))?;
        let latency_ms = duration_ms(started.elapsed());

        let started = Instant::now();
        let body = self
            .http
            .get(cache_busted(&target.download_url))
            .timeout(target.timeout)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| Error::from_send(e, timeout_secs))?
            .bytes()
            .await
            .map_err(|e| Error::from_send(e, timeout_secs))?;
        let elapsed = started.elapsed();

        if body.is_empty() {
            return Err(Error::EmptyPayload);
        }

        let sample = SpeedSample {
            latency_ms,
            download_mbps: throughput_mbps(body.len(), elapsed),
            bytes: body.len(),
        };
        debug!(
            latency_ms = sample.latency_ms,
            download_mbps = sample.download_mbps,
            bytes = sample.bytes,
            "speed test complete"
        );
        Ok(sample)
    }
}

/// Append a timestamp query parameter so intermediaries never answer from
/// cache.
fn cache_busted(url: &Url) -> Url {
    let mut url = url.clone();
    url.query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &Utc::now().timestamp_millis().to_string());
    url
}

/// Holds the in-flight flag for the lifetime of one round. Dropping the
/// round future (cancellation) releases it too.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
