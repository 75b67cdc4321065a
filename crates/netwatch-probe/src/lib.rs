//! Connectivity probes for the netwatch monitor.
//!
//! [`ProbeClient`] performs the only network I/O in the workspace:
//! concurrent HEAD reachability rounds ([`ReachabilityReport`]) and a
//! heavier download speed test ([`SpeedSample`]). Interpretation of the
//! numbers lives in `netwatch-core`.

pub mod client;
pub mod error;
pub mod report;
pub mod transport;

pub use client::{ProbeClient, SpeedTestTarget};
pub use error::Error;
pub use report::{ReachabilityReport, SpeedSample, throughput_mbps};
pub use transport::{TlsMode, TransportConfig};
