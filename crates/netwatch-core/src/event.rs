// ── Platform connectivity events ──
//
// Hosts that can observe OS-level connectivity changes translate them
// into these events and feed them to the monitor, either one at a time
// via `NetworkMonitor::handle_event` or as a stream via
// `NetworkMonitor::attach_event_source`. Without a source the monitor
// runs probe-only.

use serde::{Deserialize, Serialize};

use crate::model::LinkInfo;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConnectivityEvent {
    /// The platform regained connectivity.
    Online,
    /// The platform lost connectivity. Always applied immediately, ahead
    /// of any probe round still in flight.
    Offline,
    /// Link type, downlink or RTT estimate changed. Never changes online
    /// status by itself.
    LinkChanged(LinkInfo),
}
