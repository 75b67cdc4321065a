// ── Reactive snapshot stream ──
//
// Subscription type for consuming monitor updates.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::store::MonitorSnapshot;

/// A subscription to monitor snapshots.
///
/// Provides both point-in-time access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct MonitorStream {
    current: MonitorSnapshot,
    receiver: watch::Receiver<MonitorSnapshot>,
}

impl MonitorStream {
    pub(crate) fn new(mut receiver: watch::Receiver<MonitorSnapshot>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation or by the last `changed()`.
    pub fn current(&self) -> &MonitorSnapshot {
        &self.current
    }

    /// The latest snapshot (may have changed since `current`).
    pub fn latest(&self) -> MonitorSnapshot {
        self.receiver.borrow().clone()
    }

    /// Wait for the next update batch, returning the new snapshot.
    /// Returns `None` once the monitor has been dropped.
    pub async fn changed(&mut self) -> Option<MonitorSnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    /// The first item is the current snapshot.
    pub fn into_stream(self) -> SnapshotWatchStream {
        SnapshotWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct SnapshotWatchStream {
    inner: WatchStream<MonitorSnapshot>,
}

impl Stream for SnapshotWatchStream {
    type Item = MonitorSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
