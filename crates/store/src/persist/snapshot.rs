//! Sequenced background snapshot pump.
//!
//! Each store owns one [`SnapshotWriter`]. Mutators allocate a sequence
//! number inside their atomic update, capture the post-update state, and
//! enqueue it here; they return without waiting for I/O. A single spawned
//! task drains the queue, coalesces bursts down to the newest pending
//! snapshot, and refuses any payload older than one already written.
//!
//! The sequence numbers make the write path safe under racing mutations:
//! because a sequence is allocated while the state lock is held, a higher
//! sequence always carries newer state, so "skip anything at or below the
//! last written sequence" guarantees the durable blob never regresses.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, warn};

use super::PersistenceAdapter;

/// Sequence number for a snapshot. Allocated under the owning store's
/// state lock; strictly increasing per writer.
pub type SnapshotSeq = u64;

struct Command {
    seq: SnapshotSeq,
    op: Op,
}

enum Op {
    Save(serde_json::Value),
    Remove,
    /// Advance the handled watermark without touching storage. Used when
    /// a payload failed to serialize, so `flushed` never stalls.
    Skip,
}

/// Fire-and-forget snapshot writer for one persistence key.
#[derive(Debug)]
pub struct SnapshotWriter {
    key: &'static str,
    tx: mpsc::UnboundedSender<Command>,
    last_allocated: AtomicU64,
    handled: watch::Receiver<SnapshotSeq>,
}

impl SnapshotWriter {
    /// Spawn the pump task for `key` on the given backend.
    ///
    /// Must run inside a Tokio runtime (the stores are hydrated from one).
    #[must_use]
    pub fn spawn(adapter: Arc<dyn PersistenceAdapter>, key: &'static str) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (handled_tx, handled) = watch::channel(0);
        tokio::spawn(pump(adapter, key, rx, handled_tx));
        Self {
            key,
            tx,
            last_allocated: AtomicU64::new(0),
            handled,
        }
    }

    /// Allocate the next sequence number.
    ///
    /// Must be called inside the owning store's atomic update so that
    /// sequence order matches state order.
    #[must_use]
    pub fn allocate_seq(&self) -> SnapshotSeq {
        self.last_allocated.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Enqueue a snapshot of `state` for sequence `seq`.
    pub fn save(&self, seq: SnapshotSeq, state: &impl Serialize) {
        let op = match serde_json::to_value(state) {
            Ok(value) => Op::Save(value),
            Err(e) => {
                error!(key = self.key, error = %e, "Failed to serialize snapshot");
                Op::Skip
            }
        };
        self.enqueue(Command { seq, op });
    }

    /// Enqueue deletion of the stored blob for sequence `seq`.
    pub fn remove(&self, seq: SnapshotSeq) {
        self.enqueue(Command { seq, op: Op::Remove });
    }

    /// Wait until every snapshot enqueued so far has been handled.
    ///
    /// Only tests and orderly shutdown call this; the mutation path never
    /// waits on storage.
    pub async fn flushed(&self) {
        let target = self.last_allocated.load(Ordering::Acquire);
        let mut handled = self.handled.clone();
        while *handled.borrow_and_update() < target {
            if handled.changed().await.is_err() {
                // Pump is gone; nothing more will land.
                return;
            }
        }
    }

    fn enqueue(&self, command: Command) {
        if self.tx.send(command).is_err() {
            error!(key = self.key, "Snapshot pump is gone, dropping snapshot");
        }
    }
}

async fn pump(
    adapter: Arc<dyn PersistenceAdapter>,
    key: &'static str,
    mut rx: mpsc::UnboundedReceiver<Command>,
    handled_tx: watch::Sender<SnapshotSeq>,
) {
    let mut last_written: SnapshotSeq = 0;
    while let Some(mut command) = rx.recv().await {
        // Coalesce a burst of queued snapshots down to the newest one;
        // every payload is the full state, so the newest wins.
        while let Ok(newer) = rx.try_recv() {
            if newer.seq > command.seq {
                command = newer;
            }
        }

        if command.seq > last_written {
            match command.op {
                Op::Save(value) => {
                    if let Err(e) = adapter.save(key, &value).await {
                        warn!(key, seq = command.seq, error = %e, "Snapshot write failed, in-memory state unaffected");
                    }
                }
                Op::Remove => {
                    if let Err(e) = adapter.remove(key).await {
                        warn!(key, seq = command.seq, error = %e, "Snapshot delete failed");
                    }
                }
                Op::Skip => {}
            }
            last_written = command.seq;
        } else {
            debug!(key, seq = command.seq, last_written, "Dropped stale snapshot");
        }
        handled_tx.send_replace(last_written.max(command.seq));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;

    #[tokio::test]
    async fn test_snapshots_land_in_sequence_order() {
        let adapter = Arc::new(MemoryStore::new());
        let writer = SnapshotWriter::spawn(adapter.clone(), "cart");

        let seq1 = writer.allocate_seq();
        let seq2 = writer.allocate_seq();
        writer.save(seq1, &serde_json::json!({ "v": 1 }));
        writer.save(seq2, &serde_json::json!({ "v": 2 }));
        writer.flushed().await;

        assert_eq!(
            adapter.load("cart").await,
            Some(serde_json::json!({ "v": 2 }))
        );
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_rejected() {
        let adapter = Arc::new(MemoryStore::new());
        let writer = SnapshotWriter::spawn(adapter.clone(), "cart");

        let seq1 = writer.allocate_seq();
        let seq2 = writer.allocate_seq();
        // Enqueue out of order, as racing mutators can.
        writer.save(seq2, &serde_json::json!({ "v": 2 }));
        writer.flushed().await;
        writer.save(seq1, &serde_json::json!({ "v": 1 }));
        writer.flushed().await;

        assert_eq!(
            adapter.load("cart").await,
            Some(serde_json::json!({ "v": 2 }))
        );
    }

    #[tokio::test]
    async fn test_remove_flows_through_sequence() {
        let adapter = Arc::new(MemoryStore::new());
        let writer = SnapshotWriter::spawn(adapter.clone(), "session");

        let seq1 = writer.allocate_seq();
        writer.save(seq1, &serde_json::json!({ "full_name": "Ada" }));
        writer.flushed().await;

        let seq2 = writer.allocate_seq();
        writer.remove(seq2);
        writer.flushed().await;

        assert_eq!(adapter.load("session").await, None);
    }

    #[tokio::test]
    async fn test_save_failure_is_swallowed() {
        let adapter = Arc::new(MemoryStore::new());
        adapter.fail_saves(true);
        let writer = SnapshotWriter::spawn(adapter.clone(), "cart");

        let seq = writer.allocate_seq();
        writer.save(seq, &serde_json::json!({ "v": 1 }));
        // Must complete despite the backend failing.
        writer.flushed().await;
        assert_eq!(adapter.load("cart").await, None);
    }
}
