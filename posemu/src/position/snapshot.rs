//! Snapshot slot shared between the sampler and readers.
//!
//! The sampler is the only writer. Each tick swaps in a whole
//! `Arc<PositionSnapshot>` under the write lock, so readers holding a clone
//! keep a consistent snapshot even while the next one is published.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use super::state::PositionSnapshot;

/// Single-writer/multi-reader slot holding the latest snapshot.
#[derive(Debug, Default)]
pub struct SnapshotState {
    current: RwLock<Option<Arc<PositionSnapshot>>>,
}

impl SnapshotState {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest published snapshot, if any.
    pub fn latest(&self) -> Option<Arc<PositionSnapshot>> {
        self.current.read().clone()
    }

    /// Replace the current snapshot unless `cancellation` has fired.
    ///
    /// The token is checked while holding the write lock. Together with
    /// [`fence`](Self::fence) this guarantees that once a stop has cancelled
    /// the token and fenced, no publication can land afterwards.
    ///
    /// Returns true if the snapshot was published.
    pub fn publish(&self, snapshot: Arc<PositionSnapshot>, cancellation: &CancellationToken) -> bool {
        let mut current = self.current.write();
        if cancellation.is_cancelled() {
            return false;
        }
        *current = Some(snapshot);
        true
    }

    /// Wait for any in-progress publication to finish.
    pub fn fence(&self) {
        drop(self.current.write());
    }
}
