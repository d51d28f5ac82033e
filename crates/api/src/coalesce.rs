//! Per-sequence coalescing of concurrent completion requests.
//!
//! Filling the poses of a sequence is expensive (a model round-trip plus a
//! multi-table write), and clients retry eagerly. The guard ensures at most
//! one completion runs per sequence id: the first caller becomes the owner
//! and does the work, every concurrent caller becomes a follower and waits
//! for the owner's outcome. The outcome stays available for a short grace
//! period after completion so stragglers that raced the finish still get
//! the result instead of kicking off a duplicate run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use yogaflow_core::types::DbId;

/// How long a finished outcome stays observable before the slot is evicted
/// and a new owner may start.
pub const EVICT_AFTER: Duration = Duration::from_secs(5);

/// `None` while the owner is still working.
type Outcome = Option<Result<serde_json::Value, String>>;

/// Tracks in-flight completions keyed by sequence id.
#[derive(Default)]
pub struct CompletionGuard {
    slots: Mutex<HashMap<DbId, watch::Receiver<Outcome>>>,
}

/// Result of [`CompletionGuard::begin`].
pub enum Begin {
    /// This caller runs the completion and must call
    /// [`CompletionSlot::finish`] with the outcome.
    Owner(CompletionSlot),
    /// Another caller owns the completion; wait on the receiver via
    /// [`wait_for_outcome`].
    Follower(watch::Receiver<Outcome>),
}

impl CompletionGuard {
    /// Claim the completion slot for a sequence, or join the in-flight one.
    pub fn begin(self: &Arc<Self>, sequence_id: DbId) -> Begin {
        let mut slots = self.slots.lock().expect("completion guard poisoned");
        if let Some(rx) = slots.get(&sequence_id) {
            return Begin::Follower(rx.clone());
        }

        let (tx, rx) = watch::channel(None);
        slots.insert(sequence_id, rx);
        Begin::Owner(CompletionSlot {
            guard: Arc::clone(self),
            sequence_id,
            tx: Some(tx),
        })
    }

    /// Remove the slot for `sequence_id`, but only if it still belongs to
    /// the generation `rx` was created for.
    fn evict(&self, sequence_id: DbId, rx: &watch::Receiver<Outcome>) {
        let mut slots = self.slots.lock().expect("completion guard poisoned");
        if let Some(current) = slots.get(&sequence_id) {
            if current.same_channel(rx) {
                slots.remove(&sequence_id);
            }
        }
    }
}

/// Exclusive handle held by the owner of an in-flight completion.
///
/// Dropping the slot without calling [`finish`](Self::finish) (owner
/// errored out or panicked) evicts it immediately and closes the channel,
/// so followers fail fast instead of waiting forever.
pub struct CompletionSlot {
    guard: Arc<CompletionGuard>,
    sequence_id: DbId,
    tx: Option<watch::Sender<Outcome>>,
}

impl CompletionSlot {
    /// Publish the outcome to all followers. The slot stays occupied for
    /// [`EVICT_AFTER`] so stragglers observe the same outcome.
    pub fn finish(mut self, outcome: Result<serde_json::Value, String>) {
        if let Some(tx) = self.tx.take() {
            // Followers hold receivers; send only fails when there are
            // none, which is fine.
            let _ = tx.send(Some(outcome));

            let guard = Arc::clone(&self.guard);
            let sequence_id = self.sequence_id;
            let rx = tx.subscribe();
            tokio::spawn(async move {
                tokio::time::sleep(EVICT_AFTER).await;
                guard.evict(sequence_id, &rx);
                // `tx` lives inside `rx`'s channel until eviction.
                drop(tx);
            });
        }
    }
}

impl Drop for CompletionSlot {
    fn drop(&mut self) {
        // Unfinished owner: free the slot now so a retry can take over.
        if let Some(tx) = self.tx.take() {
            let rx = tx.subscribe();
            self.guard.evict(self.sequence_id, &rx);
        }
    }
}

/// Wait for the owner's outcome on a follower receiver.
///
/// Returns the error message `"generation was interrupted"` when the owner
/// dropped its slot without finishing.
pub async fn wait_for_outcome(
    mut rx: watch::Receiver<Outcome>,
) -> Result<serde_json::Value, String> {
    loop {
        let current = rx.borrow().clone();
        if let Some(outcome) = current {
            return outcome;
        }
        if rx.changed().await.is_err() {
            return Err("generation was interrupted".to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn guard() -> Arc<CompletionGuard> {
        Arc::new(CompletionGuard::default())
    }

    #[tokio::test(start_paused = true)]
    async fn second_caller_becomes_follower() {
        let guard = guard();
        let owner = match guard.begin(1) {
            Begin::Owner(slot) => slot,
            Begin::Follower(_) => panic!("first caller must own the slot"),
        };
        let follower = match guard.begin(1) {
            Begin::Follower(rx) => rx,
            Begin::Owner(_) => panic!("second caller must follow"),
        };

        owner.finish(Ok(json!({"id": 1})));
        let outcome = wait_for_outcome(follower).await.unwrap();
        assert_eq!(outcome, json!({"id": 1}));
    }

    #[tokio::test(start_paused = true)]
    async fn different_sequences_do_not_contend() {
        let guard = guard();
        let a = guard.begin(1);
        let b = guard.begin(2);
        assert!(matches!(a, Begin::Owner(_)));
        assert!(matches!(b, Begin::Owner(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn outcome_stays_available_during_grace_period() {
        let guard = guard();
        let Begin::Owner(owner) = guard.begin(7) else {
            panic!("expected owner");
        };
        owner.finish(Err("model unavailable".to_string()));

        // A straggler inside the grace period joins the finished slot.
        let Begin::Follower(rx) = guard.begin(7) else {
            panic!("expected follower during grace period");
        };
        assert_eq!(
            wait_for_outcome(rx).await.unwrap_err(),
            "model unavailable"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn slot_is_evicted_after_grace_period() {
        let guard = guard();
        let Begin::Owner(owner) = guard.begin(7) else {
            panic!("expected owner");
        };
        owner.finish(Ok(json!({})));

        tokio::time::sleep(EVICT_AFTER + Duration::from_millis(100)).await;
        assert!(matches!(guard.begin(7), Begin::Owner(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_owner_frees_slot_and_fails_followers() {
        let guard = guard();
        let Begin::Owner(owner) = guard.begin(3) else {
            panic!("expected owner");
        };
        let Begin::Follower(rx) = guard.begin(3) else {
            panic!("expected follower");
        };

        drop(owner);
        assert_eq!(
            wait_for_outcome(rx).await.unwrap_err(),
            "generation was interrupted"
        );
        assert!(matches!(guard.begin(3), Begin::Owner(_)));
    }
}
