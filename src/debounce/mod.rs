//! Per-field debounce timers.
//!
//! A `Debouncer` keeps at most one armed timer per field. Scheduling again
//! for the same field cancels the previous timer, so a burst of edits fires
//! a single action once input has been quiet for the configured delay.

use crate::field::FieldId;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct ScheduledTask {
    /// Distinguishes this arming from later ones for the same field.
    generation: u64,
    cancel: CancellationToken,
}

/// Cancellable per-field timers.
///
/// Must be used from within a Tokio runtime: every armed timer runs on its
/// own spawned task. Dropping the debouncer cancels all pending timers.
pub struct Debouncer {
    tasks: Arc<DashMap<FieldId, ScheduledTask>>,
    next_generation: AtomicU64,
}

impl Debouncer {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(DashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Arm a timer for `field_id`, replacing any timer already armed for it.
    ///
    /// `action` runs exactly once, on the timer task, after `delay` elapses
    /// without a `cancel` or a newer `schedule` for the same field. Nothing
    /// runs synchronously inside this call.
    pub fn schedule<F>(&self, field_id: FieldId, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel(field_id);

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let deadline = tokio::time::Instant::now() + delay;
        let cancel = CancellationToken::new();
        self.tasks.insert(
            field_id,
            ScheduledTask {
                generation,
                cancel: cancel.clone(),
            },
        );

        tracing::trace!(
            field_id = %field_id,
            delay_ms = delay.as_millis() as u64,
            "Debounce timer armed"
        );

        let tasks = Arc::clone(&self.tasks);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep_until(deadline) => {
                    // A cancel or re-schedule that raced with the sleep has
                    // already removed or replaced our entry.
                    let still_armed = tasks
                        .remove_if(&field_id, |_, task| task.generation == generation)
                        .is_some();
                    if still_armed {
                        tracing::trace!(field_id = %field_id, "Debounce timer fired");
                        action();
                    }
                }
            }
        });
    }

    /// Disarm the timer for `field_id`. No-op when none is armed.
    pub fn cancel(&self, field_id: FieldId) {
        if let Some((_, task)) = self.tasks.remove(&field_id) {
            task.cancel.cancel();
            tracing::trace!(field_id = %field_id, "Debounce timer cancelled");
        }
    }

    /// Disarm every timer.
    pub fn cancel_all(&self) {
        let ids: Vec<FieldId> = self.tasks.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            self.cancel(id);
        }
    }

    pub fn is_pending(&self, field_id: FieldId) -> bool {
        self.tasks.contains_key(&field_id)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("pending", &self.tasks.len())
            .finish()
    }
}
