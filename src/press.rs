//! Long-press / short-press resolution
//!
//! Each control is either idle or has one pending timer. A press arms the
//! timer; a release before the threshold cancels it and counts as a short
//! press. A release at or after the threshold is a long press even if the
//! timer task has not run yet. Whoever removes the entry first runs the
//! long-press callback, so it runs at most once per press.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

type LongPressFn = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

struct Pending {
    generation: u64,
    pressed_at: Instant,
    cancel: CancellationToken,
    on_long_press: LongPressFn,
}

/// How a press ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Released {
    /// Released before the threshold; the timer was cancelled
    Short,
    /// Released at or after the threshold; the long-press callback ran
    Long,
    /// Nothing was pending (never pressed, or the timer already fired)
    Idle,
}

#[derive(Default)]
struct TimerTable {
    next_generation: u64,
    pending: HashMap<String, Pending>,
}

/// Per-control long-press timers keyed by control identity
#[derive(Clone)]
pub struct LongPressTimers {
    threshold: Duration,
    table: Arc<Mutex<TimerTable>>,
}

impl LongPressTimers {
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            table: Arc::new(Mutex::new(TimerTable::default())),
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    fn table(&self) -> std::sync::MutexGuard<'_, TimerTable> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Press started: arm the timer for `id`.
    ///
    /// `on_long_press` runs if no matching [`release`](Self::release) arrives
    /// within the threshold. Pressing an already pending control re-arms it.
    pub fn press<F, Fut>(&self, id: &str, on_long_press: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let callback: LongPressFn =
            Box::new(move || -> Pin<Box<dyn Future<Output = ()> + Send>> {
                Box::pin(on_long_press())
            });
        let generation = {
            let mut table = self.table();
            table.next_generation += 1;
            let generation = table.next_generation;
            if let Some(previous) = table.pending.insert(
                id.to_string(),
                Pending {
                    generation,
                    pressed_at: Instant::now(),
                    cancel: cancel.clone(),
                    on_long_press: callback,
                },
            ) {
                previous.cancel.cancel();
            }
            generation
        };

        let table = Arc::clone(&self.table);
        let threshold = self.threshold;
        let id = id.to_string();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(threshold) => {
                    let fired = {
                        let mut table = table.lock().unwrap_or_else(|e| e.into_inner());
                        match table.pending.get(&id) {
                            Some(p) if p.generation == generation => table.pending.remove(&id),
                            _ => None,
                        }
                    };
                    if let Some(pending) = fired {
                        debug!("{}: long press after {:?}", id, threshold);
                        (pending.on_long_press)().await;
                    }
                }
            }
        });
    }

    /// Press ended.
    ///
    /// A release that lands on or past the threshold before the timer task
    /// got to run still counts as a long press and runs the callback here.
    pub async fn release(&self, id: &str) -> Released {
        let removed = self.table().pending.remove(id);
        let Some(pending) = removed else {
            return Released::Idle;
        };
        pending.cancel.cancel();

        let held = pending.pressed_at.elapsed();
        if held < self.threshold {
            return Released::Short;
        }
        debug!("{}: released after {:?}, long press", id, held);
        (pending.on_long_press)().await;
        Released::Long
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.table().pending.contains_key(id)
    }

    pub fn pending_count(&self) -> usize {
        self.table().pending.len()
    }
}
