use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use transcript::NegativeOutcome;

/// Counters for one `prepare` run.
pub struct RunStats {
    records: AtomicUsize,
    turns: AtomicUsize,
    positive_pairs: AtomicUsize,
    negatives_added: AtomicUsize,
    negatives_skipped: AtomicUsize,
    started: Instant,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            records: AtomicUsize::new(0),
            turns: AtomicUsize::new(0),
            positive_pairs: AtomicUsize::new(0),
            negatives_added: AtomicUsize::new(0),
            negatives_skipped: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    pub fn record(&self, entities: usize, turns: usize, outcome: &NegativeOutcome) {
        self.records.fetch_add(1, Ordering::Relaxed);
        self.turns.fetch_add(turns, Ordering::Relaxed);
        self.positive_pairs.fetch_add(entities, Ordering::Relaxed);
        match outcome {
            NegativeOutcome::Added(_) => {
                self.negatives_added.fetch_add(1, Ordering::Relaxed);
            }
            NegativeOutcome::Skipped => {
                self.negatives_skipped.fetch_add(1, Ordering::Relaxed);
            }
            NegativeOutcome::Disabled | NegativeOutcome::NotDrawn => {}
        }
    }

    pub fn records(&self) -> usize {
        self.records.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let records = self.records();
        let negatives_added = self.negatives_added.load(Ordering::Relaxed);
        StatsSnapshot {
            records,
            turns: self.turns.load(Ordering::Relaxed),
            positive_pairs: self.positive_pairs.load(Ordering::Relaxed),
            negatives_added,
            negatives_skipped: self.negatives_skipped.load(Ordering::Relaxed),
            negative_rate: if records > 0 {
                negatives_added as f64 / records as f64
            } else {
                0.0
            },
            elapsed_ms: self.elapsed().as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub records: usize,
    pub turns: usize,
    pub positive_pairs: usize,
    pub negatives_added: usize,
    pub negatives_skipped: usize,
    pub negative_rate: f64,
    pub elapsed_ms: u64,
}
