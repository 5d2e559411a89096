//! Timing for a single simulation run.
//!
//! The simulator stamps the start of a run, marks each pipeline stage as it
//! finishes, and completes the timer before analysis. Throughput is derived
//! from the completed duration.
//!
//! # Thread Safety
//!
//! A `RunTimer` belongs to one run and is never shared.

use serde::Serialize;
use std::time::{Duration, Instant};

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Encode,
    Inject,
    Decode,
    Classify,
}

/// Wall-clock timing of one run.
#[derive(Debug, Clone)]
pub struct RunTimer {
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    /// Elapsed time at the end of each stage, in order
    stages: Vec<(Stage, Duration)>,
}

impl RunTimer {
    /// Create a timer started now.
    pub fn start() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            stages: Vec::with_capacity(4),
        }
    }

    /// Record that `stage` has finished.
    pub fn mark(&mut self, stage: Stage) {
        self.stages.push((stage, self.start_time.elapsed()));
    }

    /// Stop the clock.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Stages completed so far.
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.stages.iter().map(|(stage, _)| *stage)
    }

    /// Time spent inside `stage`, if it ran.
    pub fn stage_duration(&self, stage: Stage) -> Option<Duration> {
        let idx = self.stages.iter().position(|(s, _)| *s == stage)?;
        let end = self.stages[idx].1;
        let begin = if idx == 0 {
            Duration::ZERO
        } else {
            self.stages[idx - 1].1
        };
        Some(end.saturating_sub(begin))
    }
}

/// `bytes · 8 / seconds`, or 0 when no time elapsed.
pub fn throughput_bps(bytes: usize, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        0.0
    } else {
        bytes as f64 * 8.0 / secs
    }
}
