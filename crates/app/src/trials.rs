//! Batch trials: many independent runs of one configuration.
//!
//! Trial `i` uses seed `base_seed + i` (wrapping) and owns its generator,
//! so trials run in parallel on the rayon pool and the aggregate is the same
//! regardless of scheduling.

use fec_sim_core::{simulate, Result, SimulationReport, SimulationRequest};
use rayon::prelude::*;
use serde::Serialize;

/// Aggregate statistics over a batch of runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialSummary {
    pub runs: usize,
    pub base_seed: u64,

    /// Runs where the decoder returned a block
    pub decoder_successes: usize,

    /// Runs where the returned block equals the message
    pub content_matches: usize,

    pub mean_errors_introduced: f64,
    pub mean_errors_corrected: f64,

    /// decoder_successes / runs
    pub decoder_success_ratio: f64,
}

impl TrialSummary {
    pub fn from_reports(base_seed: u64, reports: &[SimulationReport]) -> Self {
        let runs = reports.len();
        let decoder_successes = reports.iter().filter(|r| r.outcome.succeeded).count();
        let content_matches = reports.iter().filter(|r| r.outcome.matches_original).count();
        let introduced: usize = reports.iter().map(|r| r.summary.errors_introduced).sum();
        let corrected: usize = reports.iter().map(|r| r.summary.errors_corrected).sum();

        Self {
            runs,
            base_seed,
            decoder_successes,
            content_matches,
            mean_errors_introduced: mean(introduced, runs),
            mean_errors_corrected: mean(corrected, runs),
            decoder_success_ratio: mean(decoder_successes, runs),
        }
    }

    /// Runs where the decoder returned a block that is not the message.
    pub fn miscorrections(&self) -> usize {
        self.decoder_successes - self.content_matches
    }

    pub fn print(&self) {
        println!("\n=== Trial Summary ===");
        println!("Runs: {} (seeds {}..)", self.runs, self.base_seed);
        println!(
            "Decoder successes: {} ({:.2}%)",
            self.decoder_successes,
            self.decoder_success_ratio * 100.0
        );
        println!("Content matches: {}", self.content_matches);
        println!("Miscorrections: {}", self.miscorrections());
        println!("Mean errors introduced: {:.2}", self.mean_errors_introduced);
        println!("Mean errors corrected: {:.2}", self.mean_errors_corrected);
        println!();
    }
}

fn mean(total: usize, runs: usize) -> f64 {
    if runs == 0 {
        0.0
    } else {
        total as f64 / runs as f64
    }
}

/// Run `trials` copies of `base` with consecutive seeds.
pub fn run_trials(base: &SimulationRequest, trials: usize) -> Result<TrialSummary> {
    let reports: Vec<SimulationReport> = (0..trials as u64)
        .into_par_iter()
        .map(|i| simulate(&base.clone().with_seed(base.seed.wrapping_add(i))))
        .collect::<Result<_>>()?;

    tracing::info!(trials, base_seed = base.seed, "trials finished");

    Ok(TrialSummary::from_reports(base.seed, &reports))
}
