//! Result analysis: channel statistics and correction-capacity metrics.
//!
//! Everything here is a pure function of a finished run's artifacts. Lists
//! are truncated for reporting (20 positions, 10 detailed events) but every
//! count and ratio is computed from the full data.

use crate::channel::ErrorEvent;
use crate::metrics;
use serde::Serialize;
use std::time::Duration;

/// Most corrupted positions listed in a distribution.
pub const MAX_REPORTED_POSITIONS: usize = 20;

/// Most detailed error events listed in an analysis.
pub const MAX_REPORTED_EVENTS: usize = 10;

/// Artifacts of a completed run the analyzer needs.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInput<'a> {
    pub codeword_len: usize,
    pub nsym: usize,
    pub channel_label: &'a str,
    pub requested_rate: f64,
    pub events: &'a [ErrorEvent],
    pub errors_corrected: usize,
    pub elapsed: Duration,
}

/// Where the channel hit the block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDistribution {
    pub total: usize,
    pub density: f64,
    /// First corrupted positions, capped at [`MAX_REPORTED_POSITIONS`]
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelAnalysis {
    /// Free-form channel label supplied by the caller
    #[serde(rename = "type")]
    pub label: String,
    pub error_rate_actual: f64,
    pub error_distribution: ErrorDistribution,
    /// Requested rate in percent
    pub noise_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionAnalysis {
    pub capacity_utilization: f64,
    pub efficiency: f64,
    /// Percent of injected errors the decoder corrected
    pub success_rate: f64,
}

/// Derived statistics for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub channel: ChannelAnalysis,
    pub correction: CorrectionAnalysis,
    /// First events in position order, capped at [`MAX_REPORTED_EVENTS`]
    pub errors: Vec<ErrorEvent>,
    pub throughput_bps: f64,
}

/// Compute the statistics block for a finished run.
pub fn analyze(input: AnalysisInput<'_>) -> Analysis {
    let total = input.events.len();
    let density = error_density(total, input.codeword_len);

    let positions = input
        .events
        .iter()
        .take(MAX_REPORTED_POSITIONS)
        .map(|e| e.position)
        .collect();

    Analysis {
        channel: ChannelAnalysis {
            label: input.channel_label.to_string(),
            error_rate_actual: density,
            error_distribution: ErrorDistribution {
                total,
                density,
                positions,
            },
            noise_level: input.requested_rate * 100.0,
        },
        correction: CorrectionAnalysis {
            capacity_utilization: capacity_utilization(input.errors_corrected, input.nsym),
            efficiency: efficiency(input.errors_corrected, total),
            success_rate: success_rate(input.errors_corrected, total),
        },
        errors: input
            .events
            .iter()
            .take(MAX_REPORTED_EVENTS)
            .cloned()
            .collect(),
        throughput_bps: metrics::throughput_bps(input.codeword_len, input.elapsed),
    }
}

/// Injected errors per codeword byte. 0 for an empty block.
pub fn error_density(error_count: usize, codeword_len: usize) -> f64 {
    if codeword_len == 0 {
        0.0
    } else {
        error_count as f64 / codeword_len as f64
    }
}

/// `corrected / floor(nsym / 2)`, 0 when the code cannot correct any
/// unknown error.
pub fn capacity_utilization(errors_corrected: usize, nsym: usize) -> f64 {
    let capacity = nsym / 2;
    if capacity == 0 {
        0.0
    } else {
        errors_corrected as f64 / capacity as f64
    }
}

/// `corrected / max(1, injected)`.
pub fn efficiency(errors_corrected: usize, error_count: usize) -> f64 {
    errors_corrected as f64 / error_count.max(1) as f64
}

/// [`efficiency`] in percent.
pub fn success_rate(errors_corrected: usize, error_count: usize) -> f64 {
    efficiency(errors_corrected, error_count) * 100.0
}
