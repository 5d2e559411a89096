//! Simulation report: the single output artifact of a run.
//!
//! A report is assembled once, after classification and analysis, and never
//! mutated. It carries the raw artifacts (message, codeword, corrupted block,
//! full event log, decode outcome) alongside the derived blocks.
//!
//! # Output Formats
//!
//! - `to_json()`: pretty JSON via serde; byte buffers as lowercase hex
//! - `export_text()`: `key=value` lines for scripting and tests
//! - `print_summary()` / `print_result()`: human-readable stdout output

use crate::analysis::Analysis;
use crate::channel::{ErrorEvent, ErrorModel, Injection};
use crate::codec::CodeParameters;
use crate::error::Result;
use crate::metrics::{RunTimer, Stage};
use crate::simulator::{DecodeOutcome, SimulationRequest};
use serde::{Serialize, Serializer};
use std::fmt::Display;

/// Overall status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// The decoder returned a block
    Success,
    /// The channel exceeded the code's capacity
    Partial,
}

/// Headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub was_successful: bool,
    pub data_recovered: bool,
    #[serde(serialize_with = "serialize_round2")]
    pub success_rate: f64,
    pub errors_introduced: usize,
    pub errors_corrected: usize,
    /// introduced - corrected, floored at 0
    pub errors_remaining: usize,
    pub max_correctable: usize,
}

/// What was sent and how noisy the channel was asked to be.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transmission {
    pub original_size: usize,
    pub encoded_size: usize,
    pub channel_type: String,
    pub error_type: ErrorModel,
    pub error_rate_requested: f64,
    pub error_rate_actual: f64,
    /// Requested rate in percent
    pub noise_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Performance {
    #[serde(serialize_with = "serialize_round2")]
    pub processing_time_ms: f64,
    pub bytes_processed: usize,
    pub throughput_bps: f64,
}

/// Complete result of one simulation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub status: ReportStatus,
    pub seed: u64,
    pub stages: Vec<Stage>,

    #[serde(serialize_with = "serialize_hex")]
    pub message: Vec<u8>,
    #[serde(serialize_with = "serialize_hex")]
    pub codeword: Vec<u8>,
    #[serde(serialize_with = "serialize_hex")]
    pub corrupted: Vec<u8>,

    /// Every injected error, in position order
    pub events: Vec<ErrorEvent>,

    pub outcome: DecodeOutcome,
    pub parameters: CodeParameters,
    pub summary: Summary,
    pub transmission: Transmission,
    pub performance: Performance,
    pub analysis: Analysis,
}

/// Pieces the simulator hands over once a run is finished.
pub(crate) struct RunArtifacts<'a> {
    pub request: &'a SimulationRequest,
    pub parameters: CodeParameters,
    pub codeword: Vec<u8>,
    pub injection: Injection,
    pub outcome: DecodeOutcome,
    pub analysis: Analysis,
    pub timer: &'a RunTimer,
}

pub(crate) fn assemble(artifacts: RunArtifacts<'_>) -> SimulationReport {
    let RunArtifacts {
        request,
        parameters,
        codeword,
        injection,
        outcome,
        analysis,
        timer,
    } = artifacts;

    let introduced = injection.error_count();

    let status = if outcome.succeeded {
        ReportStatus::Success
    } else {
        ReportStatus::Partial
    };

    let summary = Summary {
        was_successful: outcome.succeeded,
        data_recovered: outcome.matches_original,
        success_rate: analysis.correction.success_rate,
        errors_introduced: introduced,
        errors_corrected: outcome.errors_corrected,
        errors_remaining: introduced.saturating_sub(outcome.errors_corrected),
        max_correctable: parameters.max_errors,
    };

    let transmission = Transmission {
        original_size: request.message.len(),
        encoded_size: codeword.len(),
        channel_type: request.channel_label.clone(),
        error_type: request.model,
        error_rate_requested: request.error_rate,
        error_rate_actual: analysis.channel.error_rate_actual,
        noise_level: analysis.channel.noise_level,
    };

    let performance = Performance {
        processing_time_ms: timer.duration().as_secs_f64() * 1000.0,
        bytes_processed: codeword.len(),
        throughput_bps: analysis.throughput_bps,
    };

    SimulationReport {
        status,
        seed: request.seed,
        stages: timer.stages().collect(),
        message: request.message.clone(),
        codeword,
        corrupted: injection.corrupted,
        events: injection.events,
        outcome,
        parameters,
        summary,
        transmission,
        performance,
        analysis,
    }
}

impl SimulationReport {
    pub fn is_success(&self) -> bool {
        self.status == ReportStatus::Success
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Export as simple `key=value` lines.
    pub fn export_text(&self) -> String {
        format!(
            "status={}\n\
             seed={}\n\
             nsym={}\n\
             original_size={}\n\
             encoded_size={}\n\
             error_type={}\n\
             errors_introduced={}\n\
             errors_corrected={}\n\
             data_recovered={}\n\
             success_rate={:.2}\n\
             error_rate_actual={:.4}\n\
             capacity_utilization={:.4}\n",
            if self.is_success() { "success" } else { "partial" },
            self.seed,
            self.parameters.parity_bytes,
            self.transmission.original_size,
            self.transmission.encoded_size,
            self.transmission.error_type,
            self.summary.errors_introduced,
            self.summary.errors_corrected,
            self.summary.data_recovered,
            self.summary.success_rate,
            self.transmission.error_rate_actual,
            self.analysis.correction.capacity_utilization,
        )
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Simulation Summary ===");
        println!("Seed: {}", self.seed);
        println!("Processing time: {:.2} ms", self.performance.processing_time_ms);
        println!();

        println!("=== Code ===");
        println!(
            "Message: {} bytes, parity: {} bytes, block: {} bytes",
            self.parameters.message_len, self.parameters.parity_bytes, self.parameters.block_len
        );
        println!(
            "Corrects up to {} errors or {} erasures",
            self.parameters.max_errors, self.parameters.max_erasures
        );
        println!(
            "Overhead: {:.2}%, code rate: {:.3}",
            self.parameters.overhead_percent, self.parameters.code_rate
        );
        println!();

        println!("=== Channel ===");
        println!(
            "Channel: {} ({} model, requested rate {:.2}%)",
            self.transmission.channel_type,
            self.transmission.error_type,
            self.analysis.channel.noise_level
        );
        println!(
            "Errors injected: {} ({:.2}% of block)",
            self.summary.errors_introduced,
            self.transmission.error_rate_actual * 100.0
        );
        if !self.analysis.channel.error_distribution.positions.is_empty() {
            println!(
                "Positions: {:?}{}",
                self.analysis.channel.error_distribution.positions,
                if self.summary.errors_introduced
                    > self.analysis.channel.error_distribution.positions.len()
                {
                    " ..."
                } else {
                    ""
                }
            );
        }
        for event in &self.analysis.errors {
            println!("  {event}");
        }
        println!();

        println!("=== Decoding ===");
        println!("Decoder success: {}", self.summary.was_successful);
        println!("Data recovered: {}", self.summary.data_recovered);
        println!("Errors corrected: {}", self.summary.errors_corrected);
        println!("Errors remaining: {}", self.summary.errors_remaining);
        println!("Success rate: {:.2}%", self.summary.success_rate);
        println!(
            "Capacity utilization: {:.1}%",
            self.analysis.correction.capacity_utilization * 100.0
        );
        if let Some(reason) = &self.outcome.failure {
            println!("Failure: {reason}");
        }
        println!();

        println!("=== Performance ===");
        println!("Throughput: {:.2} kbit/s", self.performance.throughput_bps / 1000.0);
        println!();
    }

    /// Print just the final result (pass/fail).
    pub fn print_result(&self) {
        if self.summary.data_recovered {
            println!(
                "✓ Block recovered: {} of {} injected errors corrected",
                self.summary.errors_corrected, self.summary.errors_introduced
            );
        } else if self.summary.was_successful {
            println!("✗ Decoder returned a block that does not match the message");
        } else {
            println!(
                "✗ Block uncorrectable: {} errors injected, capacity {}",
                self.summary.errors_introduced, self.summary.max_correctable
            );
        }
    }
}

/// Lowercase hex, no separators.
pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub(crate) fn serialize_hex<S: Serializer>(
    bytes: &[u8],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&to_hex(bytes))
}

pub(crate) fn serialize_display_opt<T: Display, S: Serializer>(
    value: &Option<T>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_none(),
    }
}

fn serialize_round2<S: Serializer>(
    value: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}
