//! Noisy channel: error injection into an encoded block.
//!
//! This module corrupts a codeword in a deterministic way using an explicitly
//! passed random source. Given the same generator state and inputs, the
//! corrupted block and the event log are bit-identical.
//!
//! # Error Models
//!
//! - **Random**: every byte independently, with probability `error_rate`, is
//!   replaced by a uniformly random value. The new value may equal the old
//!   one; the attempt is still logged and counted.
//! - **Burst**: one contiguous run of `floor(len · error_rate)` bytes starting
//!   at a uniformly drawn index in `[0, len - burst_len)` is randomized.
//! - **Erasures**: every byte independently, with probability `error_rate`,
//!   is zeroed. The erased indices are handed to the decoder as hints.
//!
//! # Validation
//!
//! Rates outside `[0, 1]` and bursts that cannot fit are rejected before any
//! byte is altered.

use crate::error::{ParameterError, Result};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Value written into an erased byte.
pub const ERASURE_SENTINEL: u8 = 0x00;

/// Noise model applied to the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorModel {
    Random,
    Burst,
    Erasures,
}

impl ErrorModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorModel::Random => "random",
            ErrorModel::Burst => "burst",
            ErrorModel::Erasures => "erasures",
        }
    }
}

impl fmt::Display for ErrorModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorModel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(ErrorModel::Random),
            "burst" => Ok(ErrorModel::Burst),
            "erasures" | "erasure" => Ok(ErrorModel::Erasures),
            other => Err(format!(
                "unknown error model '{other}' (expected random, burst or erasures)"
            )),
        }
    }
}

/// What happened to a single byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    BitFlip,
    BurstError,
    Erasure,
}

/// One corrupted byte position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEvent {
    /// Index into the codeword
    pub position: usize,

    /// Byte before corruption
    pub original_value: u8,

    /// Byte after corruption (may equal `original_value` for random models)
    pub corrupted_value: u8,

    pub kind: ErrorKind,

    /// Offset within the burst, only for `ErrorKind::BurstError`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burst_index: Option<usize>,
}

impl ErrorEvent {
    /// True when the stored byte actually differs from the original.
    pub fn changed_value(&self) -> bool {
        self.original_value != self.corrupted_value
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{:<3} {:02x} -> {:02x} ({:?})",
            self.position, self.original_value, self.corrupted_value, self.kind
        )
    }
}

/// A corrupted block plus the log of everything that was changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    /// Same length as the source codeword
    pub corrupted: Vec<u8>,

    /// One event per altered position, ascending by position
    pub events: Vec<ErrorEvent>,
}

impl Injection {
    /// Number of positions altered (attempts, not value changes).
    pub fn error_count(&self) -> usize {
        self.events.len()
    }

    /// Altered positions in ascending order.
    pub fn positions(&self) -> Vec<usize> {
        self.events.iter().map(|e| e.position).collect()
    }

    /// Positions marked as erasures, for erasure-aware decoding.
    pub fn erasure_positions(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter(|e| e.kind == ErrorKind::Erasure)
            .map(|e| e.position)
            .collect()
    }
}

/// Configuration for one channel pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    pub model: ErrorModel,

    /// Corruption probability (random, erasures) or burst fraction [0.0, 1.0]
    pub error_rate: f64,
}

impl ChannelConfig {
    pub fn new(model: ErrorModel, error_rate: f64) -> Self {
        Self { model, error_rate }
    }

    /// Reject rates outside [0, 1] (NaN included).
    pub fn validate(&self) -> Result<()> {
        validate_rate(self.error_rate)
    }
}

pub(crate) fn validate_rate(rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(ParameterError::RateOutOfRange(rate).into())
    }
}

/// Apply `config` to `codeword`, drawing randomness from `rng`.
pub fn inject<R: Rng + ?Sized>(
    codeword: &[u8],
    config: &ChannelConfig,
    rng: &mut R,
) -> Result<Injection> {
    config.validate()?;

    let injection = match config.model {
        ErrorModel::Random => inject_random(codeword, config.error_rate, rng),
        ErrorModel::Burst => inject_burst(codeword, config.error_rate, rng)?,
        ErrorModel::Erasures => inject_erasures(codeword, config.error_rate, rng),
    };

    tracing::debug!(
        model = %config.model,
        rate = config.error_rate,
        block_len = codeword.len(),
        errors = injection.error_count(),
        "injected channel errors"
    );

    Ok(injection)
}

fn inject_random<R: Rng + ?Sized>(codeword: &[u8], rate: f64, rng: &mut R) -> Injection {
    let mut corrupted = codeword.to_vec();
    let mut events = Vec::new();

    for (position, byte) in corrupted.iter_mut().enumerate() {
        let roll: f64 = rng.gen();
        if roll < rate {
            let original_value = *byte;
            *byte = rng.gen();
            events.push(ErrorEvent {
                position,
                original_value,
                corrupted_value: *byte,
                kind: ErrorKind::BitFlip,
                burst_index: None,
            });
        }
    }

    Injection { corrupted, events }
}

fn inject_burst<R: Rng + ?Sized>(codeword: &[u8], rate: f64, rng: &mut R) -> Result<Injection> {
    let block_len = codeword.len();
    let burst_len = (block_len as f64 * rate).floor() as usize;

    let mut corrupted = codeword.to_vec();
    if burst_len == 0 {
        return Ok(Injection {
            corrupted,
            events: Vec::new(),
        });
    }

    if burst_len >= block_len {
        return Err(ParameterError::BurstTooLong {
            burst_len,
            block_len,
        }
        .into());
    }

    let burst_start = rng.gen_range(0..block_len - burst_len);
    let events: Vec<ErrorEvent> = (burst_start..burst_start + burst_len)
        .map(|position| {
            let original_value = corrupted[position];
            corrupted[position] = rng.gen();
            ErrorEvent {
                position,
                original_value,
                corrupted_value: corrupted[position],
                kind: ErrorKind::BurstError,
                burst_index: Some(position - burst_start),
            }
        })
        .collect();

    Ok(Injection { corrupted, events })
}

fn inject_erasures<R: Rng + ?Sized>(codeword: &[u8], rate: f64, rng: &mut R) -> Injection {
    let mut corrupted = codeword.to_vec();
    let mut events = Vec::new();

    for (position, byte) in corrupted.iter_mut().enumerate() {
        let roll: f64 = rng.gen();
        if roll < rate {
            events.push(ErrorEvent {
                position,
                original_value: *byte,
                corrupted_value: ERASURE_SENTINEL,
                kind: ErrorKind::Erasure,
                burst_index: None,
            });
            *byte = ERASURE_SENTINEL;
        }
    }

    Injection { corrupted, events }
}
