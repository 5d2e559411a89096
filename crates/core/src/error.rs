//! Error types for the FEC channel simulator.
//!
//! Two failure families matter to callers:
//! - `InvalidParameter`: the request can never be simulated as given. Raised
//!   before any byte of the codeword is touched.
//! - `Uncorrectable`: the decoder's correction budget was exceeded. The
//!   simulator turns this into an unsuccessful outcome instead of failing.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Parameter: malformed request (block size, rate, burst, erasure index)
/// - Uncorrectable: the received block is beyond the code's capacity
/// - I/O: reading message bytes from disk
/// - JSON: report serialization
/// - Config: command-line configuration problems
#[derive(Debug, Error)]
pub enum Error {
    /// The request is malformed and was rejected before simulation
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] ParameterError),

    /// The decoder could not recover the block
    #[error("uncorrectable block: {0}")]
    Uncorrectable(#[from] UncorrectableError),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Report serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for the recoverable "channel beat the code" outcome.
    pub fn is_uncorrectable(&self) -> bool {
        matches!(self, Error::Uncorrectable(_))
    }
}

/// Request validation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// Message plus parity does not fit in one GF(256) block
    #[error("block length {len} exceeds maximum {max}")]
    BlockTooLong { len: usize, max: usize },

    /// Received block cannot even hold the parity symbols
    #[error("codeword length {len} is shorter than nsym {nsym}")]
    CodewordTooShort { len: usize, nsym: usize },

    /// Error rate outside [0, 1] (or NaN)
    #[error("error rate {0} is outside [0, 1]")]
    RateOutOfRange(f64),

    /// Burst would cover the whole block, leaving no start index to draw
    #[error("burst length {burst_len} does not fit in block of {block_len} bytes")]
    BurstTooLong { burst_len: usize, block_len: usize },

    /// Erasure index points past the end of the block
    #[error("erasure position {position} out of range for block of {len} bytes")]
    ErasureOutOfRange { position: usize, len: usize },
}

/// Decoder failures. All of them mean "too much damage for this nsym".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UncorrectableError {
    /// More declared erasures than parity symbols
    #[error("{erasures} erasures exceed nsym {nsym}")]
    TooManyErasures { erasures: usize, nsym: usize },

    /// Error locator degree blows the 2*errors + erasures <= nsym budget
    #[error("{errors} errors with {erasures} erasures exceed nsym {nsym}")]
    TooManyErrors {
        errors: usize,
        erasures: usize,
        nsym: usize,
    },

    /// Chien search found a different number of roots than the locator degree
    #[error("error locator has degree {expected} but {found} roots were found")]
    LocatorMismatch { expected: usize, found: usize },

    /// Syndromes were non-zero but no correctable position set exists
    #[error("could not locate errors")]
    DegenerateLocator,

    /// Correction was applied but the result is still not a codeword
    #[error("residual syndrome after correction")]
    ResidualSyndrome,
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
