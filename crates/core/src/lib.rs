//! fec-sim-core: Reed-Solomon transmission simulation and analysis
//!
//! This library measures how a forward-error-correction code survives a lossy
//! channel:
//! - Encodes a message with a systematic Reed-Solomon code over GF(256)
//! - Corrupts the codeword under a random, burst or erasure noise model
//! - Attempts recovery, using erasure hints where the channel provides them
//! - Reports channel statistics and correction-capacity metrics
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `gf256`: Field arithmetic and byte polynomials
//! - `reed_solomon`: The built-in codec
//! - `codec`: The `Codec` trait the simulator talks to
//! - `channel`: Error injection with an explicitly passed generator
//! - `simulator`: Encode -> inject -> decode -> classify
//! - `analysis`: Derived statistics of a finished run
//! - `metrics`: Run timing and throughput
//! - `report`: The final `SimulationReport`
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and recoverable
//! - **Request-scoped**: No state survives a run or is shared between runs
//! - **Deterministic**: Seeded randomness makes runs reproducible
//! - **Failure is data**: An uncorrectable block still yields a full report
//!
//! # Example
//! ```
//! use fec_sim_core::{simulate, SimulationRequest};
//!
//! let request = SimulationRequest::new("HELLO", 4).with_error_rate(0.0);
//! let report = simulate(&request).unwrap();
//! assert!(report.outcome.matches_original);
//! assert_eq!(report.codeword.len(), 9);
//! ```

pub mod analysis;
pub mod channel;
pub mod codec;
pub mod error;
pub mod gf256;
pub mod metrics;
pub mod reed_solomon;
pub mod report;
pub mod simulator;

// Re-export commonly used types
pub use channel::{ChannelConfig, ErrorEvent, ErrorKind, ErrorModel, Injection};
pub use codec::{Codec, CodeParameters, DecodedBlock};
pub use error::{Error, ParameterError, Result, UncorrectableError};
pub use reed_solomon::ReedSolomon;
pub use report::{ReportStatus, SimulationReport};
pub use simulator::{simulate, DecodeOutcome, SimulationRequest, Simulator};
