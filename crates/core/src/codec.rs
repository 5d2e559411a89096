//! Codec adapter seam.
//!
//! The simulator never touches field arithmetic directly. It talks to a
//! [`Codec`], which encodes a message into a systematic codeword and decodes a
//! (possibly damaged) codeword back, optionally using known erasure positions.
//!
//! [`crate::reed_solomon::ReedSolomon`] is the implementation shipped with the
//! crate; tests substitute their own codecs to drive the simulator into
//! specific outcomes.

use crate::error::Result;
use serde::Serialize;

/// Result of a successful decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlock {
    /// Recovered message bytes (codeword without parity)
    pub message: Vec<u8>,

    /// Recovered full codeword
    pub codeword: Vec<u8>,

    /// Positions the decoder repaired, erasures included, ascending
    pub corrected_positions: Vec<usize>,
}

impl DecodedBlock {
    /// Number of symbols the decoder corrected.
    pub fn errors_corrected(&self) -> usize {
        self.corrected_positions.len()
    }
}

/// A systematic block code with `nsym` parity symbols.
///
/// # Contract
/// - `encode` fails with `InvalidParameter` when `message.len() + nsym`
///   exceeds [`Codec::max_block_len`].
/// - `decode` fails with `Uncorrectable` when `2·errors + erasures > nsym`
///   (or the damage is otherwise beyond repair).
pub trait Codec {
    /// Largest codeword the codec can handle.
    fn max_block_len(&self) -> usize;

    /// Append `nsym` parity bytes to `message`.
    fn encode(&self, message: &[u8], nsym: usize) -> Result<Vec<u8>>;

    /// Recover the message from a received block.
    ///
    /// `erasures` lists indices known to be unreliable. Each costs one parity
    /// symbol instead of the two an unknown error costs.
    fn decode(
        &self,
        codeword: &[u8],
        nsym: usize,
        erasures: Option<&[usize]>,
    ) -> Result<DecodedBlock>;
}

/// Static properties of a code configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CodeParameters {
    /// Message length in bytes
    pub message_len: usize,

    /// Parity symbols appended by the encoder
    pub parity_bytes: usize,

    /// Codeword length in bytes
    pub block_len: usize,

    /// Unknown errors the code can always correct (nsym / 2)
    pub max_errors: usize,

    /// Erasures the code can always correct (nsym)
    pub max_erasures: usize,

    /// Parity overhead relative to the message, in percent
    pub overhead_percent: f64,

    /// message_len / block_len
    pub code_rate: f64,
}

impl CodeParameters {
    pub fn new(message_len: usize, nsym: usize) -> Self {
        let block_len = message_len + nsym;

        let overhead_percent = if message_len == 0 {
            0.0
        } else {
            nsym as f64 / message_len as f64 * 100.0
        };

        let code_rate = if block_len == 0 {
            0.0
        } else {
            message_len as f64 / block_len as f64
        };

        Self {
            message_len,
            parity_bytes: nsym,
            block_len,
            max_errors: nsym / 2,
            max_erasures: nsym,
            overhead_percent,
            code_rate,
        }
    }
}
