//! Transmission simulator: encode -> inject -> decode -> classify.
//!
//! # Stages
//!
//! ```text
//! message --encode--> codeword --inject--> corrupted --decode--> outcome
//!                                                          |
//!                                           analyze <------+
//! ```
//!
//! Stages run strictly in order with no retries. Bad parameters fail the run
//! before the channel touches anything. An uncorrectable block is NOT a
//! failure of the run: it becomes an outcome with `succeeded == false` and a
//! full report is still produced.
//!
//! # Concurrency
//!
//! A run owns every buffer it creates and draws randomness only from the
//! generator it is handed, so independent runs can execute in parallel with
//! no coordination.

use crate::analysis::{self, AnalysisInput};
use crate::channel::{self, ChannelConfig, ErrorModel, Injection};
use crate::codec::{Codec, CodeParameters, DecodedBlock};
use crate::error::{Error, ParameterError, Result, UncorrectableError};
use crate::metrics::RunTimer;
use crate::reed_solomon::ReedSolomon;
use crate::report::{self, SimulationReport};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

pub use crate::metrics::Stage;

/// Default parity symbols.
pub const DEFAULT_NSYM: usize = 10;

/// Default corruption rate.
pub const DEFAULT_ERROR_RATE: f64 = 0.15;

/// Default channel label.
pub const DEFAULT_CHANNEL: &str = "wireless";

/// Everything needed to run one simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    /// Plaintext payload
    pub message: Vec<u8>,

    /// Parity symbols to append
    pub nsym: usize,

    /// Corruption probability or burst fraction [0.0, 1.0]
    pub error_rate: f64,

    pub model: ErrorModel,

    /// Free-form label echoed in the report (e.g. "wireless")
    pub channel_label: String,

    /// Seed for the request-scoped generator used by [`simulate`]
    pub seed: u64,
}

impl SimulationRequest {
    /// Request with default rate, model and label.
    pub fn new(message: impl Into<Vec<u8>>, nsym: usize) -> Self {
        Self {
            message: message.into(),
            nsym,
            error_rate: DEFAULT_ERROR_RATE,
            model: ErrorModel::Random,
            channel_label: DEFAULT_CHANNEL.to_string(),
            seed: 0,
        }
    }

    pub fn with_error_rate(mut self, error_rate: f64) -> Self {
        self.error_rate = error_rate;
        self
    }

    pub fn with_model(mut self, model: ErrorModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_channel_label(mut self, label: impl Into<String>) -> Self {
        self.channel_label = label.into();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig::new(self.model, self.error_rate)
    }

    /// Checks that do not depend on the codec. An empty message is valid.
    pub fn validate(&self) -> Result<()> {
        self.channel_config().validate()
    }
}

/// How decoding went.
///
/// `succeeded` means the decoder returned a block; `matches_original` means
/// that block equals the message. A miscorrection has the first without the
/// second.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeOutcome {
    pub succeeded: bool,

    /// Recovered message bytes (empty when decoding failed)
    #[serde(serialize_with = "report::serialize_hex")]
    pub recovered: Vec<u8>,

    pub errors_corrected: usize,

    pub matches_original: bool,

    /// Positions the decoder repaired
    pub corrected_positions: Vec<usize>,

    /// Why decoding failed, if it did
    #[serde(serialize_with = "report::serialize_display_opt")]
    pub failure: Option<UncorrectableError>,
}

impl DecodeOutcome {
    /// Outcome for a block the decoder gave up on.
    pub fn uncorrectable(reason: UncorrectableError) -> Self {
        Self {
            succeeded: false,
            recovered: Vec::new(),
            errors_corrected: 0,
            matches_original: false,
            corrected_positions: Vec::new(),
            failure: Some(reason),
        }
    }

    /// Outcome for a block the decoder returned.
    pub fn decoded(block: DecodedBlock, original: &[u8]) -> Self {
        Self {
            succeeded: true,
            errors_corrected: block.errors_corrected(),
            matches_original: block.message == original,
            recovered: block.message,
            corrected_positions: block.corrected_positions,
            failure: None,
        }
    }
}

/// Turn a decode result into an outcome. Only `Uncorrectable` is absorbed.
pub fn classify(decoded: Result<DecodedBlock>, original: &[u8]) -> Result<DecodeOutcome> {
    match decoded {
        Ok(block) => Ok(DecodeOutcome::decoded(block, original)),
        Err(Error::Uncorrectable(reason)) => Ok(DecodeOutcome::uncorrectable(reason)),
        Err(err) => Err(err),
    }
}

/// Runs simulations against a codec.
#[derive(Debug, Clone, Default)]
pub struct Simulator<C> {
    codec: C,
}

impl<C: Codec> Simulator<C> {
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Run one simulation, drawing channel noise from `rng`.
    pub fn run<R: Rng + ?Sized>(
        &self,
        request: &SimulationRequest,
        rng: &mut R,
    ) -> Result<SimulationReport> {
        let span = tracing::debug_span!(
            "simulate",
            channel = %request.channel_label,
            model = %request.model,
            nsym = request.nsym,
            rate = request.error_rate,
            seed = request.seed,
        );
        let _enter = span.enter();

        request.validate()?;

        let block_len = request.message.len() + request.nsym;
        let max = self.codec.max_block_len();
        if block_len > max {
            return Err(ParameterError::BlockTooLong {
                len: block_len,
                max,
            }
            .into());
        }

        let mut timer = RunTimer::start();

        // Stage 1: encode
        let codeword = self.codec.encode(&request.message, request.nsym)?;
        timer.mark(Stage::Encode);
        tracing::debug!(
            message_len = request.message.len(),
            block_len = codeword.len(),
            "encoded"
        );

        // Stage 2: inject
        let injection = channel::inject(&codeword, &request.channel_config(), rng)?;
        timer.mark(Stage::Inject);

        // Stage 3: decode, with erasure hints only for the erasure channel
        let erasures = match request.model {
            ErrorModel::Erasures => Some(injection.erasure_positions()),
            ErrorModel::Random | ErrorModel::Burst => None,
        };
        let decoded = self
            .codec
            .decode(&injection.corrupted, request.nsym, erasures.as_deref());
        timer.mark(Stage::Decode);
        tracing::debug!(decoded = decoded.is_ok(), "decode finished");

        // Stage 4: classify
        let outcome = classify(decoded, &request.message)?;
        timer.mark(Stage::Classify);
        timer.complete();
        tracing::debug!(
            decode_us = timer
                .stage_duration(Stage::Decode)
                .map_or(0, |d| d.as_micros() as u64),
            total_us = timer.duration().as_micros() as u64,
            "run timed"
        );

        log_outcome(&injection, &outcome);

        let analysis = analysis::analyze(AnalysisInput {
            codeword_len: codeword.len(),
            nsym: request.nsym,
            channel_label: &request.channel_label,
            requested_rate: request.error_rate,
            events: &injection.events,
            errors_corrected: outcome.errors_corrected,
            elapsed: timer.duration(),
        });

        Ok(report::assemble(report::RunArtifacts {
            request,
            parameters: CodeParameters::new(request.message.len(), request.nsym),
            codeword,
            injection,
            outcome,
            analysis,
            timer: &timer,
        }))
    }
}

fn log_outcome(injection: &Injection, outcome: &DecodeOutcome) {
    match &outcome.failure {
        Some(reason) => tracing::warn!(
            injected = injection.error_count(),
            %reason,
            "block uncorrectable"
        ),
        None => tracing::info!(
            injected = injection.error_count(),
            corrected = outcome.errors_corrected,
            matches_original = outcome.matches_original,
            "block decoded"
        ),
    }
}

/// Run `request` against the built-in Reed-Solomon codec with a generator
/// seeded from `request.seed`.
pub fn simulate(request: &SimulationRequest) -> Result<SimulationReport> {
    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    Simulator::new(ReedSolomon::new()).run(request, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportStatus;

    /// Codec that ignores its input and returns a fixed message.
    struct LyingCodec;

    impl Codec for LyingCodec {
        fn max_block_len(&self) -> usize {
            16
        }

        fn encode(&self, message: &[u8], nsym: usize) -> Result<Vec<u8>> {
            let mut out = message.to_vec();
            out.resize(message.len() + nsym, 0);
            Ok(out)
        }

        fn decode(
            &self,
            _codeword: &[u8],
            _nsym: usize,
            _erasures: Option<&[usize]>,
        ) -> Result<DecodedBlock> {
            Ok(DecodedBlock {
                message: b"WRONG".to_vec(),
                codeword: b"WRONG\0\0".to_vec(),
                corrected_positions: vec![0],
            })
        }
    }

    /// Codec whose decoder always gives up.
    struct HopelessCodec;

    impl Codec for HopelessCodec {
        fn max_block_len(&self) -> usize {
            255
        }

        fn encode(&self, message: &[u8], _nsym: usize) -> Result<Vec<u8>> {
            Ok(message.to_vec())
        }

        fn decode(
            &self,
            _codeword: &[u8],
            _nsym: usize,
            _erasures: Option<&[usize]>,
        ) -> Result<DecodedBlock> {
            Err(UncorrectableError::ResidualSyndrome.into())
        }
    }

    #[test]
    fn test_clean_channel_roundtrip() {
        let request = SimulationRequest::new("clean channel", 6)
            .with_error_rate(0.0)
            .with_seed(1);
        let report = simulate(&request).unwrap();

        assert_eq!(report.status, ReportStatus::Success);
        assert!(report.outcome.succeeded);
        assert!(report.outcome.matches_original);
        assert_eq!(report.outcome.errors_corrected, 0);
        assert_eq!(report.outcome.recovered, b"clean channel");
        assert_eq!(report.codeword.len(), 19);
        assert_eq!(report.corrupted, report.codeword);
    }

    #[test]
    fn test_decoder_success_is_not_content_match() {
        let request = SimulationRequest::new("HELLO", 2).with_error_rate(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report = Simulator::new(LyingCodec).run(&request, &mut rng).unwrap();

        assert_eq!(report.status, ReportStatus::Success);
        assert!(report.outcome.succeeded);
        assert!(!report.outcome.matches_original);
        assert!(report.summary.was_successful);
        assert!(!report.summary.data_recovered);
    }

    #[test]
    fn test_uncorrectable_becomes_partial_report() {
        let request = SimulationRequest::new("HELLO", 2).with_error_rate(0.5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let report = Simulator::new(HopelessCodec).run(&request, &mut rng).unwrap();

        assert_eq!(report.status, ReportStatus::Partial);
        assert!(!report.outcome.succeeded);
        assert!(!report.outcome.matches_original);
        assert_eq!(report.outcome.errors_corrected, 0);
        assert!(report.outcome.recovered.is_empty());
        assert_eq!(
            report.outcome.failure,
            Some(UncorrectableError::ResidualSyndrome)
        );
        assert_eq!(report.analysis.correction.success_rate, 0.0);
    }

    #[test]
    fn test_invalid_parameters_rejected_up_front() {
        let err = simulate(&SimulationRequest::new("x", 4).with_error_rate(2.0)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter(ParameterError::RateOutOfRange(_))
        ));

        let err = simulate(&SimulationRequest::new(vec![1u8; 250], 10)).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter(ParameterError::BlockTooLong { .. })
        ));

        let err = simulate(
            &SimulationRequest::new("burst", 4)
                .with_model(ErrorModel::Burst)
                .with_error_rate(1.0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter(ParameterError::BurstTooLong { .. })
        ));
    }

    #[test]
    fn test_empty_message_is_simulated() {
        let request = SimulationRequest::new(Vec::<u8>::new(), 4).with_error_rate(0.0);
        let report = simulate(&request).unwrap();

        assert_eq!(report.status, ReportStatus::Success);
        assert!(report.outcome.matches_original);
        assert!(report.outcome.recovered.is_empty());
        assert_eq!(report.codeword.len(), 4);
        assert_eq!(report.parameters.overhead_percent, 0.0);

        let request = SimulationRequest::new(Vec::<u8>::new(), 0).with_error_rate(0.5);
        let report = simulate(&request).unwrap();
        assert!(report.codeword.is_empty());
        assert_eq!(report.analysis.channel.error_rate_actual, 0.0);
        assert_eq!(report.parameters.code_rate, 0.0);
    }

    #[test]
    fn test_block_limit_comes_from_codec() {
        // LyingCodec::encode accepts anything; the limit is enforced before it
        let request = SimulationRequest::new(vec![7u8; 14], 4).with_error_rate(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = Simulator::new(LyingCodec).run(&request, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter(ParameterError::BlockTooLong { len: 18, max: 16 })
        ));
    }

    #[test]
    fn test_stages_run_in_order() {
        let request = SimulationRequest::new("ordered", 4).with_error_rate(0.1);
        let report = simulate(&request).unwrap();
        assert_eq!(
            report.stages,
            vec![Stage::Encode, Stage::Inject, Stage::Decode, Stage::Classify]
        );
    }

    #[test]
    fn test_classify_propagates_other_errors() {
        let err = classify(Err(ParameterError::RateOutOfRange(2.0).into()), b"x").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
    }

    #[test]
    fn test_same_seed_same_report() {
        let request = SimulationRequest::new("determinism check", 8)
            .with_error_rate(0.3)
            .with_seed(77);
        let a = simulate(&request).unwrap();
        let b = simulate(&request).unwrap();

        assert_eq!(a.corrupted, b.corrupted);
        assert_eq!(a.events, b.events);
        assert_eq!(a.outcome, b.outcome);
    }
}
