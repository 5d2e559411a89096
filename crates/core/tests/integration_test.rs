//! Integration tests for the full simulation pipeline.
//!
//! These tests verify end-to-end behavior: message -> encode -> channel ->
//! decode -> classify -> analyze, checking both the decode outcome and the
//! statistics derived from it.

use fec_sim_core::{
    channel::{inject, ChannelConfig, ErrorKind, ErrorModel},
    simulate, Codec, Error, ParameterError, ReedSolomon, ReportStatus, SimulationRequest,
    Simulator, UncorrectableError,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// HELLO with four parity bytes: two corrupted bytes are recovered.
#[test]
fn test_hello_two_errors_recovered() {
    let codec = ReedSolomon::new();
    let codeword = codec.encode(b"HELLO", 4).expect("encode failed");
    assert_eq!(codeword.len(), 9);

    let mut corrupted = codeword.clone();
    corrupted[1] ^= 0x5A;
    corrupted[6] ^= 0xC3;

    let decoded = codec.decode(&corrupted, 4, None).expect("decode failed");
    assert_eq!(decoded.message, b"HELLO");
    assert_eq!(decoded.errors_corrected(), 2);
    assert_eq!(decoded.codeword, codeword);
}

/// HELLO with four parity bytes: three corrupted bytes are beyond capacity.
#[test]
fn test_hello_three_errors_uncorrectable() {
    let codec = ReedSolomon::new();
    let codeword = codec.encode(b"HELLO", 4).expect("encode failed");

    let mut corrupted = codeword;
    corrupted[0] ^= 0x11;
    corrupted[4] ^= 0x22;
    corrupted[8] ^= 0x44;

    let err = codec.decode(&corrupted, 4, None).unwrap_err();
    assert!(matches!(err, Error::Uncorrectable(_)), "got {err:?}");
}

/// Same scenario driven through the simulator: every seed that happens to
/// inject exactly two errors must recover HELLO.
#[test]
fn test_hello_simulated_two_error_runs() {
    let mut two_error_runs = 0;

    for seed in 0..400 {
        let request = SimulationRequest::new("HELLO", 4)
            .with_error_rate(0.25)
            .with_seed(seed);
        let report = simulate(&request).expect("simulation failed");

        if report.summary.errors_introduced != 2 {
            continue;
        }
        two_error_runs += 1;

        let changed = report.events.iter().filter(|e| e.changed_value()).count();
        assert_eq!(report.status, ReportStatus::Success, "seed {seed}");
        assert!(report.outcome.matches_original, "seed {seed}");
        assert_eq!(report.outcome.recovered, b"HELLO");
        assert_eq!(report.outcome.errors_corrected, changed, "seed {seed}");
    }

    assert!(two_error_runs > 20, "only {two_error_runs} two-error runs");
}

/// Burst no longer than nsym/2 is always corrected.
#[test]
fn test_short_burst_recovered() {
    // 30 + 10 = 40 byte block, floor(40 * 0.125) = 5 = nsym / 2
    let message: Vec<u8> = (b'a'..=b'z').chain(b"0123".iter().copied()).collect();
    assert_eq!(message.len(), 30);

    for seed in 0..25 {
        let request = SimulationRequest::new(message.clone(), 10)
            .with_model(ErrorModel::Burst)
            .with_error_rate(0.125)
            .with_seed(seed);
        let report = simulate(&request).expect("simulation failed");

        assert_eq!(report.events.len(), 5);
        assert!(report
            .events
            .iter()
            .all(|e| e.kind == ErrorKind::BurstError));
        assert!(report.outcome.matches_original, "seed {seed}");
        assert_eq!(report.analysis.channel.error_rate_actual, 0.125);
    }
}

/// Burst shorter than one byte leaves the block untouched.
#[test]
fn test_zero_length_burst() {
    let request = SimulationRequest::new("tiny", 2)
        .with_model(ErrorModel::Burst)
        .with_error_rate(0.1)
        .with_seed(9);
    let report = simulate(&request).expect("simulation failed");

    assert!(report.events.is_empty());
    assert_eq!(report.corrupted, report.codeword);
    assert!(report.outcome.matches_original);
    assert_eq!(report.summary.success_rate, 0.0);
}

/// Erasures up to nsym are always recovered when hints are passed through.
#[test]
fn test_erasure_channel_uses_hints() {
    let message = b"erasure channel end to end".to_vec();
    let nsym = 12;
    let mut checked = 0;

    for seed in 0..60 {
        let request = SimulationRequest::new(message.clone(), nsym)
            .with_model(ErrorModel::Erasures)
            .with_error_rate(0.2)
            .with_seed(seed);
        let report = simulate(&request).expect("simulation failed");

        let erased = report.events.len();
        assert!(report.events.iter().all(|e| e.kind == ErrorKind::Erasure));
        assert!(report.events.iter().all(|e| report.corrupted[e.position] == 0));

        if erased <= nsym {
            checked += 1;
            assert!(report.outcome.matches_original, "seed {seed}: {erased} erasures");
            assert_eq!(report.outcome.errors_corrected, erased);
            assert!(report.analysis.correction.efficiency <= 1.0);
        }
    }

    assert!(checked > 30);
}

/// A fully erased block exceeds the erasure budget: the real codec gives up
/// and the run still yields a complete partial report.
#[test]
fn test_fully_erased_block_partial_report() {
    let message = b"this block will not survive".to_vec();
    let request = SimulationRequest::new(message, 4)
        .with_model(ErrorModel::Erasures)
        .with_error_rate(1.0)
        .with_channel_label("deep-space")
        .with_seed(31337);
    let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
    let report = Simulator::new(ReedSolomon::new())
        .run(&request, &mut rng)
        .expect("simulation failed");

    assert_eq!(report.status, ReportStatus::Partial);
    assert!(!report.is_success());
    assert!(!report.outcome.succeeded);
    assert!(!report.outcome.matches_original);
    assert!(report.outcome.recovered.is_empty());
    assert_eq!(report.outcome.errors_corrected, 0);
    assert_eq!(
        report.outcome.failure,
        Some(UncorrectableError::TooManyErasures {
            erasures: 31,
            nsym: 4
        })
    );

    assert_eq!(report.summary.errors_introduced, 31);
    assert_eq!(report.summary.errors_remaining, 31);
    assert_eq!(report.summary.success_rate, 0.0);
    assert_eq!(report.transmission.channel_type, "deep-space");
    assert_eq!(report.analysis.channel.error_rate_actual, 1.0);
    assert_eq!(report.analysis.channel.error_distribution.positions.len(), 20);
    assert_eq!(report.analysis.errors.len(), 10);

    let json: serde_json::Value =
        serde_json::from_str(&report.to_json().expect("json failed")).expect("invalid json");
    assert_eq!(json["status"], "partial");
    assert!(json["outcome"]["failure"].is_string());
}

/// Reporting caps never change the underlying counts.
#[test]
fn test_truncation_keeps_exact_counts() {
    let message = vec![0x42u8; 200];
    let request = SimulationRequest::new(message, 20)
        .with_error_rate(0.5)
        .with_seed(4);
    let report = simulate(&request).expect("simulation failed");

    let total = report.events.len();
    assert!(total > 20);
    assert_eq!(report.analysis.channel.error_distribution.total, total);
    assert_eq!(report.analysis.channel.error_distribution.positions.len(), 20);
    assert_eq!(report.analysis.errors.len(), 10);
    assert_eq!(
        report.analysis.channel.error_rate_actual,
        total as f64 / 220.0
    );
}

/// Invalid configurations fail before any injection.
#[test]
fn test_invalid_burst_rejected_before_injection() {
    let codec = ReedSolomon::new();
    let codeword = codec.encode(b"abc", 2).expect("encode failed");
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let config = ChannelConfig::new(ErrorModel::Burst, 1.0);
    let err = inject(&codeword, &config, &mut rng).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidParameter(ParameterError::BurstTooLong {
            burst_len: 5,
            block_len: 5
        })
    ));
}

/// Parallel runs with their own seeds match sequential runs.
#[test]
fn test_parallel_runs_are_independent() {
    let requests: Vec<_> = (0..8)
        .map(|seed| {
            SimulationRequest::new("independent runs", 6)
                .with_error_rate(0.2)
                .with_seed(seed)
        })
        .collect();

    let sequential: Vec<_> = requests
        .iter()
        .map(|r| simulate(r).expect("simulation failed"))
        .collect();

    let handles: Vec<_> = requests
        .into_iter()
        .map(|r| std::thread::spawn(move || simulate(&r).expect("simulation failed")))
        .collect();

    for (handle, expected) in handles.into_iter().zip(&sequential) {
        let report = handle.join().expect("thread panicked");
        assert_eq!(report.events, expected.events);
        assert_eq!(report.outcome, expected.outcome);
    }
}
