//! Configuration for the fec-sim application.
//!
//! Handles parsing command-line arguments and generating sensible defaults
//! (including a generated message that is reproducible with a seed).
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments, using intelligent defaults.
//! The seed is always printed so runs are reproducible.

use crate::input_gen;
use fec_sim_core::channel::ErrorModel;
use fec_sim_core::simulator::{DEFAULT_CHANNEL, DEFAULT_ERROR_RATE, DEFAULT_NSYM};
use fec_sim_core::{Error, Result, SimulationRequest};
use std::path::PathBuf;

/// Generated message length when neither `--message` nor `--in` is given.
pub const DEFAULT_MESSAGE_LEN: usize = 32;

/// Where the message bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageSource {
    /// Literal text from `--message`
    Text(String),
    /// Raw bytes read from `--in`
    File(PathBuf),
    /// Seeded sample of the given length
    Generated(usize),
}

/// Complete configuration for a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // === Message ===
    pub source: MessageSource,

    // === Code ===
    /// Parity symbols per block
    pub nsym: usize,

    // === Channel ===
    pub model: ErrorModel,

    /// Corruption probability or burst fraction
    pub error_rate: f64,

    /// Free-form label echoed in the report
    pub channel: String,

    /// Seed for message generation and channel noise
    pub seed: u64,

    // === Batch ===
    /// Independent runs with seeds seed, seed+1, ...
    pub trials: usize,

    // === Output ===
    /// Print the report (or trial summary) as JSON on stdout
    pub json: bool,

    pub print_config: bool,

    /// Fallback filter when RUST_LOG is unset
    pub log_level: String,

    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// Without `--seed` a time-based seed is used. With it, message
    /// generation and channel noise are fully deterministic.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut message: Option<String> = None;
        let mut input_file: Option<PathBuf> = None;
        let mut message_len: Option<usize> = None;
        let mut nsym: Option<usize> = None;
        let mut error_rate: Option<f64> = None;
        let mut model: Option<ErrorModel> = None;
        let mut channel: Option<String> = None;
        let mut seed: Option<u64> = None;
        let mut trials: Option<usize> = None;
        let mut json = false;
        let mut print_config = false;
        let mut log_level: Option<String> = None;
        let mut json_logs = false;

        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--message" => message = Some(value(args, &mut i, "text")?.to_string()),
                "--in" => input_file = Some(PathBuf::from(value(args, &mut i, "a path")?)),
                "--len" => message_len = Some(parse(args, &mut i, "length")?),
                "--nsym" => nsym = Some(parse(args, &mut i, "nsym")?),
                "--rate" => error_rate = Some(parse(args, &mut i, "rate")?),
                "--model" => {
                    let raw = value(args, &mut i, "random, burst or erasures")?;
                    model = Some(raw.parse().map_err(Error::Config)?);
                }
                "--channel" => channel = Some(value(args, &mut i, "a label")?.to_string()),
                "--seed" => seed = Some(parse(args, &mut i, "seed")?),
                "--trials" => trials = Some(parse(args, &mut i, "trial count")?),
                "--json" => json = true,
                "--print-config" => print_config = true,
                "--log-level" => log_level = Some(value(args, &mut i, "a level")?.to_string()),
                "--json-logs" => json_logs = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => return Err(Error::Config(format!("unknown argument: {flag}"))),
            }
            i += 1;
        }

        let source = match (message, input_file) {
            (Some(_), Some(_)) => {
                return Err(Error::Config("--message and --in are mutually exclusive".into()))
            }
            (Some(text), None) => MessageSource::Text(text),
            (None, Some(path)) => MessageSource::File(path),
            (None, None) => MessageSource::Generated(message_len.unwrap_or(DEFAULT_MESSAGE_LEN)),
        };

        let config = Config {
            source,
            nsym: nsym.unwrap_or(DEFAULT_NSYM),
            model: model.unwrap_or(ErrorModel::Random),
            error_rate: error_rate.unwrap_or(DEFAULT_ERROR_RATE),
            channel: channel.unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            seed: seed.unwrap_or_else(time_seed),
            trials: trials.unwrap_or(1),
            json,
            print_config,
            log_level: log_level.unwrap_or_else(|| "warn".to_string()),
            json_logs,
        };
        config.validate()?;

        Ok(config)
    }

    /// Reject values that would only fail later, inside a run.
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.error_rate) {
            return Err(Error::Config(format!(
                "--rate must be within [0, 1], got {}",
                self.error_rate
            )));
        }
        if self.trials == 0 {
            return Err(Error::Config("--trials must be at least 1".into()));
        }
        Ok(())
    }

    /// Resolve the message bytes.
    pub fn load_message(&self) -> Result<Vec<u8>> {
        match &self.source {
            MessageSource::Text(text) => Ok(text.as_bytes().to_vec()),
            MessageSource::File(path) => Ok(std::fs::read(path)?),
            MessageSource::Generated(len) => Ok(input_gen::generate_message(self.seed, *len)),
        }
    }

    /// Build the simulation request for `message`.
    pub fn request(&self, message: Vec<u8>) -> SimulationRequest {
        SimulationRequest::new(message, self.nsym)
            .with_error_rate(self.error_rate)
            .with_model(self.model)
            .with_channel_label(self.channel.clone())
            .with_seed(self.seed)
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.source {
            MessageSource::Text(text) => println!("Message: {text:?}"),
            MessageSource::File(path) => println!("Message file: {}", path.display()),
            MessageSource::Generated(len) => println!("Message: generated, {len} bytes"),
        }
        println!("Parity symbols: {}", self.nsym);
        println!();
        println!("=== Channel ===");
        println!("Seed: {}", self.seed);
        println!("Label: {}", self.channel);
        println!("Model: {}", self.model);
        println!("Error rate: {:.2}%", self.error_rate * 100.0);
        println!();
        println!("=== Batch ===");
        println!("Trials: {}", self.trials);
        println!();
    }
}

/// Advance to the value following `args[*i]`.
fn value<'a>(args: &'a [String], i: &mut usize, what: &str) -> Result<&'a str> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| Error::Config(format!("{flag} requires {what}")))
}

fn parse<T: std::str::FromStr>(args: &[String], i: &mut usize, what: &str) -> Result<T> {
    let raw = value(args, i, what)?;
    raw.parse()
        .map_err(|_| Error::Config(format!("invalid {what}: {raw}")))
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

fn print_help() {
    println!("fec-sim: Reed-Solomon transmission simulator");
    println!();
    println!("USAGE:");
    println!("    fec-sim [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --message <TEXT>        Message to transmit");
    println!("    --in <PATH>             Read the message from a file");
    println!(
        "    --len <N>               Generated message length (default: {DEFAULT_MESSAGE_LEN})"
    );
    println!();
    println!("    --nsym <N>              Parity symbols (default: {DEFAULT_NSYM})");
    println!("    --rate <F>              Error rate 0.0-1.0 (default: {DEFAULT_ERROR_RATE})");
    println!("    --model <MODEL>         random, burst or erasures (default: random)");
    println!("    --channel <LABEL>       Channel label (default: {DEFAULT_CHANNEL})");
    println!("    --seed <N>              Random seed for determinism (default: time-based)");
    println!();
    println!("    --trials <N>            Independent runs, seeds seed..seed+N-1 (default: 1)");
    println!();
    println!("    --json                  Print the report as JSON");
    println!("    --print-config          Print resolved configuration");
    println!("    --log-level <LEVEL>     Log filter when RUST_LOG is unset (default: warn)");
    println!("    --json-logs             Emit logs as JSON on stderr");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    fec-sim                                   # Random message, random defaults");
    println!("    fec-sim --message HELLO --nsym 4 --seed 7 # Deterministic run");
    println!("    fec-sim --model burst --rate 0.1          # Single burst over 10% of the block");
    println!("    fec-sim --trials 1000 --json              # Batch statistics as JSON");
    println!();
}
