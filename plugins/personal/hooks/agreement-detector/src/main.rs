//! Stop hook that blocks replies opening with reflexive agreement ("you are
//! absolutely right", "你是对的", "맞습니다", "その通りです", ...) and asks for
//! grounded technical analysis instead.
//!
//! Reads the hook payload from stdin, scans the start of the recent assistant
//! messages in the current turn, and prints a `{"decision":"block"}` JSON when
//! a phrase is found. Always exits 0; detection is advisory.

use std::io::{self, Read};
use std::process;

use agreement_detector::{hook, Config, PhraseDetector};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "AGREEMENT_DETECTOR_LOG";

fn main() {
    // stdout is reserved for the hook decision.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        warn!(error = %e, "failed to read hook payload");
        process::exit(0);
    }

    let config = Config::from_env();

    let detector = match PhraseDetector::builtin() {
        Ok(d) => d.with_max_input_bytes(config.max_input_bytes),
        Err(e) => {
            error!(error = %e, "failed to compile phrase catalog");
            process::exit(0);
        }
    };

    if let Some(output) = hook::evaluate(&input, &detector, &config) {
        match serde_json::to_string(&output) {
            Ok(json) => println!("{}", json),
            Err(e) => error!(error = %e, "failed to serialize hook output"),
        }
    }

    process::exit(0);
}
