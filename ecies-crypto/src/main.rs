use std::{process::ExitCode, time::Instant};

use clap::Parser;
use ecies_crypto::selftest::{DEFAULT_ITERATIONS, DEFAULT_MAX_LEN, RoundTripCheck};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ecies-crypto", about = "ECIES round-trip self-test")]
pub struct SelfTestArgs {
    /// Number of messages to encrypt and decrypt
    #[arg(short = 'i', long = "iterations", default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Plaintext lengths cycle through 0..max-len
    #[arg(short = 'm', long = "max-len", default_value_t = DEFAULT_MAX_LEN)]
    max_len: usize,

    /// Seed for a deterministic ChaCha20 generator; the OS generator seeds it otherwise
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    let args = SelfTestArgs::parse();
    let mut rng = match args.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_os_rng(),
    };

    info!(iterations = args.iterations, max_len = args.max_len, seed = ?args.seed, "running self-test");

    let now = Instant::now();
    let passed = RoundTripCheck::new(args.iterations, args.max_len).run(&mut rng);
    let elapsed = now.elapsed();

    if passed {
        info!(?elapsed, "self-test passed");
        ExitCode::SUCCESS
    } else {
        error!(?elapsed, "self-test failed");
        ExitCode::FAILURE
    }
}
