use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, ValueEnum};
use seqid::{DEFAULT_CLAIM_ATTEMPTS, DEFAULT_MAX_ATTEMPTS};

/// How identifiers are derived from the store.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Read the highest stored identifier and probe for a free successor.
    Probing,
    /// Atomically increment a per-prefix counter.
    Counter,
}

/// Runtime configuration for the `seqid-axum-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is honoured).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "seqid-axum-server",
    version,
    about = "An HTTP service allocating prefixed sequential identifiers"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:3000"))]
    pub server_addr: String,

    /// Allocation strategy.
    ///
    /// `probing` reproduces the scan-and-probe scheme and tolerates a small
    /// race between concurrent callers. `counter` is race-free.
    ///
    /// Environment variable: `ALLOCATOR_STRATEGY`
    #[arg(long, env = "ALLOCATOR_STRATEGY", value_enum, default_value_t = Strategy::Probing)]
    pub strategy: Strategy,

    /// Probing rounds before an allocation fails with a contention error.
    ///
    /// Environment variable: `MAX_ATTEMPTS`
    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Allocate-then-write rounds for claim requests.
    ///
    /// Environment variable: `CLAIM_ATTEMPTS`
    #[arg(long, env = "CLAIM_ATTEMPTS", default_value_t = DEFAULT_CLAIM_ATTEMPTS)]
    pub claim_attempts: u32,

    /// JSON file holding an array of previously issued identifiers to load
    /// into the store at startup.
    ///
    /// Environment variable: `SEED_FILE`
    #[arg(long, env = "SEED_FILE")]
    pub seed_file: Option<PathBuf>,
}

/// Validated server configuration derived from [`CliArgs`].
///
/// Both attempt bounds are guaranteed to be non-zero.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the listener binds to.
    pub server_addr: String,
    /// Allocation strategy behind every endpoint.
    pub strategy: Strategy,
    /// Probing rounds per allocation (probing strategy only).
    pub max_attempts: u32,
    /// Allocate-then-write rounds per claim.
    pub claim_attempts: u32,
    /// Optional JSON array of identifiers loaded at startup.
    pub seed_file: Option<PathBuf>,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.max_attempts == 0 {
            bail!("MAX_ATTEMPTS must be greater than 0");
        }

        if args.claim_attempts == 0 {
            bail!("CLAIM_ATTEMPTS must be greater than 0");
        }

        if args.server_addr.trim().is_empty() {
            bail!("SERVER_ADDR must not be empty");
        }

        Ok(Self {
            server_addr: args.server_addr,
            strategy: args.strategy,
            max_attempts: args.max_attempts,
            claim_attempts: args.claim_attempts,
            seed_file: args.seed_file,
        })
    }
}
