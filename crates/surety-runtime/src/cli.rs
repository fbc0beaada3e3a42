//! # Command Line
//!
//! Every command first bootstraps the session, then acts on the published
//! state. Against a live node a converged cache makes that free; under
//! `--simulate` the chain is fresh for each invocation, so the cache stays
//! in memory.

use crate::container::config::SuretyConfig;
use crate::container::session::{load_seed, CacheMode, Session};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use fs_01_contract_gateway::{
    parse_ether, ContractGateway, HttpTransport, InMemoryChain, RpcContractGateway, TxReceipt,
};
use fs_02_convergence_cache::{ConvergenceCache, FileBackedKVStore};
use fs_03_bootstrap::{BootstrapReport, Pool, SeedDataset};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Default number of simulated accounts.
pub const DEFAULT_SIMULATED_ACCOUNTS: usize = 20;

/// FlightSurety client.
#[derive(Parser, Debug)]
#[command(name = "surety")]
#[command(about = "Bootstrap FlightSurety airlines and flights, buy insurance, request flight status")]
#[command(version)]
pub struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "surety.toml")]
    pub config: PathBuf,

    /// Profile to connect with (overrides FS_PROFILE)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Run against in-process simulated contracts
    #[arg(long)]
    pub simulate: bool,

    /// Accounts on the simulated chain
    #[arg(long, default_value_t = DEFAULT_SIMULATED_ACCOUNTS)]
    pub accounts: usize,

    /// Print Prometheus counters before exiting
    #[arg(long)]
    pub dump_metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Converge airlines and flights on-chain and show the result
    Bootstrap {
        /// Print the full view as JSON
        #[arg(long)]
        json: bool,
    },

    /// Buy flight delay insurance for a passenger
    BuyInsurance {
        /// Passenger address or name
        #[arg(long)]
        passenger: String,
        /// Flight code
        #[arg(long)]
        flight: String,
        /// Premium in ether (at most 1)
        #[arg(long)]
        premium: String,
    },

    /// Ask the oracles for a flight's status
    RequestStatus {
        /// Requesting passenger or airline address, or passenger name
        #[arg(long)]
        requester: String,
        /// Flight code
        #[arg(long)]
        flight: String,
    },

    /// Delete every cached bootstrap result
    ClearCache,
}

/// Load configuration: file, then `FS_*` environment, then flags.
pub fn resolve_config(args: &Args) -> Result<SuretyConfig> {
    let mut config = SuretyConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    config.apply_env();
    if let Some(profile) = &args.profile {
        config.profile = profile.clone();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Execute `args`. Returns `false` when `bootstrap` did not converge.
pub async fn execute(args: &Args) -> Result<bool> {
    let config = resolve_config(args)?;

    if args.command == Command::ClearCache {
        return clear_cache(&config);
    }

    let seed = load_seed(&config)
        .with_context(|| format!("loading seed {}", config.bootstrap.seed_path.display()))?;

    if args.simulate {
        info!("[runtime] Simulated chain with {} accounts", args.accounts);
        let chain = Arc::new(InMemoryChain::new(args.accounts));
        return serve(chain, &config, seed, CacheMode::Memory, &args.command).await;
    }

    let session = config.session().context("building session")?;
    info!(
        "[runtime] Profile '{}' at {} (app {}, data {})",
        config.profile,
        session.rpc_url,
        session.app_address.short(),
        session.data_address.short()
    );
    let transport = HttpTransport::new(session.rpc_url.clone(), config.rpc_timeout())
        .context("building HTTP transport")?;
    let gateway = Arc::new(
        RpcContractGateway::new(session, transport).with_receipt_polling(config.receipt_polling()),
    );
    let cache = CacheMode::File(config.cache.path.clone());
    serve(gateway, &config, seed, cache, &args.command).await
}

async fn serve<G: ContractGateway + 'static>(
    gateway: Arc<G>,
    config: &SuretyConfig,
    seed: SeedDataset,
    cache: CacheMode,
    command: &Command,
) -> Result<bool> {
    let session = Session::open(gateway, config, seed, cache)
        .await
        .context("opening session")?;
    let report = session.bootstrap().await;

    match command {
        Command::Bootstrap { json } => {
            if *json {
                let snapshot = session.view().snapshot();
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_report(&session, &report);
            }
            Ok(report.is_converged())
        }
        Command::BuyInsurance {
            passenger,
            flight,
            premium,
        } => {
            warn_if_diverged(&report);
            let passenger = session.resolve_account(passenger)?;
            let premium =
                parse_ether(premium).ok_or_else(|| anyhow!("invalid premium '{premium}'"))?;
            let receipt = session
                .buy_insurance(passenger, flight, premium)
                .await
                .context("buying insurance")?;
            print_receipt("Insurance purchased", &receipt);
            Ok(true)
        }
        Command::RequestStatus { requester, flight } => {
            warn_if_diverged(&report);
            let requester = session.resolve_account(requester)?;
            let receipt = session
                .request_flight_status(requester, flight)
                .await
                .context("requesting flight status")?;
            print_receipt("Status requested", &receipt);
            Ok(true)
        }
        Command::ClearCache => bail!("clear-cache does not open a session"),
    }
}

fn clear_cache(config: &SuretyConfig) -> Result<bool> {
    let store = FileBackedKVStore::open(&config.cache.path)
        .with_context(|| format!("opening cache {}", config.cache.path.display()))?;
    let cache = ConvergenceCache::new(store);
    let removed = cache.clear().context("clearing cache")?;
    println!(
        "Removed {} cache keys from {}",
        removed,
        config.cache.path.display()
    );
    Ok(true)
}

fn warn_if_diverged(report: &BootstrapReport) {
    if !report.is_converged() {
        warn!("[runtime] Bootstrap did not converge; acting on partial state");
    }
}

fn print_report<G: ContractGateway + 'static>(session: &Session<G>, report: &BootstrapReport) {
    let view = session.view();
    println!("Operational: {}", report.operational);
    match &report.authorization {
        Ok(()) => println!("App contract authorized"),
        Err(e) => println!("Authorization failed: {e}"),
    }

    println!("Airlines ({}):", view.phase(Pool::Airlines));
    for airline in view.airlines() {
        println!("  {}  {}", airline.address, airline.name);
    }
    if let Err(e) = &report.airlines {
        println!("  error: {e}");
    }

    println!("Flights ({}):", view.phase(Pool::Flights));
    for flight in view.flights() {
        println!(
            "  {:<8} {:>14}  {}",
            flight.flight,
            flight.timestamp,
            flight.airline_name.as_deref().unwrap_or("-")
        );
    }
    if let Err(e) = &report.flights {
        println!("  error: {e}");
    }

    println!("Passengers:");
    for passenger in &report.passengers {
        println!("  {}  {}", passenger.address, passenger.name);
    }
}

fn print_receipt(what: &str, receipt: &TxReceipt) {
    match receipt.block_number {
        Some(block) => println!("{what}: tx {} in block {block}", receipt.tx_hash),
        None => println!("{what}: tx {}", receipt.tx_hash),
    }
}
