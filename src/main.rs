//! Fundview CLI
//!
//! Command-line front end for the fund dashboard:
//! - Fund summary and NAV history
//! - Investor position lookup
//! - Endpoint status
//! - Live watch mode

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fundview::view::{format_date, format_nav};
use fundview::{
    Address, Config, ContractClient, ContractClientConfig, Dashboard, DashboardView, Inbound,
    StaticWallet, WalletProvider,
};

#[derive(Parser)]
#[command(name = "fundview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Read-only dashboard for an on-chain investment fund")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show fund-level metrics
    Summary,

    /// Show the NAV history
    History,

    /// Show an investor's position
    Position {
        /// Investor address (0x-prefixed)
        address: Address,
    },

    /// Compare the RPC endpoint's chain with the configured one
    Status,

    /// Keep the dashboard running and print every change
    Watch {
        /// Connect this account
        #[arg(short, long)]
        wallet: Option<Address>,
        /// Seconds between fund data refreshes
        #[arg(short, long, default_value = "60")]
        interval_secs: u64,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        return write_default_config(output.as_deref());
    }

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config);
    config.validate().context("invalid configuration")?;

    tracing::debug!(
        contract = %config.network.contract_address,
        chain = %config.network.chain_name,
        "Fundview v{}",
        env!("CARGO_PKG_VERSION")
    );

    let client = Arc::new(ContractClient::new(ContractClientConfig {
        rpc_url: config.network.rpc_url.clone(),
        contract_address: config.network.contract_address,
        request_timeout_ms: config.rpc.request_timeout_ms,
    })?);

    match cli.command {
        Commands::Summary => {
            let dashboard = mounted(&config, client, None).await;
            let state = dashboard.state();
            let Some(fund) = &state.fund else {
                bail!(state.error.clone().unwrap_or_else(|| "fund data unavailable".to_string()));
            };

            let view = DashboardView::from_state(state, &config.network);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(fund)?),
                OutputFormat::Table => {
                    if let Some(card) = &view.fund {
                        print!("{}", card);
                    }
                    if let Some(chart) = &view.chart {
                        println!();
                        print!("{}", chart);
                    }
                }
            }
        }

        Commands::History => {
            let dashboard = mounted(&config, client, None).await;
            let state = dashboard.state();
            if state.fund.is_none() {
                bail!(state.error.clone().unwrap_or_else(|| "fund data unavailable".to_string()));
            }

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&state.nav_history)?)
                }
                OutputFormat::Table => {
                    if state.nav_history.is_empty() {
                        println!("No NAV history recorded");
                        return Ok(());
                    }

                    println!("{:>5}  {:<14}  {:>8}", "#", "Date", "NAV");
                    println!("{}", "-".repeat(31));
                    for (index, point) in state.nav_history.iter().enumerate() {
                        println!(
                            "{:>5}  {:<14}  {:>8}",
                            index,
                            format_date(point.timestamp),
                            format_nav(point.nav)
                        );
                    }

                    if let Some(chart) = DashboardView::from_state(state, &config.network).chart {
                        println!();
                        print!("{}", chart);
                    }
                }
            }
        }

        Commands::Position { address } => {
            let wallet: Arc<dyn WalletProvider> =
                Arc::new(StaticWallet::new(vec![address], config.network.chain_id));
            let mut dashboard = mounted(&config, client, Some(wallet)).await;
            if dashboard.state().connection.address() != Some(address) {
                dashboard.connect().await;
            }

            let state = dashboard.state();
            if let Some(error) = &state.error {
                eprintln!("Warning: {}", error);
            }

            match cli.format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "address": address,
                        "connection": state.connection,
                        "position": state.position,
                    }))?
                ),
                OutputFormat::Table => {
                    print!("{}", DashboardView::from_state(state, &config.network).position)
                }
            }
        }

        Commands::Status => {
            let endpoint_chain = client
                .chain_id()
                .await
                .with_context(|| format!("RPC endpoint {} unreachable", config.network.rpc_url))?;
            let matches = endpoint_chain == config.network.chain_id;

            match cli.format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "rpc_url": client.config().rpc_url,
                        "contract": client.config().contract_address,
                        "endpoint_chain_id": endpoint_chain,
                        "configured_chain_id": config.network.chain_id,
                        "matches": matches,
                    }))?
                ),
                OutputFormat::Table => {
                    println!("RPC endpoint:   {}", client.config().rpc_url);
                    println!("Endpoint chain: {}", endpoint_chain);
                    println!(
                        "Configured:     {} ({})",
                        config.network.chain_id, config.network.chain_name
                    );
                    println!("Contract:       {}", client.config().contract_address);
                }
            }

            if !matches {
                bail!(
                    "endpoint is on chain {} but {} ({}) is configured",
                    endpoint_chain,
                    config.network.chain_name,
                    config.network.chain_id
                );
            }
        }

        Commands::Watch {
            wallet,
            interval_secs,
        } => {
            let wallet = wallet.map(|address| {
                Arc::new(StaticWallet::new(vec![address], config.network.chain_id))
                    as Arc<dyn WalletProvider>
            });
            watch(&config, client, wallet, interval_secs, cli.format).await?;
        }

        Commands::Config { .. } => unreachable!("handled before config load"),
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("fundview={}", config.logging.level).into());
    let json = config.logging.format == "json";

    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn write_default_config(output: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = fundview::config::generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => print!("{}", config),
    }

    Ok(())
}

async fn mounted(
    config: &Config,
    client: Arc<ContractClient>,
    wallet: Option<Arc<dyn WalletProvider>>,
) -> Dashboard {
    let mut dashboard = Dashboard::new(
        config.network.clone(),
        client,
        config.rpc.history_concurrency,
        wallet,
    );
    dashboard.mount().await;
    dashboard
}

/// Run the dashboard event loop until Ctrl-C
async fn watch(
    config: &Config,
    client: Arc<ContractClient>,
    wallet: Option<Arc<dyn WalletProvider>>,
    interval_secs: u64,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new(
        config.network.clone(),
        client,
        config.rpc.history_concurrency,
        wallet,
    );
    let (tx, rx) = mpsc::channel(32);

    // Print settled states only, skipping repeats
    let mut updates = dashboard.subscribe();
    let network = config.network.clone();
    let printer = tokio::spawn(async move {
        let mut last = String::new();
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            if state.loading.any() {
                continue;
            }

            let view = DashboardView::from_state(&state, &network);
            let rendered = match format {
                OutputFormat::Json => serde_json::to_string(&view).unwrap_or_default(),
                OutputFormat::Table => format!("{}\n{}", "=".repeat(48), view),
            };
            if rendered != last {
                println!("{}", rendered);
                last = rendered;
            }
        }
    });

    let refresh_tx = tx.clone();
    let ticker = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        // First tick fires immediately; mount already loaded
        interval.tick().await;
        loop {
            interval.tick().await;
            if refresh_tx.send(Inbound::Refresh).await.is_err() {
                break;
            }
        }
    });

    let shutdown = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Received Ctrl-C, shutting down");
        }
        let _ = tx.send(Inbound::Shutdown).await;
    });

    tracing::info!(
        interval_secs,
        read_only = !dashboard.has_wallet(),
        "Watching fund"
    );
    dashboard.run(rx).await;

    ticker.abort();
    shutdown.abort();
    drop(dashboard);
    printer.await?;

    Ok(())
}
