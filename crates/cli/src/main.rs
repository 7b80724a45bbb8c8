//! Command Line Interface for the oracle-priced AMM.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use oracle_amm_engine::prelude::PoolConfig;
use std::env;
use std::path::PathBuf;
use tracing::info;

mod report;
mod sandbox;
mod script;

use sandbox::Sandbox;
use script::Script;

/// Environment variable naming the pool configuration file.
const CONFIG_ENV: &str = "ORACLE_AMM_CONFIG";

#[derive(Parser)]
#[command(name = "oracle-amm")]
#[command(about = "Oracle-priced AMM pool simulator", long_about = None)]
struct Cli {
    /// Pool configuration file (JSON). Defaults to $ORACLE_AMM_CONFIG, then
    /// built-in defaults.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deposit, buy, sell and withdraw at fixed oracle prices
    Scenario,
    /// Run a JSON script of pool operations
    Run {
        /// Script file
        #[arg(short, long)]
        script: PathBuf,
    },
    /// Print the effective pool configuration
    Config,
}

fn load_config(path: Option<PathBuf>) -> Result<PoolConfig> {
    let path = path.or_else(|| env::var(CONFIG_ENV).ok().map(PathBuf::from));
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading pool configuration");
            PoolConfig::from_file(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
        None => Ok(PoolConfig::default()),
    }
}

async fn execute(config: PoolConfig, script: &Script) -> Result<()> {
    let sandbox = Sandbox::new(config, script.update_fee)?;
    let report = script::run(&sandbox, script).await?;

    println!("\n📜 Operations");
    report::print_steps(&report);
    println!("\n🏦 Pool");
    report::print_pool(&sandbox).await?;
    println!("\n👥 Providers");
    report::print_providers(&sandbox).await;
    println!("\n💰 Balances");
    report::print_balances(&sandbox, &report.accounts).await?;
    println!("\n📒 Journal");
    report::print_journal(&sandbox).await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Scenario => {
            println!("🚀 Running reference scenario...");
            execute(config, &Script::reference()).await?;
        }
        Commands::Run { script } => {
            let parsed = Script::from_file(&script)?;
            println!(
                "🚀 Running {} operations from {}...",
                parsed.operations.len(),
                script.display()
            );
            execute(config, &parsed).await?;
        }
        Commands::Config => {
            report::print_config(&config);
        }
    }

    Ok(())
}
