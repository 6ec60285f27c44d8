use std::path::Path;

use anyhow::{Context, bail};
use clap::Parser;
use log::{debug, info};
use ravencoin_rpc::cli::{Cli, Commands, split_call};
use ravencoin_rpc::config::{init_config, load_configuration};
use ravencoin_rpc::log::init_logging;
use ravencoin_rpc::rpc::{Outcome, RpcClient, callspec::coerce_args};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging(cli.log_config.as_deref())?;

    match cli.command {
        Commands::InitConfig { force } => {
            if init_config(&cli.config, force)? {
                println!("Wrote default configuration to {}", cli.config.display());
            } else {
                println!(
                    "Configuration {} already exists, use --force to overwrite",
                    cli.config.display()
                );
            }
            Ok(())
        },
        Commands::Call { method, args } => {
            let client = connect(&cli.config)?;
            let params = coerce_args(&method, &args)?;
            let outcome = client.invoke(&method, params).await;
            print_outcome(&outcome)?;
            match outcome.error() {
                Some(e) => bail!("{method} failed with status {}", e.status),
                None => Ok(()),
            }
        },
        Commands::Batch { calls } => {
            let client = connect(&cli.config)?;
            let mut batch = client.open_batch()?;
            let mut methods = Vec::with_capacity(calls.len());
            for call in &calls {
                let (method, args) = split_call(call).with_context(|| format!("Empty call '{call}'"))?;
                let params = coerce_args(&method, &args)?;
                batch.push(&method, params);
                methods.push(method);
            }
            debug!(calls = methods.len(); "Flushing batch");

            let outcomes = batch.flush().await;
            let mut failed = 0;
            for (method, outcome) in methods.iter().zip(&outcomes) {
                println!("{method}:");
                print_outcome(outcome)?;
                if !outcome.is_success() {
                    failed += 1;
                }
            }
            if failed > 0 {
                bail!("{failed} of {} calls failed", outcomes.len());
            }
            Ok(())
        },
    }
}

fn connect(config_path: &Path) -> Result<RpcClient, anyhow::Error> {
    let config = load_configuration(config_path)?;
    info!(endpoint = config.url.as_str(); "Connecting to node");
    RpcClient::new(config).context("Could not create RPC client")
}

fn print_outcome(outcome: &Outcome) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}
