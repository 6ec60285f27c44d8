use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "raven-rpc")]
#[command(about = "Ravencoin JSON-RPC client", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Path to the configuration file, created with defaults if missing",
        default_value = "data/raven-rpc.toml"
    )]
    pub config: PathBuf,
    #[arg(long, global = true, help = "Path to a log4rs configuration file")]
    pub log_config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Invoke one remote procedure and print its outcome
    Call {
        #[arg(help = "Procedure name, e.g. getblockcount")]
        method: String,
        #[arg(
            help = "Positional arguments, converted by the procedure's declared argument kinds",
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        args: Vec<String>,
    },
    /// Send several calls as a single batch request
    Batch {
        #[arg(
            short,
            long = "call",
            required = true,
            help = "A call as \"<method> [args...]\", repeat for each call"
        )]
        calls: Vec<String>,
    },
    /// Write the default configuration file
    InitConfig {
        #[arg(short, long, help = "Overwrite an existing file")]
        force: bool,
    },
}

/// Splits a batch call given as `"<method> [args...]"` on whitespace.
pub fn split_call(call: &str) -> Option<(String, Vec<String>)> {
    let mut parts = call.split_whitespace().map(str::to_string);
    let method = parts.next()?;
    Some((method, parts.collect()))
}
