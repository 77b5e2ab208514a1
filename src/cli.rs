//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// TLS client certificate authenticator - try admission policies offline
#[derive(Parser, Debug)]
#[command(name = "tls-client-auth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "TLS_CLIENT_AUTH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        long,
        default_value = "info",
        env = "TLS_CLIENT_AUTH_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "TLS_CLIENT_AUTH_LOG_FORMAT", global = true)]
    pub log_format: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Authenticate a client certificate chain against the configured policy
    Verify {
        /// PEM file holding the client chain, leaf first
        #[arg(long, required = true)]
        cert: PathBuf,

        /// Reference time (RFC 3339) instead of the current time
        #[arg(long)]
        at: Option<String>,
    },
}
