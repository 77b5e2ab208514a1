//! TLS client certificate authenticator CLI
//!
//! Runs the authenticator against certificate files, so operators can check
//! an admission policy before deploying it.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use tls_client_auth::{
    Authenticator, AuthenticatorConfig, CallContext, Clock, FixedClock, Peer, SystemClock,
    TlsClientCertificateAuthenticator, TlsInfo,
    cli::{Cli, Command},
    setup_tracing,
    tls::load_certs,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = setup_tracing(&cli.log_level, cli.log_format.as_deref()) {
        eprintln!("Failed to setup tracing: {e}");
        return ExitCode::FAILURE;
    }

    let result = match &cli.command {
        Command::Verify { cert, at } => run_verify(cli.config.as_deref(), cert, at.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Authenticate a PEM chain and print the resulting metadata.
fn run_verify(config: Option<&Path>, cert: &Path, at: Option<&str>) -> anyhow::Result<ExitCode> {
    let config = AuthenticatorConfig::load(config)?;

    let clock: Arc<dyn Clock> = match at {
        Some(at) => {
            let at = chrono::DateTime::parse_from_rfc3339(at)
                .with_context(|| format!("Invalid --at timestamp '{at}'"))?;
            Arc::new(FixedClock::new(SystemTime::from(at)))
        }
        None => Arc::new(SystemClock),
    };

    let authenticator = TlsClientCertificateAuthenticator::from_config(&config, clock)?;
    let chain = load_certs(cert)?;
    let ctx = CallContext::with_peer(Peer::tls(None, TlsInfo::with_certificates(chain)));

    match authenticator.authenticate(&ctx) {
        Ok(metadata) => {
            info!(cert = %cert.display(), "client certificate accepted");
            println!("{}", serde_json::to_string_pretty(&metadata.raw())?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            warn!(cert = %cert.display(), code = %e.code(), "client certificate refused");
            eprintln!("{}: {e}", e.code());
            Ok(ExitCode::FAILURE)
        }
    }
}
