//! TLS Client Certificate Authenticator
//!
//! Decides whether an RPC client presenting a TLS client certificate may
//! proceed, and computes the metadata attached to its requests.
//!
//! # Features
//!
//! - **Deterministic chain validation**: certificates are verified against a
//!   fixed trust anchor pool at a reference time read from an injectable
//!   [`Clock`]
//! - **Declarative policy**: an accept predicate and a metadata projection,
//!   both JMESPath expressions over a [`CertificateView`](tls::CertificateView)
//! - **Framework agnostic**: peer state arrives through the narrow
//!   [`PeerContext`] capability
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tls_client_auth::{
//!     Authenticator, AuthenticatorConfig, CallContext, SystemClock,
//!     TlsClientCertificateAuthenticator,
//! };
//!
//! let config = AuthenticatorConfig::load(Some("auth.yaml".as_ref()))?;
//! let authenticator = TlsClientCertificateAuthenticator::from_config(&config, Arc::new(SystemClock))?;
//!
//! match authenticator.authenticate(&CallContext::background()) {
//!     Ok(metadata) => println!("{}", metadata.raw()),
//!     Err(e) => eprintln!("{}: {e}", e.code()),
//! }
//! # Ok::<(), tls_client_auth::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod authenticator;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod metadata;
pub mod peer;
pub mod policy;
pub mod tls;

pub use authenticator::{Authenticator, TlsClientCertificateAuthenticator};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AuthenticatorConfig;
pub use error::{AuthError, Code, Error, Result};
pub use metadata::AuthenticationMetadata;
pub use peer::{CallContext, Peer, PeerContext, TlsInfo};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Setup tracing/logging
///
/// # Errors
///
/// Returns `Error::Internal` if a global subscriber is already installed.
pub fn setup_tracing(level: &str, format: Option<&str>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        Some("json") => subscriber.with(fmt::layer().json()).try_init(),
        _ => subscriber.with(fmt::layer()).try_init(),
    }
    .map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {e}")))
}
