//! Error types for the TLS client certificate authenticator
//!
//! Two layers:
//! - [`Error`] covers construction and configuration faults. These are fatal
//!   and surface at startup.
//! - [`AuthError`] is the per-call outcome of
//!   [`Authenticator::authenticate`](crate::Authenticator::authenticate). Its
//!   `Display` output is the exact message handed back to the client.

use std::fmt;

use thiserror::Error;

use crate::metadata::MetadataError;
use crate::policy::PolicyError;
use crate::tls::ProjectionError;

/// Result type alias for construction and configuration
pub type Result<T> = std::result::Result<T, Error>;

/// Construction and configuration errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A policy expression failed to compile
    #[error("Invalid expression `{expression}`: {message}")]
    Expression {
        /// Source text of the expression
        expression: String,
        /// Compiler diagnostic
        message: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Status code attached to an [`AuthError`].
///
/// Mirrors the two RPC status codes the authenticator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// The client could not be authenticated.
    Unauthenticated,
    /// The server is misconfigured; not the client's fault.
    Internal,
}

impl Code {
    /// Canonical upper-case name, as used by RPC status codes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a failed authentication attempt.
///
/// Variants are listed in the order the authenticator checks them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// The call context carries no transport peer information.
    #[error("Connection was not established using gRPC")]
    NoPeer,

    /// Peer information is present, but the connection is not TLS.
    #[error("Connection was not established using TLS")]
    NoTls,

    /// The TLS handshake completed without a client certificate.
    #[error("Client provided no TLS client certificate")]
    NoCertificate,

    /// The presented certificate does not chain to a trust anchor at the
    /// reference time. Carries the verifier's diagnostic verbatim.
    #[error("Cannot validate TLS client certificate: {0}")]
    ChainValidation(rustls::Error),

    /// The certificate passed validation but its claims cannot be read.
    #[error("Cannot extract TLS client certificate claims: {0}")]
    Projection(#[from] ProjectionError),

    /// The accept predicate did not admit the certificate.
    ///
    /// The message is fixed so clients cannot probe which claim failed.
    #[error("Rejected TLS client certificate claims")]
    Rejected,

    /// A policy expression produced something the authenticator cannot use.
    #[error("Invalid authentication policy: {0}")]
    Policy(#[from] PolicyError),

    /// The metadata expression's result is not valid authentication metadata.
    #[error("Failed to create authentication metadata: {0}")]
    Metadata(#[from] MetadataError),
}

impl AuthError {
    /// Status code to report to the client.
    #[must_use]
    pub fn code(&self) -> Code {
        match self {
            Self::NoPeer
            | Self::NoTls
            | Self::NoCertificate
            | Self::ChainValidation(_)
            | Self::Rejected => Code::Unauthenticated,
            Self::Projection(_) | Self::Policy(_) | Self::Metadata(_) => Code::Internal,
        }
    }
}
