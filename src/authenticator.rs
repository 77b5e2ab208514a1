//! TLS client certificate authenticator.
//!
//! # Decision sequence
//!
//! Each step either fails terminally or hands over to the next:
//!
//! ```text
//! context ─▶ peer? ─▶ TLS? ─▶ certificate? ─▶ chain valid at clock.now()?
//!                                               ─▶ accept predicate ─▶ metadata
//! ```
//!
//! Only the first presented certificate is validated and projected; the
//! rest serve as untrusted intermediates. All shared state is read-only, so
//! one authenticator can serve any number of concurrent calls.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::clock::Clock;
use crate::config::AuthenticatorConfig;
use crate::error::AuthError;
use crate::metadata::AuthenticationMetadata;
use crate::peer::PeerContext;
use crate::policy::{ExpressionLanguage, JmesPath, PolicyEvaluator, PolicyOutcome};
use crate::tls::{CertificateView, ChainValidator, TrustAnchorPool, VerifiedLeaf};
use crate::Result;

/// Decides whether an inbound call may proceed.
pub trait Authenticator: Send + Sync {
    /// Authenticate the call described by `ctx`.
    ///
    /// # Errors
    ///
    /// Returns the terminal [`AuthError`] of the first failing check.
    fn authenticate(&self, ctx: &dyn PeerContext) -> std::result::Result<AuthenticationMetadata, AuthError>;
}

/// Authenticates clients by their TLS client certificate.
pub struct TlsClientCertificateAuthenticator {
    validator: ChainValidator,
    clock: Arc<dyn Clock>,
    policy: PolicyEvaluator,
}

impl TlsClientCertificateAuthenticator {
    /// Build an authenticator from its parts.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the trust anchors cannot back a verifier.
    pub fn new(trust_anchors: &TrustAnchorPool, clock: Arc<dyn Clock>, policy: PolicyEvaluator) -> Result<Self> {
        let validator = ChainValidator::new(trust_anchors)?;
        debug!(
            anchors = trust_anchors.len(),
            accept = policy.accept_source(),
            metadata = policy.metadata_source(),
            "TLS client certificate authenticator ready"
        );
        Ok(Self {
            validator,
            clock,
            policy,
        })
    }

    /// Build an authenticator from configuration, compiling expressions as
    /// JMESPath.
    ///
    /// # Errors
    ///
    /// Returns an error if the CA set cannot be loaded or an expression does
    /// not compile.
    pub fn from_config(config: &AuthenticatorConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::from_config_with_language(config, clock, &JmesPath)
    }

    /// Like [`from_config`](Self::from_config), with a caller-chosen
    /// expression language.
    ///
    /// # Errors
    ///
    /// Returns an error if the CA set cannot be loaded or an expression does
    /// not compile.
    pub fn from_config_with_language(
        config: &AuthenticatorConfig,
        clock: Arc<dyn Clock>,
        language: &dyn ExpressionLanguage,
    ) -> Result<Self> {
        let anchors = config.trust_anchors()?;
        let policy = PolicyEvaluator::compile(
            language,
            &config.validation_expression,
            &config.metadata_extraction_expression,
        )?;
        Self::new(&anchors, clock, policy)
    }
}

impl Authenticator for TlsClientCertificateAuthenticator {
    fn authenticate(&self, ctx: &dyn PeerContext) -> std::result::Result<AuthenticationMetadata, AuthError> {
        let peer = ctx.peer().ok_or(AuthError::NoPeer)?;
        let tls = peer.tls.as_ref().ok_or(AuthError::NoTls)?;
        let leaf = tls.leaf().ok_or(AuthError::NoCertificate)?;

        let verified = self
            .validator
            .validate(leaf, tls.intermediates(), self.clock.now())
            .map_err(AuthError::ChainValidation)?;

        self.admit(&verified)
    }
}

impl TlsClientCertificateAuthenticator {
    /// Project the verified leaf and run the policy over its claims.
    fn admit(&self, verified: &VerifiedLeaf<'_>) -> std::result::Result<AuthenticationMetadata, AuthError> {
        let view = CertificateView::project(verified)?.to_value();
        match self.policy.evaluate(&view)? {
            PolicyOutcome::Rejected => Err(AuthError::Rejected),
            PolicyOutcome::Accepted(raw) => Ok(AuthenticationMetadata::from_raw(raw)?),
        }
    }
}

impl fmt::Debug for TlsClientCertificateAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsClientCertificateAuthenticator")
            .field("clock", &self.clock)
            .field("accept", &self.policy.accept_source())
            .field("metadata", &self.policy.metadata_source())
            .finish_non_exhaustive()
    }
}
