//! Certificate chain validation at an explicit reference time.
//!
//! Wraps rustls' `WebPkiClientVerifier`. The verifier is driven with the
//! reference time passed by the caller rather than the system clock, so
//! expiry behaviour is reproducible.
//!
//! Client-presented certificates after the leaf are untrusted intermediates:
//! they may help build a path to an anchor but are never trusted or
//! projected on their own.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rustls::pki_types::{CertificateDer, UnixTime};
use rustls::server::WebPkiClientVerifier;
use rustls::server::danger::ClientCertVerifier;

use crate::tls::trust::TrustAnchorPool;
use crate::{Error, Result};

/// Verifies client certificates against a [`TrustAnchorPool`].
#[derive(Debug, Clone)]
pub struct ChainValidator {
    verifier: Arc<dyn ClientCertVerifier>,
}

impl ChainValidator {
    /// Build a validator trusting exactly the anchors in `pool`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if rustls refuses the anchor set.
    pub fn new(pool: &TrustAnchorPool) -> Result<Self> {
        let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
        let verifier = WebPkiClientVerifier::builder_with_provider(pool.root_store(), provider)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build client verifier: {e}")))?;

        Ok(Self { verifier })
    }

    /// Verify `leaf` chains to a trust anchor and is time-valid at
    /// `reference_time`.
    ///
    /// # Errors
    ///
    /// Returns the verifier's diagnostic unchanged: unknown issuer, expired,
    /// not yet valid, bad signature, wrong key usage, and so on.
    pub fn validate<'a>(
        &self,
        leaf: &'a CertificateDer<'a>,
        intermediates: &[CertificateDer<'_>],
        reference_time: SystemTime,
    ) -> std::result::Result<VerifiedLeaf<'a>, rustls::Error> {
        let since_epoch = reference_time
            .duration_since(UNIX_EPOCH)
            .map_err(|_| rustls::Error::FailedToGetCurrentTime)?;

        self.verifier
            .verify_client_cert(leaf, intermediates, UnixTime::since_unix_epoch(since_epoch))?;

        Ok(VerifiedLeaf { der: leaf })
    }
}

/// A leaf certificate that passed [`ChainValidator::validate`].
///
/// Only the validator can construct one, so anything derived from a
/// `VerifiedLeaf` is derived from a verified certificate.
#[derive(Debug, Clone, Copy)]
pub struct VerifiedLeaf<'a> {
    der: &'a CertificateDer<'a>,
}

impl<'a> VerifiedLeaf<'a> {
    /// DER encoding of the verified certificate.
    #[must_use]
    pub fn der(&self) -> &[u8] {
        self.der.as_ref()
    }

    /// Skip validation; for exercising code downstream of the validator.
    #[cfg(test)]
    pub(crate) fn assume_verified(der: &'a CertificateDer<'a>) -> Self {
        Self { der }
    }
}
