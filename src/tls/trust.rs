//! Trust anchor pool and PEM loading.
//!
//! The pool is fixed at construction: once built, no certificate is ever
//! added or removed. All certificate files are expected in **PEM format**.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rustls::RootCertStore;
use rustls::pki_types::CertificateDer;
use rustls::pki_types::pem::PemObject;
use tracing::debug;

use crate::{Error, Result};

/// Immutable set of root certificates that anchor client certificate chains.
#[derive(Debug, Clone)]
pub struct TrustAnchorPool {
    certificates: Vec<CertificateDer<'static>>,
    store: Arc<RootCertStore>,
}

impl TrustAnchorPool {
    /// Build a pool from DER-encoded root certificates.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a certificate cannot be used as a trust
    /// anchor, or if the sequence is empty.
    pub fn from_der(certificates: impl IntoIterator<Item = CertificateDer<'static>>) -> Result<Self> {
        let certificates: Vec<_> = certificates.into_iter().collect();
        if certificates.is_empty() {
            return Err(Error::Config(
                "No client certificate authorities configured".to_string(),
            ));
        }

        let mut store = RootCertStore::empty();
        for cert in &certificates {
            store
                .add(cert.clone())
                .map_err(|e| Error::Config(format!("Failed to add CA cert to trust store: {e}")))?;
        }

        debug!(anchors = store.len(), "trust anchor pool built");

        Ok(Self {
            certificates,
            store: Arc::new(store),
        })
    }

    /// Build a pool from a PEM bundle held in memory.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the bundle cannot be parsed or contains no
    /// certificates.
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        Self::from_der(parse_pem_certs(pem, "inline PEM")?)
    }

    /// Build a pool from a PEM bundle on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_der(load_certs(path)?)
    }

    /// The root certificates, in the order they were supplied.
    #[must_use]
    pub fn certificates(&self) -> &[CertificateDer<'static>] {
        &self.certificates
    }

    /// Number of trust anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Always `false` for a successfully constructed pool.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub(crate) fn root_store(&self) -> Arc<RootCertStore> {
        Arc::clone(&self.store)
    }
}

/// Load all certificates from a PEM file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains no valid PEM
/// certificate blocks.
pub fn load_certs(path: impl AsRef<Path>) -> Result<Vec<CertificateDer<'static>>> {
    let path = path.as_ref();
    let pem_data = fs::read(path)
        .map_err(|e| Error::Config(format!("Cannot read '{}': {e}", path.display())))?;
    parse_pem_certs(&pem_data, &path.display().to_string())
}

/// Parse every `CERTIFICATE` block of a PEM bundle.
///
/// `origin` names the source in error messages.
///
/// # Errors
///
/// Returns `Error::Config` on malformed PEM or when no certificate is found.
pub fn parse_pem_certs(pem: &[u8], origin: &str) -> Result<Vec<CertificateDer<'static>>> {
    let certs = CertificateDer::pem_slice_iter(pem)
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::Config(format!("Failed to parse certs from '{origin}': {e}")))?;

    if certs.is_empty() {
        return Err(Error::Config(format!("No certificates found in '{origin}'")));
    }

    Ok(certs)
}
