//! Structured view of a verified client certificate.
//!
//! [`CertificateView`] is the value the policy expressions are evaluated
//! against. It serialises with camel-case keys:
//!
//! ```json
//! {
//!   "dnsNames": ["a.example.com"],
//!   "emailAddresses": ["me@example.com"],
//!   "uris": ["uri:example:a"]
//! }
//! ```
//!
//! SAN sequences keep the order of the certificate's extension and are not
//! deduplicated. Subject attributes are not exposed.

use serde::Serialize;
use x509_parser::certificate::X509Certificate;
use x509_parser::extensions::GeneralName;
use x509_parser::prelude::FromDer;

use crate::tls::validator::VerifiedLeaf;

/// A verified certificate whose claims cannot be read.
///
/// The chain validator and the claim parser are separate parsers; when they
/// disagree the certificate is refused rather than projected with missing
/// claims.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProjectionError {
    /// The certificate does not parse as X.509.
    #[error("malformed certificate: {0}")]
    Certificate(String),

    /// The subject alternative name extension is malformed or duplicated.
    #[error("malformed subject alternative name extension: {0}")]
    SubjectAlternativeName(String),
}

/// Claims of a verified leaf certificate exposed to policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateView {
    /// Subject Alternative Name: DNS entries.
    pub dns_names: Vec<String>,

    /// Subject Alternative Name: RFC 822 email addresses.
    pub email_addresses: Vec<String>,

    /// Subject Alternative Name: URI entries.
    pub uris: Vec<String>,
}

impl CertificateView {
    /// Project a verified leaf certificate.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError`] if the certificate or its SAN extension
    /// cannot be parsed.
    pub fn project(leaf: &VerifiedLeaf<'_>) -> Result<Self, ProjectionError> {
        let (_, cert) = X509Certificate::from_der(leaf.der())
            .map_err(|e| ProjectionError::Certificate(e.to_string()))?;
        Self::from_certificate(&cert)
    }

    fn from_certificate(cert: &X509Certificate<'_>) -> Result<Self, ProjectionError> {
        let mut view = Self::default();

        let san = cert
            .subject_alternative_name()
            .map_err(|e| ProjectionError::SubjectAlternativeName(e.to_string()))?;
        if let Some(san_ext) = san {
            for name in &san_ext.value.general_names {
                match name {
                    GeneralName::DNSName(dns) => view.dns_names.push((*dns).to_owned()),
                    GeneralName::RFC822Name(email) => {
                        view.email_addresses.push((*email).to_owned());
                    }
                    GeneralName::URI(uri) => view.uris.push((*uri).to_owned()),
                    _ => {}
                }
            }
        }

        Ok(view)
    }

    /// The view as a JSON value, ready for expression evaluation.
    #[must_use]
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!(self)
    }
}
