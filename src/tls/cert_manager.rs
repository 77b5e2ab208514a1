//! Certificate fixtures for tests.
//!
//! [`CertGenerator`] is an `rcgen`-backed issuer for root CAs, intermediate
//! CAs and client certificates with explicit validity windows.

use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose,
    IsCa, Issuer, KeyPair, KeyUsagePurpose, SanType, date_time_ymd,
};
use rcgen::string::Ia5String;
use rustls::pki_types::CertificateDer;
use time::OffsetDateTime;

use crate::{Error, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Validity window of a generated certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validity {
    /// First instant the certificate is valid.
    pub not_before: OffsetDateTime,
    /// Last instant the certificate is valid.
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Window between two explicit instants.
    #[must_use]
    pub fn between(not_before: OffsetDateTime, not_after: OffsetDateTime) -> Self {
        Self {
            not_before,
            not_after,
        }
    }
}

impl Default for Validity {
    /// Effectively unbounded: 1975-01-01 to 4096-01-01.
    fn default() -> Self {
        Self {
            not_before: date_time_ymd(1975, 1, 1),
            not_after: date_time_ymd(4096, 1, 1),
        }
    }
}

/// Parameters for generating a CA certificate.
#[derive(Debug, Clone, Default)]
pub struct CaParams<'a> {
    /// Common Name (e.g. `"Client Root CA"`).
    pub cn: &'a str,
    /// Validity window.
    pub validity: Validity,
}

/// Parameters for generating a client certificate.
///
/// SAN lists are written in the given order.
#[derive(Debug, Clone, Default)]
pub struct LeafCertParams<'a> {
    /// Common Name; the subject is left empty when `None`.
    pub cn: Option<&'a str>,
    /// Organisational Unit.
    pub ou: Option<&'a str>,
    /// Subject Alternative Names: DNS entries.
    pub san_dns: Vec<String>,
    /// Subject Alternative Names: RFC 822 email addresses.
    pub san_emails: Vec<String>,
    /// Subject Alternative Names: URI entries.
    pub san_uris: Vec<String>,
    /// Validity window.
    pub validity: Validity,
}

/// A generated certificate together with its private key.
#[derive(Debug, Clone)]
pub struct GeneratedCert {
    /// DER-encoded certificate.
    pub cert_der: CertificateDer<'static>,
    /// PEM-encoded certificate.
    pub cert_pem: String,
    /// PEM-encoded private key.
    pub key_pem: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Generator
// ─────────────────────────────────────────────────────────────────────────────

/// Certificate generator backed by `rcgen`.
pub struct CertGenerator;

impl CertGenerator {
    /// Generate a self-signed root CA certificate.
    ///
    /// # Errors
    ///
    /// Returns an error if key generation or certificate serialisation fails.
    pub fn init_ca(params: &CaParams<'_>) -> Result<GeneratedCert> {
        let key_pair = generate_key("CA")?;
        let ca_params = ca_params(params);

        let ca_cert = ca_params
            .self_signed(&key_pair)
            .map_err(|e| Error::Config(format!("CA cert generation failed: {e}")))?;

        Ok(GeneratedCert {
            cert_der: ca_cert.der().clone(),
            cert_pem: ca_cert.pem(),
            key_pem: key_pair.serialize_pem(),
        })
    }

    /// Issue an intermediate CA certificate signed by `issuer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the issuer cannot be parsed or signing fails.
    pub fn issue_intermediate(params: &CaParams<'_>, issuer: &GeneratedCert) -> Result<GeneratedCert> {
        let issuer = load_issuer(issuer)?;
        let key_pair = generate_key("intermediate")?;

        let cert = ca_params(params)
            .signed_by(&key_pair, &issuer)
            .map_err(|e| Error::Config(format!("Intermediate cert signing failed: {e}")))?;

        Ok(GeneratedCert {
            cert_der: cert.der().clone(),
            cert_pem: cert.pem(),
            key_pem: key_pair.serialize_pem(),
        })
    }

    /// Issue a client certificate signed by `issuer`.
    ///
    /// The certificate carries the `clientAuth` and `serverAuth` extended key
    /// usages.
    ///
    /// # Errors
    ///
    /// Returns an error if the issuer cannot be parsed, a SAN is not valid
    /// IA5 text, or signing fails.
    pub fn issue_leaf(params: &LeafCertParams<'_>, issuer: &GeneratedCert) -> Result<GeneratedCert> {
        let issuer = load_issuer(issuer)?;
        let leaf_key = generate_key("leaf")?;

        let mut leaf_params = CertificateParams::default();
        let mut dn = DistinguishedName::new();
        if let Some(cn) = params.cn {
            dn.push(DnType::CommonName, cn);
        }
        if let Some(ou) = params.ou {
            dn.push(DnType::OrganizationalUnitName, ou);
        }
        leaf_params.distinguished_name = dn;
        leaf_params.not_before = params.validity.not_before;
        leaf_params.not_after = params.validity.not_after;
        leaf_params.extended_key_usages = vec![
            ExtendedKeyUsagePurpose::ServerAuth,
            ExtendedKeyUsagePurpose::ClientAuth,
        ];

        let mut sans: Vec<SanType> = Vec::new();
        for dns in &params.san_dns {
            sans.push(SanType::DnsName(ia5(dns, "DNS")?));
        }
        for email in &params.san_emails {
            sans.push(SanType::Rfc822Name(ia5(email, "email")?));
        }
        for uri in &params.san_uris {
            sans.push(SanType::URI(ia5(uri, "URI")?));
        }
        leaf_params.subject_alt_names = sans;

        let leaf_cert = leaf_params
            .signed_by(&leaf_key, &issuer)
            .map_err(|e| Error::Config(format!("Leaf cert signing failed: {e}")))?;

        Ok(GeneratedCert {
            cert_der: leaf_cert.der().clone(),
            cert_pem: leaf_cert.pem(),
            key_pem: leaf_key.serialize_pem(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Private helpers
// ─────────────────────────────────────────────────────────────────────────────

fn ca_params(params: &CaParams<'_>) -> CertificateParams {
    let mut ca_params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, params.cn);
    ca_params.distinguished_name = dn;
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    ca_params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
        KeyUsagePurpose::DigitalSignature,
    ];
    ca_params.not_before = params.validity.not_before;
    ca_params.not_after = params.validity.not_after;
    ca_params
}

fn generate_key(what: &str) -> Result<KeyPair> {
    KeyPair::generate().map_err(|e| Error::Config(format!("Failed to generate {what} key: {e}")))
}

fn load_issuer(ca: &GeneratedCert) -> Result<Issuer<'static, KeyPair>> {
    let ca_key = KeyPair::from_pem(&ca.key_pem)
        .map_err(|e| Error::Config(format!("Failed to parse CA key: {e}")))?;
    Issuer::from_ca_cert_pem(&ca.cert_pem, ca_key)
        .map_err(|e| Error::Config(format!("Failed to parse CA cert: {e}")))
}

fn ia5(value: &str, kind: &str) -> Result<Ia5String> {
    Ia5String::try_from(value)
        .map_err(|e| Error::Config(format!("Invalid {kind} SAN '{value}': {e}")))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> GeneratedCert {
        CertGenerator::init_ca(&CaParams {
            cn: "Test Root CA",
            validity: Validity::default(),
        })
        .unwrap()
    }

    #[test]
    fn init_ca_produces_pem_cert_and_key() {
        let ca = root();
        assert!(ca.cert_pem.contains("BEGIN CERTIFICATE"));
        assert!(ca.key_pem.contains("PRIVATE KEY"));
        assert!(!ca.cert_der.is_empty());
    }

    #[test]
    fn init_ca_generates_unique_keys_on_each_call() {
        assert_ne!(root().key_pem, root().key_pem);
    }

    #[test]
    fn issue_leaf_with_all_san_kinds() {
        let ca = root();
        let leaf = CertGenerator::issue_leaf(
            &LeafCertParams {
                cn: Some("agent"),
                san_dns: vec!["agent.example.com".to_string()],
                san_emails: vec!["agent@example.com".to_string()],
                san_uris: vec!["spiffe://example.com/agent".to_string()],
                ..LeafCertParams::default()
            },
            &ca,
        )
        .unwrap();
        assert!(leaf.cert_pem.contains("BEGIN CERTIFICATE"));
    }

    #[test]
    fn issue_leaf_rejects_non_ia5_san() {
        let ca = root();
        let result = CertGenerator::issue_leaf(
            &LeafCertParams {
                san_dns: vec!["bücher.example".to_string()],
                ..LeafCertParams::default()
            },
            &ca,
        );
        assert!(result.is_err());
    }

    #[test]
    fn issue_leaf_fails_with_invalid_ca_key() {
        let mut ca = root();
        ca.key_pem = "not a pem key".to_string();
        let result = CertGenerator::issue_leaf(&LeafCertParams::default(), &ca);
        assert!(result.is_err());
    }
}
