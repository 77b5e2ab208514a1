//! Configuration management
//!
//! # Example YAML
//!
//! ```yaml
//! client_certificate_authorities_file: "/etc/tls-client-auth/ca.crt"
//! validation_expression: "contains(dnsNames, 'a.example.com')"
//! metadata_extraction_expression: '{"public": @}'
//! ```

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tls::{TrustAnchorPool, load_certs, parse_pem_certs};
use crate::{Error, Result};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "TLS_CLIENT_AUTH_";

/// Authenticator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticatorConfig {
    /// PEM bundle of client certificate authorities, inline.
    pub client_certificate_authorities: Option<String>,

    /// Path to a PEM bundle of client certificate authorities.
    ///
    /// May be combined with the inline bundle; both sets are trusted.
    pub client_certificate_authorities_file: Option<String>,

    /// JMESPath predicate deciding whether a verified certificate is accepted.
    pub validation_expression: String,

    /// JMESPath expression producing the authentication metadata.
    pub metadata_extraction_expression: String,
}

impl Default for AuthenticatorConfig {
    fn default() -> Self {
        Self {
            client_certificate_authorities: None,
            client_certificate_authorities_file: None,
            validation_expression: String::new(),
            metadata_extraction_expression: default_metadata_extraction_expression(),
        }
    }
}

fn default_metadata_extraction_expression() -> String {
    r#"{"public": @}"#.to_string()
}

impl AuthenticatorConfig {
    /// Load configuration from file and environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file does not exist or cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();

        if let Some(p) = path {
            if !p.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            figment = figment.merge(Yaml::file(p));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;

        debug!(
            validation = %config.validation_expression,
            metadata = %config.metadata_extraction_expression,
            "configuration loaded"
        );

        Ok(config)
    }

    /// Check required fields are present.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        if self.client_certificate_authorities.is_none()
            && self.client_certificate_authorities_file.is_none()
        {
            return Err(Error::Config(
                "one of client_certificate_authorities or client_certificate_authorities_file is required"
                    .to_string(),
            ));
        }
        if self.validation_expression.trim().is_empty() {
            return Err(Error::Config("validation_expression is required".to_string()));
        }
        if self.metadata_extraction_expression.trim().is_empty() {
            return Err(Error::Config(
                "metadata_extraction_expression must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the trust anchor pool from the configured CA sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or parsed, or if no
    /// certificate is configured at all.
    pub fn trust_anchors(&self) -> Result<TrustAnchorPool> {
        let mut certs = Vec::new();
        if let Some(pem) = &self.client_certificate_authorities {
            certs.extend(parse_pem_certs(pem.as_bytes(), "client_certificate_authorities")?);
        }
        if let Some(path) = &self.client_certificate_authorities_file {
            certs.extend(load_certs(path)?);
        }
        TrustAnchorPool::from_der(certs)
    }
}
