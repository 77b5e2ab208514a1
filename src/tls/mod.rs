//! X.509 handling for client certificate authentication.
//!
//! # Flow
//!
//! ```text
//! presented chain (leaf, intermediates…)
//!   → ChainValidator::validate  (anchors from TrustAnchorPool, injected reference time)
//!   → VerifiedLeaf
//!   → CertificateView::project  (dnsNames, emailAddresses, uris)
//! ```
//!
//! # Modules
//!
//! - [`trust`] — trust anchor pool and PEM loading
//! - [`validator`] — chain validation (`ChainValidator`, `VerifiedLeaf`)
//! - [`view`] — certificate claims exposed to policy (`CertificateView`)
//! - `cert_manager` — `rcgen`-backed certificate fixtures (tests only)

#[cfg(test)]
pub(crate) mod cert_manager;
pub mod trust;
pub mod validator;
pub mod view;

#[cfg(test)]
pub(crate) use cert_manager::{CaParams, CertGenerator, GeneratedCert, LeafCertParams, Validity};
pub use trust::{TrustAnchorPool, load_certs, parse_pem_certs};
pub use validator::{ChainValidator, VerifiedLeaf};
pub use view::{CertificateView, ProjectionError};
