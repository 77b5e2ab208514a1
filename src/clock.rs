//! Reference time source for certificate validity checks.
//!
//! Chain validation never reads ambient wall-clock time directly; it asks the
//! [`Clock`] handed to the authenticator at construction. Production code
//! uses [`SystemClock`], tests and the CLI's `--at` flag use [`FixedClock`].

use std::fmt::Debug;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A time provider for the reference time of a validation.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current reference time.
    fn now(&self) -> SystemTime;
}

/// Production clock using real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock pinned to a single instant.
///
/// Every call to [`Clock::now`] returns the same value, which makes expiry
/// checks reproducible.
///
/// ```
/// use tls_client_auth::{Clock, FixedClock};
///
/// let clock = FixedClock::from_unix_secs(1_712_700_000);
/// assert_eq!(clock.now(), clock.now());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(SystemTime);

impl FixedClock {
    /// Create a clock frozen at `at`.
    #[must_use]
    pub fn new(at: SystemTime) -> Self {
        Self(at)
    }

    /// Create a clock frozen at `secs` seconds after the Unix epoch.
    #[must_use]
    pub fn from_unix_secs(secs: u64) -> Self {
        Self(UNIX_EPOCH + Duration::from_secs(secs))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}
