//! Scan configuration

use crate::error::ScanError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

/// Default number of concurrent workers
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Process-wide scan settings.
///
/// Built once at startup and handed by reference to every stage of the
/// pipeline. Nothing mutates it once the scan has started.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Raw target tokens (files already flattened)
    pub targets: Vec<String>,
    /// Raw proxy tokens (files already flattened)
    pub proxies: Vec<String>,
    /// Extra headers sent with every probe
    pub headers: HeaderMap,
    /// Add an `http://` target for bare IPs and CIDR hosts
    pub assume_http: bool,
    /// Add an `https://` target for bare IPs and CIDR hosts
    pub assume_https: bool,
    /// Number of concurrent workers
    pub concurrency: usize,
    /// Timeout for each probe
    pub timeout: Duration,
    /// Print failure lines as well as successes
    pub display_failures: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            proxies: Vec::new(),
            headers: HeaderMap::new(),
            assume_http: true,
            assume_https: true,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            display_failures: false,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_proxies<I, S>(mut self, proxies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.proxies = proxies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_headers<I>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (HeaderName, HeaderValue)>,
    {
        for (name, value) in headers {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn with_assume_http(mut self, assume: bool) -> Self {
        self.assume_http = assume;
        self
    }

    pub fn with_assume_https(mut self, assume: bool) -> Self {
        self.assume_https = assume;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_display_failures(mut self, display: bool) -> Self {
        self.display_failures = display;
        self
    }

    /// Reject settings that would make the scan meaningless
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.concurrency == 0 {
            return Err(ScanError::Configuration(
                "worker count must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::Configuration(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
