//! Scan data models

use crate::error::{ProbeError, ScanError};
use std::fmt;

/// A concrete target ready to be requested.
///
/// `scheme` is `None` only when scheme inference was disabled for a bare
/// IP or CIDR host. Such a target cannot be probed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedTarget {
    scheme: Option<String>,
    location: String,
}

impl ResolvedTarget {
    /// Create a target with an explicit scheme; `location` is everything after `://`
    pub fn new(scheme: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            scheme: Some(scheme.into()),
            location: location.into(),
        }
    }

    /// Create a target that carries a host only
    pub fn schemeless(location: impl Into<String>) -> Self {
        Self {
            scheme: None,
            location: location.into(),
        }
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Get the target URL string
    pub fn url(&self) -> String {
        match &self.scheme {
            Some(scheme) => format!("{}://{}", scheme, self.location),
            None => self.location.clone(),
        }
    }
}

impl fmt::Display for ResolvedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// Scheme spoken to the proxy itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProxyScheme {
    Http,
    Https,
    Socks5,
    Socks5h,
}

impl ProxyScheme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            "socks5" => Some(Self::Socks5),
            "socks5h" => Some(Self::Socks5h),
            _ => None,
        }
    }
}

impl fmt::Display for ProxyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyScheme::Http => write!(f, "http"),
            ProxyScheme::Https => write!(f, "https"),
            ProxyScheme::Socks5 => write!(f, "socks5"),
            ProxyScheme::Socks5h => write!(f, "socks5h"),
        }
    }
}

/// Proxy authentication credentials
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyAuth {
    pub username: String,
    pub password: String,
}

impl ProxyAuth {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

/// A forward proxy that probes are routed through
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProxyEndpoint {
    pub scheme: ProxyScheme,
    pub host: String,
    pub port: u16,
    pub auth: Option<ProxyAuth>,
}

impl ProxyEndpoint {
    pub fn new(scheme: ProxyScheme, host: String, port: u16) -> Self {
        Self {
            scheme,
            host,
            port,
            auth: None,
        }
    }

    pub fn with_auth(mut self, username: String, password: String) -> Self {
        self.auth = Some(ProxyAuth::new(username, password));
        self
    }

    /// Get the proxy URL string
    pub fn url(&self) -> String {
        let auth_part = self.auth.as_ref().map_or(String::new(), |auth| {
            if auth.password.is_empty() {
                format!("{}@", auth.username)
            } else {
                format!("{}:{}@", auth.username, auth.password)
            }
        });

        format!("{}://{}{}:{}", self.scheme, auth_part, self.host, self.port)
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

/// One (target, proxy) pair to probe
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkItem {
    pub target: ResolvedTarget,
    pub proxy: ProxyEndpoint,
}

impl WorkItem {
    pub fn new(target: ResolvedTarget, proxy: ProxyEndpoint) -> Self {
        Self { target, proxy }
    }
}

/// Reachability verdict for a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Success,
    Failure,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Success => write!(f, "SUCCESS"),
            Verdict::Failure => write!(f, "FAILURE"),
        }
    }
}

/// Result of probing one work item
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub item: WorkItem,
    pub verdict: Verdict,
    /// HTTP status of the response, when one arrived
    pub status: Option<u16>,
    pub error: Option<ProbeError>,
    pub response_time_ms: Option<u64>,
}

impl ProbeOutcome {
    pub fn success(item: WorkItem, status: u16, response_time_ms: u64) -> Self {
        Self {
            item,
            verdict: Verdict::Success,
            status: Some(status),
            error: None,
            response_time_ms: Some(response_time_ms),
        }
    }

    pub fn failure(item: WorkItem, error: ProbeError) -> Self {
        Self {
            item,
            verdict: Verdict::Failure,
            status: None,
            error: Some(error),
            response_time_ms: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.verdict == Verdict::Success
    }
}

/// Items accepted from a token list, plus the tokens that were rejected
#[derive(Debug)]
pub struct Expansion<T> {
    pub items: Vec<T>,
    pub rejected: Vec<ScanError>,
}

impl<T> Default for Expansion<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// Running totals over all reported outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: usize,
    pub success: usize,
    pub failure: usize,
    /// Work items never sent because the scan was interrupted
    pub undispatched: usize,
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SUMMARY: total={} success={} failure={}",
            self.total, self.success, self.failure
        )?;
        if self.undispatched > 0 {
            write!(f, " undispatched={}", self.undispatched)?;
        }
        Ok(())
    }
}
