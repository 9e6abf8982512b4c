//! Proxy Spray - probe upstream targets through HTTP(S) proxies
//!
//! Expands target specifications (URLs, IPv4 addresses, CIDR blocks) and
//! proxy URLs into every (target, proxy) pair, probes each pair once on a
//! bounded worker pool and reports which pairs are reachable. Useful for
//! finding proxies that leak access to private resources.

pub mod config;
pub mod error;
pub mod input;
pub mod scan;

pub use config::ScanConfig;
pub use error::{ProbeError, ScanError};
pub use scan::*;

/// Application result type
pub type Result<T> = anyhow::Result<T>;
