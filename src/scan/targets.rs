//! Target expansion
//!
//! Turns raw target tokens into the ordered list of URLs to probe. A token
//! is, in priority order:
//! - a URL with an explicit scheme, kept verbatim
//! - an IPv4 CIDR block, expanded to every address in the block
//! - a bare IPv4 address
//!
//! Bare addresses and CIDR hosts get one target per enabled inferred
//! scheme, https first.

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::scan::models::{Expansion, ResolvedTarget};
use ipnetwork::Ipv4Network;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use std::net::Ipv4Addr;

/// `a.b.c.d/n`, validated further by `Ipv4Network`
static CIDR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,3}(?:\.\d{1,3}){3}/\d{1,2}$").expect("Invalid CIDR regex")
});

/// Blocks wider than this expand to more than 65536 hosts and get a warning
const WIDE_CIDR_PREFIX: u8 = 16;

static SCHEME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*$").expect("Invalid scheme regex"));

/// Target expander for turning target tokens into resolved targets
pub struct TargetExpander;

impl TargetExpander {
    /// Expand every token, in order. Invalid tokens are logged and
    /// collected in `rejected`; they never stop the expansion.
    pub fn expand(tokens: &[String], config: &ScanConfig) -> Expansion<ResolvedTarget> {
        let mut expansion = Expansion::default();

        for token in tokens {
            match Self::parse_token(token, config) {
                Ok(targets) => {
                    debug!("Target '{}' expanded to {} entries", token, targets.len());
                    expansion.items.extend(targets);
                }
                Err(e) => {
                    warn!("Skipping target: {}", e);
                    expansion.rejected.push(e);
                }
            }
        }

        expansion
    }

    /// Expand a single target token
    pub fn parse_token(token: &str, config: &ScanConfig) -> Result<Vec<ResolvedTarget>, ScanError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ScanError::invalid_target(token, "empty target"));
        }

        if let Some(target) = Self::parse_url(token)? {
            return Ok(vec![target]);
        }

        if let Some(network) = Self::parse_cidr(token)? {
            if Self::is_wide(network) {
                warn!(
                    "CIDR block {} expands to {} addresses per inferred scheme",
                    token,
                    Self::host_count(network)
                );
            }
            return Ok(Self::hosts(network)
                .flat_map(|host| Self::infer_schemes(&host.to_string(), config))
                .collect());
        }

        if let Ok(addr) = token.parse::<Ipv4Addr>() {
            return Ok(Self::infer_schemes(&addr.to_string(), config));
        }

        Err(ScanError::invalid_target(
            token,
            "expected a URL with a scheme, an IPv4 address or a CIDR block",
        ))
    }

    /// Parse `scheme://host[...]`. Returns `Ok(None)` when the token has no scheme.
    fn parse_url(token: &str) -> Result<Option<ResolvedTarget>, ScanError> {
        let Some((scheme, location)) = token.split_once("://") else {
            return Ok(None);
        };

        if !SCHEME_REGEX.is_match(scheme) {
            return Err(ScanError::invalid_target(token, "malformed scheme"));
        }

        let url = Url::parse(token)
            .map_err(|e| ScanError::invalid_target(token, format!("malformed URL: {}", e)))?;
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ScanError::invalid_target(token, "URL has no host"));
        }

        Ok(Some(ResolvedTarget::new(scheme, location)))
    }

    /// Parse `a.b.c.d/n`. Host bits are ignored.
    fn parse_cidr(token: &str) -> Result<Option<Ipv4Network>, ScanError> {
        if !CIDR_REGEX.is_match(token) {
            return Ok(None);
        }

        token
            .parse::<Ipv4Network>()
            .map(Some)
            .map_err(|e| ScanError::invalid_target(token, format!("malformed CIDR block: {}", e)))
    }

    fn is_wide(network: Ipv4Network) -> bool {
        network.prefix() < WIDE_CIDR_PREFIX
    }

    fn host_count(network: Ipv4Network) -> u64 {
        1u64 << (32 - u32::from(network.prefix()))
    }

    /// Every address of the block in ascending order, network and
    /// broadcast addresses included
    fn hosts(network: Ipv4Network) -> impl Iterator<Item = Ipv4Addr> {
        let start: u32 = network.network().into();
        let end: u32 = network.broadcast().into();
        (start..=end).map(Ipv4Addr::from)
    }

    /// Attach the enabled schemes to a bare host, https first. With both
    /// disabled the host comes back without a scheme.
    fn infer_schemes(host: &str, config: &ScanConfig) -> Vec<ResolvedTarget> {
        let mut targets = Vec::with_capacity(2);
        if config.assume_https {
            targets.push(ResolvedTarget::new("https", host));
        }
        if config.assume_http {
            targets.push(ResolvedTarget::new("http", host));
        }
        if targets.is_empty() {
            targets.push(ResolvedTarget::schemeless(host));
        }
        targets
    }
}
