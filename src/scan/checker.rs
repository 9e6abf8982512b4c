//! Probe executor: one request per work item through its proxy

use crate::config::ScanConfig;
use crate::error::ProbeError;
use crate::scan::models::{ProbeOutcome, ProxyEndpoint, WorkItem};
use log::debug;
use parking_lot::RwLock;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Proxy as ReqwestProxy};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Issues probe requests and classifies the result.
///
/// Any HTTP response, whatever its status, is a success: it proves the proxy
/// forwarded the request. Connection, TLS, proxy and timeout errors are
/// failures. There are no retries.
///
/// One client is built per distinct proxy and shared by every clone of the
/// executor.
#[derive(Debug, Clone)]
pub struct ProbeExecutor {
    timeout: Duration,
    headers: HeaderMap,
    clients: Arc<RwLock<HashMap<ProxyEndpoint, Client>>>,
}

impl ProbeExecutor {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            timeout: config.timeout,
            headers: config.headers.clone(),
            clients: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Probe a single work item. Always returns exactly one outcome.
    pub async fn probe(&self, item: WorkItem) -> ProbeOutcome {
        if item.target.scheme().is_none() {
            let error = ProbeError::Configuration(format!(
                "target '{}' has no scheme",
                item.target
            ));
            return ProbeOutcome::failure(item, error);
        }

        let start = Instant::now();
        let url = item.target.url();

        let client = match self.client_for(&item.proxy) {
            Ok(client) => client,
            Err(e) => return ProbeOutcome::failure(item, ProbeError::Request(e.to_string())),
        };

        match tokio::time::timeout(self.timeout, client.get(&url).send()).await {
            Ok(Ok(response)) => {
                let elapsed = start.elapsed().as_millis() as u64;
                let status = response.status();
                debug!("{} via {} answered {} in {}ms", url, item.proxy, status, elapsed);
                ProbeOutcome::success(item, status.as_u16(), elapsed)
            }
            Ok(Err(e)) if e.is_timeout() => {
                ProbeOutcome::failure(item, ProbeError::Timeout(self.timeout))
            }
            Ok(Err(e)) => {
                debug!("{} via {} failed: {}", url, item.proxy, e);
                ProbeOutcome::failure(item, ProbeError::Request(e.to_string()))
            }
            Err(_) => ProbeOutcome::failure(item, ProbeError::Timeout(self.timeout)),
        }
    }

    /// Cached client for `proxy`, built on first use
    fn client_for(&self, proxy: &ProxyEndpoint) -> reqwest::Result<Client> {
        if let Some(client) = self.clients.read().get(proxy) {
            return Ok(client.clone());
        }

        let client = self.create_client(proxy)?;
        Ok(self
            .clients
            .write()
            .entry(proxy.clone())
            .or_insert(client)
            .clone())
    }

    /// Create a reqwest client that routes every scheme through the proxy
    fn create_client(&self, proxy: &ProxyEndpoint) -> reqwest::Result<Client> {
        let reqwest_proxy = ReqwestProxy::all(proxy.url())?;

        Client::builder()
            .proxy(reqwest_proxy)
            .timeout(self.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(true)
            .default_headers(self.headers.clone())
            .build()
    }
}
