//! Scan pipeline
//!
//! This module provides:
//! - Expansion of target tokens (URLs, IPs, CIDR blocks) into URLs
//! - Loading of proxy URLs
//! - The target x proxy work matrix
//! - A bounded worker pool that probes each pair once
//! - Streaming reporting of every outcome

pub mod checker;
pub mod dispatcher;
pub mod headers;
pub mod matrix;
pub mod models;
pub mod proxies;
pub mod reporter;
pub mod targets;

pub use checker::ProbeExecutor;
pub use dispatcher::{DispatchStats, Dispatcher, ScanHandle, ShutdownHandle};
pub use headers::HeaderParser;
pub use models::{
    Expansion, ProbeOutcome, ProxyAuth, ProxyEndpoint, ProxyScheme, ResolvedTarget, ScanSummary,
    Verdict, WorkItem,
};
pub use proxies::ProxyLoader;
pub use reporter::Reporter;
pub use targets::TargetExpander;

use crate::config::ScanConfig;
use crate::error::ScanError;
use log::info;
use std::io::Write;

/// Expand the configured targets and proxies into the work matrix.
///
/// Invalid tokens are skipped with a warning. Ending up with no valid
/// target or no valid proxy is a configuration error.
pub fn prepare(config: &ScanConfig) -> Result<Vec<WorkItem>, ScanError> {
    info!("Loading proxies...");
    let proxies = ProxyLoader::load(&config.proxies);
    info!(
        "Loaded {} proxies ({} rejected)",
        proxies.items.len(),
        proxies.rejected.len()
    );

    info!("Loading targets...");
    let targets = TargetExpander::expand(&config.targets, config);
    info!(
        "Loaded {} targets ({} rejected)",
        targets.items.len(),
        targets.rejected.len()
    );

    if proxies.items.is_empty() {
        return Err(ScanError::Configuration(
            "no valid proxies after expansion".to_string(),
        ));
    }
    if targets.items.is_empty() {
        return Err(ScanError::Configuration(
            "no valid targets after expansion".to_string(),
        ));
    }

    Ok(matrix::build(&targets.items, &proxies.items))
}

/// Run the work set to completion, reporting each outcome as it arrives.
///
/// Items left undispatched by an interrupt are added to the reporter's summary.
pub async fn execute<W: Write>(
    dispatcher: &Dispatcher,
    work: Vec<WorkItem>,
    reporter: &mut Reporter<W>,
) -> crate::Result<DispatchStats> {
    let mut handle = dispatcher.spawn(work)?;
    info!("Beginning to send {} HTTP requests", handle.total());

    while let Some(outcome) = handle.next_outcome().await {
        reporter.record(&outcome)?;
    }

    let stats = handle.join().await;
    reporter.record_undispatched(stats.undispatched);
    Ok(stats)
}
