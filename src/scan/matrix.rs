//! Work matrix construction

use crate::scan::models::{ProxyEndpoint, ResolvedTarget, WorkItem};

/// Pair every target with every proxy, target-major.
///
/// No filtering and no deduplication: repeated targets or proxies produce
/// repeated work items. Either side being empty yields an empty matrix.
pub fn build(targets: &[ResolvedTarget], proxies: &[ProxyEndpoint]) -> Vec<WorkItem> {
    let mut work = Vec::with_capacity(targets.len() * proxies.len());
    for target in targets {
        for proxy in proxies {
            work.push(WorkItem::new(target.clone(), proxy.clone()));
        }
    }
    work
}
