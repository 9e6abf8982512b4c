//! Result reporting

use crate::scan::models::{ProbeOutcome, ScanSummary, Verdict};
use std::io::{self, Write};

/// Writes one status line per outcome as it arrives and keeps the totals.
///
/// Failure lines are only written when `display_failures` is set but are
/// always counted.
pub struct Reporter<W: Write> {
    out: W,
    display_failures: bool,
    summary: ScanSummary,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, display_failures: bool) -> Self {
        Self {
            out,
            display_failures,
            summary: ScanSummary::default(),
        }
    }

    /// Format the status line for an outcome
    pub fn status_line(outcome: &ProbeOutcome) -> String {
        format!(
            "{}: {} >--[VIA]--> {}",
            outcome.verdict, outcome.item.target, outcome.item.proxy
        )
    }

    pub fn record(&mut self, outcome: &ProbeOutcome) -> io::Result<()> {
        self.summary.total += 1;
        match outcome.verdict {
            Verdict::Success => self.summary.success += 1,
            Verdict::Failure => self.summary.failure += 1,
        }

        if outcome.is_success() || self.display_failures {
            writeln!(self.out, "{}", Self::status_line(outcome))?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Record work items that were never dispatched
    pub fn record_undispatched(&mut self, count: usize) {
        self.summary.undispatched += count;
    }

    pub fn summary(&self) -> ScanSummary {
        self.summary
    }

    /// Write the summary line and hand back the sink
    pub fn finish(mut self) -> io::Result<(ScanSummary, W)> {
        writeln!(self.out, "{}", self.summary)?;
        self.out.flush()?;
        Ok((self.summary, self.out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProbeError;
    use crate::scan::models::{ProxyEndpoint, ProxyScheme, ResolvedTarget, WorkItem};

    fn outcome(host: &str, success: bool) -> ProbeOutcome {
        let item = WorkItem::new(
            ResolvedTarget::new("https", host),
            ProxyEndpoint::new(ProxyScheme::Https, "p1".to_string(), 8080),
        );
        if success {
            ProbeOutcome::success(item, 404, 5)
        } else {
            ProbeOutcome::failure(item, ProbeError::Request("connection refused".to_string()))
        }
    }

    fn render(display_failures: bool, outcomes: &[ProbeOutcome]) -> (ScanSummary, String) {
        let mut reporter = Reporter::new(Vec::new(), display_failures);
        for o in outcomes {
            reporter.record(o).unwrap();
        }
        let (summary, out) = reporter.finish().unwrap();
        (summary, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_status_line_format() {
        assert_eq!(
            Reporter::<Vec<u8>>::status_line(&outcome("example.com", true)),
            "SUCCESS: https://example.com >--[VIA]--> https://p1:8080"
        );
        assert_eq!(
            Reporter::<Vec<u8>>::status_line(&outcome("example.com", false)),
            "FAILURE: https://example.com >--[VIA]--> https://p1:8080"
        );
    }

    #[test]
    fn test_failures_hidden_but_counted() {
        let outcomes = vec![
            outcome("a", false),
            outcome("b", true),
            outcome("c", false),
            outcome("d", true),
            outcome("e", false),
        ];
        let (summary, text) = render(false, &outcomes);

        assert_eq!(
            summary,
            ScanSummary {
                total: 5,
                success: 2,
                failure: 3,
                undispatched: 0,
            }
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "SUCCESS: https://b >--[VIA]--> https://p1:8080",
                "SUCCESS: https://d >--[VIA]--> https://p1:8080",
                "SUMMARY: total=5 success=2 failure=3",
            ]
        );
    }

    #[test]
    fn test_failures_displayed_in_arrival_order() {
        let outcomes = vec![outcome("a", false), outcome("b", true)];
        let (_, text) = render(true, &outcomes);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("FAILURE: https://a"));
        assert!(lines[1].starts_with("SUCCESS: https://b"));
    }

    #[test]
    fn test_interrupted_run_reports_undispatched() {
        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.record(&outcome("a", true)).unwrap();
        reporter.record_undispatched(4);

        let (summary, out) = reporter.finish().unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.undispatched, 4);
        assert_eq!(
            String::from_utf8(out).unwrap().lines().last(),
            Some("SUMMARY: total=1 success=1 failure=0 undispatched=4")
        );
    }

    #[test]
    fn test_empty_run_still_summarises() {
        let (summary, text) = render(false, &[]);
        assert_eq!(summary, ScanSummary::default());
        assert_eq!(text, "SUMMARY: total=0 success=0 failure=0\n");
    }
}
