//! Counters collected during a filter pass

/// Counters for one filter pool run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Tail candidates handed to workers
    pub evaluated: usize,

    /// Tail candidates cut off by the limit and never fetched
    pub skipped_by_limit: usize,

    /// Pages whose text was fetched
    pub fetched: usize,

    /// Pages that yielded no text (error, block, timeout)
    pub fetch_failures: usize,

    /// Pages classified as matches
    pub matched: usize,

    /// Workers spawned
    pub workers: usize,

    /// Workers that died before reporting
    pub worker_failures: usize,

    /// Wall-clock time of the pass in milliseconds
    pub elapsed_ms: u64,
}

impl FilterReport {
    /// Fold one worker's counters into the report
    pub fn absorb(&mut self, other: &FilterReport) {
        self.evaluated += other.evaluated;
        self.fetched += other.fetched;
        self.fetch_failures += other.fetch_failures;
        self.matched += other.matched;
    }

    /// Generate a one-line summary
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} evaluated, {} matched, {} without text, {} workers in {}ms",
            self.evaluated, self.matched, self.fetch_failures, self.workers, self.elapsed_ms
        );
        if self.skipped_by_limit > 0 {
            line.push_str(&format!(", {} over limit", self.skipped_by_limit));
        }
        if self.worker_failures > 0 {
            line.push_str(&format!(", {} workers failed", self.worker_failures));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_and_summary() {
        let mut report = FilterReport {
            workers: 2,
            skipped_by_limit: 4,
            ..Default::default()
        };
        report.absorb(&FilterReport {
            evaluated: 3,
            fetched: 2,
            fetch_failures: 1,
            matched: 1,
            ..Default::default()
        });
        report.absorb(&FilterReport {
            evaluated: 2,
            fetched: 2,
            matched: 2,
            ..Default::default()
        });

        assert_eq!(report.evaluated, 5);
        assert_eq!(report.matched, 3);
        assert_eq!(report.workers, 2);
        assert_eq!(
            report.summary(),
            "5 evaluated, 3 matched, 1 without text, 2 workers in 0ms, 4 over limit"
        );
    }
}
