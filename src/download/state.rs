//! Run statistics.

/// A batch line that did not download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    /// 1-based line number in the batch file.
    pub line: usize,
    pub url: String,
    pub reason: String,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub total: usize,
    pub successful: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self) {
        self.total += 1;
        self.successful += 1;
    }

    pub fn record_failure(&mut self, line: usize, url: &str, reason: impl Into<String>) {
        self.total += 1;
        self.failures.push(BatchFailure {
            line,
            url: url.to_string(),
            reason: reason.into(),
        });
    }

    pub fn failed(&self) -> usize {
        self.total - self.successful
    }

    /// True when every processed line downloaded.
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}
