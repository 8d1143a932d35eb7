use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// The terminal result of processing one [`crate::WorkItem`].
///
/// Invariant: every dispatched work item yields exactly one outcome, even when the
/// transcription call fails. Failures are captured here as data instead of propagating,
/// so one bad file never aborts its siblings.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The input file this outcome belongs to.
    pub file_path: PathBuf,

    /// Whether the transcription call returned successfully.
    pub succeeded: bool,

    /// `"Success"` on success, otherwise the captured error message.
    pub message: String,
}

impl Outcome {
    /// Build a success outcome for a file.
    pub fn success(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            succeeded: true,
            message: "Success".to_owned(),
        }
    }

    /// Build a failure outcome carrying the error's message.
    pub fn failure(file_path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            succeeded: false,
            message: message.into(),
        }
    }
}

/// Aggregate counts and failure list for a finished batch run.
///
/// Derived once after all outcomes are collected; it exists for reporting only and is
/// never persisted. Because parallel runs make no promise about completion order, the
/// failure list is sorted by path so repeated runs report deterministically.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of work items dispatched.
    pub total: usize,

    /// Number of items that succeeded.
    pub succeeded: usize,

    /// Number of items that failed.
    pub failed: usize,

    /// Each failed file with its captured error message, sorted by path.
    pub failures: Vec<(PathBuf, String)>,

    /// Wall-clock time for the whole run.
    pub elapsed: Duration,
}

impl RunSummary {
    /// Summarize a set of collected outcomes.
    pub fn from_outcomes(outcomes: &[Outcome], elapsed: Duration) -> Self {
        let mut failures: Vec<(PathBuf, String)> = outcomes
            .iter()
            .filter(|o| !o.succeeded)
            .map(|o| (o.file_path.clone(), o.message.clone()))
            .collect();

        // Parallel completion order is unspecified; sort for stable reporting.
        failures.sort_by(|a, b| a.0.cmp(&b.0));

        let failed = failures.len();
        Self {
            total: outcomes.len(),
            succeeded: outcomes.len() - failed,
            failed,
            failures,
            elapsed,
        }
    }

    /// Whether every item in the run succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==== Transcription Summary ====")?;
        writeln!(f, "Total files processed: {}", self.total)?;
        writeln!(f, "Total time: {:.2} seconds", self.elapsed.as_secs_f64())?;
        writeln!(f, "Successful: {}", self.succeeded)?;
        write!(f, "Failed: {}", self.failed)?;

        if !self.failures.is_empty() {
            write!(f, "\n\nFailed files:")?;
            for (path, message) in &self.failures {
                write!(f, "\n- {}: {}", path.display(), message)?;
            }
        }

        Ok(())
    }
}
