//! # Bulk Grading
//!
//! Grades every ungraded submission of an assignment, one at a time. A pause between calls
//! keeps the run under the provider's rate limits. A submission that fails is logged and
//! recorded in the summary, and the run carries on with the next one.

use std::time::Duration;

use serde::Serialize;

use crate::error::MarkerError;
use crate::grading::{GradingJob, ensure_gradable};
use crate::prompt::GradingMode;
use crate::traits::completion::CompletionClient;
use crate::types::{Assignment, Submission};

/// Default pause between two grading calls.
pub fn default_delay() -> Duration {
    Duration::from_millis(util::config::bulk_grading_delay_ms())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BulkOutcomeStatus {
    Graded {
        grade: f64,
        manual_review_needed: bool,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkOutcome {
    pub submission_id: String,
    #[serde(flatten)]
    pub status: BulkOutcomeStatus,
}

/// Result of a bulk run.
#[derive(Debug, Clone, Serialize)]
pub struct BulkGradingSummary {
    pub assignment_id: String,
    /// Submissions that were sent for grading (status `submitted`).
    pub attempted: usize,
    pub graded: usize,
    pub failed: usize,
    /// One entry per attempted submission, in input order.
    pub outcomes: Vec<BulkOutcome>,
    /// Every input submission, with graded ones replaced by their updated record.
    pub submissions: Vec<Submission>,
}

impl BulkGradingSummary {
    pub fn message(&self) -> String {
        if self.attempted == 0 {
            "No ungraded submissions found".to_string()
        } else {
            format!(
                "Bulk graded {} of {} submissions ({} failed).",
                self.graded, self.attempted, self.failed
            )
        }
    }
}

/// Grades all submissions whose status is `submitted`.
///
/// # Errors
/// Only assignment-level problems (AI grading disabled, invalid total points) abort the run,
/// and they do so before any call is made. Per-submission failures are reported in
/// [`BulkGradingSummary::outcomes`].
pub async fn bulk_grade(
    client: &dyn CompletionClient,
    assignment: &Assignment,
    submissions: Vec<Submission>,
    delay: Duration,
) -> Result<BulkGradingSummary, MarkerError> {
    ensure_gradable(assignment)?;

    let pending = submissions.iter().filter(|s| s.is_ungraded()).count();
    tracing::info!(assignment_id = %assignment.id, pending, "starting bulk AI grading");

    let mut outcomes = Vec::with_capacity(pending);
    let mut updated = Vec::with_capacity(submissions.len());
    let mut attempted = 0;

    for submission in submissions {
        if !submission.is_ungraded() {
            updated.push(submission);
            continue;
        }

        if attempted > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        attempted += 1;

        let id = submission.id.clone();
        match GradingJob::new(assignment, submission.clone())
            .with_mode(GradingMode::Bulk)
            .run(client)
            .await
        {
            Ok(graded) => {
                outcomes.push(BulkOutcome {
                    submission_id: id,
                    status: BulkOutcomeStatus::Graded {
                        grade: graded.interpretation.overall_grade,
                        manual_review_needed: graded.interpretation.manual_review_needed,
                    },
                });
                updated.push(graded.submission);
            }
            Err(err) => {
                tracing::error!(submission_id = %id, error = %err, "error grading submission");
                outcomes.push(BulkOutcome {
                    submission_id: id,
                    status: BulkOutcomeStatus::Failed {
                        error: err.to_string(),
                    },
                });
                updated.push(submission);
            }
        }
    }

    let failed = outcomes
        .iter()
        .filter(|o| matches!(o.status, BulkOutcomeStatus::Failed { .. }))
        .count();

    let summary = BulkGradingSummary {
        assignment_id: assignment.id.clone(),
        attempted,
        graded: attempted - failed,
        failed,
        outcomes,
        submissions: updated,
    };

    tracing::info!(
        assignment_id = %assignment.id,
        graded = summary.graded,
        failed = summary.failed,
        "bulk AI grading finished"
    );

    Ok(summary)
}
