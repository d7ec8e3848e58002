//! # AI Grading Job
//!
//! [`GradingJob`] grades one submission: it builds the prompt, asks the
//! [`CompletionClient`] for a grading, interprets the text with
//! [`GradeParser`](crate::parsers::grade_parser::GradeParser) and writes the result into a
//! copy of the submission record.
//!
//! The returned [`GradedSubmission`] is ready to be persisted by the caller.

use chrono::Utc;
use serde::Serialize;

use crate::error::MarkerError;
use crate::parsers::grade_parser::{GradeInterpretation, GradeParser};
use crate::prompt::{self, GradingMode};
use crate::report::GradingReport;
use crate::traits::completion::CompletionClient;
use crate::types::{Assignment, GradedBy, Submission, SubmissionStatus};

/// Outcome of one AI grading call.
#[derive(Debug, Clone, Serialize)]
pub struct GradedSubmission {
    /// The submission with grade, feedback and rubric grades applied.
    pub submission: Submission,
    /// The unmodified model output.
    pub ai_response: String,
    pub interpretation: GradeInterpretation,
}

impl GradedSubmission {
    pub fn report(&self, assignment: &Assignment) -> GradingReport {
        GradingReport::from_interpretation(
            &self.submission.id,
            assignment.total_points,
            &self.interpretation,
        )
    }
}

/// Checks that an assignment can be sent to the model at all.
pub(crate) fn ensure_gradable(assignment: &Assignment) -> Result<(), MarkerError> {
    if !assignment.ai_grading_enabled {
        return Err(MarkerError::AiGradingDisabled(assignment.id.clone()));
    }
    if !assignment.total_points.is_finite() || assignment.total_points <= 0.0 {
        return Err(MarkerError::InvalidAssignment(format!(
            "assignment {} has non-positive total points ({})",
            assignment.id, assignment.total_points
        )));
    }
    Ok(())
}

/// A grading job for a single submission.
pub struct GradingJob<'a> {
    assignment: &'a Assignment,
    submission: Submission,
    mode: GradingMode,
}

impl<'a> GradingJob<'a> {
    pub fn new(assignment: &'a Assignment, submission: Submission) -> Self {
        Self {
            assignment,
            submission,
            mode: GradingMode::Single,
        }
    }

    /// Selects the prompt variant and temperature.
    pub fn with_mode(mut self, mode: GradingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Runs the job.
    ///
    /// # Errors
    /// - [`MarkerError::AiGradingDisabled`] / [`MarkerError::InvalidAssignment`] before any call.
    /// - Whatever the client reports for the completion call.
    ///
    /// A response without a recognisable grade is not an error; it produces a graded
    /// submission with grade 0 and the manual-review notice in its feedback.
    pub async fn run(self, client: &dyn CompletionClient) -> Result<GradedSubmission, MarkerError> {
        ensure_gradable(self.assignment)?;

        tracing::info!(
            assignment_id = %self.assignment.id,
            submission_id = %self.submission.id,
            mode = ?self.mode,
            "requesting AI grading"
        );

        let request = prompt::grading_request(self.mode, self.assignment, &self.submission);
        let ai_response = client.complete(&request).await?;

        let interpretation =
            GradeParser::new(&self.assignment.rubric, self.assignment.total_points).parse(&ai_response);

        let mut submission = self.submission;
        submission.grade = Some(interpretation.overall_grade);
        submission.feedback = Some(interpretation.feedback.clone());
        submission.graded_by = Some(GradedBy::Ai);
        submission.graded_at = Some(Utc::now());
        submission.status = SubmissionStatus::Graded;
        if !interpretation.rubric_grades.is_empty() {
            submission.rubric_grades = interpretation.rubric_grades.clone();
        }

        tracing::info!(
            submission_id = %submission.id,
            grade = interpretation.overall_grade,
            manual_review = interpretation.manual_review_needed,
            "AI grading complete"
        );

        Ok(GradedSubmission {
            submission,
            ai_response,
            interpretation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::grade_parser::MANUAL_REVIEW_NOTICE;
    use crate::traits::completion::CompletionRequest;
    use crate::types::{RubricCriterion, RubricGrade};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedClient {
        reply: String,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl FixedClient {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for FixedClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, MarkerError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.reply.clone())
        }
    }

    fn assignment() -> Assignment {
        Assignment {
            id: "a1".into(),
            title: "Persuasive essay".into(),
            description: "Argue for public transport.".into(),
            total_points: 20.0,
            rubric: vec![RubricCriterion::new("Clarity", 50.0), RubricCriterion::new("Evidence", 50.0)],
            ai_grading_enabled: true,
        }
    }

    #[tokio::test]
    async fn test_run_applies_grade_to_submission() {
        let client = FixedClient::new(
            "Clarity: 8 points. Easy to follow.\nEvidence: 6 points. Needs sources.\nGrade: 14 out of 20",
        );
        let assignment = assignment();
        let graded = GradingJob::new(&assignment, Submission::new("s1", "u1", "Buses are good."))
            .run(&client)
            .await
            .unwrap();

        let submission = &graded.submission;
        assert_eq!(submission.grade, Some(14.0));
        assert_eq!(submission.status, SubmissionStatus::Graded);
        assert_eq!(submission.graded_by, Some(GradedBy::Ai));
        assert!(submission.graded_at.is_some());
        assert_eq!(
            submission.rubric_grades,
            vec![
                RubricGrade {
                    criteria: "Clarity".into(),
                    score: 8.0,
                    feedback: "Clarity: 8 points. Easy to follow.".into(),
                },
                RubricGrade {
                    criteria: "Evidence".into(),
                    score: 6.0,
                    feedback: "Evidence: 6 points. Needs sources.".into(),
                },
            ]
        );
        assert_eq!(submission.feedback.as_deref(), Some(graded.ai_response.as_str()));

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].temperature, prompt::SINGLE_GRADING_TEMPERATURE);
        assert!(seen[0].user_prompt.contains("Buses are good."));
    }

    #[tokio::test]
    async fn test_unparseable_reply_keeps_existing_rubric_grades_and_flags_review() {
        let client = FixedClient::new("Thanks for the submission, it was interesting.");
        let assignment = assignment();
        let mut submission = Submission::new("s1", "u1", "text");
        submission.rubric_grades = vec![RubricGrade {
            criteria: "Clarity".into(),
            score: 5.0,
            feedback: "manual".into(),
        }];

        let graded = GradingJob::new(&assignment, submission).run(&client).await.unwrap();
        assert!(graded.interpretation.manual_review_needed);
        assert_eq!(graded.submission.grade, Some(0.0));
        assert_eq!(graded.submission.rubric_grades.len(), 1);
        assert!(graded
            .submission
            .feedback
            .as_deref()
            .unwrap()
            .starts_with(MANUAL_REVIEW_NOTICE));
    }

    #[tokio::test]
    async fn test_disabled_assignment_is_refused_without_calling_client() {
        let client = FixedClient::new("Grade: 10");
        let mut assignment = assignment();
        assignment.ai_grading_enabled = false;

        let err = GradingJob::new(&assignment, Submission::new("s1", "u1", "text"))
            .run(&client)
            .await
            .unwrap_err();
        assert!(matches!(err, MarkerError::AiGradingDisabled(id) if id == "a1"));
        assert!(client.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_total_points_is_invalid() {
        let client = FixedClient::new("Grade: 10");
        let mut assignment = assignment();
        assignment.total_points = 0.0;

        let err = GradingJob::new(&assignment, Submission::new("s1", "u1", "text"))
            .run(&client)
            .await
            .unwrap_err();
        assert!(matches!(err, MarkerError::InvalidAssignment(_)));
    }
}
