//! Personalised feedback for an already graded submission.

use serde::Serialize;

use crate::error::MarkerError;
use crate::prompt::{self, AssignmentKind, FEEDBACK_TEMPERATURE};
use crate::traits::completion::{CompletionClient, CompletionRequest};
use crate::types::{Assignment, Submission};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalizedFeedback {
    pub original_feedback: Option<String>,
    pub personalized_feedback: String,
}

/// Generates student-facing feedback from the submission's grade and existing feedback.
///
/// # Errors
/// - [`MarkerError::MissingField`] when the submission has no grade yet.
/// - [`MarkerError::InvalidAssignment`] when the assignment has non-positive total points.
/// - Whatever the client reports for the completion call.
pub async fn generate_personalized_feedback(
    client: &dyn CompletionClient,
    assignment: &Assignment,
    submission: &Submission,
) -> Result<PersonalizedFeedback, MarkerError> {
    let grade = submission
        .grade
        .ok_or_else(|| MarkerError::MissingField(format!("grade of submission {}", submission.id)))?;
    if assignment.total_points <= 0.0 {
        return Err(MarkerError::InvalidAssignment(format!(
            "assignment {} has non-positive total points",
            assignment.id
        )));
    }

    let kind = AssignmentKind::classify_for_feedback(&assignment.title);
    let request = CompletionRequest::new(
        prompt::feedback_system_prompt(kind),
        prompt::feedback_user_prompt(assignment, submission, grade),
    )
    .with_temperature(FEEDBACK_TEMPERATURE);

    tracing::info!(submission_id = %submission.id, kind = kind.label(), "requesting personalised feedback");
    let personalized_feedback = client.complete(&request).await?;

    Ok(PersonalizedFeedback {
        original_feedback: submission.feedback.clone(),
        personalized_feedback,
    })
}
