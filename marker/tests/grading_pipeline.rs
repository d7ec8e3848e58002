use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use marker::bulk::{BulkOutcomeStatus, bulk_grade};
use marker::error::MarkerError;
use marker::grading::GradingJob;
use marker::interpret;
use marker::parsers::grade_parser::MANUAL_REVIEW_NOTICE;
use marker::report::GradingReportResponse;
use marker::traits::completion::{CompletionClient, CompletionRequest};
use marker::types::{Assignment, RubricCriterion, Submission, SubmissionStatus};

/// Replays canned replies in order.
struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, MarkerError>>>,
}

impl ScriptedClient {
    fn new(replies: Vec<Result<String, MarkerError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, MarkerError> {
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(MarkerError::EmptyCompletion))
    }
}

fn essay_assignment() -> Assignment {
    Assignment {
        id: "essay-1".to_string(),
        title: "Argumentative essay".to_string(),
        description: "Argue for or against homework.".to_string(),
        total_points: 100.0,
        rubric: vec![
            RubricCriterion::new("Thesis", 30.0),
            RubricCriterion::new("Evidence", 40.0),
            RubricCriterion::new("Mechanics", 30.0),
        ],
        ai_grading_enabled: true,
    }
}

const TYPICAL_REPLY: &str = "\
**Thesis**: 24 points. The position is stated early. It could be sharper.
**Evidence**: 28 points. Only two sources are cited.
**Mechanics**: 27 points. Few spelling errors.

Overall the thesis and evidence work together reasonably well.

Grade: 79 out of 100";

#[test]
fn interprets_a_typical_reply() {
    let assignment = essay_assignment();
    let result = interpret(&assignment.rubric, assignment.total_points, TYPICAL_REPLY);

    assert_eq!(result.overall_grade, 79.0);
    assert!(!result.manual_review_needed);

    let scores: Vec<(&str, f64)> = result
        .rubric_grades
        .iter()
        .map(|g| (g.criteria.as_str(), g.score))
        .collect();
    assert_eq!(
        scores,
        vec![("Thesis", 24.0), ("Evidence", 28.0), ("Mechanics", 27.0)]
    );

    let shared = "Overall the thesis and evidence work together reasonably well.";
    assert_eq!(
        result.rubric_grades[0].feedback,
        format!("**Thesis**: 24 points. The position is stated early. It could be sharper. {shared}")
    );
    assert!(result.rubric_grades[1].feedback.ends_with(shared));
    assert!(!result.rubric_grades[2].feedback.contains(shared));
}

#[test]
fn interpretation_is_repeatable() {
    let assignment = essay_assignment();
    let first = interpret(&assignment.rubric, assignment.total_points, TYPICAL_REPLY);
    let second = interpret(&assignment.rubric, assignment.total_points, TYPICAL_REPLY);
    assert_eq!(first, second);
}

#[tokio::test]
async fn single_grading_produces_report() {
    let assignment = essay_assignment();
    let client = ScriptedClient::new(vec![Ok(TYPICAL_REPLY.to_string())]);

    let graded = GradingJob::new(&assignment, Submission::new("s1", "u1", "Homework is useful."))
        .run(&client)
        .await
        .unwrap();

    let value = serde_json::to_value(GradingReportResponse::from(graded.report(&assignment))).unwrap();
    assert_eq!(value["data"]["submission_id"], "s1");
    assert_eq!(value["data"]["overall_grade"], 79.0);
    assert_eq!(value["data"]["percentage"], 79.0);
    assert_eq!(value["data"]["rubric_grades"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn bulk_grading_survives_failures_and_flags_manual_review() {
    let assignment = essay_assignment();
    let client = ScriptedClient::new(vec![
        Ok(TYPICAL_REPLY.to_string()),
        Err(MarkerError::Http("connection reset".to_string())),
        Ok("I could not make sense of this submission.".to_string()),
    ]);

    let submissions = vec![
        Submission::new("s1", "u1", "first"),
        Submission::new("s2", "u2", "second"),
        Submission::new("s3", "u3", "third"),
    ];

    let summary = bulk_grade(&client, &assignment, submissions, Duration::from_millis(1))
        .await
        .unwrap();

    assert_eq!(summary.attempted, 3);
    assert_eq!(summary.graded, 2);
    assert_eq!(summary.failed, 1);

    match &summary.outcomes[1].status {
        BulkOutcomeStatus::Failed { error } => assert!(error.contains("connection reset")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(
        summary.outcomes[2].status,
        BulkOutcomeStatus::Graded {
            grade: 0.0,
            manual_review_needed: true
        }
    );

    let third = &summary.submissions[2];
    assert_eq!(third.status, SubmissionStatus::Graded);
    assert!(third.feedback.as_deref().unwrap().starts_with(MANUAL_REVIEW_NOTICE));
    assert_eq!(summary.submissions[1].status, SubmissionStatus::Submitted);
}
