//! # Types Module
//!
//! This module defines the core data structures used throughout the marker system:
//! assignments with their weighted rubric, student submissions, and the per-criterion
//! grades written back into a submission after grading.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, weighted grading dimension defined by the assignment author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricCriterion {
    /// Criterion name, e.g. "Clarity".
    #[serde(rename = "criteria")]
    pub name: String,
    /// Share of the total, expressed in points/percent.
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RubricCriterion {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

fn default_true() -> bool {
    true
}

/// An assignment as seen by the grader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Grading ceiling; must be positive.
    pub total_points: f64,
    /// Ordered as the author defined it. May be empty.
    #[serde(default)]
    pub rubric: Vec<RubricCriterion>,
    #[serde(default = "default_true")]
    pub ai_grading_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Submitted,
    Graded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradedBy {
    Ai,
    Teacher,
}

/// Score and feedback recovered for one rubric criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricGrade {
    /// Name of the criterion this grade belongs to.
    pub criteria: String,
    pub score: f64,
    /// Sentences of the grading text attributed to the criterion, space-joined.
    pub feedback: String,
}

/// A student's submission record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub student_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    pub content: String,
    pub status: SubmissionStatus,
    #[serde(default)]
    pub grade: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub rubric_grades: Vec<RubricGrade>,
    #[serde(default)]
    pub graded_by: Option<GradedBy>,
    #[serde(default)]
    pub graded_at: Option<DateTime<Utc>>,
}

impl Submission {
    /// A freshly submitted, ungraded record.
    pub fn new(
        id: impl Into<String>,
        student_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            student_id: student_id.into(),
            student_name: None,
            content: content.into(),
            status: SubmissionStatus::Submitted,
            grade: None,
            feedback: None,
            rubric_grades: Vec::new(),
            graded_by: None,
            graded_at: None,
        }
    }

    pub fn with_student_name(mut self, name: impl Into<String>) -> Self {
        self.student_name = Some(name.into());
        self
    }

    pub fn is_ungraded(&self) -> bool {
        self.status == SubmissionStatus::Submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_assignment_defaults_from_json() {
        let value = json!({
            "id": "a1",
            "title": "Essay on rivers",
            "description": "Write 500 words.",
            "total_points": 100,
            "rubric": [{ "criteria": "Clarity", "weight": 40 }]
        });
        let assignment: Assignment = serde_json::from_value(value).unwrap();
        assert!(assignment.ai_grading_enabled);
        assert_eq!(assignment.rubric[0].name, "Clarity");
        assert_eq!(assignment.rubric[0].description, None);
    }

    #[test]
    fn test_submission_status_serializes_lowercase() {
        let submission = Submission::new("s1", "u1", "text");
        let value = serde_json::to_value(&submission).unwrap();
        assert_eq!(value["status"], "submitted");
        assert!(submission.is_ungraded());
    }
}
