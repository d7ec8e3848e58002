//! # Grading Report Module
//!
//! This module defines the data structures and response envelope for returning grading results
//! from the marker system. It provides a standardized, serializable format for reporting the
//! overall grade, per-criterion grades and feedback to clients.
//!
//! ## JSON Output Example
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Grading complete.",
//!   "data": {
//!     "submission_id": "...",
//!     "overall_grade": 14.0,
//!     "total_points": 20.0,
//!     "percentage": 70.0,
//!     "manual_review_needed": false,
//!     "rubric_grades": [
//!       { "criteria": "Clarity", "score": 8.0, "feedback": "..." }
//!     ],
//!     "feedback": "..."
//!   }
//! }
//! ```

use serde::Serialize;

use crate::parsers::grade_parser::GradeInterpretation;
use crate::types::RubricGrade;

/// Round a float to two decimal places.
#[inline]
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Final report for one graded submission.
#[derive(Debug, Clone, Serialize)]
pub struct GradingReport {
    pub submission_id: String,
    pub overall_grade: f64,
    pub total_points: f64,
    /// `overall_grade / total_points * 100`, rounded to two decimals.
    pub percentage: f64,
    pub manual_review_needed: bool,
    pub rubric_grades: Vec<RubricGrade>,
    pub feedback: String,
}

impl GradingReport {
    pub fn from_interpretation(
        submission_id: &str,
        total_points: f64,
        interpretation: &GradeInterpretation,
    ) -> Self {
        let percentage = if total_points > 0.0 {
            round2(interpretation.overall_grade / total_points * 100.0)
        } else {
            0.0
        };

        Self {
            submission_id: submission_id.to_string(),
            overall_grade: interpretation.overall_grade,
            total_points,
            percentage,
            manual_review_needed: interpretation.manual_review_needed,
            rubric_grades: interpretation.rubric_grades.clone(),
            feedback: interpretation.feedback.clone(),
        }
    }
}

/// The API response envelope for grading results.
#[derive(Debug, Serialize)]
pub struct GradingReportResponse {
    success: bool,
    message: String,
    data: GradingReport,
}

impl From<GradingReport> for GradingReportResponse {
    fn from(report: GradingReport) -> Self {
        let message = if report.manual_review_needed {
            "Grading complete. Manual review needed."
        } else {
            "Grading complete."
        };
        GradingReportResponse {
            success: true,
            message: message.to_string(),
            data: report,
        }
    }
}
