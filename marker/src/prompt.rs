//! # Prompt Builder
//!
//! Builds the system and user prompts sent to the language model for grading and for
//! personalised feedback. The grading prompt always asks for a final line of the form
//! `Grade: X out of N`, which is the first pattern [`crate::parsers::grade_parser`] looks for.

use crate::parsers::grade_parser::format_points;
use crate::traits::completion::CompletionRequest;
use crate::types::{Assignment, RubricGrade, Submission};

/// Grading temperature for a single, teacher-triggered grading call.
pub const SINGLE_GRADING_TEMPERATURE: f32 = 0.7;
/// Lower temperature for bulk runs, for more consistent scoring across a class.
pub const BULK_GRADING_TEMPERATURE: f32 = 0.5;
pub const FEEDBACK_TEMPERATURE: f32 = 0.7;

/// How a grading call was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradingMode {
    #[default]
    Single,
    Bulk,
}

/// Broad assignment category, guessed from the title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentKind {
    Essay,
    Assessment,
    Coding,
    Presentation,
    Lab,
    Reflection,
    Discussion,
    Project,
    Review,
    Analysis,
    General,
}

impl AssignmentKind {
    const KEYWORDS: [(AssignmentKind, &'static [&'static str]); 10] = [
        (AssignmentKind::Essay, &["essay", "research", "paper"]),
        (AssignmentKind::Assessment, &["quiz", "test", "exam"]),
        (AssignmentKind::Coding, &["programming", "code", "algorithm"]),
        (AssignmentKind::Presentation, &["presentation", "slide", "speech"]),
        (AssignmentKind::Lab, &["lab", "experiment", "practical"]),
        (AssignmentKind::Reflection, &["reflection", "journal", "diary"]),
        (AssignmentKind::Discussion, &["discussion", "debate", "forum"]),
        (AssignmentKind::Project, &["project", "portfolio", "capstone"]),
        (AssignmentKind::Review, &["review", "summary", "critique"]),
        (AssignmentKind::Analysis, &["analysis", "case study", "evaluation"]),
    ];

    /// Case-insensitive keyword match on the title; the first category in the table wins.
    pub fn classify(title: &str) -> Self {
        Self::classify_among(title, |_| true)
    }

    /// Classification used for personalised feedback, which has no discussion, review or
    /// analysis tone. Titles that only match those keywords are `General`.
    pub fn classify_for_feedback(title: &str) -> Self {
        Self::classify_among(title, |kind| {
            !matches!(
                kind,
                AssignmentKind::Discussion | AssignmentKind::Review | AssignmentKind::Analysis
            )
        })
    }

    fn classify_among(title: &str, allowed: impl Fn(AssignmentKind) -> bool) -> Self {
        let title = title.to_lowercase();
        Self::KEYWORDS
            .iter()
            .filter(|(kind, _)| allowed(*kind))
            .find(|(_, words)| words.iter().any(|w| title.contains(w)))
            .map(|(kind, _)| *kind)
            .unwrap_or(AssignmentKind::General)
    }

    pub fn label(self) -> &'static str {
        match self {
            AssignmentKind::Essay => "essay",
            AssignmentKind::Assessment => "assessment",
            AssignmentKind::Coding => "coding",
            AssignmentKind::Presentation => "presentation",
            AssignmentKind::Lab => "lab",
            AssignmentKind::Reflection => "reflection",
            AssignmentKind::Discussion => "discussion",
            AssignmentKind::Project => "project",
            AssignmentKind::Review => "review",
            AssignmentKind::Analysis => "analysis",
            AssignmentKind::General => "general",
        }
    }

    /// What a grader should look at for this kind of work. Empty for `General`.
    pub fn expectations(self) -> &'static [&'static str] {
        match self {
            AssignmentKind::Essay => &[
                "Clear thesis and argument structure",
                "Quality of supporting evidence and citations",
                "Logical flow and organisation",
                "Grammar, spelling and style",
                "Depth of analysis and critical thinking",
            ],
            AssignmentKind::Assessment => &[
                "Accuracy of answers against the expected solutions",
                "Completeness of responses",
                "Working shown where applicable",
                "Understanding of key concepts",
                "No partial credit for completely wrong answers",
            ],
            AssignmentKind::Coding => &[
                "Correctness and functionality",
                "Efficiency of the chosen approach",
                "Organisation and readability",
                "Implementation of the required features",
                "Documentation and comments",
            ],
            AssignmentKind::Presentation => &[
                "Organisation and flow of content",
                "Visual design and clarity",
                "Coverage of the required topics",
                "Quality of supporting material",
                "Effectiveness of communication",
            ],
            AssignmentKind::Lab => &[
                "Correct procedure",
                "Accuracy of observations and data",
                "Analysis and interpretation of results",
                "Understanding of the underlying concepts",
                "Conclusions drawn from the experiment",
            ],
            AssignmentKind::Reflection => &[
                "Depth of personal insight",
                "Connection to course concepts",
                "Critical thinking about experiences",
                "Growth in understanding",
                "Quality of expression",
            ],
            AssignmentKind::Discussion => &[
                "Engagement with the topic",
                "Quality of original contributions",
                "Responses to other ideas",
                "Use of evidence and reasoning",
                "Clarity and focus",
            ],
            AssignmentKind::Project => &[
                "Achievement of the project goals",
                "Quality of execution",
                "Creativity and originality",
                "Technical proficiency",
                "Documentation and presentation",
            ],
            AssignmentKind::Review => &[
                "Coverage of the source material",
                "Critical analysis rather than summary",
                "Supported judgements",
                "Logical organisation of the critique",
                "Insight beyond surface observations",
            ],
            AssignmentKind::Analysis => &[
                "Depth of analytical thinking",
                "Application of relevant concepts and theories",
                "Evidence-based reasoning",
                "Consideration of multiple perspectives",
                "Conclusions that follow from the analysis",
            ],
            AssignmentKind::General => &[],
        }
    }
}

/// Band used to set the tone of personalised feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceLevel {
    Excellent,
    Good,
    Satisfactory,
    Average,
    NeedsImprovement,
}

impl PerformanceLevel {
    /// 90+ excellent, 80+ good, 70+ satisfactory, below 60 needs improvement, else average.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            PerformanceLevel::Excellent
        } else if percentage >= 80.0 {
            PerformanceLevel::Good
        } else if percentage >= 70.0 {
            PerformanceLevel::Satisfactory
        } else if percentage < 60.0 {
            PerformanceLevel::NeedsImprovement
        } else {
            PerformanceLevel::Average
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceLevel::Excellent => "excellent",
            PerformanceLevel::Good => "good",
            PerformanceLevel::Satisfactory => "satisfactory",
            PerformanceLevel::Average => "average",
            PerformanceLevel::NeedsImprovement => "needs improvement",
        }
    }
}

fn rubric_lines(assignment: &Assignment) -> String {
    assignment
        .rubric
        .iter()
        .map(|c| {
            format!(
                "- {} ({} points): {}",
                c.name,
                format_points(c.weight),
                c.description.as_deref().unwrap_or("")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn rubric_assessment(grades: &[RubricGrade]) -> String {
    if grades.is_empty() {
        return String::new();
    }
    let lines = grades
        .iter()
        .map(|g| format!("- {}: {} points - {}", g.criteria, format_points(g.score), g.feedback))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Rubric Assessment:\n{lines}")
}

pub fn grading_system_prompt(mode: GradingMode, assignment: &Assignment) -> String {
    match mode {
        GradingMode::Single => "You are an experienced teaching assistant grading student work for one \
            specific assignment. Tailor every judgement to that assignment's title and \
            requirements, give a fair score that reflects the work actually submitted, and \
            do not fall back on habitual scores such as 85/100."
            .to_string(),
        GradingMode::Bulk => format!(
            "You are an assessment assistant evaluating submissions for \"{title}\".\n\n\
             Your responsibilities:\n\
             1. Check the submission against the assignment requirements.\n\
             2. Detect incorrect answers, off-topic or low-effort content and missing components.\n\
             3. Justify every score with evidence from the submission.\n\
             4. Never use a generic default score.\n\
             5. Award points for quality, not out of generosity.\n\n\
             Scores must track the quality of the content.",
            title = assignment.title
        ),
    }
}

pub fn grading_user_prompt(
    mode: GradingMode,
    assignment: &Assignment,
    submission: &Submission,
) -> String {
    let total = format_points(assignment.total_points);
    let mut prompt = format!(
        "Please grade a student submission for the assignment \"{title}\".\n\n\
         ASSIGNMENT DETAILS:\n\
         TITLE: {title}\n\
         DESCRIPTION: {description}\n\
         TOTAL POINTS: {total}\n\n",
        title = assignment.title,
        description = assignment.description,
    );

    if mode == GradingMode::Bulk {
        let kind = AssignmentKind::classify(&assignment.title);
        let expectations = kind.expectations();
        if !expectations.is_empty() {
            prompt.push_str(&format!("For this {} assignment, evaluate:\n", kind.label()));
            for item in expectations {
                prompt.push_str(&format!("- {item}\n"));
            }
            prompt.push('\n');
        }
    }

    prompt.push_str(&format!(
        "RUBRIC:\n{rubric}\n\nSTUDENT SUBMISSION:\n{content}\n\n",
        rubric = rubric_lines(assignment),
        content = submission.content,
    ));

    prompt.push_str(&format!(
        "REQUIREMENTS:\n\
         1. Grade the actual content of this submission against \"{title}\".\n\
         2. Identify major flaws or incorrect answers first and let them drive the grade.\n\
         3. Poor work may score below 60%; off-topic or incorrect work 0-40%; exceptional work 90-100%.\n\
         4. Give a score for each rubric criterion as \"<criterion>: <score> points\" followed by specific feedback.\n\
         5. Provide a final grade as \"Grade: X out of {total}\".\n",
        title = assignment.title,
    ));

    prompt
}

/// The full request for grading one submission.
pub fn grading_request(
    mode: GradingMode,
    assignment: &Assignment,
    submission: &Submission,
) -> CompletionRequest {
    let temperature = match mode {
        GradingMode::Single => SINGLE_GRADING_TEMPERATURE,
        GradingMode::Bulk => BULK_GRADING_TEMPERATURE,
    };
    CompletionRequest::new(
        grading_system_prompt(mode, assignment),
        grading_user_prompt(mode, assignment, submission),
    )
    .with_temperature(temperature)
}

pub fn feedback_system_prompt(kind: AssignmentKind) -> String {
    format!(
        "You are an educator writing constructive feedback on {label} assignments.\n\n\
         Refer to specific passages of the student's work, balance encouragement with honest \
         critique, and give concrete suggestions for improvement. Avoid generic comments and \
         empty praise.",
        label = kind.label()
    )
}

/// Prompt for rewriting a graded submission's feedback in a personal voice.
///
/// `grade` must be the submission's recorded grade.
pub fn feedback_user_prompt(assignment: &Assignment, submission: &Submission, grade: f64) -> String {
    let kind = AssignmentKind::classify_for_feedback(&assignment.title);
    let percentage = (grade / assignment.total_points) * 100.0;
    let level = PerformanceLevel::from_percentage(percentage);
    let name = submission.student_name.as_deref().unwrap_or("the student");

    format!(
        "Write personalised feedback for {name} on their {kind} submission for \"{title}\".\n\n\
         ASSIGNMENT DETAILS:\n\
         TITLE: {title}\n\
         DESCRIPTION: {description}\n\n\
         STUDENT SUBMISSION:\n{content}\n\n\
         CURRENT GRADE: {grade} out of {total} ({level} performance)\n\n\
         CURRENT FEEDBACK:\n{feedback}\n\n\
         RUBRIC FEEDBACK:\n{rubric}\n\n\
         The feedback should:\n\
         1. Address the student by name ({name}).\n\
         2. Highlight two or three strengths with examples from the work.\n\
         3. Identify two or three areas for improvement with references to the work.\n\
         4. Offer actionable suggestions specific to this kind of assignment.\n\
         5. End on an encouraging note that fits a {level} performance.\n",
        kind = kind.label(),
        title = assignment.title,
        description = assignment.description,
        content = submission.content,
        grade = format_points(grade),
        total = format_points(assignment.total_points),
        level = level.label(),
        feedback = submission.feedback.as_deref().unwrap_or(""),
        rubric = rubric_assessment(&submission.rubric_grades),
    )
}
