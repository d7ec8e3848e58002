//! # Grading Response Interpreter
//!
//! Turns the free-form text of an AI grading response into a structured result: an overall
//! grade, a score per rubric criterion, and the sentences of feedback that belong to each
//! criterion.
//!
//! The extraction is a best-effort priority chain of regular expressions. Each stage is
//! first-match-wins, and the order of the patterns (not their position in the text) decides
//! which number is taken:
//!
//! 1. Overall grade labels: `grade:`, `N out of TOTAL` / `N/TOTAL`, `score:`, `points:`,
//!    `total:`, `overall:`.
//! 2. Percentage fallback: `N%` scaled to the assignment's total points.
//! 3. Per-criterion scores, with a sentence-level number search as the last resort.
//! 4. Feedback sentences per criterion (a sentence may belong to several criteria).
//! 5. Reconciliation from criterion scores, or the manual-review outcome.
//!
//! Nothing here returns an error. A response without any recognisable grade yields
//! `overall_grade = 0` with `manual_review_needed = true`. No clamping is applied, so a
//! pathological response can produce a grade outside `0..=total_points`.
//!
//! Criterion names are interpolated into the patterns as written, without escaping. A name
//! that is not a valid pattern simply never matches through the regex stage.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::types::{RubricCriterion, RubricGrade};
use crate::utilities::sentences::{Sentence, split_sentences};

/// Prefixed to the feedback when no grade could be recovered.
pub const MANUAL_REVIEW_NOTICE: &str = "The AI grading system couldn't determine a grade from the response. Please review the submission manually.\n\n";

// ASCII digits only; a non-ASCII digit must not win a match that `f64::parse` then rejects.
const NUMBER: &str = r"([0-9]+\.?[0-9]*)";

static GRADE_LABEL: Lazy<Regex> = Lazy::new(|| label_pattern("grade"));
static SCORE_LABEL: Lazy<Regex> = Lazy::new(|| label_pattern("score"));
static POINTS_LABEL: Lazy<Regex> = Lazy::new(|| label_pattern("points"));
static TOTAL_LABEL: Lazy<Regex> = Lazy::new(|| label_pattern("total"));
static OVERALL_LABEL: Lazy<Regex> = Lazy::new(|| label_pattern("overall"));
static PERCENTAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("{NUMBER}%")).expect("percentage regex is valid"));
static FIRST_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(NUMBER).expect("number regex is valid"));

fn label_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"(?i){label}:?\s*{NUMBER}")).expect("label regex is valid")
}

/// Renders a point value the way it appears in prompts: `100`, not `100.0`.
pub fn format_points(points: f64) -> String {
    format!("{points}")
}

/// Structured result of interpreting one grading response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeInterpretation {
    /// Recovered grade, or 0 when manual review is needed.
    pub overall_grade: f64,
    /// One entry per criterion that produced a score, in rubric order.
    pub rubric_grades: Vec<RubricGrade>,
    pub manual_review_needed: bool,
    /// The full response text, prefixed with [`MANUAL_REVIEW_NOTICE`] when needed.
    pub feedback: String,
}

/// Interprets grading text for one assignment's rubric and point ceiling.
///
/// The parser holds no state between calls; the same input always produces the same
/// [`GradeInterpretation`].
#[derive(Debug, Clone, Copy)]
pub struct GradeParser<'a> {
    rubric: &'a [RubricCriterion],
    total_points: f64,
}

impl<'a> GradeParser<'a> {
    pub fn new(rubric: &'a [RubricCriterion], total_points: f64) -> Self {
        Self {
            rubric,
            total_points,
        }
    }

    /// Runs all five stages over `raw_text`.
    pub fn parse(&self, raw_text: &str) -> GradeInterpretation {
        let sentences = split_sentences(raw_text);

        let overall = self
            .extract_overall_grade(raw_text)
            .or_else(|| self.percentage_grade(raw_text));

        // (rubric index, score) for every criterion that produced a score.
        let scored: Vec<(usize, f64)> = self
            .rubric
            .iter()
            .enumerate()
            .filter_map(|(index, criterion)| {
                self.extract_criterion_score(criterion, raw_text, &sentences)
                    .map(|score| (index, score))
            })
            .collect();

        let out_of = self.out_of_pattern();
        let attributions = attribute_sentences(self.rubric, &sentences, |text| {
            overall_chain(out_of.as_ref())
                .into_iter()
                .flatten()
                .any(|re| re.is_match(text))
        });
        let rubric_grades: Vec<RubricGrade> = scored
            .iter()
            .map(|&(index, score)| RubricGrade {
                criteria: self.rubric[index].name.clone(),
                score,
                feedback: feedback_for(index, &attributions),
            })
            .collect();

        let overall = overall.or_else(|| self.reconcile(&scored));

        match overall {
            Some(grade) => GradeInterpretation {
                overall_grade: grade,
                rubric_grades,
                manual_review_needed: false,
                feedback: raw_text.to_string(),
            },
            None => {
                tracing::warn!(
                    total_points = self.total_points,
                    "no grade found in AI response; flagging for manual review"
                );
                GradeInterpretation {
                    overall_grade: 0.0,
                    rubric_grades,
                    manual_review_needed: true,
                    feedback: format!("{MANUAL_REVIEW_NOTICE}{raw_text}"),
                }
            }
        }
    }

    /// Stage 1: labelled grades, tried strictly in priority order.
    pub fn extract_overall_grade(&self, raw_text: &str) -> Option<f64> {
        let out_of = self.out_of_pattern();
        overall_chain(out_of.as_ref())
            .into_iter()
            .flatten()
            .find_map(|re| capture_number(re, raw_text))
    }

    /// `N out of TOTAL` / `N/TOTAL` for this assignment's ceiling.
    fn out_of_pattern(&self) -> Option<Regex> {
        Regex::new(&format!(
            r"(?i){NUMBER}\s*(?:out of|/)\s*{}",
            regex::escape(&format_points(self.total_points))
        ))
        .ok()
    }

    /// Stage 2: the first `N%` in the text, scaled to the point ceiling.
    pub fn percentage_grade(&self, raw_text: &str) -> Option<f64> {
        capture_number(&PERCENTAGE, raw_text).map(|percent| (percent / 100.0) * self.total_points)
    }

    /// Stage 3 for a single criterion.
    fn extract_criterion_score(
        &self,
        criterion: &RubricCriterion,
        raw_text: &str,
        sentences: &[Sentence<'_>],
    ) -> Option<f64> {
        let name = &criterion.name;
        let patterns = [
            format!(r"(?i){name}[^:]*:?\s*{NUMBER}\s*(?:points|point|pts|pt)?"),
            format!(r"(?i){name}[^:]*:?\s*(?:score|points|grade)?\s*:?\s*{NUMBER}"),
            format!(r"(?i)for\s+(?:the\s+)?{name}[^:]*:?\s*{NUMBER}"),
        ];

        for pattern in &patterns {
            match Regex::new(pattern) {
                Ok(re) => {
                    if let Some(score) = capture_number(&re, raw_text) {
                        return Some(score);
                    }
                }
                Err(err) => {
                    tracing::warn!(criterion = %name, error = %err, "criterion pattern does not compile");
                }
            }
        }

        let needle = name.to_lowercase();
        let mentioned: Vec<&str> = sentences
            .iter()
            .filter(|s| s.mentions(&needle))
            .map(|s| s.text)
            .collect();
        if mentioned.is_empty() {
            return None;
        }
        capture_number(&FIRST_NUMBER, &mentioned.join(" "))
    }

    /// Stage 5: sum of scores over the weights of the criteria that produced them.
    fn reconcile(&self, scored: &[(usize, f64)]) -> Option<f64> {
        if scored.is_empty() {
            return None;
        }
        let score_sum: f64 = scored.iter().map(|(_, score)| score).sum();
        let weight_sum: f64 = scored.iter().map(|&(index, _)| self.rubric[index].weight).sum();
        (weight_sum > 0.0).then(|| (score_sum / weight_sum) * self.total_points)
    }
}

/// Convenience wrapper around [`GradeParser`].
pub fn interpret(
    rubric: &[RubricCriterion],
    total_points: f64,
    raw_text: &str,
) -> GradeInterpretation {
    GradeParser::new(rubric, total_points).parse(raw_text)
}

/// The overall-grade patterns in priority order.
fn overall_chain(out_of: Option<&Regex>) -> [Option<&Regex>; 6] {
    [
        Some(&*GRADE_LABEL),
        out_of,
        Some(&*SCORE_LABEL),
        Some(&*POINTS_LABEL),
        Some(&*TOTAL_LABEL),
        Some(&*OVERALL_LABEL),
    ]
}

fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// For every sentence, which rubric entries (by index) it is attributed to.
///
/// A sentence belongs to every criterion it names. A sentence that names none inherits the
/// criteria of the closest preceding naming sentence on the same line, unless it states the
/// overall grade; such a sentence belongs to no criterion and ends the carry-over.
fn attribute_sentences<'s>(
    rubric: &[RubricCriterion],
    sentences: &[Sentence<'s>],
    states_overall_grade: impl Fn(&str) -> bool,
) -> Vec<(&'s str, Vec<bool>)> {
    let needles: Vec<String> = rubric.iter().map(|c| c.name.to_lowercase()).collect();
    let mut carry: Option<(usize, Vec<bool>)> = None;
    let mut out = Vec::with_capacity(sentences.len());

    for sentence in sentences {
        let mentions: Vec<bool> = needles.iter().map(|n| sentence.mentions(n)).collect();
        let attributed = if mentions.iter().any(|m| *m) {
            carry = Some((sentence.line, mentions.clone()));
            mentions
        } else if states_overall_grade(sentence.text) {
            carry = None;
            mentions
        } else {
            match &carry {
                Some((line, previous)) if *line == sentence.line => previous.clone(),
                _ => mentions,
            }
        };
        out.push((sentence.text, attributed));
    }

    out
}

fn feedback_for(index: usize, attributions: &[(&str, Vec<bool>)]) -> String {
    attributions
        .iter()
        .filter(|(_, attributed)| attributed[index])
        .map(|(text, _)| *text)
        .collect::<Vec<_>>()
        .join(" ")
}
