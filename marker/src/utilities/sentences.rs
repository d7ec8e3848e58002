//! Sentence splitting for grading responses.
//!
//! A sentence ends at a run of `.`, `!`, `?` or `…` (plus any closing quotes or brackets)
//! that is followed by whitespace or the end of the line. Line breaks always end a
//! sentence. Decimal numbers such as `8.5` are never split because the full stop is not
//! followed by whitespace.

use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[.!?…]+["'’”)\]]*(?:\s+|$)"#).expect("sentence terminator regex is valid")
});

/// A trimmed, non-empty sentence and the zero-based line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub line: usize,
    pub text: &'a str,
}

impl Sentence<'_> {
    /// Case-insensitive substring test.
    pub fn mentions(&self, needle_lower: &str) -> bool {
        self.text.to_lowercase().contains(needle_lower)
    }
}

pub fn split_sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut sentences = Vec::new();

    for (line, content) in text.lines().enumerate() {
        let mut start = 0;
        for end in SENTENCE_END.find_iter(content) {
            push_trimmed(&mut sentences, line, &content[start..end.end()]);
            start = end.end();
        }
        push_trimmed(&mut sentences, line, &content[start..]);
    }

    sentences
}

fn push_trimmed<'a>(out: &mut Vec<Sentence<'a>>, line: usize, raw: &'a str) {
    let text = raw.trim();
    if !text.is_empty() {
        out.push(Sentence { line, text });
    }
}
