//! Positional diff - pinpoint where actual output departs from the expectation
//!
//! This is a character-index scan, not an edit-distance diff. Every character
//! of the actual output is compared with the expected character at the same
//! index; a highlighted span starts at the first mismatch of a run and ends
//! where the two strings line up again. An insertion or deletion therefore
//! shifts everything after it and the rest of the line tends to light up.

use std::fmt;

/// A run of actual output, either matching the expectation or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSegment {
    pub text: String,
    pub wrong: bool,
}

/// Actual output annotated with mismatching spans
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diff {
    pub segments: Vec<DiffSegment>,
}

impl Diff {
    /// The actual text with all annotation removed
    pub fn plain(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// True when nothing is highlighted
    pub fn is_clean(&self) -> bool {
        self.segments.iter().all(|s| !s.wrong)
    }

    /// Char index of the first highlighted character
    pub fn first_divergence(&self) -> Option<usize> {
        let mut index = 0;
        for segment in &self.segments {
            if segment.wrong {
                return Some(index);
            }
            index += segment.text.chars().count();
        }
        None
    }

    /// Highlighted spans as `(char_index, text)` pairs
    pub fn wrong_spans(&self) -> Vec<(usize, &str)> {
        let mut index = 0;
        let mut spans = Vec::new();
        for segment in &self.segments {
            if segment.wrong {
                spans.push((index, segment.text.as_str()));
            }
            index += segment.text.chars().count();
        }
        spans
    }

    fn push(&mut self, ch: char, wrong: bool) {
        match self.segments.last_mut() {
            Some(last) if last.wrong == wrong => last.text.push(ch),
            _ => self.segments.push(DiffSegment {
                text: ch.to_string(),
                wrong,
            }),
        }
    }
}

/// Plain-text rendering: wrong spans are wrapped in `[[` `]]`
impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            if segment.wrong {
                write!(f, "[[{}]]", segment.text)?;
            } else {
                f.write_str(&segment.text)?;
            }
        }
        Ok(())
    }
}

/// Annotate `actual` against `expected`
pub fn render_diff(expected: &str, actual: &str) -> Diff {
    let expected: Vec<char> = expected.chars().collect();
    let mut diff = Diff::default();
    let mut previous_was_wrong = false;

    for (index, ch) in actual.chars().enumerate() {
        match expected.get(index) {
            None => previous_was_wrong = true,
            Some(&want) if want != ch && !previous_was_wrong => previous_was_wrong = true,
            Some(&want) if want == ch && previous_was_wrong => previous_was_wrong = false,
            Some(_) => {}
        }
        diff.push(ch, previous_was_wrong);
    }

    diff
}

/// How one output channel of a failing case should be explained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelReport {
    /// Output was produced; show the expectation and the annotated output
    Mismatch { expected: String, diff: Diff },
    /// An expectation exists but the channel was empty
    Missing { expected: String },
    /// No expectation existed but the channel produced output
    Unexpected { actual: String },
    /// Nothing worth showing
    Silent,
}

/// Explain a single channel (stdout or stderr) of a case
pub fn compare_channel(expected: Option<&str>, actual: &str) -> ChannelReport {
    match expected {
        Some(expected) if !actual.is_empty() => ChannelReport::Mismatch {
            expected: expected.to_string(),
            diff: render_diff(expected, actual),
        },
        Some(expected) if !expected.is_empty() => ChannelReport::Missing {
            expected: expected.to_string(),
        },
        Some(_) => ChannelReport::Silent,
        None if !actual.is_empty() => ChannelReport::Unexpected {
            actual: actual.to_string(),
        },
        None => ChannelReport::Silent,
    }
}
