use serde::Serialize;

/// Per-word occurrence data: how often the word was seen and on which lines.
///
/// `lines` is strictly increasing as long as callers feed non-decreasing line
/// numbers; repeated occurrences on the same line bump `count` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccurrenceRecord {
    word: String,
    count: usize,
    lines: Vec<usize>,
}

impl OccurrenceRecord {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            count: 0,
            lines: Vec::new(),
        }
    }

    pub fn record_occurrence(&mut self, line_number: usize) {
        self.count += 1;
        if self.lines.last() != Some(&line_number) {
            self.lines.push(line_number);
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn lines(&self) -> &[usize] {
        &self.lines
    }
}
