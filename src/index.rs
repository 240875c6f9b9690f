use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::normalize::{is_valid_token, normalize_line, tokenize};
use crate::record::OccurrenceRecord;
use crate::splay::{Iter, SplayTree};

#[derive(Debug, Error)]
pub enum ConcordanceError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid token {0:?}")]
    InvalidToken(String),
    #[error("invalid line number {line} (previous line was {previous})")]
    InvalidLineNumber { line: usize, previous: usize },
}

/// Counters gathered during a build pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub lines_read: usize,
    pub lines_indexed: usize,
    pub tokens: usize,
}

/// Sequential concordance builder backed by a [`SplayTree`].
#[derive(Debug, Default)]
pub struct Concordance {
    tree: SplayTree,
    last_line: usize,
    stats: BuildStats,
}

impl Concordance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConcordanceError> {
        let file = File::open(path.as_ref())?;
        Self::build_from_reader(BufReader::new(file))
    }

    /// Index every line of `reader`, numbering physical lines from 1.
    ///
    /// Lines are split on `\n` as raw bytes; invalid UTF-8 is replaced and
    /// then scrubbed by normalization, so non-UTF-8 documents still index.
    pub fn build_from_reader<R: BufRead>(reader: R) -> Result<Self, ConcordanceError> {
        let mut concordance = Self::new();
        for (idx, line) in reader.split(b'\n').enumerate() {
            let mut bytes = line?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            let raw = String::from_utf8_lossy(&bytes);
            concordance.add_line(idx + 1, &raw)?;
        }
        let stats = concordance.stats;
        info!(
            "indexed {} tokens from {} of {} lines: {} distinct words (tree height {})",
            stats.tokens,
            stats.lines_indexed,
            stats.lines_read,
            concordance.len(),
            concordance.tree.height()
        );
        if concordance.is_empty() {
            warn!("document contained no indexable words");
        }
        Ok(concordance)
    }

    /// Normalize and tokenize one raw line, feeding each token into the tree.
    /// Returns the number of tokens indexed.
    ///
    /// A line counts as indexed when its normalized form is non-empty, even if
    /// it holds only spaces. Line counters move only once every token on the
    /// line was accepted.
    pub fn add_line(
        &mut self,
        line_number: usize,
        raw: &str,
    ) -> Result<usize, ConcordanceError> {
        let line = normalize_line(raw);
        if !line.is_empty() {
            debug!("parsing line {line_number}: {line}");
        }
        let mut added = 0;
        for word in tokenize(&line) {
            if self.add_token(line_number, word)? {
                added += 1;
            }
        }
        self.stats.lines_read += 1;
        if !line.is_empty() {
            self.stats.lines_indexed += 1;
        }
        Ok(added)
    }

    /// Record one occurrence of `word` on `line_number`.
    ///
    /// Empty words are skipped and report `false`. Words outside the token
    /// alphabet and line numbers that are zero or move backwards are rejected.
    pub fn add_token(
        &mut self,
        line_number: usize,
        word: &str,
    ) -> Result<bool, ConcordanceError> {
        if word.is_empty() {
            return Ok(false);
        }
        if !is_valid_token(word) {
            return Err(ConcordanceError::InvalidToken(word.to_string()));
        }
        if line_number == 0 || line_number < self.last_line {
            return Err(ConcordanceError::InvalidLineNumber {
                line: line_number,
                previous: self.last_line,
            });
        }
        self.last_line = line_number;
        self.tree.find_or_create(word).record_occurrence(line_number);
        self.stats.tokens += 1;
        Ok(true)
    }

    /// Splaying lookup of a single word.
    pub fn lookup(&mut self, word: &str) -> Option<&OccurrenceRecord> {
        self.tree.find(word)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn tree(&self) -> &SplayTree {
        &self.tree
    }

    /// Records in ascending word order.
    pub fn iter(&self) -> Iter<'_> {
        self.tree.iter()
    }

    /// Flatten the finished tree into an immutable, shareable sorted table.
    pub fn freeze(self) -> Arc<WordTable> {
        Arc::new(WordTable {
            stats: self.stats,
            records: self.tree.into_records(),
        })
    }
}

impl<'a> IntoIterator for &'a Concordance {
    type Item = &'a OccurrenceRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug)]
pub struct QueryParams<'a> {
    pub prefix: &'a str,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone)]
pub struct QueryResult {
    pub total: usize,
    pub items: Vec<OccurrenceRecord>,
    pub has_more: bool,
}

/// Read-only view of a finished concordance, sorted by word.
#[derive(Debug, Clone)]
pub struct WordTable {
    stats: BuildStats,
    records: Vec<OccurrenceRecord>,
}

impl WordTable {
    pub fn records(&self) -> &[OccurrenceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    pub fn get(&self, word: &str) -> Option<&OccurrenceRecord> {
        self.records
            .binary_search_by(|r| r.word().cmp(word))
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Page through the words starting with `prefix` (all words when empty).
    /// Pages are 1-based.
    pub fn query(&self, params: QueryParams<'_>) -> QueryResult {
        let start = self.records.partition_point(|r| r.word() < params.prefix);
        let matching = &self.records[start..];
        let total = matching
            .iter()
            .take_while(|r| r.word().starts_with(params.prefix))
            .count();

        let offset = params
            .page
            .saturating_sub(1)
            .saturating_mul(params.page_size);
        let items: Vec<OccurrenceRecord> = matching[..total]
            .iter()
            .skip(offset)
            .take(params.page_size)
            .cloned()
            .collect();
        let has_more = offset.saturating_add(items.len()) < total;

        QueryResult {
            total,
            items,
            has_more,
        }
    }
}
