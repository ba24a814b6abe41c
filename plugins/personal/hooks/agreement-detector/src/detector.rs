//! Phrase detector: compiles a [`Catalog`] once and classifies text against it.
//!
//! All entries are compiled into a single [`RegexSet`] for the "does anything
//! match" pass, plus one [`Regex`] per entry to recover the span of the entry
//! that won. The `regex` crate runs in time linear in the input, and inputs
//! longer than the configured cap are skipped outright, so evaluation is
//! bounded for any text.

use std::ops::Range;

use regex::{Regex, RegexBuilder, RegexSet, RegexSetBuilder};
use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, MatchMode, PatternEntry};
use crate::error::CatalogError;

/// Inputs larger than this are treated as a negative detection.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 1024 * 1024;

/// Compiled program size limit per regex (and for the combined set).
const REGEX_SIZE_LIMIT: usize = 16 * (1 << 20);

/// The entry that matched and the byte range of the match in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub entry: PatternEntry,
    pub span: Range<usize>,
}

/// Outcome of one detection call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub hit: Option<Match>,
}

impl MatchResult {
    pub fn none() -> Self {
        Self { hit: None }
    }

    pub fn matched(&self) -> bool {
        self.hit.is_some()
    }

    pub fn entry(&self) -> Option<&PatternEntry> {
        self.hit.as_ref().map(|m| &m.entry)
    }

    pub fn span(&self) -> Option<Range<usize>> {
        self.hit.as_ref().map(|m| m.span.clone())
    }

    /// The offending slice of `text`, which must be the text that was scanned.
    pub fn matched_text<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.hit.as_ref().and_then(|m| text.get(m.span.clone()))
    }
}

struct CompiledEntry {
    entry: PatternEntry,
    regex: Regex,
}

pub struct PhraseDetector {
    entries: Vec<CompiledEntry>,
    set: RegexSet,
    max_input_bytes: usize,
}

impl PhraseDetector {
    pub fn new(catalog: Catalog) -> Result<Self, CatalogError> {
        let mut sources = Vec::with_capacity(catalog.len());
        let mut entries = Vec::with_capacity(catalog.len());

        for entry in catalog.entries() {
            let source = pattern_source(entry);
            let regex = RegexBuilder::new(&source)
                .case_insensitive(true)
                .size_limit(REGEX_SIZE_LIMIT)
                .build()
                .map_err(|source| CatalogError::InvalidPattern {
                    pattern: entry.pattern.to_string(),
                    source,
                })?;
            sources.push(source);
            entries.push(CompiledEntry {
                entry: entry.clone(),
                regex,
            });
        }

        let set = RegexSetBuilder::new(&sources)
            .case_insensitive(true)
            .size_limit(REGEX_SIZE_LIMIT)
            .build()
            .map_err(|source| CatalogError::InvalidPattern {
                pattern: "<combined catalog>".to_string(),
                source,
            })?;

        debug!(entries = entries.len(), "phrase detector compiled");

        Ok(Self {
            entries,
            set,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        })
    }

    /// Detector over [`Catalog::builtin`].
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(Catalog::builtin())
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    pub fn max_input_bytes(&self) -> usize {
        self.max_input_bytes
    }

    /// First catalog entry (in declaration order) that matches `text`.
    pub fn detect(&self, text: &str) -> MatchResult {
        if !self.within_cap(text) {
            return MatchResult::none();
        }

        let hit = self
            .set
            .matches(text)
            .iter()
            .next()
            .and_then(|index| self.locate(index, text));

        if let Some(m) = &hit {
            debug!(
                language = %m.entry.language,
                pattern = %m.entry.pattern,
                start = m.span.start,
                end = m.span.end,
                "agreement phrase detected"
            );
        }

        MatchResult { hit }
    }

    /// Like [`detect`](Self::detect), for raw bytes. Invalid UTF-8 is a miss.
    pub fn detect_bytes(&self, bytes: &[u8]) -> MatchResult {
        match std::str::from_utf8(bytes) {
            Ok(text) => self.detect(text),
            Err(e) => {
                debug!(error = %e, "input is not UTF-8, skipping detection");
                MatchResult::none()
            }
        }
    }

    /// Every entry that matches, in catalog order, each with its first span.
    pub fn detect_all(&self, text: &str) -> Vec<Match> {
        if !self.within_cap(text) {
            return Vec::new();
        }

        self.set
            .matches(text)
            .iter()
            .filter_map(|index| self.locate(index, text))
            .collect()
    }

    fn within_cap(&self, text: &str) -> bool {
        if text.len() > self.max_input_bytes {
            debug!(
                len = text.len(),
                cap = self.max_input_bytes,
                "input over size cap, skipping detection"
            );
            return false;
        }
        true
    }

    fn locate(&self, index: usize, text: &str) -> Option<Match> {
        let compiled = self.entries.get(index)?;
        compiled.regex.find(text).map(|m| Match {
            entry: compiled.entry.clone(),
            span: m.range(),
        })
    }
}

// ---------------------------------------------------------------------------
// Per-mode compilation
// ---------------------------------------------------------------------------

fn pattern_source(entry: &PatternEntry) -> String {
    match entry.mode {
        MatchMode::ExactPhrase => exact_phrase_source(entry),
        MatchMode::Substring => regex::escape(&entry.pattern),
        MatchMode::Regex => entry.pattern.to_string(),
    }
}

/// Literal phrase, anchored on word boundaries at edges that are word
/// characters. CJK phrases get no boundaries.
fn exact_phrase_source(entry: &PatternEntry) -> String {
    let escaped = regex::escape(&entry.pattern);
    if !entry.language.is_space_delimited() {
        return escaped;
    }

    let starts_word = entry.pattern.chars().next().is_some_and(is_word_char);
    let ends_word = entry.pattern.chars().next_back().is_some_and(is_word_char);

    format!(
        "{}{}{}",
        if starts_word { r"\b" } else { "" },
        escaped,
        if ends_word { r"\b" } else { "" }
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
