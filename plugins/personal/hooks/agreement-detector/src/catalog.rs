//! Detection patterns for reflexive-agreement phrases, grouped by language.
//!
//! A [`Catalog`] is an ordered, immutable list of [`PatternEntry`] values. The
//! order is significant: the detector reports the first entry that matches, so
//! the language groups and the entries inside each group are evaluated exactly
//! as declared here.
//!
//! Every entry is matched case-insensitively (Unicode simple case folding).
//! Scripts without case, like Hangul or kana, are unaffected by the fold, so
//! one rule covers the whole catalog.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Chinese,
    Korean,
    Japanese,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Chinese => "zh",
            Language::Korean => "ko",
            Language::Japanese => "ja",
        }
    }

    /// Whether words are delimited by whitespace/punctuation. Exact phrases in
    /// such languages must sit on word boundaries; CJK phrases only need
    /// containment.
    pub fn is_space_delimited(self) -> bool {
        matches!(self, Language::English)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Literal phrase; word boundaries apply for space-delimited languages.
    ExactPhrase,
    /// Literal containment, no boundary check.
    Substring,
    /// Regular expression, evaluated by a linear-time engine.
    Regex,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PatternEntry {
    pub language: Language,
    pub pattern: Cow<'static, str>,
    pub mode: MatchMode,
}

impl PatternEntry {
    pub fn new(language: Language, pattern: impl Into<Cow<'static, str>>, mode: MatchMode) -> Self {
        Self {
            language,
            pattern: pattern.into(),
            mode,
        }
    }

    pub fn phrase(language: Language, pattern: impl Into<Cow<'static, str>>) -> Self {
        Self::new(language, pattern, MatchMode::ExactPhrase)
    }

    pub fn substring(language: Language, pattern: impl Into<Cow<'static, str>>) -> Self {
        Self::new(language, pattern, MatchMode::Substring)
    }

    pub fn regex(language: Language, pattern: impl Into<Cow<'static, str>>) -> Self {
        Self::new(language, pattern, MatchMode::Regex)
    }
}

/// Ordered, validated set of detection patterns.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<PatternEntry>,
}

impl Catalog {
    /// Validate and wrap `entries`, keeping their order.
    pub fn new(entries: Vec<PatternEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            if entry.pattern.is_empty() {
                return Err(CatalogError::EmptyPattern {
                    language: entry.language,
                    index,
                });
            }
            if !seen.insert(entry) {
                return Err(CatalogError::DuplicateEntry {
                    index,
                    pattern: entry.pattern.to_string(),
                });
            }
        }

        Ok(Self { entries })
    }

    /// The shipped catalog: English, Chinese, Korean, then Japanese.
    pub fn builtin() -> Self {
        use Language::*;

        let entries = vec![
            // English
            PatternEntry::regex(English, r"\byou\s+are\s+(?:absolutely\s+)?(?:right|correct)\b"),
            PatternEntry::regex(English, r"\byou['’]?re\s+(?:absolutely\s+)?(?:right|correct)\b"),
            PatternEntry::regex(English, r"\bthat['’]?s\s+(?:absolutely\s+)?(?:right|correct)\b"),
            PatternEntry::regex(English, r"\babsolutely\s+(?:right|correct)\b"),
            PatternEntry::regex(English, r"\bexactly\s+(?:right|correct)\b"),
            PatternEntry::phrase(English, "spot on"),
            PatternEntry::phrase(English, "good point"),
            PatternEntry::phrase(English, "valid point"),
            // Chinese
            PatternEntry::regex(Chinese, r"你\s*(?:是\s*)?(?:对的|正确的|没错)"),
            PatternEntry::regex(Chinese, r"完全\s*(?:正确|没错)"),
            PatternEntry::regex(Chinese, r"确实\s*(?:如此|这样)"),
            PatternEntry::regex(Chinese, r"说得\s*(?:对|不错)"),
            PatternEntry::regex(Chinese, r"你说的\s*(?:对|没错)"),
            // Korean
            PatternEntry::regex(Korean, r"사용자가.*맞다"),
            PatternEntry::substring(Korean, "맞습니다"),
            PatternEntry::substring(Korean, "정확합니다"),
            // Japanese
            PatternEntry::substring(Japanese, "その通りです"),
            PatternEntry::substring(Japanese, "正しいです"),
            PatternEntry::substring(Japanese, "そうですね"),
        ];

        Self { entries }
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    pub fn by_language(&self, language: Language) -> impl Iterator<Item = &PatternEntry> {
        self.entries.iter().filter(move |e| e.language == language)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
