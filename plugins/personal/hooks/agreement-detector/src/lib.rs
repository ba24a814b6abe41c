//! Detects reflexive-agreement phrases ("you are absolutely right" and its
//! Chinese, Korean and Japanese equivalents) in assistant replies and produces
//! a corrective reminder.
//!
//! The core is [`PhraseDetector::detect`] plus [`compose_advisory`]; the
//! [`hook`] and [`transcript`] modules adapt it to a Stop hook that reads a
//! JSONL transcript.

pub mod advisory;
pub mod catalog;
pub mod config;
pub mod detector;
pub mod error;
pub mod hook;
pub mod transcript;

pub use advisory::{compose_advisory, ADVISORY};
pub use catalog::{Catalog, Language, MatchMode, PatternEntry};
pub use config::Config;
pub use detector::{Match, MatchResult, PhraseDetector};
pub use error::{CatalogError, HookError};
