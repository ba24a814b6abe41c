//! JSONL transcript parsing.
//!
//! Each transcript line is one JSON object. Assistant entries appear in two
//! shapes, `{"role":"assistant","content":...}` and
//! `{"type":"assistant","message":{"content":...}}`; content is either a plain
//! string or an array of blocks of which only `text` blocks are read.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::HookError;

pub fn read_transcript(path: &Path) -> Result<String, HookError> {
    fs::read_to_string(path).map_err(|source| HookError::Transcript {
        path: path.display().to_string(),
        source,
    })
}

/// Text of the last `limit` assistant messages in the current turn, oldest
/// first. Lines that are not JSON are skipped.
pub fn recent_assistant_texts(transcript: &str, limit: usize) -> Vec<String> {
    let lines: Vec<&str> = transcript.lines().collect();
    let turn_start = find_turn_start(&lines);

    let mut texts: Vec<String> = lines[turn_start..]
        .iter()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            match serde_json::from_str::<Value>(line) {
                Ok(entry) => Some(extract_assistant_text(&entry)),
                Err(e) => {
                    debug!(error = %e, "skipping unparsable transcript line");
                    None
                }
            }
        })
        .filter(|text| !text.is_empty())
        .collect();

    if texts.len() > limit {
        texts.drain(..texts.len() - limit);
    }
    texts
}

/// Walk backwards to the last real user message (string content, not a
/// tool_result array). Everything after it belongs to the current turn.
pub fn find_turn_start(lines: &[&str]) -> usize {
    for i in (0..lines.len()).rev() {
        if !lines[i].contains("\"user\"") {
            continue;
        }

        let entry: Value = match serde_json::from_str(lines[i]) {
            Ok(v) => v,
            Err(_) => continue,
        };

        let typed = entry["type"].as_str() == Some("user") && entry["message"]["content"].is_string();
        let bare = entry["role"].as_str() == Some("user") && entry["content"].is_string();
        if typed || bare {
            return i;
        }
    }

    0
}

/// Joined text blocks of an assistant entry; empty for anything else.
pub fn extract_assistant_text(entry: &Value) -> String {
    let content = if entry["role"].as_str() == Some("assistant") {
        &entry["content"]
    } else if entry["type"].as_str() == Some("assistant") {
        &entry["message"]["content"]
    } else {
        return String::new();
    };

    if let Some(s) = content.as_str() {
        return s.to_string();
    }

    let Some(blocks) = content.as_array() else {
        return String::new();
    };

    blocks
        .iter()
        .filter_map(|block| {
            if block["type"].as_str()? == "text" {
                block["text"].as_str()
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Leading `chars` characters of `text`, cut on a char boundary.
pub fn scan_window(text: &str, chars: Option<usize>) -> &str {
    match chars.and_then(|n| text.char_indices().nth(n)) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
