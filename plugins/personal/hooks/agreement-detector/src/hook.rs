//! Stop-hook adapter: payload in, optional block decision out.
//!
//! Every failure here ends in "no output". The hook must never be the reason
//! a session breaks, so errors are logged and swallowed at this boundary.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::advisory::compose_advisory;
use crate::config::Config;
use crate::detector::PhraseDetector;
use crate::error::HookError;
use crate::transcript::{read_transcript, recent_assistant_texts, scan_window};

/// Input received from the host via stdin.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    pub session_id: Option<String>,
    pub transcript_path: Option<String>,
    pub hook_event_name: Option<String>,
    pub stop_hook_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookOutput {
    pub decision: &'static str,
    pub reason: &'static str,
}

impl HookOutput {
    fn block(reason: &'static str) -> Self {
        Self {
            decision: "block",
            reason,
        }
    }
}

pub fn evaluate(input: &str, detector: &PhraseDetector, config: &Config) -> Option<HookOutput> {
    match try_evaluate(input, detector, config) {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "agreement check skipped");
            None
        }
    }
}

fn try_evaluate(
    input: &str,
    detector: &PhraseDetector,
    config: &Config,
) -> Result<Option<HookOutput>, HookError> {
    let input: HookInput = serde_json::from_str(input)?;

    // Already continuing from a block; let the session stop.
    if input.stop_hook_active == Some(true) {
        debug!("stop hook already active");
        return Ok(None);
    }

    let path = match input.transcript_path.as_deref() {
        Some(p) if !p.is_empty() => p,
        _ => return Err(HookError::MissingTranscript),
    };

    debug!(
        session = input.session_id.as_deref().unwrap_or("unknown"),
        event = input.hook_event_name.as_deref().unwrap_or("unknown"),
        "checking transcript"
    );

    let transcript = read_transcript(Path::new(path))?;
    Ok(check_messages(&transcript, detector, config))
}

/// Scan the recent assistant messages of `transcript`, stopping at the first
/// detection.
pub fn check_messages(transcript: &str, detector: &PhraseDetector, config: &Config) -> Option<HookOutput> {
    for message in recent_assistant_texts(transcript, config.recent_messages) {
        let window = scan_window(&message, config.scan_window_chars);
        let result = detector.detect(window);
        if let Some(advisory) = compose_advisory(&result) {
            debug!(matched = ?result.matched_text(window), "blocking on reflexive agreement");
            return Some(HookOutput::block(advisory));
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::ADVISORY;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn detector() -> PhraseDetector {
        PhraseDetector::builtin().unwrap()
    }

    fn transcript_file(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    fn payload(path: &str, active: bool) -> String {
        json!({
            "session_id": "abc",
            "transcript_path": path,
            "hook_event_name": "Stop",
            "stop_hook_active": active,
        })
        .to_string()
    }

    #[test]
    fn blocks_on_agreement() {
        let file = transcript_file(&[
            r#"{"type":"user","message":{"role":"user","content":"Is the lock needed?"}}"#,
            r#"{"type":"assistant","message":{"content":[{"type":"text","text":"You're absolutely right, it is."}]}}"#,
        ]);
        let path = file.path().to_str().unwrap();
        let output = evaluate(&payload(path, false), &detector(), &Config::default()).unwrap();
        assert_eq!(output, HookOutput::block(ADVISORY));

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["decision"], "block");
        assert_eq!(value["reason"], ADVISORY);
    }

    #[test]
    fn passes_substantive_reply() {
        let file = transcript_file(&[
            r#"{"type":"user","message":{"role":"user","content":"Is the lock needed?"}}"#,
            r#"{"type":"assistant","message":{"content":[{"type":"text","text":"The lock guards the retry counter; removing it reintroduces the race."}]}}"#,
        ]);
        let path = file.path().to_str().unwrap();
        assert!(evaluate(&payload(path, false), &detector(), &Config::default()).is_none());
    }

    #[test]
    fn respects_active_stop_hook() {
        let file = transcript_file(&[r#"{"role":"assistant","content":"You are right."}"#]);
        let path = file.path().to_str().unwrap();
        assert!(evaluate(&payload(path, true), &detector(), &Config::default()).is_none());
    }

    #[test]
    fn silent_on_bad_input() {
        let d = detector();
        let config = Config::default();
        assert!(evaluate("", &d, &config).is_none());
        assert!(evaluate("not json", &d, &config).is_none());
        assert!(evaluate("{}", &d, &config).is_none());
        assert!(evaluate(&payload("", false), &d, &config).is_none());
        assert!(evaluate(&payload("/nonexistent/transcript.jsonl", false), &d, &config).is_none());
    }

    #[test]
    fn scan_window_limits_detection_to_message_start() {
        let late = format!("{} you are right", "The retry loop drops the error. ".repeat(4));
        let transcript = json!({"role": "assistant", "content": late}).to_string();
        let d = detector();

        assert!(check_messages(&transcript, &d, &Config::default()).is_none());
        assert!(check_messages(&transcript, &d, &Config::default().scan_window_chars(None)).is_some());
    }

    #[test]
    fn only_recent_messages_are_checked() {
        let transcript = [
            r#"{"role":"assistant","content":"正しいです"}"#,
            r#"{"role":"assistant","content":"Checked the logs."}"#,
            r#"{"role":"assistant","content":"Patched the handler."}"#,
        ]
        .join("\n");
        let d = detector();

        assert!(check_messages(&transcript, &d, &Config::default().recent_messages(2)).is_none());
        assert!(check_messages(&transcript, &d, &Config::default().recent_messages(3)).is_some());
    }

    #[test]
    fn previous_turn_is_ignored() {
        let transcript = [
            r#"{"role":"assistant","content":"You are right."}"#,
            r#"{"role":"user","content":"Now fix the parser."}"#,
            r#"{"role":"assistant","content":"The parser drops trailing commas; fixed in lexer.rs."}"#,
        ]
        .join("\n");
        assert!(check_messages(&transcript, &detector(), &Config::default()).is_none());
    }
}
