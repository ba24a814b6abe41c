//! Reminder injected when a reflexive-agreement phrase is detected.

use crate::detector::MatchResult;

/// Same text for every language; language only affects detection.
pub const ADVISORY: &str = "\
<system-reminder>\n\
Do NOT open with reflexive agreement such as \"you are right\" or its \
equivalent in any language.\n\
Give substantive technical analysis instead. Look for flaws, bugs, edge \
cases, and counter-examples before conceding a point.\n\
If the user is correct, say why, with specific technical reasoning.\n\
\n\
Example of a grounded response:\n\
user: \"Should I add null checking here?\"\n\
assistant: That removes the immediate crash. Empty strings still pass \
through unchecked, though, so validating against the expected input range \
covers both cases.\n\
</system-reminder>";

pub fn compose_advisory(result: &MatchResult) -> Option<&'static str> {
    result.matched().then_some(ADVISORY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::PhraseDetector;

    #[test]
    fn advisory_only_on_match() {
        let d = PhraseDetector::builtin().unwrap();

        for text in ["You are absolutely right", "你是对的", "당신이 맞습니다", "正しいです"] {
            assert_eq!(compose_advisory(&d.detect(text)), Some(ADVISORY), "{text}");
        }

        for text in ["", "The current approach has a race condition in the retry loop."] {
            assert_eq!(compose_advisory(&d.detect(text)), None, "{text}");
        }
    }

    #[test]
    fn advisory_is_not_language_specific() {
        let d = PhraseDetector::builtin().unwrap();
        let en = compose_advisory(&d.detect("good point"));
        let ja = compose_advisory(&d.detect("そうですね"));
        assert_eq!(en, ja);
    }

    #[test]
    fn advisory_is_wrapped_reminder() {
        assert!(ADVISORY.starts_with("<system-reminder>"));
        assert!(ADVISORY.ends_with("</system-reminder>"));
        assert!(ADVISORY.contains("technical reasoning"));
    }
}
