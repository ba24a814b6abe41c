//! Runtime settings, overridable through environment variables.

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::detector::DEFAULT_MAX_INPUT_BYTES;

pub const ENV_MAX_INPUT_BYTES: &str = "AGREEMENT_DETECTOR_MAX_INPUT_BYTES";
/// `0` scans whole messages.
pub const ENV_SCAN_WINDOW: &str = "AGREEMENT_DETECTOR_SCAN_WINDOW";
pub const ENV_RECENT_MESSAGES: &str = "AGREEMENT_DETECTOR_RECENT_MESSAGES";

/// Reflexive agreement opens a reply, so only the start of a message is read.
const DEFAULT_SCAN_WINDOW_CHARS: usize = 80;
const DEFAULT_RECENT_MESSAGES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_input_bytes: usize,
    /// `None` scans each message in full.
    pub scan_window_chars: Option<usize>,
    pub recent_messages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            scan_window_chars: Some(DEFAULT_SCAN_WINDOW_CHARS),
            recent_messages: DEFAULT_RECENT_MESSAGES,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults,
    /// unparsable ones are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(n) = parse_var::<usize, _>(&lookup, ENV_MAX_INPUT_BYTES) {
            config.max_input_bytes = n;
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, ENV_SCAN_WINDOW) {
            config.scan_window_chars = (n > 0).then_some(n);
        }
        if let Some(n) = parse_var::<usize, _>(&lookup, ENV_RECENT_MESSAGES) {
            config.recent_messages = n;
        }

        config
    }

    pub fn max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    pub fn scan_window_chars(mut self, chars: Option<usize>) -> Self {
        self.scan_window_chars = chars;
        self
    }

    pub fn recent_messages(mut self, recent_messages: usize) -> Self {
        self.recent_messages = recent_messages;
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ENV_MAX_INPUT_BYTES, "4096"),
            (ENV_SCAN_WINDOW, " 200 "),
            (ENV_RECENT_MESSAGES, "2"),
        ]));
        assert_eq!(config.max_input_bytes, 4096);
        assert_eq!(config.scan_window_chars, Some(200));
        assert_eq!(config.recent_messages, 2);
    }

    #[test]
    fn zero_window_means_whole_message() {
        let config = Config::from_lookup(lookup(&[(ENV_SCAN_WINDOW, "0")]));
        assert_eq!(config.scan_window_chars, None);
    }

    #[test]
    fn garbage_falls_back_to_default() {
        let config = Config::from_lookup(lookup(&[
            (ENV_MAX_INPUT_BYTES, "lots"),
            (ENV_RECENT_MESSAGES, "-1"),
        ]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn builder_setters() {
        let config = Config::default()
            .max_input_bytes(10)
            .scan_window_chars(None)
            .recent_messages(1);
        assert_eq!(config.max_input_bytes, 10);
        assert_eq!(config.scan_window_chars, None);
        assert_eq!(config.recent_messages, 1);
    }
}
