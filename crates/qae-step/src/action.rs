//! Closed action vocabulary
//!
//! Every [`Step`](crate::Step) carries exactly one [`Action`]. The set is
//! closed: consumers match on it exhaustively instead of dispatching on
//! strings.

use crate::error::StepError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One atomic browser action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    /// Load a URL
    Navigate,
    /// Click an element
    Click,
    /// Replace an input's value
    Fill,
    /// Type keystrokes into an element
    Type,
    /// Pause for a number of milliseconds
    Wait,
    /// Choose an option from a `<select>`
    Select,
    /// Move the pointer over an element
    Hover,
    /// Tick a checkbox
    Check,
    /// Untick a checkbox
    Uncheck,
    /// Focus an element
    Focus,
    /// Remove focus from an element
    Blur,
    /// Press a keyboard key
    Press,
    /// Scroll an element into view
    Scroll,
    /// Assert that text is present
    AssertText,
    /// Assert that an element is visible
    AssertVisible,
    /// Capture a screenshot
    Screenshot,
    /// Upload a file through an input
    Upload,
    /// Trigger and await a download
    Download,
    /// Evaluate a script in the page
    Evaluate,
}

impl Action {
    /// All actions, in declaration order
    pub const ALL: [Action; 19] = [
        Action::Navigate,
        Action::Click,
        Action::Fill,
        Action::Type,
        Action::Wait,
        Action::Select,
        Action::Hover,
        Action::Check,
        Action::Uncheck,
        Action::Focus,
        Action::Blur,
        Action::Press,
        Action::Scroll,
        Action::AssertText,
        Action::AssertVisible,
        Action::Screenshot,
        Action::Upload,
        Action::Download,
        Action::Evaluate,
    ];

    /// Wire name (camelCase)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Navigate => "navigate",
            Action::Click => "click",
            Action::Fill => "fill",
            Action::Type => "type",
            Action::Wait => "wait",
            Action::Select => "select",
            Action::Hover => "hover",
            Action::Check => "check",
            Action::Uncheck => "uncheck",
            Action::Focus => "focus",
            Action::Blur => "blur",
            Action::Press => "press",
            Action::Scroll => "scroll",
            Action::AssertText => "assertText",
            Action::AssertVisible => "assertVisible",
            Action::Screenshot => "screenshot",
            Action::Upload => "upload",
            Action::Download => "download",
            Action::Evaluate => "evaluate",
        }
    }

    /// Whether the action belongs to the assertion family
    #[inline]
    #[must_use]
    pub fn is_assertion(&self) -> bool {
        matches!(self, Action::AssertText | Action::AssertVisible)
    }

    /// Whether `needle` (case-insensitive) equals or is contained in the wire name
    ///
    /// `"assert"` matches both assertion actions, `"check"` matches
    /// `check` and `uncheck`.
    #[must_use]
    pub fn matches_keyword(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        !needle.is_empty() && self.as_str().to_lowercase().contains(&needle)
    }

    /// Map a loose English verb onto the vocabulary
    ///
    /// Accepts wire names plus common synonyms ("enter", "tap", "verify",
    /// "pause", ...). Returns `None` for anything outside the vocabulary.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        let word = word.trim().to_lowercase();
        if let Ok(action) = word.parse() {
            return Some(action);
        }
        let action = match word.as_str() {
            "go" | "goto" | "visit" | "open" | "browse" => Action::Navigate,
            "tap" | "press button" | "select button" => Action::Click,
            "enter" | "input" | "set" => Action::Fill,
            "typing" | "keyboard" => Action::Type,
            "pause" | "delay" | "sleep" => Action::Wait,
            "choose" | "pick" | "dropdown" => Action::Select,
            "mouseover" => Action::Hover,
            "tick" => Action::Check,
            "untick" => Action::Uncheck,
            "key" | "keypress" => Action::Press,
            "assert" | "assertion" | "verify" | "expect" => Action::AssertText,
            "visible" | "visibility" => Action::AssertVisible,
            "capture" | "snapshot" => Action::Screenshot,
            "attach" => Action::Upload,
            "script" | "eval" => Action::Evaluate,
            _ => return None,
        };
        Some(action)
    }

    /// Rough wall-clock estimate of one execution, in milliseconds
    #[must_use]
    pub fn estimated_duration_ms(&self) -> u64 {
        match self {
            Action::Navigate => 2_000,
            Action::Click | Action::Check | Action::Uncheck | Action::Select => 500,
            Action::Fill | Action::Type => 800,
            Action::Hover | Action::Focus | Action::Blur | Action::Press | Action::Scroll => 300,
            Action::AssertText | Action::AssertVisible => 200,
            Action::Screenshot => 1_000,
            Action::Upload | Action::Download => 3_000,
            Action::Evaluate => 400,
            Action::Wait => 1_000,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = StepError;

    /// Parse a wire name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Action::ALL
            .iter()
            .find(|a| a.as_str().to_lowercase() == lowered)
            .copied()
            .ok_or_else(|| StepError::UnknownAction(s.to_string()))
    }
}
