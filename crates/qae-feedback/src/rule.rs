//! Feedback rule types
//!
//! A [`FeedbackRule`] is compiled from exactly one line of feedback.
//! `applied` is the only field that changes after compilation.

use serde::{Deserialize, Serialize};

/// Value used for assertions added without an explicit expectation
pub const ASSERTION_PLACEHOLDER: &str = "Expected content";

/// Default wait added by "add a wait" without a duration
pub const DEFAULT_FEEDBACK_WAIT_MS: u64 = 1_000;

/// Step requested by an `addStep` rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase")]
pub enum AddTarget {
    /// Screenshot, at most one per sequence
    Screenshot,
    /// Wait, appended on every request
    Wait {
        /// Duration in milliseconds
        ms: u64,
    },
    /// Assertion, at most one assertion-family step per sequence
    Assertion {
        /// Text to assert, if the feedback quoted one
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expected: Option<String>,
    },
}

/// Locator convention a reviewer asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectorPreference {
    /// `data-testid` attributes
    TestId,
    /// `aria-label` attributes
    AriaLabel,
    /// Unspecified "better selectors"
    Generic,
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RuleKind {
    /// Swap the action of every step whose action matches `from`
    ActionReplace {
        /// Action keyword to match (equals or contained)
        from: String,
        /// Replacement action keyword
        to: String,
    },
    /// Substitute a substring inside step selectors
    SelectorReplace {
        /// Selector text to find
        from: String,
        /// Replacement text
        to: String,
    },
    /// Append a step
    AddStep {
        /// What to append
        target: AddTarget,
    },
    /// Drop every step whose action contains `action`
    RemoveStep {
        /// Lower-cased action keyword
        action: String,
    },
    /// Find-and-replace over rendered code
    CodeReplace {
        /// Literal text to find
        find: String,
        /// Literal replacement
        replace: String,
        /// `find` with regex metacharacters escaped
        pattern: String,
    },
    /// Advisory locator-style preference; never applied structurally
    StyleChange {
        /// Requested convention
        preference: SelectorPreference,
    },
}

impl RuleKind {
    /// Build a code replacement, escaping `find` into a literal pattern
    #[must_use]
    pub fn code_replace(find: impl Into<String>, replace: impl Into<String>) -> Self {
        let find = find.into();
        Self::CodeReplace {
            pattern: regex::escape(&find),
            find,
            replace: replace.into(),
        }
    }

    /// Short wire name of the kind
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::ActionReplace { .. } => "actionReplace",
            RuleKind::SelectorReplace { .. } => "selectorReplace",
            RuleKind::AddStep { .. } => "addStep",
            RuleKind::RemoveStep { .. } => "removeStep",
            RuleKind::CodeReplace { .. } => "codeReplace",
            RuleKind::StyleChange { .. } => "styleChange",
        }
    }

    /// Whether the rule transforms step sequences
    #[inline]
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RuleKind::ActionReplace { .. }
                | RuleKind::SelectorReplace { .. }
                | RuleKind::AddStep { .. }
                | RuleKind::RemoveStep { .. }
        )
    }
}

/// One compiled line of feedback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRule {
    /// The feedback line as written
    pub original_text: String,
    /// Payload
    #[serde(flatten)]
    pub kind: RuleKind,
    /// Set once an application attempt took effect
    #[serde(default)]
    pub applied: bool,
}

impl FeedbackRule {
    /// Create an unapplied rule
    #[inline]
    #[must_use]
    pub fn new(original_text: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            original_text: original_text.into(),
            kind,
            applied: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_replace_escapes_pattern() {
        let kind = RuleKind::code_replace("page.click(", "page.tap(");
        match kind {
            RuleKind::CodeReplace { pattern, .. } => assert_eq!(pattern, r"page\.click\("),
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn rule_serializes_flat_with_kind_tag() {
        let rule = FeedbackRule::new(
            "Add a wait of 2 seconds",
            RuleKind::AddStep {
                target: AddTarget::Wait { ms: 2000 },
            },
        );
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["kind"], "addStep");
        assert_eq!(json["originalText"], "Add a wait of 2 seconds");
        assert_eq!(json["target"]["step"], "wait");
        assert_eq!(json["target"]["ms"], 2000);
        assert_eq!(json["applied"], false);

        let back: FeedbackRule = serde_json::from_value(json).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn style_change_is_not_structural() {
        let kind = RuleKind::StyleChange {
            preference: SelectorPreference::TestId,
        };
        assert!(!kind.is_structural());
        assert_eq!(kind.name(), "styleChange");
    }
}
