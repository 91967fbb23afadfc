//! Feedback rule compiler
//!
//! Each line of feedback is matched against an ordered list of forms; the
//! first form that matches produces the line's rule and the compiler moves
//! on to the next line. Lines no form understands are dropped.

use crate::rule::{AddTarget, FeedbackRule, RuleKind, SelectorPreference, DEFAULT_FEEDBACK_WAIT_MS};
use once_cell::sync::Lazy;
use qae_step::Action;
use regex::Regex;
use tracing::debug;

static USE_INSTEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^(?:please\s+)?use\s+[`"']?(.+?)[`"']?\s+instead\s+of\s+[`"']?(.+?)[`"']?\s*[.!]?$"#)
        .expect("use-instead pattern is valid")
});

static REPLACE_WITH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^(?:please\s+)?replace\s+[`"']?(.+?)[`"']?\s+with\s+[`"']?(.+?)[`"']?\s*[.!]?$"#)
        .expect("replace-with pattern is valid")
});

static NEGATED_ADD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:don'?t|do\s+not|never|no\s+need\s+to)\s+(?:add|include|insert)\b")
        .expect("negated-add pattern is valid")
});

static ADD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:add|include|insert|append)\b.*?\b(screenshots?|captures?|waits?|pauses?|delays?|assertions?|asserts?)\b",
    )
    .expect("add pattern is valid")
});

static REMOVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:remove|delete|drop|don'?t\s+include|do\s+not\s+include|no)\s+(?:the\s+|any\s+|all\s+|a\s+|an\s+)?([a-z]+)",
    )
    .expect("remove pattern is valid")
});

static VERIFY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:add\s+(?:an?\s+)?(?:assertion|check)|verify|assert|check\s+that|make\s+sure)\b")
        .expect("verify pattern is valid")
});

static QUOTED_ARROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["'`]([^"'`]+)["'`]\s*(?:->|=>|→|\bto\b)\s*["'`]([^"'`]+)["'`]"#)
        .expect("quoted-arrow pattern is valid")
});

static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(milliseconds?|ms|seconds?|secs?|s)\b").expect("duration pattern is valid")
});

static QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"["'`]([^"'`]+)["'`]"#).expect("quoted pattern is valid")
});

/// Compile feedback lines into rules, in order
///
/// Blank and unrecognized lines produce nothing.
#[must_use]
pub fn compile<S: AsRef<str>>(lines: &[S]) -> Vec<FeedbackRule> {
    lines
        .iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            if line.is_empty() {
                return None;
            }
            let kind = compile_line(line);
            match &kind {
                Some(kind) => debug!(line, kind = kind.name(), "Compiled feedback line"),
                None => debug!(line, "Dropped unrecognized feedback line"),
            }
            kind.map(|kind| FeedbackRule::new(line, kind))
        })
        .collect()
}

/// Compile a multi-line feedback block, one rule candidate per line
#[must_use]
pub fn compile_text(feedback: &str) -> Vec<FeedbackRule> {
    compile(&feedback.lines().collect::<Vec<_>>())
}

fn compile_line(line: &str) -> Option<RuleKind> {
    use_instead(line)
        .or_else(|| replace_with(line))
        .or_else(|| add_step(line))
        .or_else(|| remove_step(line))
        .or_else(|| style_change(line))
        .or_else(|| verify(line))
        .or_else(|| quoted_arrow(line))
}

fn use_instead(line: &str) -> Option<RuleKind> {
    let caps = USE_INSTEAD.captures(line)?;
    let wanted = caps[1].trim();
    let current = caps[2].trim();

    if wanted.contains('.') || current.contains('.') {
        return Some(RuleKind::code_replace(current, wanted));
    }
    if is_selector_like(wanted) || is_selector_like(current) {
        return Some(RuleKind::SelectorReplace {
            from: current.to_string(),
            to: wanted.to_string(),
        });
    }
    // Plain words only make an action swap when the target is a known action;
    // otherwise later forms (style preferences) get a chance at the line.
    Action::from_keyword(wanted)?;
    Some(RuleKind::ActionReplace {
        from: current.to_lowercase(),
        to: wanted.to_lowercase(),
    })
}

fn replace_with(line: &str) -> Option<RuleKind> {
    let caps = REPLACE_WITH.captures(line)?;
    Some(RuleKind::code_replace(caps[1].trim(), caps[2].trim()))
}

fn add_step(line: &str) -> Option<RuleKind> {
    if NEGATED_ADD.is_match(line) {
        return None;
    }
    let caps = ADD.captures(line)?;
    let word = caps[1].to_lowercase();
    let target = if word.starts_with("screenshot") || word.starts_with("capture") {
        AddTarget::Screenshot
    } else if word.starts_with("assert") {
        AddTarget::Assertion {
            expected: quoted(line),
        }
    } else {
        AddTarget::Wait {
            ms: duration_ms(line).unwrap_or(DEFAULT_FEEDBACK_WAIT_MS),
        }
    };
    Some(RuleKind::AddStep { target })
}

fn remove_step(line: &str) -> Option<RuleKind> {
    let caps = REMOVE.captures(line)?;
    let action = action_keyword(&caps[1])?;
    Some(RuleKind::RemoveStep { action })
}

fn style_change(line: &str) -> Option<RuleKind> {
    let lowered = line.to_lowercase();
    let preference = if lowered.contains("data-testid") {
        SelectorPreference::TestId
    } else if lowered.contains("aria-label") {
        SelectorPreference::AriaLabel
    } else if lowered.contains("selector") {
        SelectorPreference::Generic
    } else {
        return None;
    };
    Some(RuleKind::StyleChange { preference })
}

fn verify(line: &str) -> Option<RuleKind> {
    VERIFY.is_match(line).then(|| RuleKind::AddStep {
        target: AddTarget::Assertion {
            expected: quoted(line),
        },
    })
}

fn quoted_arrow(line: &str) -> Option<RuleKind> {
    let caps = QUOTED_ARROW.captures(line)?;
    Some(RuleKind::code_replace(&caps[1], &caps[2]))
}

fn is_selector_like(s: &str) -> bool {
    s.starts_with('#') || s.starts_with('[')
}

fn quoted(line: &str) -> Option<String> {
    QUOTED.captures(line).map(|c| c[1].to_string())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn duration_ms(line: &str) -> Option<u64> {
    let caps = DURATION.captures(line)?;
    let amount: f64 = caps[1].parse().ok()?;
    let unit = caps[2].to_lowercase();
    let ms = if unit.starts_with("ms") || unit.starts_with("milli") {
        amount
    } else {
        amount * 1000.0
    };
    Some(ms.round().max(0.0) as u64)
}

/// Normalize a removal target onto a keyword that matches some action
///
/// Plurals are singularized; synonyms map onto the action's wire name;
/// anything in the assertion family collapses to "assert".
fn action_keyword(word: &str) -> Option<String> {
    let word = word.to_lowercase();
    let singular = word.strip_suffix('s').unwrap_or(&word);

    for candidate in [word.as_str(), singular] {
        if Action::ALL.iter().any(|a| a.matches_keyword(candidate)) {
            return Some(candidate.to_string());
        }
        if let Some(action) = Action::from_keyword(candidate) {
            if action.is_assertion() {
                return Some("assert".to_string());
            }
            return Some(action.as_str().to_lowercase());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single(line: &str) -> RuleKind {
        let rules = compile(&[line]);
        assert_eq!(rules.len(), 1, "expected one rule for {line:?}");
        rules.into_iter().next().map(|r| r.kind).unwrap()
    }

    #[test]
    fn add_screenshot() {
        assert_eq!(
            single("Add a screenshot step"),
            RuleKind::AddStep {
                target: AddTarget::Screenshot
            }
        );
    }

    #[test]
    fn add_wait_with_duration() {
        assert_eq!(
            single("Please add a wait of 3 seconds at the end"),
            RuleKind::AddStep {
                target: AddTarget::Wait { ms: 3000 }
            }
        );
        assert_eq!(
            single("include a pause"),
            RuleKind::AddStep {
                target: AddTarget::Wait {
                    ms: DEFAULT_FEEDBACK_WAIT_MS
                }
            }
        );
        assert_eq!(
            single("add a 250ms delay"),
            RuleKind::AddStep {
                target: AddTarget::Wait { ms: 250 }
            }
        );
    }

    #[test]
    fn add_assertion_keeps_quoted_text() {
        assert_eq!(
            single(r#"Add an assertion for "Welcome back""#),
            RuleKind::AddStep {
                target: AddTarget::Assertion {
                    expected: Some("Welcome back".into())
                }
            }
        );
    }

    #[test]
    fn verify_line_is_assertion() {
        assert_eq!(
            single("Verify the dashboard shows the user name"),
            RuleKind::AddStep {
                target: AddTarget::Assertion { expected: None }
            }
        );
    }

    #[test]
    fn use_instead_of_action() {
        assert_eq!(
            single("Use type instead of fill"),
            RuleKind::ActionReplace {
                from: "fill".into(),
                to: "type".into()
            }
        );
    }

    #[test]
    fn use_instead_of_code() {
        match single("use page.tap instead of page.click") {
            RuleKind::CodeReplace { find, replace, pattern } => {
                assert_eq!(find, "page.click");
                assert_eq!(replace, "page.tap");
                assert_eq!(pattern, r"page\.click");
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn use_instead_of_selector() {
        assert_eq!(
            single("use #submit instead of [type=submit]"),
            RuleKind::SelectorReplace {
                from: "[type=submit]".into(),
                to: "#submit".into()
            }
        );
    }

    #[test]
    fn replace_with_preserves_case() {
        match single("Replace waitForTimeout with waitForLoadState") {
            RuleKind::CodeReplace { find, replace, .. } => {
                assert_eq!(find, "waitForTimeout");
                assert_eq!(replace, "waitForLoadState");
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn remove_forms() {
        assert_eq!(
            single("Remove the wait step"),
            RuleKind::RemoveStep {
                action: "wait".into()
            }
        );
        assert_eq!(
            single("Don't include screenshots"),
            RuleKind::RemoveStep {
                action: "screenshot".into()
            }
        );
        assert_eq!(
            single("no assertions please"),
            RuleKind::RemoveStep {
                action: "assert".into()
            }
        );
    }

    #[test]
    fn remove_unknown_word_falls_through() {
        assert!(compile(&["remove the flakiness"]).is_empty());
    }

    #[test]
    fn style_preferences() {
        assert_eq!(
            single("use data-testid instead of class selectors"),
            RuleKind::StyleChange {
                preference: SelectorPreference::TestId
            }
        );
        assert_eq!(
            single("prefer aria-label locators"),
            RuleKind::StyleChange {
                preference: SelectorPreference::AriaLabel
            }
        );
        assert_eq!(
            single("the selector is too brittle"),
            RuleKind::StyleChange {
                preference: SelectorPreference::Generic
            }
        );
    }

    #[test]
    fn quoted_arrow_forms() {
        for line in [
            r#""Sign in" -> "Log in""#,
            r#"change "Sign in" to "Log in""#,
            r#"'Sign in' => 'Log in'"#,
        ] {
            match single(line) {
                RuleKind::CodeReplace { find, replace, .. } => {
                    assert_eq!(find, "Sign in");
                    assert_eq!(replace, "Log in");
                }
                other => panic!("unexpected kind {other:?} for {line:?}"),
            }
        }
    }

    #[test]
    fn unmatched_and_blank_lines_are_dropped() {
        let rules = compile(&["", "   ", "looks great, thanks", "Add a screenshot"]);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].original_text, "Add a screenshot");
        assert!(!rules[0].applied);
    }

    #[test]
    fn compile_text_splits_lines() {
        let rules = compile_text("Add a screenshot\nRemove the wait step\n\nnice work");
        let kinds: Vec<_> = rules.iter().map(|r| r.kind.name()).collect();
        assert_eq!(kinds, vec!["addStep", "removeStep"]);
    }
}
