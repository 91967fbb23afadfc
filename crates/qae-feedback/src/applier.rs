//! Feedback applier
//!
//! Applies compiled rules to a step sequence or to rendered code. Both
//! transforms return fresh values; the only side effect is flipping
//! `applied` on rules that took effect. Rules never flip back to unapplied.

use crate::rule::{AddTarget, FeedbackRule, RuleKind, ASSERTION_PLACEHOLDER};
use qae_step::{renumber, Action, Step};
use regex::{NoExpand, Regex};
use std::fmt;
use tracing::{debug, warn};

/// Aggregate outcome of one application pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplySummary {
    /// Rules whose `applied` flag is set
    pub applied: usize,
    /// Rules considered
    pub total: usize,
}

impl ApplySummary {
    /// Tally the `applied` flags of `rules`
    #[must_use]
    pub fn of(rules: &[FeedbackRule]) -> Self {
        Self {
            applied: rules.iter().filter(|r| r.applied).count(),
            total: rules.len(),
        }
    }

    /// Whether every rule took effect
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.applied == self.total
    }
}

impl fmt::Display for ApplySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} applied", self.applied, self.total)
    }
}

/// Apply structural rules to `steps`, in rule order
///
/// `codeReplace` and `styleChange` rules are ignored here. The result is
/// always renumbered, even when no rule fired.
#[must_use]
pub fn apply_to_steps(steps: &[Step], rules: &mut [FeedbackRule]) -> Vec<Step> {
    let mut out = steps.to_vec();

    for rule in rules.iter_mut() {
        let fired = match &rule.kind {
            RuleKind::ActionReplace { from, to } => replace_action(&mut out, from, to),
            RuleKind::SelectorReplace { from, to } => replace_selector(&mut out, from, to),
            RuleKind::AddStep { target } => {
                add_step(&mut out, target);
                // Satisfied either by the new step or by one already present
                true
            }
            RuleKind::RemoveStep { action } => {
                let before = out.len();
                out.retain(|s| !s.action.matches_keyword(action));
                out.len() < before
            }
            RuleKind::CodeReplace { .. } | RuleKind::StyleChange { .. } => false,
        };
        debug!(rule = %rule.original_text, kind = rule.kind.name(), fired, "Applied rule to steps");
        rule.applied |= fired;
    }

    renumber(&mut out);
    out
}

/// Apply `codeReplace` rules to `code`, sequentially
///
/// Each rule sees the output of the previous one.
#[must_use]
pub fn apply_to_code(code: &str, rules: &mut [FeedbackRule]) -> String {
    let mut out = code.to_string();

    for rule in rules.iter_mut() {
        let RuleKind::CodeReplace { pattern, replace, .. } = &rule.kind else {
            continue;
        };
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(e) => {
                warn!(rule = %rule.original_text, error = %e, "Skipping code rule with invalid pattern");
                continue;
            }
        };
        if re.is_match(&out) {
            out = re.replace_all(&out, NoExpand(replace)).into_owned();
            rule.applied = true;
        }
    }

    out
}

fn replace_action(steps: &mut [Step], from: &str, to: &str) -> bool {
    let Some(target) = Action::from_keyword(to) else {
        warn!(from, to, "Replacement action is outside the vocabulary");
        return false;
    };
    let from_action = Action::from_keyword(from);

    let mut fired = false;
    for step in steps.iter_mut() {
        let matches = step.action.matches_keyword(from) || from_action == Some(step.action);
        if matches && step.action != target {
            step.action = target;
            step.modified_by_feedback = true;
            fired = true;
        }
    }
    fired
}

fn replace_selector(steps: &mut [Step], from: &str, to: &str) -> bool {
    if from.is_empty() {
        return false;
    }
    let mut fired = false;
    for step in steps.iter_mut() {
        if let Some(selector) = step.selector.as_mut() {
            if selector.contains(from) {
                *selector = selector.replace(from, to);
                step.modified_by_feedback = true;
                fired = true;
            }
        }
    }
    fired
}

fn add_step(steps: &mut Vec<Step>, target: &AddTarget) {
    let step = match target {
        AddTarget::Screenshot => {
            if steps.iter().any(|s| s.action == Action::Screenshot) {
                return;
            }
            Step::screenshot("Capture final state")
        }
        AddTarget::Assertion { expected } => {
            if steps.iter().any(|s| s.action.is_assertion()) {
                return;
            }
            let text = expected.as_deref().unwrap_or(ASSERTION_PLACEHOLDER);
            Step::new(Action::AssertText)
                .with_selector("body")
                .with_value(text)
                .with_description(format!("Verify \"{text}\" is visible"))
        }
        AddTarget::Wait { ms } => Step::wait_ms(*ms),
    };

    let mut step = step;
    step.modified_by_feedback = true;
    steps.push(step);
}
