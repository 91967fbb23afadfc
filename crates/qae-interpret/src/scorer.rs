//! Confidence scorer
//!
//! Pure 20-100 estimate of how reproducible a produced step sequence is,
//! given the text it came from. The weights are part of the contract:
//! identical inputs always produce identical scores.

use once_cell::sync::Lazy;
use qae_step::Step;
use regex::Regex;

/// Lowest score ever reported
pub const MIN_CONFIDENCE: u8 = 20;

/// Highest score ever reported
pub const MAX_CONFIDENCE: u8 = 100;

/// Keywords counted once each when found literally in the description
pub const ACTION_KEYWORDS: [&str; 9] = [
    "click", "fill", "enter", "type", "verify", "assert", "check", "login", "navigate",
];

const BASE: i32 = 50;
const PER_STEP: i32 = 5;
const STEP_CAP: i32 = 20;
const PER_KEYWORD: i32 = 5;
const PER_SELECTOR: i32 = 2;
const PER_VALUE: i32 = 2;
const SHORT_PENALTY: i32 = 10;
const BRIEF_PENALTY: i32 = 5;
const SEQUENCING_BONUS: i32 = 10;

static SEQUENCING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\d+[.)]\s|\bthen\b|\bafter that\b").expect("sequencing pattern is valid")
});

/// Individual score contributions, before clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfidenceBreakdown {
    /// Step-count bonus (capped)
    pub steps: i32,
    /// Action keywords present in the description
    pub keywords: i32,
    /// Steps carrying a selector
    pub selectors: i32,
    /// Steps carrying a value
    pub values: i32,
    /// Length penalty (zero or negative)
    pub length: i32,
    /// Explicit sequencing markers
    pub sequencing: i32,
}

impl ConfidenceBreakdown {
    /// Compute contributions for `description` and `steps`
    #[must_use]
    pub fn compute(description: &str, steps: &[Step]) -> Self {
        let lowered = description.to_lowercase();
        let length = description.trim().chars().count();

        let count = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);

        let mut length_penalty = 0;
        if length < 30 {
            length_penalty -= SHORT_PENALTY;
        }
        if length < 50 {
            length_penalty -= BRIEF_PENALTY;
        }

        Self {
            steps: count(steps.len()).saturating_mul(PER_STEP).min(STEP_CAP),
            keywords: count(ACTION_KEYWORDS.iter().filter(|k| lowered.contains(*k)).count())
                * PER_KEYWORD,
            selectors: count(steps.iter().filter(|s| s.selector.is_some()).count())
                .saturating_mul(PER_SELECTOR),
            values: count(steps.iter().filter(|s| s.value.is_some()).count())
                .saturating_mul(PER_VALUE),
            length: length_penalty,
            sequencing: if SEQUENCING.is_match(&lowered) {
                SEQUENCING_BONUS
            } else {
                0
            },
        }
    }

    /// Unclamped sum including the base
    #[must_use]
    pub fn raw(&self) -> i32 {
        BASE.saturating_add(self.steps)
            .saturating_add(self.keywords)
            .saturating_add(self.selectors)
            .saturating_add(self.values)
            .saturating_add(self.length)
            .saturating_add(self.sequencing)
    }

    /// Final clamped score
    #[must_use]
    pub fn total(&self) -> u8 {
        let clamped = self
            .raw()
            .clamp(i32::from(MIN_CONFIDENCE), i32::from(MAX_CONFIDENCE));
        u8::try_from(clamped).unwrap_or(MIN_CONFIDENCE)
    }
}

/// Score a step sequence against its source description
#[must_use]
pub fn score(description: &str, steps: &[Step]) -> u8 {
    ConfidenceBreakdown::compute(description, steps).total()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::interpret;
    use proptest::prelude::*;
    use qae_step::Action;

    #[test]
    fn bare_navigation_score() {
        let description = "Navigate to /login";
        let steps = interpret(description, None);
        let breakdown = ConfidenceBreakdown::compute(description, &steps);

        assert_eq!(breakdown.steps, 15);
        // "navigate" and "login" (inside "/login")
        assert_eq!(breakdown.keywords, 10);
        assert_eq!(breakdown.selectors, 0);
        assert_eq!(breakdown.values, 4);
        assert_eq!(breakdown.length, -15);
        assert_eq!(breakdown.sequencing, 0);
        assert_eq!(score(description, &steps), 64);
    }

    #[test]
    fn login_macro_score() {
        let description = "Login with valid credentials";
        let steps = interpret(description, None);
        assert_eq!(score(description, &steps), 65);
    }

    #[test]
    fn step_bonus_is_capped() {
        let steps: Vec<Step> = (0..10).map(|_| Step::new(Action::Hover)).collect();
        let breakdown = ConfidenceBreakdown::compute("", &steps);
        assert_eq!(breakdown.steps, 20);
    }

    #[test]
    fn sequencing_markers() {
        let numbered = "1. open the app\n2. do a thing";
        assert_eq!(ConfidenceBreakdown::compute(numbered, &[]).sequencing, 10);
        let chained = "do one thing and then another";
        assert_eq!(ConfidenceBreakdown::compute(chained, &[]).sequencing, 10);
        let plain = "a single thing with nothing after";
        assert_eq!(ConfidenceBreakdown::compute(plain, &[]).sequencing, 0);
    }

    #[test]
    fn floor_applies_to_empty_input() {
        assert_eq!(score("", &[]), 35);
        let mut breakdown = ConfidenceBreakdown::compute("", &[]);
        breakdown.length = -100;
        assert_eq!(breakdown.total(), MIN_CONFIDENCE);
    }

    #[test]
    fn ceiling_applies() {
        let description = "1. navigate to /a then click go, fill \"x\" in name, type, enter, verify, assert, check";
        let steps: Vec<Step> = (0..20)
            .map(|_| Step::new(Action::Fill).with_selector("#a").with_value("b"))
            .collect();
        assert_eq!(score(description, &steps), MAX_CONFIDENCE);
    }

    proptest! {
        #[test]
        fn prop_score_is_bounded_and_deterministic(description in ".{0,200}") {
            let steps = interpret(&description, None);
            let first = score(&description, &steps);
            prop_assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&first));
            prop_assert_eq!(first, score(&description, &interpret(&description, None)));
        }
    }
}
