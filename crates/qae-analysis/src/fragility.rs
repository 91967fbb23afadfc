//! Fragility detector
//!
//! Tests every locator in a corpus against an ordered list of brittleness
//! patterns. The first matching pattern decides the locator's fragility
//! score, reason and replacement strategy.
//!
//! Confidence is `100 - severity + jitter`. The jitter is drawn from a
//! [`StdRng`] seeded per call, so identical inputs and options always
//! produce identical output. Treat the number as a ranking signal only.

use once_cell::sync::Lazy;
use qae_step::{Action, RunStatus, Step, TestCase};
use rand::{rngs::StdRng, Rng, SeedableRng};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How to replace a fragile locator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixStrategy {
    /// Dedicated `data-testid` attribute
    #[serde(rename = "data-testid")]
    DataTestId,
    /// Accessible name
    #[serde(rename = "aria-label")]
    AriaLabel,
    /// ARIA role plus accessible name
    #[serde(rename = "role")]
    Role,
    /// Visible text
    #[serde(rename = "text")]
    TextContent,
}

impl FixStrategy {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FixStrategy::DataTestId => "data-testid",
            FixStrategy::AriaLabel => "aria-label",
            FixStrategy::Role => "role",
            FixStrategy::TextContent => "text",
        }
    }
}

/// A locator flagged as brittle, with a proposed replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragilitySuggestion {
    /// Owning test (soft reference)
    pub test_id: String,
    /// Owning step (soft reference)
    pub step_id: String,
    /// Locator as found
    pub current_selector: String,
    /// Proposed locator
    pub suggested_selector: String,
    /// Why the locator is brittle
    pub reason: String,
    /// Severity of the matched pattern
    pub fragility_score: u8,
    /// 0-100 confidence in the suggestion
    pub confidence: u8,
    /// Replacement strategy
    pub strategy: FixStrategy,
}

/// Scan options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragilityOptions {
    /// Also scan tests whose last run passed
    pub include_passing: bool,
    /// Drop suggestions below this confidence
    pub min_confidence: u8,
    /// Upper bound on returned suggestions
    pub limit: usize,
    /// Seed for the confidence jitter
    pub seed: u64,
    /// Upper bound (inclusive) of the jitter
    pub max_jitter: u8,
}

impl Default for FragilityOptions {
    fn default() -> Self {
        Self {
            include_passing: false,
            min_confidence: 0,
            limit: 50,
            seed: 42,
            max_jitter: 5,
        }
    }
}

impl FragilityOptions {
    /// With passing tests included or skipped
    #[inline]
    #[must_use]
    pub fn with_include_passing(mut self, include: bool) -> Self {
        self.include_passing = include;
        self
    }

    /// With confidence floor
    #[inline]
    #[must_use]
    pub fn with_min_confidence(mut self, min: u8) -> Self {
        self.min_confidence = min;
        self
    }

    /// With result limit
    #[inline]
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// With jitter seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// With jitter bound; zero makes confidence a pure function of severity
    #[inline]
    #[must_use]
    pub fn with_max_jitter(mut self, max: u8) -> Self {
        self.max_jitter = max;
        self
    }
}

struct Pattern {
    regex: Regex,
    severity: u8,
    reason: &'static str,
    strategy: FixStrategy,
    structural: bool,
}

impl Pattern {
    fn new(pattern: &str, severity: u8, reason: &'static str, strategy: FixStrategy) -> Self {
        Self {
            regex: Regex::new(pattern).expect("fragility pattern is valid"),
            severity,
            reason,
            strategy,
            structural: false,
        }
    }

    /// Match against the locator with attribute values and quoted text removed
    fn structural(mut self) -> Self {
        self.structural = true;
        self
    }
}

/// Ordered; the first match wins
static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    vec![
        Pattern::new(
            r#"#[A-Za-z_-]*\d{4,}|\[id=["']?[\w-]*\d{4,}"#,
            85,
            "dynamic/generated ID",
            FixStrategy::DataTestId,
        ),
        Pattern::new(
            r"(?:\.[A-Za-z_][\w-]*){3,}",
            55,
            "multiple chained classes",
            FixStrategy::AriaLabel,
        )
        .structural(),
        Pattern::new(
            r":nth-(?:child|of-type)\(",
            70,
            "position-based nth-child selector",
            FixStrategy::Role,
        )
        .structural(),
        Pattern::new(
            r"(?:[^\s>+~,]+\s*>\s*){3,}[^\s>+~,]+|(?:[^\s>+~,]+\s+){3,}[^\s>+~,]+",
            60,
            "deep descendant chain",
            FixStrategy::Role,
        )
        .structural(),
        Pattern::new(r"\[\d+\]", 65, "numeric index", FixStrategy::TextContent),
        Pattern::new(
            r#"\[[\w-]+=["']?[a-f0-9]{8,}["']?\]"#,
            75,
            "hash-like generated attribute value",
            FixStrategy::DataTestId,
        ),
        Pattern::new(
            r"\.[A-Za-z][\w-]*__[A-Za-z_-]*\d[\w-]*|\.(?:css|sc)-[A-Za-z0-9]{5,}",
            80,
            "CSS-module hashed class name",
            FixStrategy::DataTestId,
        )
        .structural(),
        Pattern::new(
            r"^[a-z]{1,3}$",
            50,
            "generic tag selector",
            FixStrategy::TextContent,
        ),
    ]
});

static ATTRIBUTE_SPANS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\[[^\]]*\]|"[^"]*"|'[^']*'"#).expect("attribute span pattern is valid")
});

/// Locators already built on stable, intent-revealing hooks
fn is_semantic(selector: &str) -> bool {
    ["data-testid", "aria-label", "role=", ":has-text(", "text="]
        .iter()
        .any(|hook| selector.contains(hook))
}

fn classify(selector: &str) -> Option<&'static Pattern> {
    if is_semantic(selector) {
        return None;
    }
    let structure = ATTRIBUTE_SPANS.replace_all(selector, "");
    PATTERNS.iter().find(|p| {
        let target: &str = if p.structural { &structure } else { selector };
        p.regex.is_match(target)
    })
}

/// Scan `tests` for brittle locators
///
/// Tests whose last run passed are skipped unless
/// [`FragilityOptions::include_passing`] is set; tests never run are
/// always scanned.
#[must_use]
pub fn detect(tests: &[TestCase], options: &FragilityOptions) -> Vec<FragilitySuggestion> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut out = Vec::new();

    let scanned = tests
        .iter()
        .filter(|t| options.include_passing || t.last_run != Some(RunStatus::Passed));

    for test in scanned {
        for step in &test.steps {
            let Some(selector) = step.selector.as_deref() else {
                continue;
            };
            let Some(pattern) = classify(selector) else {
                continue;
            };
            let jitter = rng.random_range(0..=options.max_jitter);
            let confidence = (100 - pattern.severity).saturating_add(jitter).min(100);
            out.push(FragilitySuggestion {
                test_id: test.id.clone(),
                step_id: step.id.clone(),
                current_selector: selector.to_string(),
                suggested_selector: suggest_selector(step, pattern.strategy),
                reason: pattern.reason.to_string(),
                fragility_score: pattern.severity,
                confidence,
                strategy: pattern.strategy,
            });
        }
    }

    out.retain(|s| s.confidence >= options.min_confidence);
    out.sort_by(|a, b| b.fragility_score.cmp(&a.fragility_score));
    out.truncate(options.limit);
    tracing::debug!(count = out.len(), "Fragile locators detected");
    out
}

fn label(step: &Step) -> String {
    let raw = step
        .description
        .as_deref()
        .or(step.value.as_deref())
        .unwrap_or("element");
    let words: Vec<&str> = raw.split_whitespace().collect();
    // "Click Sign in" labels the element "Sign in"
    let words = match words.split_first() {
        Some((first, rest)) if !rest.is_empty() && Action::from_keyword(first).is_some() => rest,
        _ => &words[..],
    };
    words.join(" ").replace('"', "")
}

fn slug(text: &str) -> String {
    let mut out = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let out = out.trim_end_matches('-');
    if out.is_empty() {
        "element".to_string()
    } else {
        out.to_string()
    }
}

fn role_for(action: Action) -> &'static str {
    match action {
        Action::Fill | Action::Type => "textbox",
        Action::Select => "combobox",
        Action::Check | Action::Uncheck => "checkbox",
        Action::Navigate => "link",
        _ => "button",
    }
}

fn suggest_selector(step: &Step, strategy: FixStrategy) -> String {
    let label = label(step);
    match strategy {
        FixStrategy::DataTestId => format!("[data-testid=\"{}\"]", slug(&label)),
        FixStrategy::AriaLabel => format!("[aria-label=\"{label}\"]"),
        FixStrategy::Role => format!("role={}[name=\"{label}\"]", role_for(step.action)),
        FixStrategy::TextContent => format!("text=\"{label}\""),
    }
}
