//! Step, test and parse-result types
//!
//! These are the stable wire shapes exchanged with every caller. Field
//! names serialize in camelCase.

use crate::action::Action;
use serde::{Deserialize, Serialize};

/// One atomic browser action within a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Unique within the owning sequence
    pub id: String,
    /// What to do
    pub action: Action,
    /// Element locator (may be a comma-separated disjunction)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    /// Action argument: URL, text, milliseconds, option label, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Human-readable summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 0-based position; contiguous across the sequence
    pub order: usize,
    /// Set when a feedback rule touched this step
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub modified_by_feedback: bool,
}

impl Step {
    /// Create a step with no selector/value
    ///
    /// `id` and `order` are placeholders until the owning sequence is
    /// renumbered.
    #[inline]
    #[must_use]
    pub fn new(action: Action) -> Self {
        Self {
            id: String::new(),
            action,
            selector: None,
            value: None,
            description: None,
            order: 0,
            modified_by_feedback: false,
        }
    }

    /// With selector
    #[inline]
    #[must_use]
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// With value
    #[inline]
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Shorthand: navigate to `url`
    #[must_use]
    pub fn navigate(url: impl Into<String>) -> Self {
        let url = url.into();
        Self::new(Action::Navigate)
            .with_description(format!("Navigate to {url}"))
            .with_value(url)
    }

    /// Shorthand: wait `ms` milliseconds
    #[must_use]
    pub fn wait_ms(ms: u64) -> Self {
        Self::new(Action::Wait)
            .with_value(ms.to_string())
            .with_description(format!("Wait {ms}ms"))
    }

    /// Shorthand: screenshot
    #[must_use]
    pub fn screenshot(description: impl Into<String>) -> Self {
        Self::new(Action::Screenshot).with_description(description)
    }
}

/// Category of an authored test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestType {
    /// End-to-end browser flow
    #[default]
    E2e,
    /// Visual regression
    Visual,
    /// Accessibility audit
    Accessibility,
    /// Page performance budget
    Performance,
    /// Load/stress
    Load,
    /// API contract
    Api,
}

/// Outcome of a test's most recent run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Last run passed
    Passed,
    /// Last run failed
    Failed,
    /// Last runs alternated between pass and fail
    Flaky,
}

/// A stored test: owns its ordered step sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    /// Test identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description the steps were authored from
    #[serde(default)]
    pub description: String,
    /// Ordered steps
    #[serde(default)]
    pub steps: Vec<Step>,
    /// Test category
    #[serde(default)]
    pub test_type: TestType,
    /// Most recent run outcome, if ever run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<RunStatus>,
}

impl TestCase {
    /// Create an empty end-to-end test
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
            test_type: TestType::E2e,
            last_run: None,
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// With steps (renumbered on the way in)
    #[must_use]
    pub fn with_steps(mut self, mut steps: Vec<Step>) -> Self {
        crate::sequence::renumber(&mut steps);
        self.steps = steps;
        self
    }

    /// With test type
    #[inline]
    #[must_use]
    pub fn with_type(mut self, test_type: TestType) -> Self {
        self.test_type = test_type;
        self
    }

    /// With last run status
    #[inline]
    #[must_use]
    pub fn with_last_run(mut self, status: RunStatus) -> Self {
        self.last_run = Some(status);
        self
    }

    /// Lower-cased concatenation of name, description and step text
    ///
    /// Used for case-insensitive substring matching by the analyzers.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let mut text = format!("{} {}", self.name, self.description);
        for step in &self.steps {
            for part in [&step.selector, &step.value, &step.description]
                .into_iter()
                .flatten()
            {
                text.push(' ');
                text.push_str(part);
            }
        }
        text.to_lowercase()
    }
}

/// Output of one interpretation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResult {
    /// Produced steps
    pub steps: Vec<Step>,
    /// 0-100 quality estimate
    pub confidence: u8,
}
