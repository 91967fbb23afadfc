//! Authoring engine
//!
//! Single entry point shared by every caller (CLI, HTTP handlers, UI
//! backends):
//! - Interprets descriptions into scored step sequences
//! - Compiles and applies reviewer feedback
//! - Suggests variations, analyzes coverage and flags fragile locators
//!
//! The engine holds configuration only. Stored tests live behind a
//! [`TestRepository`] supplied per call.

use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineResult};
use crate::repository::TestRepository;
use qae_analysis::{CoverageReport, FragilitySuggestion, VariationSuggestion};
use qae_feedback::{ApplySummary, FeedbackRule};
use qae_interpret::PatternInterpreter;
use qae_step::{CodeRenderer, ParsedResult, PlaywrightRenderer, Step, TestCase};
use serde::{Deserialize, Serialize};

/// Outcome of refining a step sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refinement {
    /// Refined, renumbered steps
    pub steps: Vec<Step>,
    /// Compiled rules with their `applied` flags
    pub rules: Vec<FeedbackRule>,
    /// "N of M applied"
    pub summary: String,
}

/// Outcome of refining rendered code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRefinement {
    /// Rewritten code
    pub code: String,
    /// Compiled rules with their `applied` flags
    pub rules: Vec<FeedbackRule>,
    /// "N of M applied"
    pub summary: String,
}

/// The authoring and analysis engine
#[derive(Debug, Clone)]
pub struct AuthoringEngine {
    config: EngineConfig,
    interpreter: PatternInterpreter,
}

impl Default for AuthoringEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AuthoringEngine {
    /// Create engine from configuration
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let interpreter = PatternInterpreter::new()
            .with_credentials(config.credentials.clone())
            .with_page_load_wait_ms(config.page_load_wait_ms);
        Self {
            config,
            interpreter,
        }
    }

    /// Create engine after validating configuration
    pub fn try_new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Interpret a description and score the result
    ///
    /// Falls back to the configured default base URL when `base_url` is
    /// `None`.
    #[must_use]
    pub fn parse(&self, description: &str, base_url: Option<&str>) -> ParsedResult {
        let base_url = base_url.or(self.config.default_base_url.as_deref());
        let result = qae_interpret::parse(&self.interpreter, description, base_url);
        tracing::info!(
            "Parsed description into {} steps (confidence {})",
            result.steps.len(),
            result.confidence
        );
        result
    }

    /// Suggest a display name for a description
    #[must_use]
    pub fn suggest_name(&self, description: &str) -> String {
        qae_interpret::suggest_name(description)
    }

    /// Compile feedback lines into rules
    #[must_use]
    pub fn compile_feedback<S: AsRef<str>>(&self, feedback: &[S]) -> Vec<FeedbackRule> {
        qae_feedback::compile(feedback)
    }

    /// Compile feedback and apply it to `steps`
    #[must_use]
    pub fn refine<S: AsRef<str>>(&self, steps: &[Step], feedback: &[S]) -> Refinement {
        let mut rules = self.compile_feedback(feedback);
        let steps = qae_feedback::apply_to_steps(steps, &mut rules);
        let summary = ApplySummary::of(&rules);
        tracing::info!("Refined steps: {}", summary);
        Refinement {
            steps,
            rules,
            summary: summary.to_string(),
        }
    }

    /// Compile feedback and apply its code rules to `code`
    #[must_use]
    pub fn refine_code<S: AsRef<str>>(&self, code: &str, feedback: &[S]) -> CodeRefinement {
        let mut rules = self.compile_feedback(feedback);
        let code = qae_feedback::apply_to_code(code, &mut rules);
        let summary = ApplySummary::of(&rules);
        tracing::info!("Refined code: {}", summary);
        CodeRefinement {
            code,
            rules,
            summary: summary.to_string(),
        }
    }

    /// Refine a stored test in place
    ///
    /// Reads the test, applies feedback to its steps and writes it back.
    /// This is the single-writer update path for stored step sequences.
    pub fn refine_stored_test<R, S>(
        &self,
        repository: &R,
        test_id: &str,
        feedback: &[S],
    ) -> EngineResult<Refinement>
    where
        R: TestRepository + ?Sized,
        S: AsRef<str>,
    {
        let mut test = repository.get(test_id)?;
        let refinement = self.refine(&test.steps, feedback);
        test.steps.clone_from(&refinement.steps);
        repository.update(test)?;
        tracing::debug!(test_id, "Stored refined test");
        Ok(refinement)
    }

    /// Render steps as a Playwright test
    #[must_use]
    pub fn render(&self, name: &str, steps: &[Step]) -> String {
        PlaywrightRenderer::new().render_test(name, steps)
    }

    /// Suggest variations of a description using configured filters
    #[must_use]
    pub fn suggest_variations(&self, description: &str) -> Vec<VariationSuggestion> {
        let variations = qae_analysis::suggest_variations(description, &self.config.variations);
        tracing::info!("Suggested {} variations", variations.len());
        variations
    }

    /// Analyze coverage of a corpus
    #[must_use]
    pub fn analyze_coverage(
        &self,
        tests: &[TestCase],
        known_pages: &[String],
        known_flows: &[String],
    ) -> CoverageReport {
        let report = qae_analysis::analyze(tests, known_pages, known_flows);
        tracing::info!(
            "Coverage analyzed: {} tests, {} gaps, score {}",
            tests.len(),
            report.gaps.len(),
            report.score
        );
        report
    }

    /// Flag fragile locators in a corpus using configured options
    #[must_use]
    pub fn detect_fragility(&self, tests: &[TestCase]) -> Vec<FragilitySuggestion> {
        let suggestions = qae_analysis::detect(tests, &self.config.fragility);
        tracing::info!("Found {} fragile locators", suggestions.len());
        suggestions
    }

    /// Analyze every test in a repository
    #[must_use]
    pub fn analyze_repository<R: TestRepository + ?Sized>(
        &self,
        repository: &R,
        known_pages: &[String],
        known_flows: &[String],
    ) -> CoverageReport {
        self.analyze_coverage(&repository.list(), known_pages, known_flows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryTestRepository;
    use qae_step::Action;

    #[test]
    fn default_base_url_synthesizes_navigation() {
        let engine = AuthoringEngine::new(
            EngineConfig::new().with_default_base_url("https://app.test"),
        );
        let result = engine.parse("Click \"Start\"", None);
        assert_eq!(result.steps[0].action, Action::Navigate);
        assert_eq!(result.steps[0].value.as_deref(), Some("https://app.test"));

        // an explicit base wins
        let result = engine.parse("Click \"Start\"", Some("https://other.test"));
        assert_eq!(result.steps[0].value.as_deref(), Some("https://other.test"));
    }

    #[test]
    fn configured_credentials_reach_login_macro() {
        let engine = AuthoringEngine::new(EngineConfig::new().with_credentials(
            qae_interpret::Credentials {
                email: "qa@corp.test".into(),
                password: "hunter2".into(),
            },
        ));
        let steps = engine.parse("Login with valid credentials", None).steps;
        assert_eq!(steps[0].value.as_deref(), Some("qa@corp.test"));
        assert_eq!(steps[1].value.as_deref(), Some("hunter2"));
    }

    #[test]
    fn try_new_validates() {
        assert!(AuthoringEngine::try_new(EngineConfig::new().with_page_load_wait_ms(0)).is_err());
        assert!(AuthoringEngine::try_new(EngineConfig::new()).is_ok());
    }

    #[test]
    fn refine_reports_summary() {
        let engine = AuthoringEngine::default();
        let steps = engine.parse("Navigate to /home", None).steps;
        let refinement = engine.refine(&steps, &["Remove the wait", "looks good"]);
        assert_eq!(refinement.summary, "1 of 1 applied");
        assert!(refinement.steps.iter().all(|s| s.action != Action::Wait));
    }

    #[test]
    fn refine_stored_test_writes_back() {
        let engine = AuthoringEngine::default();
        let steps = engine.parse("Navigate to /login", None).steps;
        let repo = InMemoryTestRepository::with_tests([TestCase::new("t1", "Login").with_steps(steps)]);

        let refinement = engine
            .refine_stored_test(&repo, "t1", &["add a wait of 1 second"])
            .unwrap();
        assert_eq!(refinement.steps.len(), 4);
        assert_eq!(repo.get("t1").unwrap().steps, refinement.steps);

        let err = engine.refine_stored_test(&repo, "nope", &["add a wait"]).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn render_wraps_test() {
        let engine = AuthoringEngine::default();
        let steps = engine.parse("Navigate to /login", None).steps;
        let code = engine.render("Login page", &steps);
        assert!(code.contains("test('Login page'"));
        assert!(code.contains("await page.goto('/login');"));
    }
}
