//! End-to-end scenarios through the engine facade.
//!
//! Core guarantees exercised here:
//! - A bare navigation is confirmed with a wait and a screenshot.
//! - The login shorthand expands to email, password and submit.
//! - Feedback application is idempotent for deduplicated additions.
//! - Coverage analysis treats missing security tests as critical.
//! - Generated ids are flagged as fragile with a data-testid replacement.

use pretty_assertions::assert_eq;
use qae_analysis::{FixStrategy, GapKind, Severity};
use qae_core::{AuthoringEngine, EngineConfig, TestRepository};
use qae_step::{Action, Step};
use qae_test_utils::{
    accessibility_test, checkout_test, corpus_with_fragile_selectors, invalid_login_test,
    login_test, seeded_repository, setup_test_engine,
};

/// Tenet: a bare navigation instruction implies "confirm the page renders".
#[test]
fn bare_navigation_gets_wait_and_screenshot() {
    let engine = setup_test_engine();
    let parsed = engine.parse("Navigate to /login", None);

    let actions: Vec<_> = parsed.steps.iter().map(|s| s.action).collect();
    assert_eq!(actions, vec![Action::Navigate, Action::Wait, Action::Screenshot]);
    assert_eq!(parsed.steps[0].value.as_deref(), Some("/login"));
    assert_eq!(parsed.steps[1].value.as_deref(), Some("2000"));
    assert!(parsed.confidence >= 50);
}

/// Tenet: the login shorthand wins over finer-grained fill and click rules.
#[test]
fn login_shorthand_expands_to_three_steps() {
    let engine = setup_test_engine();
    let steps = engine.parse("Login with valid credentials", None).steps;

    assert_eq!(steps.len(), 3);
    assert_eq!(steps[0].action, Action::Fill);
    assert!(steps[0].selector.as_deref().unwrap().contains("email"));
    assert_eq!(steps[0].value.as_deref(), Some("test@example.com"));
    assert_eq!(steps[1].action, Action::Fill);
    assert!(steps[1].selector.as_deref().unwrap().contains("password"));
    assert_eq!(steps[1].value.as_deref(), Some("password123"));
    assert_eq!(steps[2].action, Action::Click);
    assert!(steps[2].selector.as_deref().unwrap().contains("login-button"));
}

/// Tenet: re-applying an addStep(screenshot) rule never duplicates the step.
#[test]
fn screenshot_feedback_is_idempotent() {
    let engine = setup_test_engine();
    let steps = vec![Step::navigate("/"), Step::new(Action::Click).with_selector("#go")];

    let first = engine.refine(&steps, &["Add a screenshot step"]);
    assert_eq!(first.steps.len(), 3);
    assert_eq!(first.steps[2].action, Action::Screenshot);
    assert!(first.rules[0].applied);

    let second = engine.refine(&first.steps, &["Add a screenshot step"]);
    assert_eq!(second.steps.len(), 3);
    assert!(second.rules[0].applied);
    assert_eq!(second.summary, "1 of 1 applied");
}

/// Tenet: a corpus with no security-minded test gets a critical gap.
#[test]
fn missing_security_tests_are_critical() {
    let engine = setup_test_engine();
    let corpus = vec![login_test(), checkout_test()];
    let report = engine.analyze_coverage(&corpus, &[], &[]);

    let gap = report
        .gaps
        .iter()
        .find(|g| g.title == "No Security Tests")
        .expect("security gap present");
    assert_eq!(gap.kind, GapKind::MissingNegativeTest);
    assert_eq!(gap.severity, Severity::Critical);
    assert_eq!(report.gaps[0].severity, Severity::Critical);
}

/// Tenet: coverage improves as negative and accessibility tests are added.
#[test]
fn coverage_score_rewards_special_tests() {
    let engine = setup_test_engine();
    let thin = engine.analyze_coverage(&[login_test()], &[], &[]);
    let rich = engine.analyze_coverage(
        &[login_test(), invalid_login_test(), accessibility_test()],
        &[],
        &[],
    );

    assert!(rich.score > thin.score);
    assert!(!rich.gaps.iter().any(|g| g.title == "No Negative Tests"));
    assert!(!rich.gaps.iter().any(|g| g.title == "No Accessibility Tests"));
    assert!(rich.gaps.windows(2).all(|w| w[0].severity <= w[1].severity));
}

/// Tenet: numeric generated ids are flagged and replaced with data-testid.
#[test]
fn generated_id_is_fragile() {
    let engine = setup_test_engine();
    let suggestions = engine.detect_fragility(&corpus_with_fragile_selectors());

    let id = suggestions
        .iter()
        .find(|s| s.current_selector == "#el-9384756102")
        .expect("generated id flagged");
    assert_eq!(id.reason, "dynamic/generated ID");
    assert_eq!(id.strategy, FixStrategy::DataTestId);
    assert_eq!(id.test_id, "fragile-ids");
    assert_eq!(id.step_id, "step-2");
}

/// Tenet: passing tests are skipped unless the caller asks for them.
#[test]
fn fragility_respects_run_status() {
    let corpus = corpus_with_fragile_selectors();

    let default = setup_test_engine().detect_fragility(&corpus);
    assert!(default.iter().all(|s| s.test_id != "fragile-passing"));
    assert_eq!(default.len(), 3);
    assert!(default.windows(2).all(|w| w[0].fragility_score >= w[1].fragility_score));

    let mut config = EngineConfig::new();
    config.fragility.include_passing = true;
    let all = AuthoringEngine::new(config).detect_fragility(&corpus);
    assert_eq!(all.len(), 4);
}

/// Tenet: identical seeds give identical fragility output.
#[test]
fn fragility_is_reproducible_per_seed() {
    let corpus = corpus_with_fragile_selectors();
    let engine = setup_test_engine();
    assert_eq!(engine.detect_fragility(&corpus), engine.detect_fragility(&corpus));
}

/// Tenet: stored tests are refined through the repository, not in place.
#[test]
fn refine_stored_test_round_trip() {
    let engine = setup_test_engine();
    let repo = seeded_repository();

    let before = repo.get("checkout-card").unwrap();
    let refinement = engine
        .refine_stored_test(&repo, "checkout-card", &["Add a screenshot", "Add an assertion"])
        .unwrap();
    assert_eq!(refinement.summary, "2 of 2 applied");

    let after = repo.get("checkout-card").unwrap();
    assert_eq!(after.steps.len(), before.steps.len() + 2);
    assert!(after.steps.iter().rev().take(2).all(|s| s.modified_by_feedback));
    for (i, step) in after.steps.iter().enumerate() {
        assert_eq!(step.order, i);
        assert_eq!(step.id, format!("step-{}", i + 1));
    }

    let report = engine.analyze_repository(&repo, &[], &[]);
    assert_eq!(report.stats.total_tests, 3);
}

/// Tenet: variations follow the detected intent and configured limits.
#[test]
fn variations_follow_intent() {
    let engine = setup_test_engine();
    let variations = engine.suggest_variations("Login with valid credentials");
    assert_eq!(variations.len(), 10);
    assert_eq!(variations[0].id, "login-invalid-password");
    assert!(variations.iter().any(|v| v.id == "universal-accessibility"));
}

/// Tenet: code feedback rewrites rendered code sequentially.
#[test]
fn rendered_code_refinement() {
    let engine = setup_test_engine();
    let steps = engine.parse("Navigate to /login", None).steps;
    let code = engine.render("Login page", &steps);

    let refined = engine.refine_code(
        &code,
        &["replace waitForTimeout(2000) with waitForLoadState('networkidle')"],
    );
    assert!(refined.code.contains("await page.waitForLoadState('networkidle');"));
    assert!(!refined.code.contains("waitForTimeout"));
    assert_eq!(refined.summary, "1 of 1 applied");
}
