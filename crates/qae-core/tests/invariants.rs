//! Property tests for invariants that must hold for any input.
//!
//! - Step order and ids stay contiguous and unique after every refinement.
//! - Confidence, coverage and fragility numbers stay inside their bounds.
//! - Interpretation is deterministic.

use proptest::prelude::*;
use qae_core::AuthoringEngine;
use qae_step::{validate_sequence, Step, TestCase};

const FEEDBACK: [&str; 10] = [
    "Add a screenshot step",
    "add a wait of 2 seconds",
    "Remove the wait step",
    "use type instead of fill",
    "Verify the dashboard",
    "no screenshots",
    "use #submit instead of [type=submit]",
    "replace page.click with page.tap",
    "prefer data-testid selectors",
    "this line means nothing",
];

fn description() -> impl Strategy<Value = String> {
    prop::sample::subsequence(
        vec![
            "navigate to /login",
            "login with valid credentials",
            "click \"submit\"",
            "fill \"bob\" in name",
            "verify \"welcome\" is visible",
            "wait 3 seconds",
            "then take a screenshot",
            "select \"blue\" from color",
            "the dashboard page loads",
        ],
        0..6,
    )
    .prop_map(|parts| parts.join(", then "))
}

proptest! {
    #[test]
    fn prop_refinement_keeps_sequence_invariants(
        description in description(),
        feedback in prop::sample::subsequence(FEEDBACK.to_vec(), 0..FEEDBACK.len()),
    ) {
        let engine = AuthoringEngine::default();
        let parsed = engine.parse(&description, None);
        prop_assert!(validate_sequence(&parsed.steps).is_ok());
        prop_assert!((20..=100).contains(&parsed.confidence));

        let refined = engine.refine(&parsed.steps, &feedback);
        prop_assert!(validate_sequence(&refined.steps).is_ok());
        for (i, step) in refined.steps.iter().enumerate() {
            prop_assert_eq!(step.order, i);
        }

        // a second pass over the result never double-adds screenshots
        let again = engine.refine(&refined.steps, &feedback);
        let shots = |steps: &[Step]| steps.iter().filter(|s| s.action == qae_step::Action::Screenshot).count();
        prop_assert!(shots(&again.steps) <= shots(&refined.steps).max(1));
    }

    #[test]
    fn prop_parse_is_deterministic(description in description(), base in prop::option::of("https://[a-z]{1,8}\\.test")) {
        let engine = AuthoringEngine::default();
        let first = engine.parse(&description, base.as_deref());
        let second = engine.parse(&description, base.as_deref());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_analysis_scores_are_bounded(descriptions in prop::collection::vec(description(), 0..6)) {
        let engine = AuthoringEngine::default();
        let corpus: Vec<TestCase> = descriptions
            .iter()
            .enumerate()
            .map(|(i, d)| {
                TestCase::new(format!("t{i}"), d.clone())
                    .with_description(d.clone())
                    .with_steps(engine.parse(d, None).steps)
            })
            .collect();

        let report = engine.analyze_coverage(&corpus, &[], &[]);
        prop_assert!(report.score <= 100);
        prop_assert!(report.gaps.windows(2).all(|w| w[0].severity <= w[1].severity));

        for suggestion in engine.detect_fragility(&corpus) {
            prop_assert!(suggestion.confidence <= 100);
            prop_assert!(suggestion.fragility_score <= 100);
        }
    }
}
