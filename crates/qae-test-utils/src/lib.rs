//! Testing utilities for QAE workspace
//!
//! Shared fixtures: hand-built tests and small corpora with known
//! properties.

#![allow(missing_docs)]

use qae_core::{AuthoringEngine, EngineConfig, InMemoryTestRepository};
use qae_step::{Action, RunStatus, Step, TestCase, TestType};

pub fn step(action: Action, selector: &str) -> Step {
    Step::new(action).with_selector(selector)
}

/// Login flow built on data-testid locators (never fragile)
pub fn login_test() -> TestCase {
    TestCase::new("login-happy", "Login with valid credentials")
        .with_description("Login with valid credentials and see the dashboard")
        .with_steps(vec![
            Step::navigate("/login"),
            step(Action::Fill, "[data-testid=\"email\"]")
                .with_value("test@example.com")
                .with_description("Fill email"),
            step(Action::Fill, "[data-testid=\"password\"]")
                .with_value("password123")
                .with_description("Fill password"),
            step(Action::Click, "[data-testid=\"login-button\"]").with_description("Click login button"),
            step(Action::AssertText, "body")
                .with_value("Dashboard")
                .with_description("Verify \"Dashboard\" is visible"),
        ])
        .with_last_run(RunStatus::Passed)
}

pub fn checkout_test() -> TestCase {
    TestCase::new("checkout-card", "Checkout with card")
        .with_description("Add an item to the cart and pay with a card")
        .with_steps(vec![
            Step::navigate("/cart"),
            step(Action::Click, "[data-testid=\"checkout\"]").with_description("Click Checkout"),
            step(Action::Fill, "[data-testid=\"card-number\"]")
                .with_value("4242424242424242")
                .with_description("Fill card number"),
            step(Action::Click, "[data-testid=\"pay\"]").with_description("Click Pay"),
        ])
}

pub fn invalid_login_test() -> TestCase {
    TestCase::new("login-invalid", "Login with wrong password")
        .with_description("Login with a wrong password shows an error")
        .with_steps(vec![
            Step::navigate("/login"),
            step(Action::Fill, "[data-testid=\"password\"]").with_value("nope"),
            step(Action::AssertText, "body").with_value("Invalid credentials"),
        ])
}

/// Three tests whose locators each hit a different brittleness pattern
pub fn corpus_with_fragile_selectors() -> Vec<TestCase> {
    vec![
        TestCase::new("fragile-ids", "Profile edit")
            .with_steps(vec![
                Step::navigate("/profile"),
                step(Action::Click, "#el-9384756102").with_description("Click Edit profile"),
            ])
            .with_last_run(RunStatus::Failed),
        TestCase::new("fragile-layout", "Settings save")
            .with_steps(vec![
                Step::navigate("/settings"),
                step(Action::Click, "main > div > form > button").with_description("Click Save"),
                step(Action::Click, "ul li:nth-child(3)").with_description("Click Third option"),
            ])
            .with_last_run(RunStatus::Flaky),
        TestCase::new("fragile-passing", "Search")
            .with_steps(vec![
                Step::navigate("/search"),
                step(Action::Fill, ".SearchBox_input__x9f2k").with_value("shoes"),
            ])
            .with_last_run(RunStatus::Passed),
    ]
}

pub fn accessibility_test() -> TestCase {
    TestCase::new("a11y-home", "Home page audit")
        .with_type(TestType::Accessibility)
        .with_steps(vec![Step::navigate("/")])
}

pub fn setup_test_engine() -> AuthoringEngine {
    AuthoringEngine::new(EngineConfig::new())
}

pub fn seeded_repository() -> InMemoryTestRepository {
    InMemoryTestRepository::with_tests([login_test(), checkout_test(), invalid_login_test()])
}
