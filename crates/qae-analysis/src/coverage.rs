//! Coverage analyzer
//!
//! Two passes over a test corpus. The first tallies which pages and flows
//! each test touches and which special categories (negative, edge case,
//! security, accessibility) it belongs to; the second synthesizes gaps in a
//! fixed order and scores the corpus.

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use qae_step::{Action, TestCase, TestType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pages suggested once some coverage has been auto-detected
pub const COMMON_PAGES: [&str; 7] = [
    "/",
    "/login",
    "/register",
    "/dashboard",
    "/settings",
    "/profile",
    "/search",
];

const FLOW_HEURISTICS: [(&str, &[&str]); 6] = [
    ("login", &["login", "log in", "sign in", "signin"]),
    ("registration", &["register", "registration", "sign up", "signup"]),
    ("checkout", &["checkout", "payment", "cart"]),
    ("search", &["search"]),
    ("profile", &["profile"]),
    ("settings", &["settings", "preferences"]),
];

static NEGATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:invalid|wrong|incorrect|error|fail\w*|empty|missing|negative|reject\w*|denied|unauthori[sz]ed)\b")
        .expect("negative pattern is valid")
});

static EDGE_CASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:edge|boundary|limits?|max(?:imum)?|min(?:imum)?|long|special characters?|unicode|zero|overflow|large)\b")
        .expect("edge-case pattern is valid")
});

static SECURITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:security|injection|xss|auth\w*|permissions?|csrf|sql)\b")
        .expect("security pattern is valid")
});

static ACCESSIBILITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:accessib\w*|a11y|aria|screen reader|keyboard|wcag|contrast)\b")
        .expect("accessibility pattern is valid")
});

/// Kind of coverage gap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapKind {
    /// A page no test touches
    UntestedPage,
    /// A flow no test exercises
    UntestedFlow,
    /// No edge-case tests
    MissingEdgeCase,
    /// No negative (or security) tests
    MissingNegativeTest,
    /// Thin or partial coverage
    IncompleteCoverage,
}

/// Gap severity; sorts critical first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Fix before release
    Critical,
    /// Fix soon
    High,
    /// Worth planning
    Medium,
    /// Nice to have
    Low,
}

/// One detected absence of coverage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageGap {
    /// `gap-N`, assigned after sorting
    pub id: String,
    /// Kind of gap
    pub kind: GapKind,
    /// Severity
    pub severity: Severity,
    /// Short title
    pub title: String,
    /// What is missing
    pub description: String,
    /// Page, flow or category concerned
    pub affected_area: String,
    /// What to add
    pub suggestion: String,
}

/// Tallies behind a coverage report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageStats {
    /// Tests analyzed
    pub total_tests: usize,
    /// Known or detected pages
    pub pages_total: usize,
    /// Pages touched by at least one test
    pub pages_covered: usize,
    /// Known or detected flows
    pub flows_total: usize,
    /// Flows exercised by at least one test
    pub flows_covered: usize,
    /// Pages came from navigate steps rather than the caller
    pub pages_auto_detected: bool,
    /// Flows came from test names rather than the caller
    pub flows_auto_detected: bool,
    /// Tests classified as negative
    pub negative_tests: usize,
    /// Tests classified as edge case
    pub edge_case_tests: usize,
    /// Tests classified as security
    pub security_tests: usize,
    /// Tests classified as accessibility
    pub accessibility_tests: usize,
    /// Distinct [`TestType`]s present
    pub distinct_test_types: usize,
}

/// Result of one analysis call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    /// Gaps, critical first
    pub gaps: Vec<CoverageGap>,
    /// Composite 0-100 score
    pub score: u8,
    /// Underlying tallies
    pub stats: CoverageStats,
}

/// Analyze `tests` against known pages and flows
///
/// Empty `known_pages` switches on page auto-detection from navigate steps;
/// empty `known_flows` switches on flow detection from test names.
#[must_use]
pub fn analyze(tests: &[TestCase], known_pages: &[String], known_flows: &[String]) -> CoverageReport {
    let texts: Vec<String> = tests.iter().map(TestCase::searchable_text).collect();

    let pages_auto_detected = known_pages.is_empty();
    let page_hits: IndexMap<String, usize> = if pages_auto_detected {
        detect_pages(tests)
    } else {
        tally(known_pages, &texts)
    };

    let flows_auto_detected = known_flows.is_empty();
    let flow_hits: IndexMap<String, usize> = if flows_auto_detected {
        detect_flows(tests)
    } else {
        tally(known_flows, &texts)
    };

    let types: HashSet<TestType> = tests.iter().map(|t| t.test_type).collect();
    let accessibility_typed = tests
        .iter()
        .zip(&texts)
        .filter(|(t, text)| t.test_type == TestType::Accessibility || ACCESSIBILITY.is_match(text))
        .count();

    let stats = CoverageStats {
        total_tests: tests.len(),
        pages_total: page_hits.len(),
        pages_covered: page_hits.values().filter(|n| **n > 0).count(),
        flows_total: flow_hits.len(),
        flows_covered: flow_hits.values().filter(|n| **n > 0).count(),
        pages_auto_detected,
        flows_auto_detected,
        negative_tests: matching(&texts, &NEGATIVE),
        edge_case_tests: matching(&texts, &EDGE_CASE),
        security_tests: matching(&texts, &SECURITY),
        accessibility_tests: accessibility_typed,
        distinct_test_types: types.len(),
    };

    let mut gaps = synthesize_gaps(&stats, &page_hits, &flow_hits);
    gaps.sort_by_key(|g| g.severity);
    for (i, gap) in gaps.iter_mut().enumerate() {
        gap.id = format!("gap-{}", i + 1);
    }

    let score = composite_score(&stats);
    tracing::debug!(gaps = gaps.len(), score, "Coverage analyzed");
    CoverageReport { gaps, score, stats }
}

fn matching(texts: &[String], re: &Regex) -> usize {
    texts.iter().filter(|t| re.is_match(t)).count()
}

fn tally(targets: &[String], texts: &[String]) -> IndexMap<String, usize> {
    targets
        .iter()
        .map(|target| {
            let needle = target.to_lowercase();
            let hits = texts.iter().filter(|t| t.contains(&needle)).count();
            (target.clone(), hits)
        })
        .collect()
}

/// Pages reached by navigate steps, with the number of tests reaching each
fn detect_pages(tests: &[TestCase]) -> IndexMap<String, usize> {
    let mut pages: IndexMap<String, usize> = IndexMap::new();
    for test in tests {
        let visited: IndexSet<String> = test
            .steps
            .iter()
            .filter(|s| s.action == Action::Navigate)
            .filter_map(|s| s.value.as_deref().and_then(url_path))
            .collect();
        for page in visited {
            *pages.entry(page).or_default() += 1;
        }
    }
    pages
}

fn detect_flows(tests: &[TestCase]) -> IndexMap<String, usize> {
    let mut flows: IndexMap<String, usize> = IndexMap::new();
    for test in tests {
        let name = test.name.to_lowercase();
        for (flow, keywords) in FLOW_HEURISTICS {
            if keywords.iter().any(|k| name.contains(k)) {
                *flows.entry(flow.to_string()).or_default() += 1;
            }
        }
    }
    flows
}

/// Path part of an absolute or root-relative URL, without query or fragment
fn url_path(url: &str) -> Option<String> {
    let url = url.trim();
    let path = match url.find("://") {
        Some(scheme_end) => {
            let rest = &url[scheme_end + 3..];
            rest.find('/').map_or("/", |i| &rest[i..])
        }
        None if url.starts_with('/') => url,
        None => return None,
    };
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    Some(if trimmed.is_empty() { "/".to_string() } else { trimmed.to_string() })
}

fn gap(kind: GapKind, severity: Severity, title: String, description: String, area: &str, suggestion: String) -> CoverageGap {
    CoverageGap {
        id: String::new(),
        kind,
        severity,
        title,
        description,
        affected_area: area.to_string(),
        suggestion,
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    needles.iter().any(|n| haystack.contains(n))
}

fn synthesize_gaps(
    stats: &CoverageStats,
    pages: &IndexMap<String, usize>,
    flows: &IndexMap<String, usize>,
) -> Vec<CoverageGap> {
    let mut gaps = Vec::new();

    for (page, _) in pages.iter().filter(|(_, n)| **n == 0) {
        let severity = if contains_any(page, &["login", "checkout", "payment"]) {
            Severity::Critical
        } else {
            Severity::High
        };
        gaps.push(gap(
            GapKind::UntestedPage,
            severity,
            format!("Untested Page: {page}"),
            format!("No test visits or mentions {page}"),
            page,
            format!("Add a test that opens {page} and verifies its main content"),
        ));
    }

    for (flow, _) in flows.iter().filter(|(_, n)| **n == 0) {
        let severity = if contains_any(flow, &["checkout", "payment", "auth"]) {
            Severity::Critical
        } else {
            Severity::High
        };
        gaps.push(gap(
            GapKind::UntestedFlow,
            severity,
            format!("Untested Flow: {flow}"),
            format!("No test exercises the {flow} flow"),
            flow,
            format!("Add an end-to-end test covering the {flow} flow"),
        ));
    }

    if stats.negative_tests == 0 {
        gaps.push(gap(
            GapKind::MissingNegativeTest,
            Severity::High,
            "No Negative Tests".into(),
            "No test exercises invalid input or expected failures".into(),
            "negative",
            "Add tests with invalid input that verify error handling".into(),
        ));
    }
    if stats.edge_case_tests == 0 {
        gaps.push(gap(
            GapKind::MissingEdgeCase,
            Severity::Medium,
            "No Edge Case Tests".into(),
            "No test covers boundaries, long input or special characters".into(),
            "edge_case",
            "Add tests at input limits and with unusual characters".into(),
        ));
    }
    if stats.security_tests == 0 {
        gaps.push(gap(
            GapKind::MissingNegativeTest,
            Severity::Critical,
            "No Security Tests".into(),
            "No test probes injection, XSS, authentication or permissions".into(),
            "security",
            "Add tests for injection, XSS and access control".into(),
        ));
    }
    if stats.accessibility_tests == 0 {
        gaps.push(gap(
            GapKind::IncompleteCoverage,
            Severity::Medium,
            "No Accessibility Tests".into(),
            "No test checks keyboard navigation, labels or contrast".into(),
            "accessibility",
            "Add an accessibility test for the main flows".into(),
        ));
    }

    for (page, _) in pages.iter().filter(|(_, n)| **n == 1) {
        gaps.push(gap(
            GapKind::IncompleteCoverage,
            Severity::Low,
            format!("Low Coverage: {page}"),
            format!("Only one test covers {page}"),
            page,
            format!("Add more scenarios for {page}"),
        ));
    }

    if stats.pages_auto_detected && !pages.is_empty() {
        for page in COMMON_PAGES.iter().filter(|p| !pages.contains_key(**p)) {
            let severity = if matches!(*page, "/login" | "/register") {
                Severity::Medium
            } else {
                Severity::Low
            };
            gaps.push(gap(
                GapKind::UntestedPage,
                severity,
                format!("Common Page Not Tested: {page}"),
                format!("{page} is a common page with no test"),
                page,
                format!("Add a test for {page} if the application has one"),
            ));
        }
    }

    gaps
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn composite_score(stats: &CoverageStats) -> u8 {
    let ratio = |covered: usize, total: usize| covered as f64 / total as f64;

    let mut score = 50.0;
    score += match (stats.pages_auto_detected, stats.pages_total) {
        (_, 0) => 0.0,
        (true, _) => 10.0,
        (false, total) => ratio(stats.pages_covered, total) * 20.0,
    };
    score += match (stats.flows_auto_detected, stats.flows_total) {
        (_, 0) => 0.0,
        (true, _) => 8.0,
        (false, total) => ratio(stats.flows_covered, total) * 15.0,
    };
    score += (stats.distinct_test_types * 2).min(10) as f64;
    for present in [
        stats.negative_tests,
        stats.edge_case_tests,
        stats.security_tests,
        stats.accessibility_tests,
    ] {
        if present > 0 {
            score += 5.0;
        }
    }
    score.round().clamp(0.0, 100.0) as u8
}
