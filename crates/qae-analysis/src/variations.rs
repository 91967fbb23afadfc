//! Variation generator
//!
//! Classifies a description into a [`TestIntent`] by keyword vote, then
//! expands the intent's fixed catalog plus a universal tail into advisory
//! [`VariationSuggestion`]s.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected intent of a test description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestIntent {
    /// Authentication
    Login,
    /// Generic form submission
    Form,
    /// Search and filtering
    Search,
    /// Cart and payment
    Checkout,
    /// Create/read/update/delete of records
    Crud,
    /// Moving between pages
    Navigation,
}

impl TestIntent {
    /// Classification order; earlier intents win ties
    pub const ALL: [TestIntent; 6] = [
        TestIntent::Login,
        TestIntent::Form,
        TestIntent::Search,
        TestIntent::Checkout,
        TestIntent::Crud,
        TestIntent::Navigation,
    ];

    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            TestIntent::Login => "login",
            TestIntent::Form => "form",
            TestIntent::Search => "search",
            TestIntent::Checkout => "checkout",
            TestIntent::Crud => "crud",
            TestIntent::Navigation => "navigation",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            TestIntent::Login => &[
                "login", "log in", "sign in", "signin", "password", "credential", "authenticate",
                "logout",
            ],
            TestIntent::Form => &[
                "form", "submit", "register", "sign up", "signup", "contact", "field", "input",
            ],
            TestIntent::Search => &["search", "filter", "query", "find", "results", "sort"],
            TestIntent::Checkout => &[
                "checkout", "cart", "payment", "purchase", "order", "buy", "shipping",
            ],
            TestIntent::Crud => &["create", "edit", "update", "delete", "remove", "save", "new "],
            TestIntent::Navigation => &["navigate", "page", "menu", "link", "visit", "go to"],
        }
    }

    fn catalog(self) -> &'static [Template] {
        match self {
            TestIntent::Login => LOGIN,
            TestIntent::Form => FORM,
            TestIntent::Search => SEARCH,
            TestIntent::Checkout => CHECKOUT,
            TestIntent::Crud => CRUD,
            TestIntent::Navigation => NAVIGATION,
        }
    }
}

impl fmt::Display for TestIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationCategory {
    /// Invalid input, expected failure
    Negative,
    /// Unusual but valid input
    EdgeCase,
    /// Limits of accepted ranges
    Boundary,
    /// Different path to the same goal
    AlternativeFlow,
    /// Hostile input
    Security,
    /// Assistive technology and keyboard use
    Accessibility,
    /// Degraded devices or networks
    Performance,
}

/// Effort to author a variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// A few tweaked steps
    Easy,
    /// New data or setup
    Medium,
    /// New environment or tooling
    Hard,
}

/// Importance of a variation; sorts high first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Author first
    High,
    /// Author next
    Medium,
    /// Nice to have
    Low,
}

/// One advisory variation of an existing test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationSuggestion {
    /// `<intent>-<slug>`, or `universal-<slug>` for the tail
    pub id: String,
    /// Short title
    pub name: String,
    /// What the variation checks
    pub description: String,
    /// Kind of variation
    pub category: VariationCategory,
    /// Authoring effort
    pub difficulty: Difficulty,
    /// Importance
    pub priority: Priority,
    /// Expected step count of the variation
    pub estimated_steps: u32,
    /// Source description rewritten for the variation
    pub description_modification: String,
}

/// Filtering and truncation applied after generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariationOptions {
    /// Upper bound on returned suggestions
    pub max_variations: usize,
    /// Keep `negative` suggestions
    pub include_negative: bool,
    /// Keep `edge_case` and `boundary` suggestions
    pub include_edge_cases: bool,
    /// Keep `security` suggestions
    pub include_security: bool,
}

impl Default for VariationOptions {
    fn default() -> Self {
        Self {
            max_variations: 10,
            include_negative: true,
            include_edge_cases: true,
            include_security: true,
        }
    }
}

impl VariationOptions {
    /// With maximum count
    #[inline]
    #[must_use]
    pub fn with_max_variations(mut self, max: usize) -> Self {
        self.max_variations = max;
        self
    }

    /// With negative suggestions on or off
    #[inline]
    #[must_use]
    pub fn with_negative(mut self, include: bool) -> Self {
        self.include_negative = include;
        self
    }

    /// With edge-case and boundary suggestions on or off
    #[inline]
    #[must_use]
    pub fn with_edge_cases(mut self, include: bool) -> Self {
        self.include_edge_cases = include;
        self
    }

    /// With security suggestions on or off
    #[inline]
    #[must_use]
    pub fn with_security(mut self, include: bool) -> Self {
        self.include_security = include;
        self
    }

    fn keeps(&self, category: VariationCategory) -> bool {
        match category {
            VariationCategory::Negative => self.include_negative,
            VariationCategory::EdgeCase | VariationCategory::Boundary => self.include_edge_cases,
            VariationCategory::Security => self.include_security,
            _ => true,
        }
    }
}

struct Template {
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    category: VariationCategory,
    difficulty: Difficulty,
    priority: Priority,
    steps: u32,
    modification: &'static str,
}

macro_rules! template {
    ($slug:literal, $name:literal, $desc:literal, $cat:ident, $diff:ident, $prio:ident, $steps:literal, $mod:literal) => {
        Template {
            slug: $slug,
            name: $name,
            description: $desc,
            category: VariationCategory::$cat,
            difficulty: Difficulty::$diff,
            priority: Priority::$prio,
            steps: $steps,
            modification: $mod,
        }
    };
}

const LOGIN: &[Template] = &[
    template!("invalid-password", "Invalid Password", "Login with a valid email and a wrong password", Negative, Easy, High, 4,
        "Use an incorrect password and verify an error message is shown"),
    template!("empty-fields", "Empty Fields", "Submit the login form with both fields empty", Negative, Easy, High, 3,
        "Leave email and password empty, click login and verify validation messages"),
    template!("remember-me", "Remember Me", "Login with the remember-me option checked", AlternativeFlow, Medium, Medium, 5,
        "Check the remember me box before logging in and verify the session persists"),
    template!("malformed-email", "Malformed Email", "Login with an email missing the @ sign", EdgeCase, Easy, Medium, 4,
        "Enter \"user.example.com\" as the email and verify the email format error"),
    template!("sql-injection", "SQL Injection Probe", "Login with SQL metacharacters in the email field", Security, Medium, High, 4,
        "Enter \"' OR 1=1 --\" as the email and verify login is rejected"),
    template!("xss-probe", "XSS Probe", "Login with a script tag in the email field", Security, Medium, High, 4,
        "Enter \"<script>alert(1)</script>\" as the email and verify it is not executed"),
    template!("account-lockout", "Account Lockout", "Repeated failed logins lock the account", Negative, Hard, Medium, 8,
        "Fail to log in five times in a row and verify the account is locked"),
    template!("case-sensitivity", "Email Case Sensitivity", "Login with the email in upper case", EdgeCase, Easy, Low, 4,
        "Enter the email in upper case and verify login still succeeds"),
];

const FORM: &[Template] = &[
    template!("required-fields", "Missing Required Fields", "Submit with required fields empty", Negative, Easy, High, 3,
        "Leave every required field empty, submit and verify validation errors"),
    template!("max-length", "Maximum Length Input", "Fill fields with input at the maximum length", Boundary, Easy, Medium, 4,
        "Fill each text field with 255 characters and verify the form still submits"),
    template!("special-characters", "Special Characters", "Fill fields with unicode and punctuation", EdgeCase, Easy, Medium, 4,
        "Fill the fields with accented letters, emoji and quotes and verify they are saved intact"),
    template!("script-injection", "Script Injection", "Fill a text field with a script tag", Security, Medium, High, 4,
        "Enter \"<script>alert(1)</script>\" in a text field and verify it is escaped"),
    template!("double-submit", "Double Submit", "Click submit twice quickly", EdgeCase, Medium, Low, 4,
        "Click the submit button twice and verify only one submission is recorded"),
];

const SEARCH: &[Template] = &[
    template!("no-results", "No Results", "Search for a term with no matches", Negative, Easy, High, 3,
        "Search for \"zzzz-no-match\" and verify the empty-state message"),
    template!("empty-query", "Empty Query", "Submit the search with an empty query", EdgeCase, Easy, Medium, 3,
        "Submit the search box empty and verify nothing breaks"),
    template!("special-characters", "Special Characters", "Search with quotes and symbols", EdgeCase, Easy, Medium, 3,
        "Search for \"%_'\\\"\" and verify the results page renders"),
    template!("injection-probe", "Injection Probe", "Search with SQL metacharacters", Security, Medium, High, 3,
        "Search for \"' OR 1=1 --\" and verify no unexpected results are returned"),
    template!("filter-combination", "Filter Combination", "Combine several filters with a query", AlternativeFlow, Medium, Medium, 6,
        "Apply two filters together with the query and verify results satisfy both"),
];

const CHECKOUT: &[Template] = &[
    template!("declined-card", "Declined Card", "Pay with a card that is declined", Negative, Medium, High, 6,
        "Use a declined test card and verify the payment error is shown"),
    template!("empty-cart", "Empty Cart", "Start checkout with an empty cart", Negative, Easy, High, 3,
        "Empty the cart, start checkout and verify checkout is blocked"),
    template!("quantity-limits", "Quantity Limits", "Order the maximum allowed quantity", Boundary, Easy, Medium, 5,
        "Set the item quantity to the maximum allowed and verify the total is correct"),
    template!("price-tampering", "Price Tampering", "Modify the price before submitting the order", Security, Hard, High, 6,
        "Alter the price field before placing the order and verify the server rejects it"),
    template!("guest-checkout", "Guest Checkout", "Complete checkout without an account", AlternativeFlow, Medium, Medium, 8,
        "Check out as a guest instead of a logged-in user and verify the order completes"),
];

const CRUD: &[Template] = &[
    template!("missing-required", "Missing Required Data", "Create a record without required data", Negative, Easy, High, 4,
        "Create the record with required fields blank and verify it is rejected"),
    template!("duplicate-record", "Duplicate Record", "Create a record that already exists", Negative, Medium, Medium, 5,
        "Create the same record twice and verify the duplicate is reported"),
    template!("long-values", "Long Values", "Save a record with very long field values", Boundary, Easy, Medium, 4,
        "Use 1000-character values and verify the record saves and displays correctly"),
    template!("unauthorized-edit", "Unauthorized Edit", "Edit a record owned by another user", Security, Hard, High, 6,
        "Attempt the change as a different user and verify permission is denied"),
    template!("cancel-delete", "Cancel Delete", "Cancel a delete confirmation", AlternativeFlow, Easy, Low, 4,
        "Start deleting the record, cancel the confirmation and verify it still exists"),
];

const NAVIGATION: &[Template] = &[
    template!("not-found", "Page Not Found", "Visit a URL that does not exist", Negative, Easy, High, 3,
        "Navigate to a non-existent path and verify the 404 page"),
    template!("back-button", "Browser Back", "Use the browser back button", AlternativeFlow, Easy, Medium, 4,
        "Navigate forward then press back and verify the previous page is restored"),
    template!("deep-link", "Deep Link", "Open an inner page directly", AlternativeFlow, Easy, Medium, 3,
        "Open the target page directly by URL and verify it renders without prior navigation"),
    template!("protected-route", "Protected Route", "Visit an authenticated page while logged out", Security, Medium, High, 3,
        "Log out, open the page directly and verify redirection to login"),
    template!("trailing-slash", "Trailing Slash", "Visit the URL with a trailing slash", EdgeCase, Easy, Low, 2,
        "Append a trailing slash to the URL and verify the same page loads"),
];

const UNIVERSAL: &[Template] = &[
    template!("accessibility", "Keyboard and Screen Reader", "Complete the flow with keyboard only", Accessibility, Medium, Medium, 6,
        "Complete the flow using only the keyboard and verify focus order and labels"),
    template!("mobile-viewport", "Mobile Viewport", "Run the flow on a phone-sized viewport", Performance, Easy, Medium, 4,
        "Run the same steps at a 375x667 viewport and verify the layout is usable"),
    template!("slow-network", "Slow Network", "Run the flow on a throttled connection", Performance, Medium, Low, 5,
        "Throttle the network to slow 3G and verify loading states are shown"),
];

/// Classify a description by keyword vote
///
/// The intent with the most literal keyword hits wins; ties go to the
/// earlier intent in [`TestIntent::ALL`]. Text with no hits at all is
/// treated as navigation.
#[must_use]
pub fn classify(description: &str) -> TestIntent {
    let text = description.to_lowercase();
    let mut best = (TestIntent::Navigation, 0usize);
    for intent in TestIntent::ALL {
        let hits = intent.keywords().iter().filter(|k| text.contains(*k)).count();
        if hits > best.1 {
            best = (intent, hits);
        }
    }
    best.0
}

/// Expand the catalog for `intent` plus the universal tail, unfiltered
#[must_use]
pub fn generate(description: &str, intent: TestIntent) -> Vec<VariationSuggestion> {
    let base = description.trim().trim_end_matches(['.', '!']);
    let intent_entries = intent.catalog().iter().map(|t| (intent.as_str(), t));
    let universal = UNIVERSAL.iter().map(|t| ("universal", t));

    intent_entries
        .chain(universal)
        .map(|(prefix, t)| VariationSuggestion {
            id: format!("{prefix}-{}", t.slug),
            name: t.name.to_string(),
            description: t.description.to_string(),
            category: t.category,
            difficulty: t.difficulty,
            priority: t.priority,
            estimated_steps: t.steps,
            description_modification: if base.is_empty() {
                t.modification.to_string()
            } else {
                format!("{base}. {}", t.modification)
            },
        })
        .collect()
}

/// Classify, generate, filter, sort by priority and truncate
#[must_use]
pub fn suggest_variations(description: &str, options: &VariationOptions) -> Vec<VariationSuggestion> {
    let intent = classify(description);
    let mut out: Vec<_> = generate(description, intent)
        .into_iter()
        .filter(|v| options.keeps(v.category))
        .collect();
    // stable: catalog order holds within a tier
    out.sort_by_key(|v| v.priority);
    out.truncate(options.max_variations);
    tracing::debug!(%intent, count = out.len(), "Generated variations");
    out
}
