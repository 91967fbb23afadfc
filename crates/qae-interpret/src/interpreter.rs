//! Pattern interpreter
//!
//! Converts a free-text description into an ordered step sequence using a
//! fixed list of textual matchers. Matchers run in [`Matcher::PRECEDENCE`]
//! order and the order in which they emit steps is the final step order.
//! Matchers are not mutually exclusive: every matcher that finds something
//! contributes, except that the login macro suppresses click/fill matches
//! that target the credentials form it already covers.

use once_cell::sync::Lazy;
use qae_step::{renumber, Action, Step};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Default email used by the login macro
pub const DEFAULT_EMAIL: &str = "test@example.com";

/// Default password used by the login macro
pub const DEFAULT_PASSWORD: &str = "password123";

/// Default wait emitted by the page-load and fallback rules
pub const DEFAULT_PAGE_LOAD_WAIT_MS: u64 = 2_000;

const EMAIL_SELECTOR: &str =
    r#"[data-testid="email"], input[name="email"], input[type="email"], #email"#;
const PASSWORD_SELECTOR: &str =
    r#"[data-testid="password"], input[name="password"], input[type="password"], #password"#;
const LOGIN_BUTTON_SELECTOR: &str = r#"[data-testid="login-button"], button[type="submit"]"#;

// Unquoted targets run up to a clause boundary: punctuation, "and", "then" or end of line.
static NAVIGATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\b(?:navigate|go|visit|open|browse)\s+(?:to\s+)?(?:the\s+)?(?:(https?://[^\s,;"'<>]+|/[^\s,;"'<>]*)|([a-z0-9][a-z0-9-]*)\s+page\b)"#,
    )
    .expect("navigate pattern is valid")
});

static URL_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:https?://|/)[^\s,;"'<>]*"#).expect("url token pattern is valid")
});

static LOGIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:log\s?in|sign\s?in|authenticate)\b").expect("login pattern is valid")
});

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").expect("email pattern is valid")
});

static PASSWORD_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"password\s*(?:of\s+|is\s+|[:=]\s*)?["']([^"']+)["']"#)
        .expect("quoted password pattern is valid")
});

static PASSWORD_ASSIGNED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"password\s*[:=]\s*([^\s,;]+)").expect("assigned password pattern is valid")
});

static CLICK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)\bclick(?:s|ed)?(?:\s+on)?(?:\s+the)?\s+(?:"([^"]+)"|'([^']+)'|([a-z0-9][a-z0-9 _-]*?)(?:\s+(?:button|link|tab|icon))?\s*(?:[,.;!]|\s+and\b|\s+then\b|$))"#,
    )
    .expect("click pattern is valid")
});

static FILL_INTO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)\b(fill(?:\s+in)?|enter|type|input)\s+["']([^"']*)["']\s+(?:in|into)\s+(?:the\s+)?(?:"([^"]+)"|'([^']+)'|([a-z0-9][a-z0-9 _-]*?)(?:\s+(?:field|input|box|textbox))?\s*(?:[,.;!]|\s+and\b|\s+then\b|$))"#,
    )
    .expect("fill-into pattern is valid")
});

static FILL_WITH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\bfill(?:\s+in)?\s+(?:the\s+)?([a-z0-9][a-z0-9 _-]*?)(?:\s+(?:field|input|box))?\s+with\s+["']([^"']*)["']"#,
    )
    .expect("fill-with pattern is valid")
});

static VERIFY_QUOTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\b(?:verify|assert|check|confirm|ensure|expect|see)(?:\s+that)?(?:\s+the)?(?:\s+(?:text|message))?\s+["']([^"']+)["']"#,
    )
    .expect("quoted verify pattern is valid")
});

static VERIFY_VISIBLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:verify|assert|confirm|ensure|expect)(?:\s+that)?(?:\s+the)?\s+([a-z0-9][a-z0-9 _-]*?)\s+(?:is\s+|are\s+)?(?:visible|displayed|shown|appears?)\b",
    )
    .expect("visible verify pattern is valid")
});

static PAGE_LOAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([a-z0-9][a-z0-9-]*)\s+page\s+(?:loads|is\s+loaded|renders|appears)\b")
        .expect("page-load pattern is valid")
});

static WAIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bwait(?:\s+for)?\s+(\d+(?:\.\d+)?)\s*(milliseconds?|ms|seconds?|secs?|s)\b")
        .expect("wait pattern is valid")
});

static SELECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)\bselect\s+["']([^"']+)["']\s+(?:from|in)\s+(?:the\s+)?(?:"([^"]+)"|'([^']+)'|([a-z0-9][a-z0-9 _-]*?)(?:\s+(?:dropdown|select|menu|list|field))?\s*(?:[,.;!]|\s+and\b|\s+then\b|$))"#,
    )
    .expect("select pattern is valid")
});

static SCREENSHOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:screenshot|capture)\b").expect("screenshot pattern is valid")
});

/// Credentials used by the login macro when the description names none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Email filled into the email field
    pub email: String,
    /// Password filled into the password field
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: DEFAULT_EMAIL.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }
}

/// One textual matcher of the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Matcher {
    /// `navigate|go|visit|open|browse ... to <url>`
    Navigation,
    /// `login|sign in|authenticate` macro
    Login,
    /// `click <text>`
    Click,
    /// `fill|enter|type "<value>" in <field>`
    Fill,
    /// `verify|assert "<text>"`
    Verify,
    /// `<noun> page loads`
    PageLoad,
    /// `wait N seconds|ms`
    Wait,
    /// `select "<option>" from <field>`
    Select,
    /// literal screenshot/capture mention
    Screenshot,
}

impl Matcher {
    /// Fixed evaluation order; emission order follows it
    pub const PRECEDENCE: [Matcher; 9] = [
        Matcher::Navigation,
        Matcher::Login,
        Matcher::Click,
        Matcher::Fill,
        Matcher::Verify,
        Matcher::PageLoad,
        Matcher::Wait,
        Matcher::Select,
        Matcher::Screenshot,
    ];
}

/// Per-call matching context
struct Scan<'a> {
    text: &'a str,
    base_url: Option<&'a str>,
    login: bool,
}

/// Deterministic free-text to step interpreter
#[derive(Debug, Clone)]
pub struct PatternInterpreter {
    credentials: Credentials,
    page_load_wait_ms: u64,
}

impl Default for PatternInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternInterpreter {
    /// Create interpreter with default credentials and waits
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            credentials: Credentials::default(),
            page_load_wait_ms: DEFAULT_PAGE_LOAD_WAIT_MS,
        }
    }

    /// With login macro credentials
    #[inline]
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// With page-load wait
    #[inline]
    #[must_use]
    pub fn with_page_load_wait_ms(mut self, ms: u64) -> Self {
        self.page_load_wait_ms = ms;
        self
    }

    /// Interpret `description` into a renumbered step sequence
    ///
    /// Never fails; unrecognized text yields an empty sequence (or a lone
    /// navigation plus the fallback pair when `base_url` is given).
    #[must_use]
    pub fn interpret(&self, description: &str, base_url: Option<&str>) -> Vec<Step> {
        let text = description.trim().to_lowercase();
        // "/login" and "the login page" are destinations, not requests to log in
        let prose = NAVIGATE.replace_all(&text, " ");
        let prose = URL_TOKEN.replace_all(&prose, " ");
        let scan = Scan {
            text: &text,
            base_url: base_url.map(str::trim).filter(|b| !b.is_empty()),
            login: LOGIN.is_match(&prose),
        };

        let mut steps = Vec::new();
        for matcher in Matcher::PRECEDENCE {
            let before = steps.len();
            self.run(matcher, &scan, &mut steps);
            if steps.len() > before {
                tracing::debug!(?matcher, emitted = steps.len() - before, "matcher fired");
            }
        }

        // A bare navigation implies "confirm the page renders"
        if steps.len() == 1 && steps[0].action == Action::Navigate {
            steps.push(self.page_load_wait("page"));
            steps.push(Step::screenshot("Capture page after load"));
        }

        renumber(&mut steps);
        steps
    }

    fn run(&self, matcher: Matcher, scan: &Scan<'_>, steps: &mut Vec<Step>) {
        match matcher {
            Matcher::Navigation => Self::navigation(scan, steps),
            Matcher::Login => self.login(scan, steps),
            Matcher::Click => Self::click(scan, steps),
            Matcher::Fill => Self::fill(scan, steps),
            Matcher::Verify => Self::verify(scan, steps),
            Matcher::PageLoad => self.page_load(scan, steps),
            Matcher::Wait => Self::wait(scan, steps),
            Matcher::Select => Self::select(scan, steps),
            Matcher::Screenshot => Self::screenshot(scan, steps),
        }
    }

    fn navigation(scan: &Scan<'_>, steps: &mut Vec<Step>) {
        let before = steps.len();
        for caps in NAVIGATE.captures_iter(scan.text) {
            let target = if let Some(url) = caps.get(1) {
                url.as_str().trim_end_matches(['.', '!', '?', ')']).to_string()
            } else {
                match caps.get(2).map(|m| m.as_str()) {
                    Some("home" | "main" | "landing") => "/".to_string(),
                    Some(name) => format!("/{name}"),
                    None => continue,
                }
            };
            steps.push(Step::navigate(resolve_url(scan.base_url, &target)));
        }

        if steps.len() == before {
            if let Some(base) = scan.base_url {
                steps.push(Step::navigate(base));
            }
        }
    }

    fn login(&self, scan: &Scan<'_>, steps: &mut Vec<Step>) {
        if !scan.login {
            return;
        }
        let email = EMAIL
            .find(scan.text)
            .map_or_else(|| self.credentials.email.clone(), |m| m.as_str().to_string());
        let password = PASSWORD_QUOTED
            .captures(scan.text)
            .or_else(|| PASSWORD_ASSIGNED.captures(scan.text))
            .and_then(|c| c.get(1))
            .map_or_else(|| self.credentials.password.clone(), |m| m.as_str().to_string());

        steps.push(
            Step::new(Action::Fill)
                .with_selector(EMAIL_SELECTOR)
                .with_value(email)
                .with_description("Fill email"),
        );
        steps.push(
            Step::new(Action::Fill)
                .with_selector(PASSWORD_SELECTOR)
                .with_value(password)
                .with_description("Fill password"),
        );
        steps.push(
            Step::new(Action::Click)
                .with_selector(LOGIN_BUTTON_SELECTOR)
                .with_description("Click login button"),
        );
    }

    fn click(scan: &Scan<'_>, steps: &mut Vec<Step>) {
        for caps in CLICK.captures_iter(scan.text) {
            let Some(target) = first_group(&caps, &[1, 2, 3]) else {
                continue;
            };
            if scan.login && is_login_target(target) {
                continue;
            }
            steps.push(
                Step::new(Action::Click)
                    .with_selector(click_selector(target))
                    .with_description(format!("Click {target}")),
            );
        }
    }

    fn fill(scan: &Scan<'_>, steps: &mut Vec<Step>) {
        let mut found: Vec<(usize, Step)> = Vec::new();

        for caps in FILL_INTO.captures_iter(scan.text) {
            let (Some(verb), Some(value), Some(field)) = (
                caps.get(1).map(|m| m.as_str()),
                caps.get(2).map(|m| m.as_str()),
                first_group(&caps, &[3, 4, 5]),
            ) else {
                continue;
            };
            let action = if verb == "type" { Action::Type } else { Action::Fill };
            found.push((start(&caps), fill_step(action, field, value)));
        }

        for caps in FILL_WITH.captures_iter(scan.text) {
            let (Some(field), Some(value)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            found.push((
                start(&caps),
                fill_step(Action::Fill, field.as_str().trim(), value.as_str()),
            ));
        }

        found.sort_by_key(|(pos, _)| *pos);
        for (_, step) in found {
            let field = step.description.as_deref().unwrap_or_default();
            if scan.login && is_credential_field(field) {
                continue;
            }
            steps.push(step);
        }
    }

    fn verify(scan: &Scan<'_>, steps: &mut Vec<Step>) {
        let mut found: Vec<(usize, String)> = VERIFY_QUOTED
            .captures_iter(scan.text)
            .chain(VERIFY_VISIBLE.captures_iter(scan.text))
            .filter_map(|c| c.get(1).map(|m| (start(&c), m.as_str().trim().to_string())))
            .collect();
        found.sort_by_key(|(pos, _)| *pos);

        for (_, text) in found {
            steps.push(
                Step::new(Action::AssertText)
                    .with_selector("body")
                    .with_description(format!("Verify \"{text}\" is visible"))
                    .with_value(text),
            );
        }
    }

    fn page_load(&self, scan: &Scan<'_>, steps: &mut Vec<Step>) {
        for caps in PAGE_LOAD.captures_iter(scan.text) {
            let noun = caps.get(1).map_or("page", |m| m.as_str());
            steps.push(self.page_load_wait(noun));
            steps.push(Step::screenshot(format!("Capture {noun} page")));
        }
    }

    fn wait(scan: &Scan<'_>, steps: &mut Vec<Step>) {
        for caps in WAIT.captures_iter(scan.text) {
            let (Some(amount), Some(unit)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            let Ok(amount) = amount.as_str().parse::<f64>() else {
                continue;
            };
            let ms = if unit.as_str().starts_with('m') {
                amount
            } else {
                amount * 1_000.0
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            steps.push(Step::wait_ms(ms.round() as u64));
        }
    }

    fn select(scan: &Scan<'_>, steps: &mut Vec<Step>) {
        for caps in SELECT.captures_iter(scan.text) {
            let (Some(option), Some(field)) = (caps.get(1), first_group(&caps, &[2, 3, 4])) else {
                continue;
            };
            let slug = slugify(field);
            steps.push(
                Step::new(Action::Select)
                    .with_selector(format!(
                        r#"select[name="{slug}"], [data-testid="{slug}"], #{slug}"#
                    ))
                    .with_value(option.as_str())
                    .with_description(format!("Select \"{}\" from {field}", option.as_str())),
            );
        }
    }

    fn screenshot(scan: &Scan<'_>, steps: &mut Vec<Step>) {
        if SCREENSHOT.is_match(scan.text) {
            steps.push(Step::screenshot("Take screenshot"));
        }
    }

    fn page_load_wait(&self, noun: &str) -> Step {
        Step::wait_ms(self.page_load_wait_ms).with_description(format!("Wait for {noun} to load"))
    }
}

/// Interpret with default settings
#[must_use]
pub fn interpret(description: &str, base_url: Option<&str>) -> Vec<Step> {
    PatternInterpreter::new().interpret(description, base_url)
}

fn start(caps: &Captures<'_>) -> usize {
    caps.get(0).map_or(0, |m| m.start())
}

fn first_group<'t>(caps: &Captures<'t>, groups: &[usize]) -> Option<&'t str> {
    groups
        .iter()
        .find_map(|&g| caps.get(g))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

fn resolve_url(base: Option<&str>, target: &str) -> String {
    match base {
        Some(base) if target.starts_with('/') => {
            format!("{}{target}", base.trim_end_matches('/'))
        }
        _ => target.to_string(),
    }
}

fn is_login_target(target: &str) -> bool {
    ["login", "log in", "sign in", "signin", "submit"]
        .iter()
        .any(|k| target.contains(k))
}

fn is_credential_field(field: &str) -> bool {
    ["email", "password", "username", "user name"]
        .iter()
        .any(|k| field.contains(k))
}

fn click_selector(text: &str) -> String {
    format!(
        r#"button:has-text("{text}"), a:has-text("{text}"), [role="button"]:has-text("{text}"), text="{text}""#
    )
}

fn fill_step(action: Action, field: &str, value: &str) -> Step {
    let slug = slugify(field);
    let description = match action {
        Action::Type => format!("Type into {field}"),
        _ => format!("Fill {field}"),
    };
    Step::new(action)
        .with_selector(format!(
            r#"[data-testid="{slug}"], [name="{slug}"], [placeholder*="{field}" i], #{slug}"#
        ))
        .with_value(value)
        .with_description(description)
}

/// Lower-case, collapse non-alphanumerics to single dashes
pub(crate) fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
