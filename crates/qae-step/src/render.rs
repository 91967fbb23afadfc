//! Code projection
//!
//! Pure, stateless rendering of a step sequence into automation-framework
//! source text. One step renders to exactly one line; steps the target
//! framework cannot express degrade to a comment line.

use crate::action::Action;
use crate::step::Step;

/// Renders steps into framework source
///
/// Implement this trait to add support for another framework.
pub trait CodeRenderer: Send + Sync {
    /// Framework identifier (e.g., "playwright")
    fn framework(&self) -> &'static str;

    /// Render one step as one line (no trailing newline)
    fn render_step(&self, step: &Step) -> String;

    /// Render a whole sequence, one line per step
    fn render_steps(&self, steps: &[Step]) -> String {
        steps
            .iter()
            .map(|s| self.render_step(s))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render a complete test body
    fn render_test(&self, name: &str, steps: &[Step]) -> String;
}

/// Playwright Test (TypeScript) renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaywrightRenderer;

impl PlaywrightRenderer {
    /// Create new renderer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn locator(selector: &str) -> String {
        format!("page.locator('{}').first()", escape(selector))
    }

    fn unsupported(step: &Step, why: &str) -> String {
        format!("// unsupported: {} ({why})", step.action)
    }
}

impl CodeRenderer for PlaywrightRenderer {
    fn framework(&self) -> &'static str {
        "playwright"
    }

    fn render_step(&self, step: &Step) -> String {
        let value = step.value.as_deref().map(escape).unwrap_or_default();
        let selector = step.selector.as_deref();

        match (step.action, selector) {
            (Action::Navigate, _) => match step.value.as_deref() {
                Some(_) => format!("await page.goto('{value}');"),
                None => Self::unsupported(step, "no url"),
            },
            (Action::Wait, _) => {
                let ms = step
                    .value
                    .as_deref()
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(1_000);
                format!("await page.waitForTimeout({ms});")
            }
            (Action::Screenshot, _) => {
                let path = if value.is_empty() {
                    format!("screenshot-{}", step.order + 1)
                } else {
                    value
                };
                format!("await page.screenshot({{ path: '{path}.png' }});")
            }
            (Action::Press, None) => format!("await page.keyboard.press('{value}');"),
            (Action::AssertText, sel) => format!(
                "await expect({}).toContainText('{value}');",
                Self::locator(sel.unwrap_or("body"))
            ),
            (Action::Evaluate, _) if !value.is_empty() => {
                format!("await page.evaluate(() => {{ {value} }});")
            }
            (Action::Evaluate, _) => Self::unsupported(step, "no script"),
            (Action::Download, _) => Self::unsupported(step, "downloads need an event handler"),
            (action, Some(sel)) => {
                let target = Self::locator(sel);
                match action {
                    Action::Click => format!("await {target}.click();"),
                    Action::Fill => format!("await {target}.fill('{value}');"),
                    Action::Type => format!("await {target}.pressSequentially('{value}');"),
                    Action::Select => format!("await {target}.selectOption('{value}');"),
                    Action::Hover => format!("await {target}.hover();"),
                    Action::Check => format!("await {target}.check();"),
                    Action::Uncheck => format!("await {target}.uncheck();"),
                    Action::Focus => format!("await {target}.focus();"),
                    Action::Blur => format!("await {target}.blur();"),
                    Action::Press => format!("await {target}.press('{value}');"),
                    Action::Scroll => format!("await {target}.scrollIntoViewIfNeeded();"),
                    Action::AssertVisible => format!("await expect({target}).toBeVisible();"),
                    Action::Upload => format!("await {target}.setInputFiles('{value}');"),
                    // handled by the arms above
                    Action::Navigate
                    | Action::Wait
                    | Action::Screenshot
                    | Action::AssertText
                    | Action::Evaluate
                    | Action::Download => Self::unsupported(step, "unreachable"),
                }
            }
            (_, None) => Self::unsupported(step, "no selector"),
        }
    }

    fn render_test(&self, name: &str, steps: &[Step]) -> String {
        let mut out = String::from("import { test, expect } from '@playwright/test';\n\n");
        out.push_str(&format!("test('{}', async ({{ page }}) => {{\n", escape(name)));
        for step in steps {
            out.push_str("  ");
            out.push_str(&self.render_step(step));
            out.push('\n');
        }
        out.push_str("});\n");
        out
    }
}

/// Escape for a single-quoted JS string literal on one line
fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::renumber;

    #[test]
    fn renders_one_line_per_step() {
        let mut steps = vec![
            Step::navigate("https://example.com/login"),
            Step::new(Action::Fill)
                .with_selector("#email")
                .with_value("a@b.co"),
            Step::new(Action::Click).with_selector("button[type=\"submit\"]"),
            Step::wait_ms(2000),
            Step::screenshot("done"),
        ];
        renumber(&mut steps);

        let code = PlaywrightRenderer::new().render_steps(&steps);
        let lines: Vec<&str> = code.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "await page.goto('https://example.com/login');");
        assert_eq!(lines[1], "await page.locator('#email').first().fill('a@b.co');");
        assert_eq!(lines[3], "await page.waitForTimeout(2000);");
        assert_eq!(lines[4], "await page.screenshot({ path: 'screenshot-5.png' });");
    }

    #[test]
    fn unsupported_degrades_to_comment() {
        let renderer = PlaywrightRenderer::new();
        let line = renderer.render_step(&Step::new(Action::Click));
        assert!(line.starts_with("// unsupported: click"));

        let line = renderer.render_step(&Step::new(Action::Download).with_selector("a"));
        assert!(line.starts_with("// unsupported: download"));
    }

    #[test]
    fn quotes_are_escaped() {
        let step = Step::new(Action::AssertText).with_value("it's here");
        let line = PlaywrightRenderer::new().render_step(&step);
        assert_eq!(
            line,
            "await expect(page.locator('body').first()).toContainText('it\\'s here');"
        );
    }

    #[test]
    fn line_breaks_stay_on_one_line() {
        let step = Step::new(Action::Fill)
            .with_selector("#bio")
            .with_value("first\r\nsecond");
        let line = PlaywrightRenderer::new().render_step(&step);
        assert_eq!(line.lines().count(), 1);
        assert_eq!(
            line,
            "await page.locator('#bio').first().fill('first\\r\\nsecond');"
        );

        let code = PlaywrightRenderer::new().render_steps(&[step, Step::navigate("/")]);
        assert_eq!(code.lines().count(), 2);
    }

    #[test]
    fn render_test_wraps_body() {
        let out = PlaywrightRenderer::new().render_test("Smoke", &[Step::navigate("/")]);
        assert!(out.contains("test('Smoke', async ({ page }) => {"));
        assert!(out.contains("  await page.goto('/');"));
        assert!(out.trim_end().ends_with("});"));
    }
}
