//! Test name suggestions
//!
//! Derives a short display name from a free-text description.

/// Name used when nothing usable is left after trimming
pub const UNTITLED: &str = "Untitled Test";

const MAX_NAME_LEN: usize = 60;

const FILLER_PREFIXES: [&str; 6] = [
    "test that ",
    "verify that ",
    "check that ",
    "ensure that ",
    "make sure that ",
    "make sure ",
];

/// Suggest a Title Case name for a test description
///
/// Uses the first sentence or line, drops leading filler such as
/// "verify that", and cuts at 60 characters on a word boundary.
#[must_use]
pub fn suggest_name(description: &str) -> String {
    let first = description
        .trim()
        .split(['\n', '.', '!', '?'])
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default();

    let lowered = first.to_lowercase();
    let stripped = FILLER_PREFIXES
        .iter()
        .find(|p| lowered.starts_with(*p))
        .and_then(|p| first.get(p.len()..))
        .unwrap_or(first);

    let mut name = String::new();
    for word in stripped.split_whitespace() {
        let word = title_case(word);
        let extra = usize::from(!name.is_empty());
        if name.len() + extra + word.len() > MAX_NAME_LEN {
            break;
        }
        if extra == 1 {
            name.push(' ');
        }
        name.push_str(&word);
    }

    if name.is_empty() {
        UNTITLED.to_string()
    } else {
        name
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_first_sentence() {
        assert_eq!(
            suggest_name("Login with valid credentials. Then check the dashboard."),
            "Login With Valid Credentials"
        );
    }

    #[test]
    fn strips_filler() {
        assert_eq!(
            suggest_name("verify that the cart total updates"),
            "The Cart Total Updates"
        );
    }

    #[test]
    fn truncates_on_word_boundary() {
        let long = "click ".repeat(30);
        let name = suggest_name(&long);
        assert!(name.len() <= MAX_NAME_LEN);
        assert!(name.ends_with("Click"));
    }

    #[test]
    fn empty_is_untitled() {
        assert_eq!(suggest_name("   "), UNTITLED);
        assert_eq!(suggest_name("..."), UNTITLED);
    }
}
