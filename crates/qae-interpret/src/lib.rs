//! QAE Interpretation
//!
//! Turns free-text descriptions of user behaviour into step sequences and
//! scores how reproducible the result is.
//!
//! # Core Concepts
//!
//! - [`PatternInterpreter`]: Fixed, ordered grammar of textual matchers
//! - [`Matcher`]: One grammar rule; [`Matcher::PRECEDENCE`] is load-bearing
//! - [`score`]: 20-100 confidence for a sequence and its source text
//! - [`suggest_name`]: Display name for a description
//!
//! # Example
//!
//! ```rust
//! use qae_interpret::{interpret, score};
//! use qae_step::Action;
//!
//! let description = "Navigate to /login";
//! let steps = interpret(description, None);
//! assert_eq!(steps.len(), 3);
//! assert_eq!(steps[0].action, Action::Navigate);
//! assert!(score(description, &steps) >= 50);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod interpreter;
mod naming;
mod scorer;

// Re-exports
pub use interpreter::{
    interpret, Credentials, Matcher, PatternInterpreter, DEFAULT_EMAIL, DEFAULT_PAGE_LOAD_WAIT_MS,
    DEFAULT_PASSWORD,
};
pub use naming::{suggest_name, UNTITLED};
pub use scorer::{score, ConfidenceBreakdown, ACTION_KEYWORDS, MAX_CONFIDENCE, MIN_CONFIDENCE};

use qae_step::ParsedResult;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interpret and score in one pass
#[must_use]
pub fn parse(
    interpreter: &PatternInterpreter,
    description: &str,
    base_url: Option<&str>,
) -> ParsedResult {
    let steps = interpreter.interpret(description, base_url);
    let confidence = score(description, &steps);
    ParsedResult { steps, confidence }
}

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for interpretation
    pub use crate::{interpret, parse, score, suggest_name, Credentials, PatternInterpreter};
}
