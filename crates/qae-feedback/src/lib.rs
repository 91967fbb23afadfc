//! QAE Feedback
//!
//! Compiles free-text reviewer feedback into typed rules and applies them to
//! step sequences and rendered code.
//!
//! # Core Concepts
//!
//! - [`FeedbackRule`]: One compiled line of feedback plus its `applied` flag
//! - [`compile`]: Ordered recognizer; unmatched lines are dropped
//! - [`apply_to_steps`]: Structural transform that always renumbers
//! - [`apply_to_code`]: Sequential literal find-and-replace
//!
//! # Example
//!
//! ```rust
//! use qae_feedback::{apply_to_steps, compile, ApplySummary};
//! use qae_step::{Action, Step};
//!
//! let steps = vec![Step::navigate("/"), Step::new(Action::Click)];
//! let mut rules = compile(&["Add a screenshot step", "thanks!"]);
//! let refined = apply_to_steps(&steps, &mut rules);
//!
//! assert_eq!(refined.len(), 3);
//! assert_eq!(ApplySummary::of(&rules).to_string(), "1 of 1 applied");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod applier;
mod compiler;
mod rule;

// Re-exports
pub use applier::{apply_to_code, apply_to_steps, ApplySummary};
pub use compiler::{compile, compile_text};
pub use rule::{
    AddTarget, FeedbackRule, RuleKind, SelectorPreference, ASSERTION_PLACEHOLDER,
    DEFAULT_FEEDBACK_WAIT_MS,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for feedback handling
    pub use crate::{apply_to_code, apply_to_steps, compile, ApplySummary, FeedbackRule, RuleKind};
}
