//! QAE Step Model
//!
//! The canonical structured representation of browser-test actions.
//!
//! # Core Concepts
//!
//! - [`Action`]: Closed vocabulary of browser actions
//! - [`Step`]: One atomic action with optional selector/value
//! - [`TestCase`]: A stored test owning an ordered step sequence
//! - [`ParsedResult`]: Steps plus confidence from one interpretation pass
//! - [`CodeRenderer`]: Projection of steps into framework source
//!
//! # Invariant
//!
//! At every observation point `steps[i].order == i` and ids are pairwise
//! distinct. Use [`renumber`] after any structural change and
//! [`validate_sequence`] to check.
//!
//! # Example
//!
//! ```rust
//! use qae_step::{renumber, validate_sequence, Action, Step};
//!
//! let mut steps = vec![
//!     Step::navigate("/login"),
//!     Step::new(Action::Click).with_selector("#submit"),
//! ];
//! renumber(&mut steps);
//! assert!(validate_sequence(&steps).is_ok());
//! assert_eq!(steps[1].id, "step-2");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod action;
mod error;
mod render;
mod sequence;
mod step;

// Re-exports
pub use action::Action;
pub use error::{StepError, StepResult};
pub use render::{CodeRenderer, PlaywrightRenderer};
pub use sequence::{estimate_duration_ms, renumber, reorder, step_id, validate_sequence};
pub use step::{ParsedResult, RunStatus, Step, TestCase, TestType};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with steps
    pub use crate::{
        renumber, validate_sequence, Action, ParsedResult, Step, StepError, TestCase, TestType,
    };
}
