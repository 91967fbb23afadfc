//! QAE Analysis
//!
//! Read-only analyses over single descriptions and whole test corpora.
//!
//! # Core Concepts
//!
//! - [`suggest_variations`]: Keyword-vote intent plus a fixed variation catalog
//! - [`analyze`]: Coverage gaps in a fixed synthesis order, with a 0-100 score
//! - [`detect`]: Brittle locators with replacement strategies
//!
//! # Example
//!
//! ```rust
//! use qae_analysis::{analyze, classify, TestIntent};
//! use qae_step::{Step, TestCase};
//!
//! assert_eq!(classify("Login with valid credentials"), TestIntent::Login);
//!
//! let corpus = vec![TestCase::new("t1", "Home").with_steps(vec![Step::navigate("/")])];
//! let report = analyze(&corpus, &[], &[]);
//! assert!(report.gaps.iter().any(|g| g.title == "No Security Tests"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod coverage;
mod fragility;
mod variations;

// Re-exports
pub use coverage::{
    analyze, CoverageGap, CoverageReport, CoverageStats, GapKind, Severity, COMMON_PAGES,
};
pub use fragility::{detect, FixStrategy, FragilityOptions, FragilitySuggestion};
pub use variations::{
    classify, generate, suggest_variations, Difficulty, Priority, TestIntent, VariationCategory,
    VariationOptions, VariationSuggestion,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for corpus analysis
    pub use crate::{
        analyze, detect, suggest_variations, CoverageReport, FragilityOptions, FragilitySuggestion,
        VariationOptions, VariationSuggestion,
    };
}
