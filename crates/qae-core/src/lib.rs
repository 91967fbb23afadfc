//! QAE Core - Authoring Engine
//!
//! The facade callers use:
//! - Interprets free-text descriptions into scored step sequences
//! - Refines steps and rendered code from reviewer feedback
//! - Suggests variations, analyzes coverage and flags fragile locators
//! - Loads configuration and abstracts test storage
//!
//! # Example
//!
//! ```rust
//! use qae_core::{AuthoringEngine, EngineConfig};
//!
//! let engine = AuthoringEngine::new(EngineConfig::new());
//!
//! let parsed = engine.parse("Navigate to /login", None);
//! assert_eq!(parsed.steps.len(), 3);
//!
//! let refined = engine.refine(&parsed.steps, &["Remove the screenshot"]);
//! assert_eq!(refined.steps.len(), 2);
//! assert_eq!(refined.summary, "1 of 1 applied");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod engine;
pub mod error;
pub mod repository;

// Re-exports for convenience
pub use config::{EngineConfig, MAX_FRAGILITY_JITTER};
pub use engine::{AuthoringEngine, CodeRefinement, Refinement};
pub use error::{ConfigError, EngineError, EngineResult, RepositoryError};
pub use repository::{InMemoryTestRepository, TestRepository};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the engine
    pub use crate::{
        AuthoringEngine, EngineConfig, EngineError, InMemoryTestRepository, Refinement,
        TestRepository,
    };
    pub use qae_step::{Action, ParsedResult, Step, TestCase};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
