//! Test repository
//!
//! The engine never holds stored tests itself. Callers that persist tests
//! inject a [`TestRepository`]; [`InMemoryTestRepository`] is the
//! process-local implementation used by the CLI and in tests.

use crate::error::RepositoryError;
use indexmap::IndexMap;
use parking_lot::RwLock;
use qae_step::TestCase;

/// Storage capability for tests
///
/// Implementations serialize writers per test; readers always observe a
/// whole test, never a partially updated one.
pub trait TestRepository: Send + Sync {
    /// Fetch one test
    fn get(&self, id: &str) -> Result<TestCase, RepositoryError>;

    /// All tests in insertion order
    fn list(&self) -> Vec<TestCase>;

    /// Store a new test
    fn create(&self, test: TestCase) -> Result<(), RepositoryError>;

    /// Replace an existing test
    fn update(&self, test: TestCase) -> Result<(), RepositoryError>;

    /// Remove a test, returning it
    fn delete(&self, id: &str) -> Result<TestCase, RepositoryError>;
}

/// Test repository backed by an insertion-ordered map
#[derive(Debug, Default)]
pub struct InMemoryTestRepository {
    tests: RwLock<IndexMap<String, TestCase>>,
}

impl InMemoryTestRepository {
    /// Create empty repository
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create repository holding `tests`; later duplicates replace earlier ones
    #[must_use]
    pub fn with_tests(tests: impl IntoIterator<Item = TestCase>) -> Self {
        let tests = tests.into_iter().map(|t| (t.id.clone(), t)).collect();
        Self {
            tests: RwLock::new(tests),
        }
    }

    /// Number of stored tests
    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.read().len()
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.read().is_empty()
    }
}

impl TestRepository for InMemoryTestRepository {
    fn get(&self, id: &str) -> Result<TestCase, RepositoryError> {
        self.tests
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found(id))
    }

    fn list(&self) -> Vec<TestCase> {
        self.tests.read().values().cloned().collect()
    }

    fn create(&self, test: TestCase) -> Result<(), RepositoryError> {
        let mut tests = self.tests.write();
        if tests.contains_key(&test.id) {
            return Err(RepositoryError::already_exists(test.id));
        }
        tests.insert(test.id.clone(), test);
        Ok(())
    }

    fn update(&self, test: TestCase) -> Result<(), RepositoryError> {
        let mut tests = self.tests.write();
        match tests.get_mut(&test.id) {
            Some(slot) => {
                *slot = test;
                Ok(())
            }
            None => Err(RepositoryError::not_found(test.id)),
        }
    }

    fn delete(&self, id: &str) -> Result<TestCase, RepositoryError> {
        self.tests
            .write()
            .shift_remove(id)
            .ok_or_else(|| RepositoryError::not_found(id))
    }
}
