//! Test utilities for the Taxonomist workspace
//!
//! Common helpers, fixtures and doubles shared by the crates' tests.
//!
//! # Features
//!
//! - **Fake publishing API**: an in-memory link graph implementing
//!   `PublishingApi`, with call recording and injectable failures
//! - **Fixtures**: well-known content ids and a small sample taxonomy
//! - **Test Environment**: temporary directories for the version database

pub mod environment;
pub mod fixtures;
pub mod mock;

// Re-export commonly used items
pub use environment::TestEnvironment;
pub use fixtures::{taxon, taxon_item, TaxonomyFixture};
pub use mock::{FakePublishingApi, InjectedFailure, Operation};

pub use anyhow::{Context, Result};
pub use tempfile;

/// Initialize test logging (safe to call from every test)
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Run a test with a clean environment
///
/// # Example
/// ```rust
/// use taxonomist_test::with_test_env;
///
/// with_test_env(|env| {
///     assert!(env.root().exists());
///     Ok(())
/// })
/// .unwrap();
/// ```
pub fn with_test_env<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&TestEnvironment) -> Result<R>,
{
    let env = TestEnvironment::new()?;
    f(&env)
}
