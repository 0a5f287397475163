//! Test environment management
//!
//! Provides isolated temporary directories with automatic cleanup using RAII.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use taxonomist_core::Config;
use tempfile::TempDir;

/// Isolated test environment; the directory is removed on drop
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix("taxonomist-test-")
            .tempdir()
            .context("Failed to create test directory")?;
        Ok(Self { temp_dir })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn versions_db_path(&self) -> PathBuf {
        self.root().join("versions.db")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("config.toml")
    }

    /// Default configuration pointing the version log into this environment
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.versions.database_path = Some(self.versions_db_path());
        config
    }

    /// Configuration for a publishing API served at `url`
    pub fn config_for_api(&self, url: &str) -> Config {
        let mut config = self.config();
        config.publishing_api.url = url.to_string();
        config.publishing_api.bearer_token = "test-token".to_string();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleans_up() {
        let root = {
            let env = TestEnvironment::new().unwrap();
            assert!(env.root().exists());
            assert_eq!(env.config().versions_database_path(), env.versions_db_path());
            env.root().to_path_buf()
        };
        assert!(!root.exists());
    }
}
