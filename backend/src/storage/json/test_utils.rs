//! Test utilities module for automatic cleanup and consistent test infrastructure
//!
//! The temporary data directory is removed when the environment is dropped,
//! even if the test panics.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use anyhow::Result;

use super::activity_repository::ActivityRepository;
use super::connection::FileDocumentStore;
use super::global_config_repository::GlobalConfigRepository;
use super::kid_repository::KidRepository;
use crate::storage::traits::DocumentStore;

/// RAII test environment backed by a temporary directory
pub struct TestEnvironment {
    /// Kept alive so the directory is not removed until drop
    _temp_dir: TempDir,
    pub store: FileDocumentStore,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let store = FileDocumentStore::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            store,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }

    /// The file store as a shareable trait object
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::new(self.store.clone())
    }
}

/// All repositories over one test environment
pub struct RepositoryTestHelper {
    pub env: TestEnvironment,
    pub activity_repo: ActivityRepository,
    pub kid_repo: KidRepository,
    pub global_config_repo: GlobalConfigRepository,
}

impl RepositoryTestHelper {
    pub async fn new() -> Result<Self> {
        let env = TestEnvironment::new().await?;
        let store = env.store();

        Ok(RepositoryTestHelper {
            activity_repo: ActivityRepository::new(store.clone()),
            kid_repo: KidRepository::new(store.clone()),
            global_config_repo: GlobalConfigRepository::new(store),
            env,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::{ActivityStorage, KidStorage};

    #[tokio::test]
    async fn test_repositories_share_one_directory() {
        let helper = RepositoryTestHelper::new().await.unwrap();
        assert!(helper.activity_repo.get_all().await.is_empty());
        assert!(helper.kid_repo.get_all().await.is_empty());
        assert!(helper.env.base_directory().is_dir());
    }

    #[tokio::test]
    async fn test_cleanup_on_drop() {
        let path = {
            let env = TestEnvironment::new().await.unwrap();
            env.base_directory().to_path_buf()
        };
        assert!(!path.exists());
    }
}
