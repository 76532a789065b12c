use crate::core::Storage;
use crate::utils::error::{CatalogError, Result};
use std::path::{Component, Path, PathBuf};

/// Export directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // 匯出檔名只能是輸出目錄底下的相對路徑
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if name.trim().is_empty() || escapes {
            return Err(CatalogError::InvalidConfigValueError {
                field: "output file".to_string(),
                value: name.to_string(),
                reason: "must be a relative path inside the output directory".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path)?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&full_path, data).await?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        storage
            .write_file("exports/institutions.json", b"[]")
            .await
            .unwrap();
        let written = std::fs::read(temp_dir.path().join("exports/institutions.json")).unwrap();
        assert_eq!(written, b"[]");
    }

    #[tokio::test]
    async fn test_write_outside_root_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("out"));

        for name in ["../escape.json", "/tmp/abs.json", ""] {
            assert!(matches!(
                storage.write_file(name, b"{}").await,
                Err(CatalogError::InvalidConfigValueError { .. })
            ));
        }
        assert!(!temp_dir.path().join("escape.json").exists());
    }
}
