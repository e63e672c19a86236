use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

/// Filesystem storage. Relative paths resolve against `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = self.base_path.join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.base_path.join(path);

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("nested/out.csv", b"a,b\n").unwrap();

        assert!(dir.path().join("nested/out.csv").exists());
        assert_eq!(storage.read_file("nested/out.csv").unwrap(), b"a,b\n");
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(matches!(
            storage.read_file("missing.csv"),
            Err(crate::utils::error::SeatingError::IoError(_))
        ));
    }
}
