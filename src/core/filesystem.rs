use tracing::warn;

use crate::config::{CONFIG_CONTENT, CONFIG_FILE, SEED_FILES};
use crate::core::error::{Result, SessionError};
use crate::models::{FileSummary, VirtualFile};

/// In-memory workspace backing a single session.
///
/// Files live in a flat namespace keyed by name and are listed in insertion
/// order. Directory names are opaque labels created by `mkdir`; they are
/// listed alongside files but never hold anything.
///
/// # Invariants
///
/// - At least one file exists once the store is seeded.
/// - A protected file rejects every write and delete.
#[derive(Clone, Debug, Default)]
pub struct VirtualFs {
    files: Vec<VirtualFile>,
    directories: Vec<String>,
}

impl VirtualFs {
    /// Create an empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create the store every new session starts with.
    pub fn seeded() -> Self {
        let mut files: Vec<VirtualFile> = SEED_FILES
            .iter()
            .map(|(name, content)| VirtualFile::new(*name, *content))
            .collect();
        files.push(VirtualFile::protected(CONFIG_FILE, CONFIG_CONTENT));

        Self {
            files,
            directories: Vec::new(),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&VirtualFile> {
        self.files.iter().find(|f| f.name() == name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Sum of all file sizes in characters.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size()).sum()
    }

    /// Create a new writable file. Existing names are rejected.
    pub fn create(&mut self, name: &str, content: &str) -> Result<&VirtualFile> {
        self.insert(VirtualFile::new(name, content))
    }

    /// Create a new protected file. Existing names are rejected.
    pub fn create_protected(&mut self, name: &str, content: &str) -> Result<&VirtualFile> {
        self.insert(VirtualFile::protected(name, content))
    }

    fn insert(&mut self, file: VirtualFile) -> Result<&VirtualFile> {
        validate_name(file.name())?;
        if self.exists(file.name()) {
            return Err(SessionError::DuplicateName(file.name().to_string()));
        }
        self.files.push(file);
        let last = self.files.len() - 1;
        Ok(&self.files[last])
    }

    /// Replace the content of an existing file.
    pub fn write(&mut self, name: &str, content: &str) -> Result<()> {
        let file = self
            .files
            .iter_mut()
            .find(|f| f.name() == name)
            .ok_or_else(|| SessionError::file_not_found(name))?;

        if file.is_protected() {
            warn!(file = name, "rejected write to protected file");
            return Err(SessionError::ProtectedFile(name.to_string()));
        }

        file.set_content(content);
        Ok(())
    }

    /// Write the file if it exists, create it otherwise.
    pub fn upsert(&mut self, name: &str, content: &str) -> Result<()> {
        if self.exists(name) {
            self.write(name, content)
        } else {
            self.create(name, content).map(|_| ())
        }
    }

    pub fn read(&self, name: &str) -> Result<&str> {
        self.get(name)
            .map(|f| f.content())
            .ok_or_else(|| SessionError::file_not_found(name))
    }

    /// Check whether `delete` would succeed without performing it.
    pub fn check_delete(&self, name: &str) -> Result<()> {
        let Some(file) = self.get(name) else {
            return Ok(());
        };
        if file.is_protected() {
            return Err(SessionError::ProtectedFile(name.to_string()));
        }
        if self.files.len() == 1 {
            return Err(SessionError::InvalidOperation(format!(
                "cannot delete '{}': at least one file must remain",
                name
            )));
        }
        Ok(())
    }

    /// Delete a file. Deleting an absent file is a no-op.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if let Err(e) = self.check_delete(name) {
            warn!(file = name, error = %e, "rejected delete");
            return Err(e);
        }
        if let Some(idx) = self.position(name) {
            self.files.remove(idx);
        }
        Ok(())
    }

    /// Summaries of all files in insertion order.
    pub fn list(&self) -> Vec<FileSummary> {
        self.files.iter().map(VirtualFile::summary).collect()
    }

    /// File names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name())
    }

    // =========================================================================
    // Directories
    // =========================================================================

    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    pub fn has_directory(&self, name: &str) -> bool {
        self.directories.iter().any(|d| d == name)
    }

    pub fn mkdir(&mut self, name: &str) -> Result<()> {
        validate_name(name)?;
        if self.has_directory(name) || self.exists(name) {
            return Err(SessionError::DuplicateName(name.to_string()));
        }
        self.directories.push(name.to_string());
        Ok(())
    }

    pub fn rmdir(&mut self, name: &str) -> Result<()> {
        let idx = self
            .directories
            .iter()
            .position(|d| d == name)
            .ok_or(SessionError::NotFound {
                kind: "directory",
                name: name.to_string(),
            })?;
        self.directories.remove(idx);
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SessionError::InvalidOperation(
            "file name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_file_fs() -> VirtualFs {
        let mut fs = VirtualFs::empty();
        fs.create("a.py", "print('a')").unwrap();
        fs
    }

    #[test]
    fn test_seeded_contains_protected_config() {
        let fs = VirtualFs::seeded();
        let config = fs.get(CONFIG_FILE).unwrap();
        assert!(config.is_protected());
        assert!(fs.exists("main.py"));
        assert_eq!(fs.len(), SEED_FILES.len() + 1);
    }

    #[test]
    fn test_create_rejects_duplicates() {
        let mut fs = single_file_fs();
        assert_eq!(
            fs.create("a.py", "other").unwrap_err(),
            SessionError::DuplicateName("a.py".to_string())
        );
        assert_eq!(fs.read("a.py").unwrap(), "print('a')");
    }

    #[test]
    fn test_create_rejects_empty_name() {
        let mut fs = VirtualFs::empty();
        assert!(matches!(
            fs.create("  ", ""),
            Err(SessionError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_write_updates_size() {
        let mut fs = single_file_fs();
        fs.write("a.py", "x = 1\ny = 2\n").unwrap();
        let file = fs.get("a.py").unwrap();
        assert_eq!(file.size(), 12);

        fs.write("a.py", "# données\n").unwrap();
        assert_eq!(fs.get("a.py").unwrap().size(), 10);
    }

    #[test]
    fn test_write_missing_file() {
        let mut fs = single_file_fs();
        assert_eq!(
            fs.write("b.py", "").unwrap_err(),
            SessionError::file_not_found("b.py")
        );
    }

    #[test]
    fn test_protected_rejects_write_and_delete() {
        let mut fs = VirtualFs::seeded();
        for content in ["", "{}", "anything at all"] {
            assert_eq!(
                fs.write(CONFIG_FILE, content).unwrap_err(),
                SessionError::ProtectedFile(CONFIG_FILE.to_string())
            );
        }
        assert_eq!(
            fs.delete(CONFIG_FILE).unwrap_err(),
            SessionError::ProtectedFile(CONFIG_FILE.to_string())
        );
        assert_eq!(fs.read(CONFIG_FILE).unwrap(), CONFIG_CONTENT);
    }

    #[test]
    fn test_delete_last_file_rejected() {
        let mut fs = single_file_fs();
        assert!(matches!(
            fs.delete("a.py"),
            Err(SessionError::InvalidOperation(_))
        ));
        assert!(fs.exists("a.py"));
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut fs = single_file_fs();
        assert!(fs.delete("ghost.py").is_ok());
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn test_delete_removes_file() {
        let mut fs = single_file_fs();
        fs.create("b.py", "").unwrap();
        fs.delete("a.py").unwrap();
        assert!(!fs.exists("a.py"));
        assert_eq!(fs.len(), 1);
    }

    #[test]
    fn test_list_insertion_order() {
        let mut fs = VirtualFs::empty();
        fs.create("z.py", "").unwrap();
        fs.create("a.py", "").unwrap();
        fs.create("m.txt", "abc").unwrap();
        let names: Vec<_> = fs.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["z.py", "a.py", "m.txt"]);
        assert_eq!(fs.total_size(), 3);
    }

    #[test]
    fn test_upsert() {
        let mut fs = single_file_fs();
        fs.upsert("a.py", "new").unwrap();
        fs.upsert("b.csv", "x,y").unwrap();
        assert_eq!(fs.read("a.py").unwrap(), "new");
        assert_eq!(fs.read("b.csv").unwrap(), "x,y");
    }

    #[test]
    fn test_directories() {
        let mut fs = single_file_fs();
        fs.mkdir("notebooks").unwrap();
        assert!(fs.has_directory("notebooks"));
        assert!(matches!(
            fs.mkdir("notebooks"),
            Err(SessionError::DuplicateName(_))
        ));
        fs.rmdir("notebooks").unwrap();
        assert!(fs.directories().is_empty());
        assert!(matches!(
            fs.rmdir("notebooks"),
            Err(SessionError::NotFound { .. })
        ));
    }
}
