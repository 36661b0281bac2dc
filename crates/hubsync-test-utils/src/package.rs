//! [`TestPackage`] builder for sync scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the package directory created inside the workspace.
pub const PACKAGE_NAME: &str = "package";

/// A temporary workspace holding one package with `apps/` and `drivers/`.
///
/// # Example
///
/// ```rust,no_run
/// use hubsync_test_utils::TestPackage;
///
/// let pkg = TestPackage::new();
/// pkg.write_app("Manager", "definition(name: 'Manager')");
/// pkg.assert_app_contains("Manager", "definition");
/// ```
pub struct TestPackage {
    temp_dir: TempDir,
}

impl Default for TestPackage {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPackage {
    /// Create a workspace with empty `apps/` and `drivers/` buckets.
    pub fn new() -> Self {
        let pkg = Self::bare();
        fs::create_dir_all(pkg.root().join("apps")).unwrap();
        fs::create_dir_all(pkg.root().join("drivers")).unwrap();
        pkg
    }

    /// Create a workspace with an empty package directory and no buckets.
    pub fn bare() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join(PACKAGE_NAME)).unwrap();
        Self { temp_dir }
    }

    /// Directory containing the package.
    pub fn workspace(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The package directory itself.
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join(PACKAGE_NAME)
    }

    /// Write `apps/<name>.groovy`.
    pub fn write_app(&self, name: &str, source: &str) -> PathBuf {
        self.write(&format!("apps/{name}.groovy"), source)
    }

    /// Write `drivers/<name>.groovy`.
    pub fn write_driver(&self, name: &str, source: &str) -> PathBuf {
        self.write(&format!("drivers/{name}.groovy"), source)
    }

    /// Write `relative` under the package root, creating parents.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Create an empty directory under the package root.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Read a file under the package root.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        let path = self.root().join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Could not read {}: {}", path.display(), e))
    }

    pub fn read_app(&self, name: &str) -> String {
        self.read(&format!("apps/{name}.groovy"))
    }

    pub fn read_driver(&self, name: &str) -> String {
        self.read(&format!("drivers/{name}.groovy"))
    }

    /// Assert that `apps/<name>.groovy` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_app_contains(&self, name: &str, content: &str) {
        let file_content = self.read_app(name);
        assert!(
            file_content.contains(content),
            "Expected app {} to contain '{}', got:\n{}",
            name,
            content,
            file_content
        );
    }

    /// Assert that `relative` does **not** exist under the package root.
    pub fn assert_not_exists(&self, relative: &str) {
        let path = self.root().join(relative);
        assert!(
            !path.exists(),
            "Expected file NOT to exist: {}",
            path.display()
        );
    }
}
