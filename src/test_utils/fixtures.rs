use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Isolated directory tree for building fake repository snapshots and
/// install destinations.
pub struct SnapshotFixture {
    pub temp_dir: TempDir,
}

impl Default for SnapshotFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        println!("[FIXTURE] Created temp directory: {:?}", temp_dir.path());
        Self { temp_dir }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a file (and its parents) with content.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.root().join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }
}

impl Drop for SnapshotFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.root());
    }
}
