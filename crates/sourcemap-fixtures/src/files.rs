use std::fs;
use std::io;
use std::path::PathBuf;
use tempfile::TempDir;

/// Temporary directory holding maps, bundles and query files for a test.
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn write(&self, name: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a bundle whose trailing comment points at `map_name`.
    pub fn write_bundle(&self, name: &str, code: &str, map_name: &str) -> io::Result<PathBuf> {
        self.write(
            name,
            &format!("{}\n//# sourceMappingURL={}\n", code, map_name),
        )
    }
}
