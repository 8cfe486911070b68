use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

/// Filesystem store for submitted audio recordings.
///
/// Each recording is saved under a fresh uuid-v4 name so locators never
/// collide. The returned locator is the path relative to nothing in
/// particular — callers treat it as opaque.
#[derive(Debug, Clone)]
pub struct AudioStore {
    root: PathBuf,
}

impl AudioStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub async fn init(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    pub async fn save(&self, bytes: &[u8], extension: &str) -> io::Result<String> {
        let file_name = format!("{}.{}", Uuid::new_v4(), normalize_extension(extension));
        let path = self.root.join(&file_name);
        fs::write(&path, bytes).await?;
        Ok(path.to_string_lossy().into_owned())
    }

    pub async fn read(&self, locator: &str) -> io::Result<Vec<u8>> {
        fs::read(Path::new(locator)).await
    }
}

/// Browser recorders mostly upload webm; fall back to that when the client
/// gives us nothing usable.
fn normalize_extension(extension: &str) -> String {
    let cleaned: String = extension
        .trim_start_matches('.')
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();
    if cleaned.is_empty() {
        "webm".to_string()
    } else {
        cleaned.to_lowercase()
    }
}
