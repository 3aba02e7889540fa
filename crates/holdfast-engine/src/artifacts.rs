//! Diagnostic screenshots written when an intent or scenario fails.

use holdfast_common::intent::IntentKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to write artifact: {0}")]
    Io(#[from] std::io::Error),
}

/// Write-only store rooted at one directory.
///
/// Names carry epoch milliseconds. Every name a store issues is strictly
/// later than the previous one, and files are created with `create_new`, so
/// an existing artifact is never overwritten.
#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    last_millis: AtomicU64,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Keep names to one path segment of plain characters.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let mut collapsed = String::with_capacity(cleaned.len());
    for c in cleaned.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }
    let trimmed = collapsed.trim_matches('-');
    if trimmed.is_empty() {
        "artifact".to_string()
    } else {
        trimmed.to_string()
    }
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last_millis: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn next_millis(&self) -> u64 {
        let now = now_millis();
        let previous = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }

    /// `<intent-kind>-error-<epoch-millis>.png`
    pub async fn capture(&self, kind: IntentKind, png: &[u8]) -> Result<PathBuf, ArtifactError> {
        self.write(&format!("{}-error", kind.as_str()), png).await
    }

    /// `<name>-<epoch-millis>.png`, name sanitized to a single path segment.
    pub async fn capture_named(&self, name: &str, png: &[u8]) -> Result<PathBuf, ArtifactError> {
        self.write(&sanitize(name), png).await
    }

    async fn write(&self, prefix: &str, png: &[u8]) -> Result<PathBuf, ArtifactError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        loop {
            let path = self
                .dir
                .join(format!("{}-{}.png", prefix, self.next_millis()));
            let opened = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            match opened {
                Ok(mut file) => {
                    file.write_all(png).await?;
                    file.flush().await?;
                    return Ok(path);
                }
                // Another store (or an earlier run) owns this name; take the next one.
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
