//! Cookie jar holding the session id between invocations

use crate::error::{SatchelError, SatchelResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Single-entry cookie jar stored as a plain text file
#[derive(Debug, Clone)]
pub struct CookieJar {
    path: PathBuf,
}

impl CookieJar {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session id, if any
    pub async fn load(&self) -> SatchelResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| SatchelError::io(format!("reading cookie jar {}", self.path.display()), e))?;

        let id = content.trim();
        Ok((!id.is_empty()).then(|| id.to_string()))
    }

    /// Remember `id` for the next invocation
    pub async fn store(&self, id: &str) -> SatchelResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SatchelError::io("creating state directory", e))?;
        }

        fs::write(&self.path, format!("{}\n", id))
            .await
            .map_err(|e| SatchelError::io(format!("writing cookie jar {}", self.path.display()), e))?;

        debug!("Stored session cookie {}", id);
        Ok(())
    }

    /// Drop the stored id
    pub async fn forget(&self) -> SatchelResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).await.map_err(|e| {
                SatchelError::io(format!("removing cookie jar {}", self.path.display()), e)
            })?;
            debug!("Forgot session cookie");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_jar_is_empty() {
        let temp = TempDir::new().unwrap();
        let jar = CookieJar::new(temp.path().join("cookie"));

        assert_eq!(jar.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn store_load_forget() {
        let temp = TempDir::new().unwrap();
        let jar = CookieJar::new(temp.path().join("nested").join("cookie"));

        jar.store("abc-123").await.unwrap();
        assert_eq!(jar.load().await.unwrap().as_deref(), Some("abc-123"));

        jar.forget().await.unwrap();
        assert!(!jar.path().exists());
        assert_eq!(jar.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn blank_jar_is_empty() {
        let temp = TempDir::new().unwrap();
        let jar = CookieJar::new(temp.path().join("cookie"));
        tokio::fs::write(jar.path(), "  \n").await.unwrap();

        assert_eq!(jar.load().await.unwrap(), None);
    }
}
