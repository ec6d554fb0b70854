//! File-backed session transport
//!
//! Each session is stored as `<dir>/<id>.json`. Writes go through a temp file
//! and a rename so a crashed invocation never leaves a half-written session.

use crate::error::{SatchelError, SatchelResult};
use crate::session::map::SessionMap;
use crate::session::transport::{is_valid_session_id, new_session_id, SessionTransport};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// Session record as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session id, also the file stem
    pub id: String,

    /// When the session was started
    pub created_at: DateTime<Utc>,

    /// When the map was last written
    pub updated_at: DateTime<Utc>,

    /// The session map
    pub data: SessionMap,
}

#[derive(Serialize)]
struct RecordRef<'a> {
    id: &'a str,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    data: &'a SessionMap,
}

/// Transport storing one JSON file per session
#[derive(Debug)]
pub struct FileTransport {
    dir: PathBuf,
    cookie: Option<String>,
    id: Option<String>,
    created_at: Option<DateTime<Utc>>,
}

impl FileTransport {
    /// Create a transport over `dir`, presenting `cookie` as the client's id
    pub fn new(dir: PathBuf, cookie: Option<String>) -> Self {
        Self {
            dir,
            cookie,
            id: None,
            created_at: None,
        }
    }

    /// Path of the record for `id`
    pub fn record_path(dir: &Path, id: &str) -> PathBuf {
        dir.join(format!("{}.json", id))
    }

    /// Load a single record, `None` when no file exists for `id`
    pub async fn load_record(dir: &Path, id: &str) -> SatchelResult<Option<SessionRecord>> {
        let path = Self::record_path(dir, id);

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| SatchelError::io(format!("reading session file {}", path.display()), e))?;

        let record = serde_json::from_str(&content).map_err(|e| SatchelError::SessionCorrupt {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        Ok(Some(record))
    }

    /// List all stored sessions, newest first. Unreadable files are skipped.
    pub async fn list_records(dir: &Path) -> SatchelResult<Vec<SessionRecord>> {
        if !dir.exists() {
            return Ok(vec![]);
        }

        let mut records = vec![];
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| SatchelError::io("reading sessions directory", e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SatchelError::io("reading session entry", e))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = fs::read_to_string(&path).await.ok();
                if let Some(content) = content {
                    match serde_json::from_str::<SessionRecord>(&content) {
                        Ok(record) => records.push(record),
                        Err(e) => warn!("Skipping unreadable session file {}: {}", path.display(), e),
                    }
                }
            }
        }

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(records)
    }

    async fn write_record(&self, id: &str, data: &SessionMap) -> SatchelResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| SatchelError::io("creating sessions directory", e))?;

        let now = Utc::now();
        let record = RecordRef {
            id,
            created_at: self.created_at.unwrap_or(now),
            updated_at: now,
            data,
        };
        let json = serde_json::to_string_pretty(&record)?;

        let path = Self::record_path(&self.dir, id);
        let temp_path = self.dir.join(format!("{}.tmp", Uuid::new_v4()));
        fs::write(&temp_path, json)
            .await
            .map_err(|e| SatchelError::SessionPersist {
                id: id.to_string(),
                reason: e.to_string(),
            })?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| SatchelError::SessionPersist {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Session saved to disk: {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl SessionTransport for FileTransport {
    async fn start(&mut self) -> SatchelResult<SessionMap> {
        let presented = self
            .id
            .take()
            .or_else(|| self.cookie.take())
            .filter(|id| is_valid_session_id(id));

        if let Some(id) = presented {
            if let Some(record) = Self::load_record(&self.dir, &id).await? {
                debug!("Resumed session {} from disk", id);
                self.id = Some(record.id);
                self.created_at = Some(record.created_at);
                return Ok(record.data);
            }
            debug!("No stored session {}, starting a new session", id);
        }

        // Nothing touches disk until the first persist
        let id = new_session_id();
        self.created_at = Some(Utc::now());
        debug!("Started session {}", id);
        self.id = Some(id);
        Ok(SessionMap::new())
    }

    fn current_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    async fn persist(&mut self, data: &SessionMap) -> SatchelResult<()> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| SatchelError::Internal("persist called before start".to_string()))?;

        self.write_record(id, data).await
    }

    async fn destroy(&mut self) -> SatchelResult<()> {
        if let Some(id) = self.id.take() {
            let path = Self::record_path(&self.dir, &id);
            if path.exists() {
                fs::remove_file(&path).await.map_err(|e| {
                    SatchelError::io(format!("deleting session file {}", path.display()), e)
                })?;
            }
            debug!("Destroyed session {}", id);
        }
        self.created_at = None;
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "file"
    }
}
