//! Session lifecycle audit trail
//!
//! Each event is one JSON object per line in `<state_dir>/audit.log`,
//! flattened next to its timestamp:
//!
//! ```text
//! {"timestamp":"2026-01-01T00:00:00Z","event":"session.closed","session_id":"..."}
//! ```

use crate::config::Config;
use crate::error::{SatchelError, SatchelResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::warn;

/// Something that happened to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum AuditEvent {
    #[serde(rename = "session.created")]
    Created { session_id: String },

    #[serde(rename = "session.expired")]
    Expired {
        session_id: Option<String>,
        /// `None` when `session_start` was missing
        elapsed_minutes: Option<i64>,
        max_lifetime_minutes: u32,
    },

    #[serde(rename = "session.closed")]
    Closed { session_id: Option<String> },
}

impl AuditEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AuditEvent::Created { .. } => "session.created",
            AuditEvent::Expired { .. } => "session.expired",
            AuditEvent::Closed { .. } => "session.closed",
        }
    }
}

/// One line of the audit log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: AuditEvent,
}

/// Appends lifecycle events when `general.audit_log` is on
#[derive(Debug, Clone)]
pub struct AuditLog {
    enabled: bool,
    path: PathBuf,
}

impl AuditLog {
    pub fn new(config: &Config, path: PathBuf) -> Self {
        Self {
            enabled: config.general.audit_log,
            path,
        }
    }

    /// Append `event`. A failed write is logged and dropped.
    pub async fn record(&self, event: AuditEvent) {
        if !self.enabled {
            return;
        }

        let entry = AuditEntry {
            timestamp: Utc::now(),
            event,
        };
        if let Err(e) = self.append(&entry).await {
            warn!("Dropped audit event {}: {}", entry.event.name(), e);
        }
    }

    async fn append(&self, entry: &AuditEntry) -> SatchelResult<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| SatchelError::io("creating audit log directory", e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| SatchelError::io(format!("opening {}", self.path.display()), e))?;

        file.write_all(&line)
            .await
            .map_err(|e| SatchelError::io("appending audit event", e))
    }
}
