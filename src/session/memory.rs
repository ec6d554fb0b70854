//! In-memory session transport
//!
//! A server keeps one `MemoryBackend` for its lifetime and hands each
//! request a `MemoryTransport` carrying the id the client presented.

use crate::error::{SatchelError, SatchelResult};
use crate::session::map::SessionMap;
use crate::session::transport::{is_valid_session_id, new_session_id, SessionTransport};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Server-side session maps keyed by session id
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    sessions: Arc<Mutex<HashMap<String, SessionMap>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport for one request, presenting `cookie` as the client's id
    pub fn transport(&self, cookie: Option<String>) -> MemoryTransport {
        MemoryTransport {
            backend: self.clone(),
            cookie,
            id: None,
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.lock().await.contains_key(id)
    }

    /// Copy of the stored map for `id`
    pub async fn snapshot(&self, id: &str) -> Option<SessionMap> {
        self.sessions.lock().await.get(id).cloned()
    }
}

/// Per-request handle onto a `MemoryBackend`
#[derive(Debug)]
pub struct MemoryTransport {
    backend: MemoryBackend,
    cookie: Option<String>,
    id: Option<String>,
}

#[async_trait]
impl SessionTransport for MemoryTransport {
    async fn start(&mut self) -> SatchelResult<SessionMap> {
        let mut sessions = self.backend.sessions.lock().await;

        let presented = self
            .id
            .take()
            .or_else(|| self.cookie.take())
            .filter(|id| is_valid_session_id(id));

        if let Some(id) = presented {
            if let Some(data) = sessions.get(&id) {
                debug!("Resumed in-memory session {}", id);
                let data = data.clone();
                self.id = Some(id);
                return Ok(data);
            }
            debug!("Unknown session id {}, starting a new session", id);
        }

        let id = new_session_id();
        sessions.insert(id.clone(), SessionMap::new());
        debug!("Started in-memory session {}", id);
        self.id = Some(id);
        Ok(SessionMap::new())
    }

    fn current_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    async fn persist(&mut self, data: &SessionMap) -> SatchelResult<()> {
        let id = self
            .id
            .clone()
            .ok_or_else(|| SatchelError::Internal("persist called before start".to_string()))?;

        self.backend.sessions.lock().await.insert(id, data.clone());
        Ok(())
    }

    async fn destroy(&mut self) -> SatchelResult<()> {
        if let Some(id) = self.id.take() {
            self.backend.sessions.lock().await.remove(&id);
            debug!("Destroyed in-memory session {}", id);
        }
        Ok(())
    }

    fn transport_name(&self) -> &'static str {
        "memory"
    }
}
