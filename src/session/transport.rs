//! Session transport abstraction
//!
//! A transport identifies the client's session and keeps its map between
//! requests. The store only ever talks to it through this trait, so the
//! backing storage can be swapped without touching key handling.

use crate::error::SatchelResult;
use crate::session::map::SessionMap;
use async_trait::async_trait;
use uuid::Uuid;

/// Longest session id a transport will accept from a client
const MAX_SESSION_ID_LEN: usize = 128;

/// Abstract session transport interface
///
/// Implemented by:
/// - `MemoryTransport`: shared in-process map keyed by session id
/// - `FileTransport`: one JSON file per session id
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Attach to the client's session, or begin a new one when the presented
    /// id is missing, malformed or unknown. Returns the stored map.
    async fn start(&mut self) -> SatchelResult<SessionMap>;

    /// Id of the session started by `start`, if any
    fn current_id(&self) -> Option<&str>;

    /// Write the map back so the next request sees it
    async fn persist(&mut self, data: &SessionMap) -> SatchelResult<()>;

    /// Drop the stored session and forget its id
    async fn destroy(&mut self) -> SatchelResult<()>;

    /// Human-readable transport name for display
    fn transport_name(&self) -> &'static str;
}

/// Generate a fresh session id
pub fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Whether a client-presented id is safe to look up
pub fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
