//! The session store
//!
//! Wraps one client's session map with dotted-key access and a lifetime
//! sweep. Obtain one through [`RequestScope::session`](super::RequestScope::session)
//! so that each request owns exactly one store.

use crate::audit::{AuditEvent, AuditLog};
use crate::error::{SatchelError, SatchelResult};
use crate::session::map::SessionMap;
use crate::session::path::{KeyOp, NestingPolicy};
use crate::session::transport::SessionTransport;
use crate::session::value::SessionValue;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

/// Key holding the id assigned when the session was started
pub const SESSION_ID_KEY: &str = "session_id";

/// Key holding the timestamp of the session start or last renewal
pub const SESSION_START_KEY: &str = "session_start";

/// Lifecycle of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// Created, transport not started yet
    Uninitialized,
    /// Transport started and map loaded
    Opened,
    /// Renewed by gc at least once since opening
    Active,
    /// Transport destroyed and map emptied
    Closed,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Opened => "opened",
            SessionState::Active => "active",
            SessionState::Closed => "closed",
        }
    }

    /// Whether the transport session is currently started
    pub fn is_open(&self) -> bool {
        matches!(self, SessionState::Opened | SessionState::Active)
    }
}

/// Session store over a single client's session map
///
/// The store is neither `Clone` nor `Deserialize`; a second copy of a live
/// session cannot be made.
///
/// ```compile_fail
/// fn assert_clone<T: Clone>() {}
/// assert_clone::<satchel::session::SessionStore>();
/// ```
///
/// ```compile_fail
/// fn assert_deserialize<T: serde::de::DeserializeOwned>() {}
/// assert_deserialize::<satchel::session::SessionStore>();
/// ```
pub struct SessionStore {
    transport: Box<dyn SessionTransport>,
    data: SessionMap,
    max_lifetime_minutes: u32,
    nesting: NestingPolicy,
    state: SessionState,
    audit: Option<AuditLog>,
}

impl SessionStore {
    /// Lifetime used when the caller does not configure one
    pub const DEFAULT_MAX_LIFETIME_MINUTES: u32 = 1;

    /// Create an unopened store over `transport`
    pub fn new(
        transport: Box<dyn SessionTransport>,
        max_lifetime_minutes: u32,
    ) -> SatchelResult<Self> {
        check_max_lifetime(max_lifetime_minutes)?;
        Ok(Self {
            transport,
            data: SessionMap::new(),
            max_lifetime_minutes,
            nesting: NestingPolicy::default(),
            state: SessionState::Uninitialized,
            audit: None,
        })
    }

    /// Set how dotted keys are resolved for write and destroy
    pub fn with_nesting(mut self, nesting: NestingPolicy) -> Self {
        self.nesting = nesting;
        self
    }

    /// Record lifecycle events in `audit`
    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    pub fn max_lifetime_minutes(&self) -> u32 {
        self.max_lifetime_minutes
    }

    pub(crate) fn set_max_lifetime(&mut self, minutes: u32) -> SatchelResult<()> {
        self.max_lifetime_minutes = check_max_lifetime(minutes)?;
        Ok(())
    }

    pub fn nesting(&self) -> NestingPolicy {
        self.nesting
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.transport_name()
    }

    /// Id the transport currently holds; survives `clear`, unlike `session_id`
    pub fn transport_id(&self) -> Option<&str> {
        self.transport.current_id()
    }

    /// Start or attach to the transport session.
    ///
    /// A store that is already open keeps its in-memory map. If the map is
    /// empty afterwards, `session_id` and `session_start` are written.
    pub async fn open(&mut self) -> SatchelResult<()> {
        if !self.state.is_open() {
            self.data = self.transport.start().await?;
            self.state = SessionState::Opened;
            debug!(
                "Opened {} session with {} key(s)",
                self.transport.transport_name(),
                self.data.len()
            );
        }

        if self.debug().is_empty() {
            let id = self
                .transport
                .current_id()
                .map(str::to_string)
                .ok_or_else(|| {
                    SatchelError::Internal("transport started without a session id".to_string())
                })?;

            self.write(SESSION_ID_KEY, id.clone())?;
            self.write(SESSION_START_KEY, Utc::now())?;

            info!("Registered session {}", id);
            self.audit(AuditEvent::Created { session_id: id }).await;
        }

        Ok(())
    }

    /// Close the session if `session_start` is at least `max_lifetime_minutes`
    /// old, otherwise renew it.
    ///
    /// Returns `true` on both branches. A missing or non-timestamp
    /// `session_start` counts as expired.
    pub async fn gc(&mut self, max_lifetime_minutes: u32) -> SatchelResult<bool> {
        let elapsed = self.elapsed_minutes(Utc::now());
        let expired = elapsed.is_none_or(|minutes| minutes >= i64::from(max_lifetime_minutes));

        if expired {
            let id = self.session_id().map(str::to_string);
            info!(
                "Session expired after {:?} minute(s), limit {}",
                elapsed, max_lifetime_minutes
            );
            self.audit(AuditEvent::Expired {
                session_id: id,
                elapsed_minutes: elapsed,
                max_lifetime_minutes,
            })
            .await;
            self.close().await?;
        } else {
            self.renew()?;
        }

        Ok(true)
    }

    /// Store `value` under `id`.
    ///
    /// Fails with `InvalidArgument` when `id` or `value` is empty. Returns
    /// whether reading `id` back yields a non-empty value, which under the
    /// legacy policy is `false` for three-segment ids.
    pub fn write(&mut self, id: &str, value: impl Into<SessionValue>) -> SatchelResult<bool> {
        if id.is_empty() {
            return Err(SatchelError::invalid_argument(
                "an identifier is required for the value being stored",
            ));
        }

        let value = value.into();
        if value.is_empty() {
            return Err(SatchelError::invalid_argument(format!(
                "a non-empty value is required for '{}'",
                id
            )));
        }

        let path = self.nesting.resolve(KeyOp::Write, id);
        self.data.insert_path(&path, value)?;

        Ok(self.read(id).is_some_and(|v| !v.is_empty()))
    }

    /// Value stored under `id`, or `None` if unset
    pub fn read(&self, id: &str) -> Option<&SessionValue> {
        let path = self.nesting.resolve(KeyOp::Read, id);
        self.data.get_path(&path)
    }

    /// Remove `id`. Returns whether reading it back is absent or empty.
    pub fn destroy(&mut self, id: &str) -> SatchelResult<bool> {
        if id.is_empty() {
            return Err(SatchelError::invalid_argument(
                "an identifier is required for the value being removed",
            ));
        }

        let path = self.nesting.resolve(KeyOp::Destroy, id);
        self.data.remove_path(&path);

        Ok(self.read(id).is_none_or(SessionValue::is_empty))
    }

    /// Remove every key
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Destroy the transport session and empty the map.
    /// Returns whether the map is now empty.
    pub async fn close(&mut self) -> SatchelResult<bool> {
        let id = self.transport.current_id().map(str::to_string);

        self.transport.destroy().await?;
        self.data.clear();
        self.state = SessionState::Closed;

        info!("Closed session {}", id.as_deref().unwrap_or("-"));
        self.audit(AuditEvent::Closed { session_id: id }).await;

        Ok(self.data.is_empty())
    }

    /// Whether `session_id` is set and non-empty
    pub fn is_registered(&self) -> bool {
        self.read(SESSION_ID_KEY).is_some_and(|v| !v.is_empty())
    }

    /// Stored `session_id`
    pub fn session_id(&self) -> Option<&str> {
        self.read(SESSION_ID_KEY).and_then(SessionValue::as_str)
    }

    /// Stored `session_start`, if it holds a timestamp
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.read(SESSION_START_KEY)
            .and_then(SessionValue::as_timestamp)
    }

    /// The whole session map
    pub fn debug(&self) -> &SessionMap {
        &self.data
    }

    /// Write the map back through the transport. Does nothing unless open.
    pub async fn commit(&mut self) -> SatchelResult<()> {
        if !self.state.is_open() {
            return Ok(());
        }

        self.transport.persist(&self.data).await
    }

    fn renew(&mut self) -> SatchelResult<()> {
        self.write(SESSION_START_KEY, Utc::now())?;
        if self.state == SessionState::Opened {
            self.state = SessionState::Active;
        }
        debug!("Renewed session {}", self.session_id().unwrap_or("-"));
        Ok(())
    }

    fn elapsed_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        self.started_at()
            .map(|started| (now - started).num_minutes())
    }

    async fn audit(&self, event: AuditEvent) {
        if let Some(audit) = &self.audit {
            audit.record(event).await;
        }
    }
}

/// Reject a zero lifetime
pub(crate) fn check_max_lifetime(minutes: u32) -> SatchelResult<u32> {
    if minutes == 0 {
        return Err(SatchelError::invalid_argument(
            "the session expiration time must be at least one minute",
        ));
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::memory::MemoryBackend;
    use chrono::Duration;
    use tempfile::TempDir;

    async fn open_store(backend: &MemoryBackend, nesting: NestingPolicy) -> SessionStore {
        let mut store = SessionStore::new(Box::new(backend.transport(None)), 1)
            .unwrap()
            .with_nesting(nesting);
        store.open().await.unwrap();
        store
    }

    #[test]
    fn zero_lifetime_rejected() {
        let backend = MemoryBackend::new();
        let err = SessionStore::new(Box::new(backend.transport(None)), 0).err();
        assert!(matches!(err, Some(SatchelError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn open_registers_fresh_session() {
        let backend = MemoryBackend::new();
        let store = open_store(&backend, NestingPolicy::Legacy).await;

        assert_eq!(store.state(), SessionState::Opened);
        assert!(store.is_registered());
        assert_eq!(store.session_id(), store.transport_id());
        assert!(store.started_at().is_some());
        assert_eq!(store.debug().len(), 2);
    }

    #[tokio::test]
    async fn reopen_keeps_unsaved_writes() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        store.write("cart", "3 items").unwrap();

        store.open().await.unwrap();

        assert_eq!(store.read("cart"), Some(&SessionValue::from("3 items")));
    }

    #[tokio::test]
    async fn write_then_read_top_level() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;

        assert!(store.write("a", "x").unwrap());
        assert_eq!(store.read("a"), Some(&SessionValue::from("x")));
    }

    #[tokio::test]
    async fn write_two_segments_nests_one_level() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;

        assert!(store.write("a.b", "x").unwrap());

        assert_eq!(store.read("a.b"), Some(&SessionValue::from("x")));
        let inner = store.debug().get("a").and_then(SessionValue::as_map).unwrap();
        assert_eq!(inner.get("b"), Some(&SessionValue::from("x")));
    }

    #[tokio::test]
    async fn unset_three_level_read_is_absent() {
        let backend = MemoryBackend::new();
        let store = open_store(&backend, NestingPolicy::Legacy).await;

        assert_eq!(store.read("a.b.c"), None);
    }

    #[tokio::test]
    async fn legacy_three_segment_write_lands_on_literal_key() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;

        let confirmed = store.write("a.b.c", "x").unwrap();

        assert!(!confirmed);
        assert_eq!(store.read("a.b.c"), None);
        assert_eq!(store.debug().get("a.b.c"), Some(&SessionValue::from("x")));
    }

    #[tokio::test]
    async fn uniform_three_segment_write_nests() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Uniform).await;

        assert!(store.write("a.b.c", "x").unwrap());
        assert_eq!(store.read("a.b.c"), Some(&SessionValue::from("x")));
        assert!(store.destroy("a.b.c").unwrap());
        assert_eq!(store.read("a.b.c"), None);
    }

    #[tokio::test]
    async fn empty_id_or_value_rejected() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;

        assert!(matches!(
            store.write("a", ""),
            Err(SatchelError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.write("", "x"),
            Err(SatchelError::InvalidArgument(_))
        ));
        assert!(matches!(
            store.destroy(""),
            Err(SatchelError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn destroy_removes_top_level_key() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        store.write("a", "x").unwrap();

        assert!(store.destroy("a").unwrap());
        assert_eq!(store.read("a"), None);
    }

    #[tokio::test]
    async fn legacy_destroy_does_not_descend() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        store.write("a.b", "x").unwrap();

        assert!(!store.destroy("a.b").unwrap());
        assert_eq!(store.read("a.b"), Some(&SessionValue::from("x")));
    }

    #[tokio::test]
    async fn clear_empties_everything() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        store.write("a", "x").unwrap();
        store.write("b.c", 7).unwrap();

        store.clear();

        assert_eq!(store.read("a"), None);
        assert_eq!(store.read("b.c"), None);
        assert!(!store.is_registered());
        assert!(store.debug().is_empty());
    }

    #[tokio::test]
    async fn close_destroys_transport_session() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        let id = store.transport_id().unwrap().to_string();

        assert!(store.close().await.unwrap());

        assert_eq!(store.state(), SessionState::Closed);
        assert!(!backend.contains(&id).await);
        assert!(store.session_id().is_none());
    }

    #[tokio::test]
    async fn gc_closes_expired_session() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        let max = 5;
        store
            .write(SESSION_START_KEY, Utc::now() - Duration::minutes(max + 1))
            .unwrap();

        assert!(store.gc(max as u32).await.unwrap());

        assert_eq!(store.state(), SessionState::Closed);
        assert!(store.debug().is_empty());
    }

    #[tokio::test]
    async fn gc_closes_session_exactly_at_lifetime() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        let max = 5;
        store
            .write(SESSION_START_KEY, Utc::now() - Duration::minutes(max))
            .unwrap();

        assert!(store.gc(max as u32).await.unwrap());

        assert_eq!(store.state(), SessionState::Closed);
        assert!(store.debug().is_empty());
    }

    #[tokio::test]
    async fn gc_renews_live_session() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        let max = 5;
        let earlier = Utc::now() - Duration::minutes(max - 1);
        store.write(SESSION_START_KEY, earlier).unwrap();
        store.write("a", "x").unwrap();

        assert!(store.gc(max as u32).await.unwrap());

        assert_eq!(store.state(), SessionState::Active);
        assert!(store.started_at().unwrap() > earlier);
        assert_eq!(store.read("a"), Some(&SessionValue::from("x")));
    }

    #[tokio::test]
    async fn gc_without_start_counts_as_expired() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        store.clear();

        assert!(store.gc(60).await.unwrap());
        assert_eq!(store.state(), SessionState::Closed);
    }

    #[tokio::test]
    async fn open_after_close_issues_new_id() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        let first = store.session_id().unwrap().to_string();
        store.close().await.unwrap();

        store.open().await.unwrap();

        assert_eq!(store.state(), SessionState::Opened);
        assert!(store.is_registered());
        assert_ne!(store.session_id(), Some(first.as_str()));
    }

    #[tokio::test]
    async fn commit_persists_and_skips_when_closed() {
        let backend = MemoryBackend::new();
        let mut store = open_store(&backend, NestingPolicy::Legacy).await;
        let id = store.transport_id().unwrap().to_string();
        store.write("a", "x").unwrap();

        store.commit().await.unwrap();
        let saved = backend.snapshot(&id).await.unwrap();
        assert_eq!(saved.get("a"), Some(&SessionValue::from("x")));

        store.close().await.unwrap();
        store.commit().await.unwrap();
        assert!(!backend.contains(&id).await);
    }

    #[tokio::test]
    async fn lifecycle_events_reach_audit_log() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("audit.log");
        let backend = MemoryBackend::new();
        let mut store = SessionStore::new(Box::new(backend.transport(None)), 1)
            .unwrap()
            .with_audit(AuditLog::new(&Config::default(), path.clone()));

        store.open().await.unwrap();
        store.close().await.unwrap();

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let events: Vec<String> = content
            .lines()
            .map(|line| {
                let entry: serde_json::Value = serde_json::from_str(line).unwrap();
                entry["event"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(events, vec!["session.created", "session.closed"]);
    }
}
