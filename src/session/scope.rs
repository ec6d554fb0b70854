//! Request-scoped access to a single session store

use crate::audit::AuditLog;
use crate::error::{SatchelError, SatchelResult};
use crate::session::path::NestingPolicy;
use crate::session::store::{check_max_lifetime, SessionState, SessionStore};
use crate::session::transport::SessionTransport;
use tracing::debug;

/// Owns the one session store of a request
///
/// The store is created lazily by the first call to [`session`](Self::session)
/// and every later call hands back the same store. A handler owns its scope
/// for the duration of the request, so no store is ever shared between
/// requests.
pub struct RequestScope {
    transport: Option<Box<dyn SessionTransport>>,
    store: Option<SessionStore>,
    nesting: NestingPolicy,
    audit: Option<AuditLog>,
}

impl RequestScope {
    /// Scope whose store will run over `transport`
    pub fn new(transport: Box<dyn SessionTransport>) -> Self {
        Self {
            transport: Some(transport),
            store: None,
            nesting: NestingPolicy::default(),
            audit: None,
        }
    }

    /// Scope with no transport; a store must be supplied through [`adopt`](Self::adopt)
    pub fn empty() -> Self {
        Self {
            transport: None,
            store: None,
            nesting: NestingPolicy::default(),
            audit: None,
        }
    }

    /// Nesting policy for the store this scope creates
    pub fn with_nesting(mut self, nesting: NestingPolicy) -> Self {
        self.nesting = nesting;
        self
    }

    /// Audit log for the store this scope creates
    pub fn with_audit(mut self, audit: AuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// The request's store, created on first use.
    ///
    /// Every call re-applies `max_lifetime_minutes` and re-opens the store.
    /// Fails with `InvalidArgument` when `max_lifetime_minutes` is zero.
    pub async fn session(&mut self, max_lifetime_minutes: u32) -> SatchelResult<&mut SessionStore> {
        check_max_lifetime(max_lifetime_minutes)?;

        if self.store.is_none() {
            let transport = self.transport.take().ok_or_else(|| {
                SatchelError::Internal("request scope has no session transport".to_string())
            })?;

            let mut store =
                SessionStore::new(transport, max_lifetime_minutes)?.with_nesting(self.nesting);
            if let Some(audit) = self.audit.take() {
                store = store.with_audit(audit);
            }
            debug!("Created session store over {} transport", store.transport_name());
            self.store = Some(store);
        }

        let store = self
            .store
            .as_mut()
            .ok_or_else(|| SatchelError::Internal("session store missing".to_string()))?;
        store.set_max_lifetime(max_lifetime_minutes)?;
        store.open().await?;
        Ok(store)
    }

    /// The store, if one has been created
    pub fn get(&self) -> Option<&SessionStore> {
        self.store.as_ref()
    }

    /// Install a store built elsewhere.
    ///
    /// Fails with `IllegalOperation` if the scope already holds a store.
    pub fn adopt(&mut self, store: SessionStore) -> SatchelResult<()> {
        if self.store.is_some() {
            return Err(SatchelError::illegal_operation(
                "a session store is already live in this request",
            ));
        }

        self.transport = None;
        self.store = Some(store);
        Ok(())
    }

    /// Commit the store and end the request.
    ///
    /// Returns the session id the client should present next time, or `None`
    /// when no store was used or the session was closed.
    pub async fn finish(self) -> SatchelResult<Option<String>> {
        let Some(mut store) = self.store else {
            return Ok(None);
        };

        store.commit().await?;

        if store.state() == SessionState::Closed {
            return Ok(None);
        }
        Ok(store.transport_id().map(str::to_string))
    }
}
