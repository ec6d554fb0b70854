//! One CLI invocation treated as one request against the session store

use crate::audit::AuditLog;
use crate::cli::cookie::CookieJar;
use crate::config::{Backend, Config, ConfigManager};
use crate::error::{SatchelError, SatchelResult};
use crate::session::{create_transport, RequestScope, SessionStore};
use tracing::debug;

/// Everything a command needs to run a request
pub struct Invocation {
    pub config: Config,
    pub manager: ConfigManager,
    /// Session id given on the command line, overriding the cookie jar
    pub session_override: Option<String>,
}

impl Invocation {
    pub fn new(config: Config, manager: ConfigManager, session_override: Option<String>) -> Self {
        Self {
            config,
            manager,
            session_override,
        }
    }

    pub fn cookie_jar(&self) -> CookieJar {
        CookieJar::new(self.manager.cookie_path())
    }

    /// Session id this request presents: `--session` first, then the jar
    pub async fn cookie(&self) -> SatchelResult<Option<String>> {
        if let Some(id) = &self.session_override {
            return Ok(Some(id.clone()));
        }
        self.cookie_jar().load().await
    }

    /// Start the request: build the scope over the configured transport
    ///
    /// Fails with `InvalidArgument` for the memory backend, which cannot
    /// carry a session from one invocation to the next.
    pub async fn begin(&self) -> SatchelResult<RequestScope> {
        if self.config.session.backend == Backend::Memory {
            return Err(SatchelError::invalid_argument(
                "session.backend = \"memory\" keeps nothing between invocations; use \"file\"",
            ));
        }

        let cookie = self.cookie().await?;
        debug!("Presenting session cookie {:?}", cookie);

        let transport = create_transport(&self.config.session, self.manager.sessions_dir(), cookie);
        let audit = AuditLog::new(&self.config, self.manager.audit_log_path());

        Ok(RequestScope::new(transport)
            .with_nesting(self.config.session.nesting)
            .with_audit(audit))
    }

    /// The request's store, swept first when `session.auto_gc` is set
    pub async fn attach<'s>(&self, scope: &'s mut RequestScope) -> SatchelResult<&'s mut SessionStore> {
        let max = self.config.session.max_lifetime_minutes;

        if self.config.session.auto_gc {
            let store = scope.session(max).await?;
            store.gc(max).await?;
        }

        scope.session(max).await
    }

    /// End the request: save the map and update the cookie jar
    pub async fn finish(&self, scope: RequestScope) -> SatchelResult<Option<String>> {
        let jar = self.cookie_jar();
        let cookie = scope.finish().await?;

        match &cookie {
            Some(id) => jar.store(id).await?,
            None => jar.forget().await?,
        }

        Ok(cookie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionValue;
    use tempfile::TempDir;

    fn invocation(temp: &TempDir, config: Config) -> Invocation {
        let manager = ConfigManager::with_path(temp.path().join("config.toml"))
            .with_state_dir(temp.path().to_path_buf());
        Invocation::new(config, manager, None)
    }

    #[tokio::test]
    async fn cookie_carries_session_between_requests() {
        let temp = TempDir::new().unwrap();
        let inv = invocation(&temp, Config::default());

        let mut scope = inv.begin().await.unwrap();
        inv.attach(&mut scope).await.unwrap().write("a", "x").unwrap();
        let cookie = inv.finish(scope).await.unwrap();
        assert!(cookie.is_some());

        let mut scope = inv.begin().await.unwrap();
        let store = inv.attach(&mut scope).await.unwrap();
        assert_eq!(store.read("a"), Some(&SessionValue::from("x")));
        assert_eq!(store.session_id(), cookie.as_deref());
    }

    #[tokio::test]
    async fn override_beats_cookie_jar() {
        let temp = TempDir::new().unwrap();
        let mut inv = invocation(&temp, Config::default());
        inv.cookie_jar().store("from-jar").await.unwrap();
        inv.session_override = Some("from-flag".to_string());

        assert_eq!(inv.cookie().await.unwrap().as_deref(), Some("from-flag"));
    }

    #[tokio::test]
    async fn close_forgets_cookie() {
        let temp = TempDir::new().unwrap();
        let inv = invocation(&temp, Config::default());

        let mut scope = inv.begin().await.unwrap();
        inv.attach(&mut scope).await.unwrap().close().await.unwrap();
        assert_eq!(inv.finish(scope).await.unwrap(), None);

        assert_eq!(inv.cookie_jar().load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_backend_is_refused() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.session.backend = Backend::Memory;
        let inv = invocation(&temp, config);

        assert!(matches!(
            inv.begin().await.err(),
            Some(SatchelError::InvalidArgument(_))
        ));
        assert_eq!(inv.cookie_jar().load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn auto_gc_replaces_expired_session() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.session.backend = Backend::File;
        let inv = invocation(&temp, config.clone());

        let mut scope = inv.begin().await.unwrap();
        let store = inv.attach(&mut scope).await.unwrap();
        store
            .write(
                crate::session::SESSION_START_KEY,
                chrono::Utc::now() - chrono::Duration::minutes(10),
            )
            .unwrap();
        let stale = inv.finish(scope).await.unwrap().unwrap();

        config.session.auto_gc = true;
        let inv = invocation(&temp, config);
        let mut scope = inv.begin().await.unwrap();
        let store = inv.attach(&mut scope).await.unwrap();

        assert!(store.is_registered());
        assert_ne!(store.session_id(), Some(stale.as_str()));
    }
}
