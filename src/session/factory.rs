//! Transport factory for creating the configured session backend

use crate::config::schema::{Backend, SessionConfig};
use crate::session::file::FileTransport;
use crate::session::memory::MemoryBackend;
use crate::session::transport::SessionTransport;
use std::path::PathBuf;

/// Create the transport selected by `session.backend`
///
/// # Arguments
/// * `config` - Session settings
/// * `sessions_dir` - Where the file backend keeps its records
/// * `cookie` - Session id presented by the client, if any
pub fn create_transport(
    config: &SessionConfig,
    sessions_dir: PathBuf,
    cookie: Option<String>,
) -> Box<dyn SessionTransport> {
    match config.backend {
        Backend::File => Box::new(FileTransport::new(sessions_dir, cookie)),
        Backend::Memory => Box::new(MemoryBackend::new().transport(cookie)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::map::SessionMap;
    use tempfile::TempDir;

    #[test]
    fn backend_selects_transport() {
        let temp = TempDir::new().unwrap();
        let mut config = SessionConfig::default();

        let transport = create_transport(&config, temp.path().to_path_buf(), None);
        assert_eq!(transport.transport_name(), "file");

        config.backend = Backend::Memory;
        let transport = create_transport(&config, temp.path().to_path_buf(), None);
        assert_eq!(transport.transport_name(), "memory");
    }

    #[tokio::test]
    async fn file_backend_writes_under_sessions_dir() {
        let temp = TempDir::new().unwrap();
        let mut transport =
            create_transport(&SessionConfig::default(), temp.path().to_path_buf(), None);

        transport.start().await.unwrap();
        transport.persist(&SessionMap::new()).await.unwrap();

        let id = transport.current_id().unwrap();
        assert!(temp.path().join(format!("{}.json", id)).exists());
    }
}
