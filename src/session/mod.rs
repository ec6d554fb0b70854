//! Session store module
//!
//! - `store`: dotted-key access to one client's session map, plus gc
//! - `scope`: one store per request
//! - `transport`: how a client's map is found and kept between requests

mod factory;
pub mod file;
mod map;
pub mod memory;
mod path;
mod scope;
mod store;
mod transport;
mod value;

pub use factory::create_transport;
pub use file::{FileTransport, SessionRecord};
pub use map::SessionMap;
pub use memory::{MemoryBackend, MemoryTransport};
pub use path::{KeyOp, KeyPath, NestingPolicy};
pub use scope::RequestScope;
pub use store::{SessionState, SessionStore, SESSION_ID_KEY, SESSION_START_KEY};
pub use transport::{is_valid_session_id, new_session_id, SessionTransport};
pub use value::SessionValue;
