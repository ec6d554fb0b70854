//! CLI command implementations

pub mod clear;
pub mod close;
pub mod config;
pub mod destroy;
pub mod dump;
pub mod gc;
pub mod list;
pub mod open;
pub mod read;
pub mod status;
pub mod write;

pub use clear::execute as clear;
pub use close::execute as close;
pub use config::execute as config;
pub use destroy::execute as destroy;
pub use dump::execute as dump;
pub use gc::execute as gc;
pub use list::execute as list;
pub use open::execute as open;
pub use read::execute as read;
pub use status::execute as status;
pub use write::execute as write;
