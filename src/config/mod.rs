//! Configuration file discovery and loading
//!
//! The JSON overlay is optional: a missing file is "no override" and a broken
//! one is logged and treated as empty, so neither aborts the host program.

mod error;
pub mod loader;
pub mod search;

pub use error::ConfigError;
pub use loader::{load_json, read_json, JsonConfig};
pub use search::{find_config_file, SearchPath};
