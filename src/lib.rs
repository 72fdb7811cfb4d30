//! bearconf: startup configuration and logging for command-line programs
//!
//! Merges built-in defaults, command-line flags and an optional JSON file
//! found along a search path into one set of options, then configures the
//! process-wide logger from them.
//!
//! ```no_run
//! use bearconf::{Bootstrap, LoadOptions, Logger, OptionKind};
//!
//! let logger = Logger::install("worker").expect("logger");
//! let mut bootstrap = Bootstrap::new(&logger).config_filename("worker.json");
//! bootstrap
//!     .add_config("port", "-p", "--port", OptionKind::value("8080"), "Listen port")
//!     .expect("option");
//! let options = bootstrap.load(&LoadOptions::default());
//! println!("port = {:?}", options.get_str("port"));
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod logging;
pub mod registry;

pub use bootstrap::{program_name, Bootstrap, LoadOptions, Options};
pub use cli::ParsedOptions;
pub use config::{find_config_file, load_json, read_json, ConfigError, JsonConfig, SearchPath};
pub use logging::{AttachedSinks, ConsoleStyle, LogError, LogSettings, Logger};
pub use registry::{
    ConfigOption, OptionKind, OptionRegistry, OptionValue, OverridePolicy, RegistryError,
};
