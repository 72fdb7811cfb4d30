//! Command-line interface for bearconf
//!
//! The binary bootstraps itself with the library and prints the resolved
//! options as JSON, which makes it handy for checking what a program built
//! on bearconf would see.

use anyhow::Result;

use crate::bootstrap::{program_name, Bootstrap, LoadOptions};
use crate::logging::Logger;
use crate::registry::OptionKind;

pub mod parser;

pub use parser::{build_command, parse_from, ParsedOptions};

/// Searched for in the config directories unless `--config` names another file.
pub const CONFIG_FILENAME: &str = "bearconf.json";

/// Environment variable naming an extra config directory.
pub const CONFIG_DIR_ENV: &str = "BEARCONF_CONFIG_DIR";

pub fn run() -> Result<()> {
    let logger = Logger::install(&program_name())?;

    let mut bootstrap = Bootstrap::new(&logger).config_filename(CONFIG_FILENAME);
    bootstrap.add_config(
        "pretty",
        "-p",
        "--pretty",
        OptionKind::flag(false),
        "Pretty-print the resolved options",
    )?;

    let options = bootstrap.load(&LoadOptions {
        config_env_var: Some(CONFIG_DIR_ENV.to_string()),
        ..Default::default()
    });
    tracing::debug!("resolved {} options", options.parsed.values().len());

    let json = if options.get_bool("pretty") {
        serde_json::to_string_pretty(&options)?
    } else {
        serde_json::to_string(&options)?
    };
    println!("{json}");
    Ok(())
}
