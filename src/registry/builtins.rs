//! Built-in options every bootstrapped program gets

use super::option::{ConfigOption, OptionKind};

pub const CONFIG_FILE: &str = "configFile";
pub const DEBUG: &str = "debug";
pub const ECHO: &str = "echo";
pub const LOGPATH: &str = "logpath";
pub const LOGFILE: &str = "logfile";
pub const VERBOSE: &str = "verbose";

/// The built-in option set.
///
/// `config_filename` becomes the default of `configFile` and the default
/// log file is named after the program.
pub fn builtin_options(program: &str, config_filename: Option<&str>) -> Vec<ConfigOption> {
    vec![
        builtin(
            CONFIG_FILE,
            Some('c'),
            "config",
            OptionKind::Value { default: config_filename.map(str::to_string) },
            "Configuration filename (optionally with path)",
        ),
        builtin(DEBUG, Some('d'), "debug", OptionKind::flag(false), "Enable debug logging"),
        builtin(ECHO, Some('e'), "echo", OptionKind::flag(false), "Enable log echo to the console"),
        builtin(
            LOGPATH,
            Some('l'),
            "logpath",
            OptionKind::value(""),
            "Path where the log file is to be written",
        ),
        builtin(LOGFILE, None, "logfile", OptionKind::value(format!("{program}.log")), "Log filename"),
        builtin(VERBOSE, Some('v'), "verbose", OptionKind::flag(false), "Show extra output"),
    ]
}

fn builtin(key: &str, short: Option<char>, long: &str, kind: OptionKind, help: &str) -> ConfigOption {
    ConfigOption {
        key: key.to_string(),
        short,
        long: Some(long.to_string()),
        kind,
        help: help.to_string(),
    }
}
