//! Startup sequence: registry → CLI → config file → logging
//!
//! [`Bootstrap`] collects caller options, then [`Bootstrap::load_from`]
//! merges the built-ins, parses the command line, resolves and loads the
//! JSON overlay when `configFile` is set, and re-initializes the logger from
//! the parsed values.

use serde::Serialize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

use crate::cli::parser::{parse_from, ParsedOptions};
use crate::config::{load_json, JsonConfig, SearchPath};
use crate::logging::{LogSettings, Logger};
use crate::registry::builtins::{CONFIG_FILE, DEBUG, ECHO, LOGFILE, LOGPATH, VERBOSE};
use crate::registry::{
    builtin_options, OptionKind, OptionRegistry, OptionValue, OverridePolicy, RegistryError,
};

/// Inputs to [`Bootstrap::load`] besides the command line.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Replace registered defaults before parsing.
    pub defaults: HashMap<String, OptionValue>,
    /// Searched for the config file before the application directory.
    pub config_paths: Vec<PathBuf>,
    /// Environment variable naming one more search directory.
    pub config_env_var: Option<String>,
}

/// Fully resolved startup configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Options {
    pub program: String,
    pub app_path: PathBuf,
    /// When a config file was found, `configFile` here holds its display
    /// form (lossy for non-UTF-8 paths); [`Self::config_file`] is exact.
    #[serde(flatten)]
    pub parsed: ParsedOptions,
    /// Where the JSON overlay was found.
    pub config_file: Option<PathBuf>,
    /// The JSON overlay; `None` when `configFile` was never set.
    pub config: Option<JsonConfig>,
}

impl Options {
    pub fn get_bool(&self, key: &str) -> bool {
        self.parsed.get_bool(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.parsed.get_str(key)
    }

    pub fn args(&self) -> &[String] {
        self.parsed.args()
    }
}

pub struct Bootstrap<'a> {
    logger: &'a Logger,
    app_path: PathBuf,
    config_filename: Option<String>,
    policy: OverridePolicy,
    log_level: LevelFilter,
    registry: OptionRegistry,
}

impl<'a> Bootstrap<'a> {
    /// The program name is taken from the logger.
    pub fn new(logger: &'a Logger) -> Self {
        let app_path = std::env::current_dir().unwrap_or_else(|e| {
            tracing::warn!("unable to read the current directory: {}", e);
            PathBuf::from(".")
        });

        Self {
            logger,
            app_path,
            config_filename: None,
            policy: OverridePolicy::default(),
            log_level: LevelFilter::INFO,
            registry: OptionRegistry::new(),
        }
    }

    /// Default value of `configFile`; when set the config file is always searched for.
    pub fn config_filename(mut self, name: impl Into<String>) -> Self {
        self.config_filename = Some(name.into());
        self
    }

    /// Directory standing in for the current directory in the config search.
    pub fn app_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.app_path = path.into();
        self
    }

    pub fn override_policy(mut self, policy: OverridePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Level used after loading unless `--debug` is given.
    pub fn log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    pub fn add_config(
        &mut self,
        key: &str,
        short: &str,
        long: &str,
        kind: OptionKind,
        help: &str,
    ) -> Result<(), RegistryError> {
        self.registry.add_config(key, short, long, kind, help)
    }

    pub fn registry(&self) -> &OptionRegistry {
        &self.registry
    }

    /// [`Self::load_from`] with the process arguments; exits on a usage error.
    pub fn load(self, opts: &LoadOptions) -> Options {
        self.load_from(std::env::args_os(), opts).unwrap_or_else(|e| e.exit())
    }

    /// Run the startup sequence against `args` (program name first).
    pub fn load_from<I, T>(self, args: I, opts: &LoadOptions) -> Result<Options, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let Bootstrap { logger, app_path, config_filename, policy, log_level, mut registry } = self;
        let program = logger.name().to_string();

        registry.merge_builtins(builtin_options(&program, config_filename.as_deref()), policy);
        registry.apply_defaults(&opts.defaults);

        let mut parsed = parse_from(&program, &registry, args)?;

        let mut config_file = None;
        let mut config = None;
        if let Some(name) = parsed.get_str(CONFIG_FILE).map(str::to_string) {
            let search = SearchPath::with_user_home(
                opts.config_paths.iter().cloned(),
                &app_path,
                opts.config_env_var.as_deref(),
            );
            config_file = search.find(&name);
            config = Some(config_file.as_deref().map(load_json).unwrap_or_default());

            // Display form only; `config_file` keeps the exact path.
            if let Some(path) = &config_file {
                parsed.set(CONFIG_FILE, OptionValue::Str(path.to_string_lossy().into_owned()));
            }
        }

        reinit_logging(logger, log_settings(&parsed, log_level));

        Ok(Options { program, app_path, parsed, config_file, config })
    }
}

fn log_settings(parsed: &ParsedOptions, level: LevelFilter) -> LogSettings {
    let non_empty = |key: &str| parsed.get_str(key).filter(|value| !value.is_empty());

    LogSettings {
        echo: parsed.get_bool(ECHO),
        chatty: parsed.get_bool(VERBOSE),
        debug: parsed.get_bool(DEBUG),
        level,
        log_path: non_empty(LOGPATH).map(PathBuf::from),
        log_name: non_empty(LOGFILE).map(str::to_string),
    }
}

/// A log file that cannot be opened must not stop the program: retry without it.
fn reinit_logging(logger: &Logger, settings: LogSettings) {
    let Err(e) = logger.init_logs(&settings) else {
        return;
    };
    tracing::error!("unable to initialize logging: {}", e);

    if settings.log_path.is_some() {
        let console_only = LogSettings { log_path: None, ..settings };
        if let Err(e) = logger.init_logs(&console_only) {
            tracing::error!("unable to initialize console logging: {}", e);
        }
    }
}

/// Program name: the file stem of argv[0].
pub fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}
