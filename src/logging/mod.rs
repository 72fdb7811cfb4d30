//! Process-wide logger setup
//!
//! A [`Logger`] owns the reload handles of the installed `tracing`
//! subscriber. [`Logger::init_logs`] swaps the whole sink set, so a logger
//! never has more than one console sink and one file sink attached.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, reload, Layer, Registry};

mod format;

pub use format::ConsoleStyle;
use format::{LineFormat, LineStyle};

type FilterLayer = reload::Layer<LevelFilter, Registry>;
type Base = Layered<FilterLayer, Registry>;
type Sink = Box<dyn Layer<Base> + Send + Sync>;
type SinkLayer = reload::Layer<Vec<Sink>, Base>;

/// The subscriber a [`Logger`] controls.
pub type LoggerSubscriber = Layered<SinkLayer, Base>;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Failed to open log file {path}: {source}")]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to update the log subscriber: {0}")]
    Reload(#[from] reload::Error),

    #[error("A global tracing subscriber is already installed")]
    AlreadyInstalled(#[source] TryInitError),
}

/// What [`Logger::init_logs`] should attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub echo: bool,
    /// Console lines carry the program name and pid.
    pub chatty: bool,
    /// Forces the most verbose level, whatever `level` says.
    pub debug: bool,
    pub level: LevelFilter,
    /// Directory for the log file; no file sink when `None`.
    pub log_path: Option<PathBuf>,
    /// File name inside `log_path`; defaults to the program name.
    pub log_name: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            echo: true,
            chatty: false,
            debug: false,
            level: LevelFilter::INFO,
            log_path: None,
            log_name: None,
        }
    }
}

/// Sinks currently attached to a [`Logger`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachedSinks {
    pub console: Option<ConsoleStyle>,
    pub file: Option<PathBuf>,
}

pub struct Logger {
    name: String,
    filter: reload::Handle<LevelFilter, Registry>,
    sinks: reload::Handle<Vec<Sink>, Base>,
    attached: Mutex<AttachedSinks>,
}

impl Logger {
    /// Build a logger and the subscriber it controls, without installing it.
    ///
    /// The logger starts with a plain console sink at `INFO` so warnings and
    /// errors raised before [`Self::init_logs`] are visible.
    pub fn new(name: &str) -> (Self, LoggerSubscriber) {
        let (filter_layer, filter) = reload::Layer::new(LevelFilter::INFO);
        let (sink_layer, sinks) =
            reload::Layer::new(vec![console_sink(name, ConsoleStyle::Plain)]);
        let subscriber = tracing_subscriber::registry().with(filter_layer).with(sink_layer);

        let logger = Self {
            name: name.to_string(),
            filter,
            sinks,
            attached: Mutex::new(AttachedSinks {
                console: Some(ConsoleStyle::Plain),
                file: None,
            }),
        };
        (logger, subscriber)
    }

    /// Build a logger and install it as the global default subscriber.
    pub fn install(name: &str) -> Result<Self, LogError> {
        let (logger, subscriber) = Self::new(name);
        subscriber.try_init().map_err(LogError::AlreadyInstalled)?;
        Ok(logger)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the sink set and level according to `settings`.
    ///
    /// On error nothing changes: the file is opened before any swap.
    pub fn init_logs(&self, settings: &LogSettings) -> Result<(), LogError> {
        let mut sinks: Vec<Sink> = Vec::with_capacity(2);
        let mut attached = AttachedSinks::default();

        if let Some(dir) = &settings.log_path {
            let file_name = settings.log_name.as_deref().unwrap_or(&self.name);
            let path = dir.join(file_name);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| LogError::OpenFile { path: path.clone(), source })?;

            sinks.push(
                fmt::layer::<Base>()
                    .event_format(LineFormat::new(&self.name, LineStyle::File))
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .boxed(),
            );
            attached.file = Some(path);
        }

        if settings.echo {
            let style = if settings.chatty { ConsoleStyle::Chatty } else { ConsoleStyle::Plain };
            sinks.push(console_sink(&self.name, style));
            attached.console = Some(style);
        }

        let level = if settings.debug { LevelFilter::TRACE } else { settings.level };

        self.sinks.reload(sinks)?;
        self.filter.reload(level)?;
        *self.lock_attached() = attached;
        Ok(())
    }

    /// Current severity threshold.
    pub fn level(&self) -> LevelFilter {
        self.filter.clone_current().unwrap_or(LevelFilter::OFF)
    }

    pub fn sinks(&self) -> AttachedSinks {
        self.lock_attached().clone()
    }

    fn lock_attached(&self) -> MutexGuard<'_, AttachedSinks> {
        self.attached.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn console_sink(program: &str, style: ConsoleStyle) -> Sink {
    fmt::layer::<Base>()
        .event_format(LineFormat::new(program, LineStyle::Console(style)))
        .with_writer(std::io::stderr)
        .boxed()
}
