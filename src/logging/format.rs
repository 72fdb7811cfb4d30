//! Log line layout

use chrono::Local;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Console line layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStyle {
    /// `<ts> <LEVEL> <message>`
    Plain,
    /// `<ts> <LEVEL> <program>[<pid>]: <message>`
    Chatty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LineStyle {
    /// `<ts> <LEVEL> <program>: <message>`
    File,
    Console(ConsoleStyle),
}

pub(crate) struct LineFormat {
    program: String,
    style: LineStyle,
}

impl LineFormat {
    pub(crate) fn new(program: &str, style: LineStyle) -> Self {
        Self { program: program.to_string(), style }
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = level_name(event.metadata().level());
        write!(writer, "{} {:<7} ", Local::now().format(TIMESTAMP_FORMAT), level)?;

        match self.style {
            LineStyle::File => write!(writer, "{}: ", self.program)?,
            LineStyle::Console(ConsoleStyle::Chatty) => {
                write!(writer, "{}[{}]: ", self.program, std::process::id())?
            }
            LineStyle::Console(ConsoleStyle::Plain) => {}
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}
