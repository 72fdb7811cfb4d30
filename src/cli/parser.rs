//! Turns an [`OptionRegistry`] into a clap parser

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::registry::{ConfigOption, OptionKind, OptionRegistry, OptionValue, POSITIONAL_KEY};

/// Values produced by one parse: every option with a value plus positionals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedOptions {
    values: BTreeMap<String, OptionValue>,
    args: Vec<String>,
}

impl ParsedOptions {
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    /// Flag value; absent or non-boolean options read as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).and_then(OptionValue::as_bool).unwrap_or(false)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    pub fn is_set(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn values(&self) -> &BTreeMap<String, OptionValue> {
        &self.values
    }

    /// Positional arguments in command-line order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub(crate) fn set(&mut self, key: &str, value: OptionValue) {
        self.values.insert(key.to_string(), value);
    }
}

/// Build the clap command for `registry`, one flag per option.
pub fn build_command(program: &str, registry: &OptionRegistry) -> Command {
    let positional = Arg::new(POSITIONAL_KEY)
        .value_name("ARGS")
        .num_args(1..)
        .action(ArgAction::Append);

    registry
        .iter()
        .fold(Command::new(program.to_string()).arg(positional), |cmd, option| {
            cmd.arg(option_arg(option))
        })
}

fn option_arg(option: &ConfigOption) -> Arg {
    let mut arg = Arg::new(option.key.clone()).help(option.help.clone());
    if let Some(short) = option.short {
        arg = arg.short(short);
    }
    if let Some(long) = &option.long {
        arg = arg.long(long.clone());
    }

    match &option.kind {
        OptionKind::Flag { .. } => arg.action(ArgAction::SetTrue),
        OptionKind::Value { .. } => arg.action(ArgAction::Set).value_name(option.key.to_uppercase()),
    }
}

/// Parse `args` (including the program name in position 0) against `registry`.
///
/// Defaults are filled from the registry rather than clap so an absent
/// store-true flag keeps whatever default it was registered with.
pub fn parse_from<I, T>(
    program: &str,
    registry: &OptionRegistry,
    args: I,
) -> Result<ParsedOptions, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command(program, registry).try_get_matches_from(args)?;
    Ok(collect(registry, &matches))
}

fn collect(registry: &OptionRegistry, matches: &ArgMatches) -> ParsedOptions {
    let mut parsed = ParsedOptions::default();

    for option in registry.iter() {
        let from_cli = matches.value_source(&option.key) == Some(ValueSource::CommandLine);
        let value = match &option.kind {
            OptionKind::Flag { default } => Some(OptionValue::Bool(from_cli || *default)),
            OptionKind::Value { default } => matches
                .get_one::<String>(&option.key)
                .cloned()
                .or_else(|| default.clone())
                .map(OptionValue::Str),
        };
        if let Some(value) = value {
            parsed.set(&option.key, value);
        }
    }

    parsed.args = matches
        .get_many::<String>(POSITIONAL_KEY)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    parsed
}
