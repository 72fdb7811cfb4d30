//! Option definitions

use serde::Serialize;
use std::fmt;

use super::RegistryError;

/// Shape of an option on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    /// Store-true flag: absent keeps `default`, present sets `true`.
    Flag { default: bool },
    /// Flag that takes a value.
    Value { default: Option<String> },
}

impl OptionKind {
    pub fn flag(default: bool) -> Self {
        OptionKind::Flag { default }
    }

    pub fn value(default: impl Into<String>) -> Self {
        OptionKind::Value { default: Some(default.into()) }
    }

    pub fn value_without_default() -> Self {
        OptionKind::Value { default: None }
    }

    /// The default as a runtime value, if there is one.
    pub fn default_value(&self) -> Option<OptionValue> {
        match self {
            OptionKind::Flag { default } => Some(OptionValue::Bool(*default)),
            OptionKind::Value { default } => default.clone().map(OptionValue::Str),
        }
    }
}

/// A parsed (or default) option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            OptionValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Str(value)
    }
}

/// One registered command-line option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOption {
    pub key: String,
    pub short: Option<char>,
    pub long: Option<String>,
    pub kind: OptionKind,
    pub help: String,
}

impl ConfigOption {
    /// Build an option from optparse-style flag strings.
    ///
    /// `short` accepts `"-c"` or `"c"`, `long` accepts `"--config"` or
    /// `"config"`. An empty string means the option has no such flag, but
    /// at least one of the two must be present.
    pub fn new(
        key: &str,
        short: &str,
        long: &str,
        kind: OptionKind,
        help: &str,
    ) -> Result<Self, RegistryError> {
        if key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }

        let short = parse_short(key, short)?;
        let long = parse_long(key, long)?;
        if short.is_none() && long.is_none() {
            return Err(RegistryError::NoFlags { key: key.to_string() });
        }

        Ok(Self { key: key.to_string(), short, long, kind, help: help.to_string() })
    }

    /// True when `other` claims the same short or long flag.
    pub fn shares_flag_with(&self, other: &ConfigOption) -> bool {
        let short_clash = matches!((self.short, other.short), (Some(a), Some(b)) if a == b);
        let long_clash = match (&self.long, &other.long) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        };
        short_clash || long_clash
    }

    /// Human-readable flag list, e.g. `-c/--config`.
    pub fn flags(&self) -> String {
        match (self.short, &self.long) {
            (Some(s), Some(l)) => format!("-{s}/--{l}"),
            (Some(s), None) => format!("-{s}"),
            (None, Some(l)) => format!("--{l}"),
            (None, None) => String::new(),
        }
    }
}

fn parse_short(key: &str, raw: &str) -> Result<Option<char>, RegistryError> {
    let trimmed = raw.strip_prefix('-').unwrap_or(raw);
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut chars = trimmed.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return Err(RegistryError::InvalidShortFlag { key: key.to_string(), flag: raw.to_string() });
    };
    if c == '-' || c.is_whitespace() {
        return Err(RegistryError::InvalidShortFlag { key: key.to_string(), flag: raw.to_string() });
    }
    if c == 'h' {
        return Err(RegistryError::ReservedFlag { key: key.to_string(), flag: raw.to_string() });
    }
    Ok(Some(c))
}

fn parse_long(key: &str, raw: &str) -> Result<Option<String>, RegistryError> {
    let trimmed = raw.strip_prefix("--").unwrap_or(raw);
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.starts_with('-') || trimmed.contains(|c: char| c.is_whitespace() || c == '=') {
        return Err(RegistryError::InvalidLongFlag { key: key.to_string(), flag: raw.to_string() });
    }
    if trimmed == "help" {
        return Err(RegistryError::ReservedFlag { key: key.to_string(), flag: raw.to_string() });
    }
    Ok(Some(trimmed.to_string()))
}
