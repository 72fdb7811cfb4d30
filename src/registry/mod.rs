//! Option registry
//!
//! Maps configuration keys to their command-line metadata. Callers register
//! their own options first; the built-in set is merged in afterwards and
//! never overwrites a caller's key.

use std::collections::{BTreeMap, HashMap};

pub mod builtins;
mod error;
pub mod option;

pub use builtins::builtin_options;
pub use error::RegistryError;
pub use option::{ConfigOption, OptionKind, OptionValue};

/// Key the parser uses internally for positional arguments.
pub const POSITIONAL_KEY: &str = "__positional";

/// Keys that double as clap argument ids the parser already defines.
const RESERVED_KEYS: [&str; 2] = [POSITIONAL_KEY, "help"];

/// What happens when a caller registered a key that is also a built-in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverridePolicy {
    /// Caller wins silently.
    #[default]
    Allow,
    /// Caller wins and a warning names the overridden built-in.
    Warn,
    /// The built-in is restored and the attempt is logged as an error.
    Deny,
}

#[derive(Debug, Clone, Default)]
pub struct OptionRegistry {
    options: BTreeMap<String, ConfigOption>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one option from optparse-style flag strings.
    ///
    /// Invalid definitions are logged and skipped; the error is also
    /// returned for callers that want to act on it.
    pub fn add_config(
        &mut self,
        key: &str,
        short: &str,
        long: &str,
        kind: OptionKind,
        help: &str,
    ) -> Result<(), RegistryError> {
        let result = ConfigOption::new(key, short, long, kind, help).and_then(|opt| self.try_insert(opt));
        if let Err(e) = &result {
            tracing::error!("{}", e);
        }
        result
    }

    fn try_insert(&mut self, option: ConfigOption) -> Result<(), RegistryError> {
        if RESERVED_KEYS.contains(&option.key.as_str()) {
            return Err(RegistryError::ReservedKey(option.key));
        }
        if let Some(existing) = self.clashing(&option) {
            return Err(RegistryError::FlagCollision {
                flags: option.flags(),
                existing: existing.key.clone(),
                key: option.key,
            });
        }

        tracing::debug!("registered option {} ({})", option.key, option.flags());
        self.options.insert(option.key.clone(), option);
        Ok(())
    }

    /// First option under a different key that claims one of `option`'s flags.
    fn clashing(&self, option: &ConfigOption) -> Option<&ConfigOption> {
        self.options.values().find(|o| o.key != option.key && o.shares_flag_with(option))
    }

    /// Merge the built-in set without overwriting caller keys (subject to `policy`).
    ///
    /// A built-in whose flags are taken by a caller option under another key
    /// is left out so the parser never sees duplicate flags.
    pub fn merge_builtins(&mut self, builtins: Vec<ConfigOption>, policy: OverridePolicy) {
        for builtin in builtins {
            if let Some(existing) = self.options.get(&builtin.key) {
                match policy {
                    OverridePolicy::Allow => continue,
                    OverridePolicy::Warn => {
                        tracing::warn!(
                            "option '{}' ({}) overrides the built-in {}",
                            existing.key,
                            existing.flags(),
                            builtin.flags()
                        );
                        continue;
                    }
                    OverridePolicy::Deny => {
                        tracing::error!(
                            "option '{}' may not override a built-in; restoring {}",
                            existing.key,
                            builtin.flags()
                        );
                        self.options.remove(&builtin.key);
                    }
                }
            }

            if let Some(clash) = self.clashing(&builtin) {
                tracing::warn!(
                    "built-in option '{}' skipped: {} is already used by '{}'",
                    builtin.key,
                    builtin.flags(),
                    clash.key
                );
                continue;
            }
            self.options.insert(builtin.key.clone(), builtin);
        }
    }

    /// Replace registered defaults with caller-supplied values.
    ///
    /// Unknown keys and values of the wrong shape are logged and ignored.
    pub fn apply_defaults(&mut self, defaults: &HashMap<String, OptionValue>) {
        for (key, value) in defaults {
            let Some(option) = self.options.get_mut(key) else {
                tracing::warn!("default given for unknown option '{}'", key);
                continue;
            };
            match (&mut option.kind, value) {
                (OptionKind::Flag { default }, OptionValue::Bool(b)) => *default = *b,
                (OptionKind::Value { default }, OptionValue::Str(s)) => *default = Some(s.clone()),
                _ => tracing::warn!("default for option '{}' has the wrong type: {}", key, value),
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigOption> {
        self.options.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Options in key order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigOption> {
        self.options.values()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::builtins::{CONFIG_FILE, DEBUG, LOGFILE};
    use super::*;

    fn with_builtins(registry: &mut OptionRegistry, policy: OverridePolicy) {
        registry.merge_builtins(builtin_options("prog", None), policy);
    }

    #[test]
    fn test_builtins_only() {
        let mut registry = OptionRegistry::new();
        with_builtins(&mut registry, OverridePolicy::Allow);
        assert_eq!(registry.len(), 6);
        assert!(registry.contains_key(CONFIG_FILE));
    }

    #[test]
    fn test_add_config_rejects_missing_flags() {
        let mut registry = OptionRegistry::new();
        let err = registry.add_config("port", "", "", OptionKind::value("80"), "Port").unwrap_err();
        assert!(matches!(err, RegistryError::NoFlags { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_config_rejects_reserved_key() {
        let mut registry = OptionRegistry::new();
        let err = registry.add_config(POSITIONAL_KEY, "-p", "", OptionKind::flag(false), "").unwrap_err();
        assert_eq!(err, RegistryError::ReservedKey(POSITIONAL_KEY.to_string()));
    }

    #[test]
    fn test_help_key_is_reserved_even_with_valid_flags() {
        let mut registry = OptionRegistry::new();
        let err = registry
            .add_config("help", "-H", "--show-help", OptionKind::flag(false), "Show help")
            .unwrap_err();
        assert_eq!(err, RegistryError::ReservedKey("help".to_string()));
        assert!(!registry.contains_key("help"));

        with_builtins(&mut registry, OverridePolicy::Allow);
        let parsed = crate::cli::parse_from("prog", &registry, ["prog", "-d"]).unwrap();
        assert!(parsed.get_bool(DEBUG));
    }

    #[test]
    fn test_add_config_rejects_flag_collision() {
        let mut registry = OptionRegistry::new();
        registry.add_config("port", "-p", "--port", OptionKind::value("80"), "").unwrap();
        let err = registry.add_config("peer", "-p", "--peer", OptionKind::value(""), "").unwrap_err();
        assert!(matches!(err, RegistryError::FlagCollision { ref existing, .. } if existing == "port"));
        assert!(!registry.contains_key("peer"));
    }

    #[test]
    fn test_reregistering_same_key_replaces() {
        let mut registry = OptionRegistry::new();
        registry.add_config("port", "-p", "--port", OptionKind::value("80"), "").unwrap();
        registry.add_config("port", "-p", "--port", OptionKind::value("8080"), "").unwrap();
        assert_eq!(registry.get("port").unwrap().kind, OptionKind::value("8080"));
    }

    #[test]
    fn test_caller_keeps_builtin_key() {
        let keys: Vec<String> = builtin_options("prog", None).into_iter().map(|o| o.key).collect();
        assert_eq!(keys.len(), 6);

        for policy in [OverridePolicy::Allow, OverridePolicy::Warn] {
            for key in &keys {
                let long = format!("--mine-{key}");
                let mut registry = OptionRegistry::new();
                registry.add_config(key, "", &long, OptionKind::value("mine"), "Mine").unwrap();
                with_builtins(&mut registry, policy);

                let option = registry.get(key).unwrap();
                assert_eq!(option.short, None, "{key}");
                assert_eq!(option.long.as_deref(), Some(&long[2..]), "{key}");
                assert_eq!(option.kind, OptionKind::value("mine"), "{key}");
                assert_eq!(option.help, "Mine", "{key}");
                assert_eq!(registry.len(), 6, "{key}");
            }
        }
    }

    #[test]
    fn test_deny_policy_restores_builtin() {
        let mut registry = OptionRegistry::new();
        registry.add_config(DEBUG, "-D", "--dbg", OptionKind::flag(true), "Mine").unwrap();
        with_builtins(&mut registry, OverridePolicy::Deny);

        let debug = registry.get(DEBUG).unwrap();
        assert_eq!(debug.short, Some('d'));
        assert_eq!(debug.kind, OptionKind::flag(false));
    }

    #[test]
    fn test_builtin_with_taken_flag_is_skipped() {
        let mut registry = OptionRegistry::new();
        registry.add_config("dryRun", "-d", "--dry-run", OptionKind::flag(false), "").unwrap();
        with_builtins(&mut registry, OverridePolicy::Allow);

        assert!(!registry.contains_key(DEBUG));
        assert!(registry.contains_key(LOGFILE));
        assert_eq!(registry.get("dryRun").unwrap().short, Some('d'));
    }

    #[test]
    fn test_apply_defaults() {
        let mut registry = OptionRegistry::new();
        with_builtins(&mut registry, OverridePolicy::Allow);

        let defaults = HashMap::from([
            (DEBUG.to_string(), OptionValue::Bool(true)),
            (LOGFILE.to_string(), OptionValue::from("other.log")),
            (CONFIG_FILE.to_string(), OptionValue::Bool(true)),
            ("missing".to_string(), OptionValue::Bool(true)),
        ]);
        registry.apply_defaults(&defaults);

        assert_eq!(registry.get(DEBUG).unwrap().kind, OptionKind::flag(true));
        assert_eq!(registry.get(LOGFILE).unwrap().kind, OptionKind::value("other.log"));
        assert_eq!(registry.get(CONFIG_FILE).unwrap().kind, OptionKind::value_without_default());
        assert!(!registry.contains_key("missing"));
    }
}
