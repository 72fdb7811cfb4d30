//! Integration tests for the library API

use bearconf::{
    load_json, Bootstrap, LoadOptions, LogSettings, Logger, OptionKind, OverridePolicy,
};
use std::fs;
use tempfile::TempDir;
use tracing_subscriber::filter::LevelFilter;

/// A logger writing only to `dir/test.log`, active on this thread.
fn file_logger(dir: &TempDir) -> (Logger, tracing::subscriber::DefaultGuard) {
    let (logger, subscriber) = Logger::new("itest");
    let guard = tracing::subscriber::set_default(subscriber);
    logger
        .init_logs(&LogSettings {
            echo: false,
            level: LevelFilter::DEBUG,
            log_path: Some(dir.path().to_path_buf()),
            log_name: Some("test.log".to_string()),
            ..Default::default()
        })
        .expect("init logs");
    (logger, guard)
}

fn log_content(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("test.log")).expect("read log")
}

#[test]
fn test_malformed_json_emits_error_entry() {
    let tmp = TempDir::new().expect("tmp");
    let (_logger, _guard) = file_logger(&tmp);

    let path = tmp.path().join("broken.json");
    fs::write(&path, "{a:").expect("write");

    assert!(load_json(&path).is_empty());
    let content = log_content(&tmp);
    assert!(content.contains("ERROR"), "log was: {content}");
    assert!(content.contains("error during loading of config file"));
    assert!(content.contains("broken.json"));
}

#[test]
fn test_missing_json_is_silent() {
    let tmp = TempDir::new().expect("tmp");
    let (_logger, _guard) = file_logger(&tmp);

    assert!(load_json(&tmp.path().join("absent.json")).is_empty());
    assert!(!log_content(&tmp).contains("ERROR"));
}

#[test]
fn test_invalid_registration_is_logged_and_skipped() {
    let tmp = TempDir::new().expect("tmp");
    let (logger, _guard) = file_logger(&tmp);

    let mut bootstrap = Bootstrap::new(&logger).app_path(tmp.path());
    assert!(bootstrap.add_config("port", "", "", OptionKind::value("80"), "Port").is_err());
    assert!(!bootstrap.registry().contains_key("port"));
    assert!(log_content(&tmp).contains("both cannot be empty"));
}

#[test]
fn test_warn_policy_reports_override() {
    let tmp = TempDir::new().expect("tmp");
    let (logger, _guard) = file_logger(&tmp);

    let mut bootstrap =
        Bootstrap::new(&logger).app_path(tmp.path()).override_policy(OverridePolicy::Warn);
    bootstrap.add_config("verbose", "-V", "--loud", OptionKind::flag(false), "Mine").expect("option");
    assert!(!log_content(&tmp).contains("overrides the built-in"));

    let options = bootstrap.load_from(["itest", "--loud"], &LoadOptions::default()).expect("load");
    assert!(options.get_bool("verbose"));
    assert!(log_content(&tmp).contains("option 'verbose' (-V/--loud) overrides the built-in -v/--verbose"));
}

#[test]
fn test_end_to_end_with_config_search() {
    let app = TempDir::new().expect("tmp");
    let extra = TempDir::new().expect("tmp");
    fs::write(extra.path().join("itest-e2e.json"), r#"{"workers": 8}"#).expect("write");
    let (logger, _subscriber) = Logger::new("itest");

    let mut bootstrap = Bootstrap::new(&logger).app_path(app.path());
    bootstrap.add_config("port", "-p", "--port", OptionKind::value("80"), "Port").expect("option");

    let opts = LoadOptions { config_paths: vec![extra.path().to_path_buf()], ..Default::default() };
    let options = bootstrap
        .load_from(["itest", "-p", "9000", "--config", "itest-e2e.json", "job"], &opts)
        .expect("load");

    assert_eq!(options.get_str("port"), Some("9000"));
    assert_eq!(options.args(), ["job"]);
    assert_eq!(options.config_file, Some(extra.path().join("itest-e2e.json")));
    assert_eq!(options.config.expect("config")["workers"], 8);
}
