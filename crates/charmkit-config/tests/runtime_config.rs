//! Behavioural tests for runtime configuration layering.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;

use charmkit_config::{DEFAULT_LOG_FILTER, LogFormat, OrthoConfig, RuntimeConfig};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

struct Harness {
    temp_dir: TempDir,
    cli_args: RefCell<Vec<OsString>>,
    loaded: RefCell<Option<RuntimeConfig>>,
}

impl Harness {
    fn new() -> Self {
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temporary directory: {error}"),
        };
        Self {
            temp_dir,
            cli_args: RefCell::new(vec![OsString::from("charm")]),
            loaded: RefCell::new(None),
        }
    }

    fn push_cli_arg(&self, arg: impl Into<OsString>) {
        self.cli_args.borrow_mut().push(arg.into());
    }

    fn write_config(&self, contents: &str) {
        let path = self.temp_dir.path().join("charmkit.toml");
        if let Err(error) = fs::write(&path, contents) {
            panic!("failed to write configuration: {error}");
        }
        self.push_cli_arg("--config-path");
        self.push_cli_arg(path.into_os_string());
    }

    fn config(&self) -> RuntimeConfig {
        if self.loaded.borrow().is_none() {
            let args = self.cli_args.borrow().clone();
            match RuntimeConfig::load_from_iter(args) {
                Ok(config) => *self.loaded.borrow_mut() = Some(config),
                Err(error) => panic!("configuration failed to load: {error}"),
            }
        }
        match self.loaded.borrow().as_ref() {
            Some(config) => config.clone(),
            None => panic!("configuration was not loaded"),
        }
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("the command line sets the log filter to \"{filter}\"")]
fn given_cli_filter(harness: &Harness, filter: String) {
    harness.push_cli_arg("--log-filter");
    harness.push_cli_arg(filter);
}

#[given("the command line sets the log format to \"{format}\"")]
fn given_cli_format(harness: &Harness, format: String) {
    harness.push_cli_arg("--log-format");
    harness.push_cli_arg(format);
}

#[given("a configuration file setting the log format to \"{format}\"")]
fn given_config_file(harness: &Harness, format: String) {
    harness.write_config(&format!("log_format = \"{format}\"\n"));
}

#[when("the runtime configuration loads without overrides")]
fn when_load(harness: &Harness) {
    let _config = harness.config();
}

#[then("the log filter is \"{filter}\"")]
fn then_log_filter(harness: &Harness, filter: String) {
    assert_eq!(harness.config().log_filter(), filter);
}

#[then("the log format is \"{format}\"")]
fn then_log_format(harness: &Harness, format: String) {
    let expected = match format.parse::<LogFormat>() {
        Ok(parsed) => parsed,
        Err(error) => panic!("invalid expected format '{format}': {error}"),
    };
    assert_eq!(harness.config().log_format(), expected);
}

#[scenario(
    path = "tests/features/runtime_config.feature",
    name = "Built-in defaults apply when nothing is configured"
)]
fn defaults_apply(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/runtime_config.feature",
    name = "A command-line flag overrides the log filter"
)]
fn cli_overrides_filter(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/runtime_config.feature",
    name = "A configuration file selects the compact format"
)]
fn file_selects_format(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[scenario(
    path = "tests/features/runtime_config.feature",
    name = "The command line wins over the configuration file"
)]
fn cli_beats_file(#[from(harness)] harness: Harness) {
    drop(harness);
}

#[rstest]
fn bare_command_line_loads_the_defaults() {
    let config = match RuntimeConfig::load_from_iter([OsString::from("charm")]) {
        Ok(config) => config,
        Err(error) => panic!("configuration failed to load: {error}"),
    };
    assert_eq!(config, RuntimeConfig::default());
    assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
    assert_eq!(config.log_format(), LogFormat::Json);
}
