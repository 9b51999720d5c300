// config.rs

use crate::cli::Args;
use crate::midi::EventFilter;
use config::{ConfigError, Environment, File};
use log::{debug, info, LevelFilter};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "MIDIPROBE";

/// Effective settings: defaults, then the settings file, then `MIDIPROBE_*`
/// environment variables, then command-line flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input_device: Option<String>,
    pub output_device: Option<String>,
    pub filter: EventFilter,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            input_device: None,
            output_device: None,
            filter: EventFilter::default(),
            log_level: LevelFilter::Debug,
        }
    }
}

/// `$HOME/.config/midiprobe/settings.toml`, when `HOME` is set.
pub fn default_settings_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("midiprobe")
            .join("settings.toml")
    })
}

impl Settings {
    /// Loads the settings file (missing is fine) and environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = Settings::default();
        let mut builder = config::Config::builder()
            .set_default("ignore_system_exclusive", defaults.filter.ignore_system_exclusive)?
            .set_default("ignore_time", defaults.filter.ignore_time)?
            .set_default("ignore_active_sensing", defaults.filter.ignore_active_sensing)?
            .set_default("log_level", defaults.log_level.to_string())?;

        if let Some(path) = path {
            debug!("Reading settings from {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }
        let source = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let log_level_name = source.get_string("log_level")?;
        let log_level = log_level_name.parse::<LevelFilter>().map_err(|_| {
            ConfigError::Message(format!("unknown log level '{}'", log_level_name))
        })?;

        Ok(Settings {
            input_device: source.get_string("input_device").ok(),
            output_device: source.get_string("output_device").ok(),
            filter: EventFilter {
                ignore_system_exclusive: source.get_bool("ignore_system_exclusive")?,
                ignore_time: source.get_bool("ignore_time")?,
                ignore_active_sensing: source.get_bool("ignore_active_sensing")?,
            },
            log_level,
        })
    }

    /// Applies explicit command-line flags on top of the loaded values.
    pub fn apply_args(mut self, args: &Args) -> Self {
        if let Some(input) = &args.input {
            self.input_device = Some(input.clone());
        }
        if let Some(output) = &args.output {
            self.output_device = Some(output.clone());
        }
        if args.show_sysex {
            info!("System Exclusive events will be shown");
            self.filter.ignore_system_exclusive = false;
        }
        if args.show_time {
            info!("Timing events will be shown");
            self.filter.ignore_time = false;
        }
        if args.show_active_sensing {
            info!("Active Sensing events will be shown");
            self.filter.ignore_active_sensing = false;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn write_settings(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "midiprobe-{}-{}.toml",
            name,
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("midiprobe-does-not-exist.toml");
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.filter, EventFilter::default());
        assert_eq!(settings.input_device, None);
    }

    #[test]
    fn test_file_values_are_read() {
        let path = write_settings(
            "values",
            "input_device = \"Keystation\"\nignore_system_exclusive = false\nlog_level = \"info\"\n",
        );
        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.input_device.as_deref(), Some("Keystation"));
        assert!(!settings.filter.ignore_system_exclusive);
        assert!(settings.filter.ignore_time);
        assert_eq!(settings.log_level, LevelFilter::Info);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_bad_log_level_is_an_error() {
        let path = write_settings("level", "log_level = \"chatty\"\n");
        assert!(Settings::load(Some(&path)).is_err());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_flags_override_settings() {
        let args = Args::parse_from(["test", "--input", "Port A", "--show-sysex"]);
        let settings = Settings::default().apply_args(&args);
        assert_eq!(settings.input_device.as_deref(), Some("Port A"));
        assert!(!settings.filter.ignore_system_exclusive);
        assert!(settings.filter.ignore_active_sensing);
    }
}
