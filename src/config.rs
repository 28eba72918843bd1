use anyhow::{Context, Result};
use confique::Config;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Config, Debug, Clone)]
pub struct Conf {
    #[config(nested)]
    pub buffer: BufferSettings,
    #[config(nested)]
    pub log: LogSettings,
    #[config(nested)]
    pub emulator: EmulatorSettings,
}

#[derive(Config, Debug, Clone)]
pub struct BufferSettings {
    /// Capacity of buffers created without an explicit size.
    #[config(default = 32, env = "RSH_DEFAULT_CAPACITY")]
    pub default_capacity: usize,
}

#[derive(Config, Debug, Clone)]
pub struct LogSettings {
    #[config(default = "info", env = "RSH_LOG_LEVEL")]
    pub level: LogLevel,
    /// Also write the log to this file.
    pub file: Option<PathBuf>,
}

#[derive(Config, Debug, Clone)]
pub struct EmulatorSettings {
    #[config(default = 1)]
    pub devices: u16,
    /// Samples per sawtooth period.
    #[config(default = 64)]
    pub period: u32,
    #[config(default = 8192)]
    pub amplitude: i16,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Conf {
    /// Load from a TOML file, with environment variables taking precedence.
    /// A missing file leaves every value at its default.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Conf::builder()
            .env()
            .file(path)
            .load()
            .with_context(|| format!("couldn't load configuration from {}", path.display()))
    }

    pub fn defaults() -> Result<Self> {
        Conf::builder()
            .load()
            .context("couldn't build default configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let conf = Conf::defaults().unwrap();
        assert_eq!(conf.buffer.default_capacity, 32);
        assert_eq!(conf.log.level, LogLevel::Info);
        assert!(conf.log.file.is_none());
        assert_eq!(conf.emulator.devices, 1);
        assert_eq!(conf.emulator.period, 64);
        assert_eq!(conf.emulator.amplitude, 8192);
    }

    #[test]
    fn load_from_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rsh.toml");
        fs::write(
            &path,
            r#"
[buffer]
default_capacity = 128

[log]
level = "trace"
file = "rsh.log"

[emulator]
devices = 3
amplitude = 100
"#,
        )
        .unwrap();

        let conf = Conf::load(&path).unwrap();
        assert_eq!(conf.buffer.default_capacity, 128);
        assert_eq!(LevelFilter::from(conf.log.level), LevelFilter::Trace);
        assert_eq!(conf.log.file, Some(PathBuf::from("rsh.log")));
        assert_eq!(conf.emulator.devices, 3);
        assert_eq!(conf.emulator.period, 64);
        assert_eq!(conf.emulator.amplitude, 100);
    }

    #[test]
    fn bad_values_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rsh.toml");
        fs::write(&path, "[log]\nlevel = \"loud\"\n").unwrap();
        let err = Conf::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("couldn't load configuration"));
    }
}
