use crate::LogSettings;
use anyhow::{Context, Result};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::File;
use time::macros::format_description;

/// Install the global logger: terminal output, plus a log file when one is
/// configured. Fails if a logger is already installed.
pub fn init(settings: &LogSettings) -> Result<()> {
    let level = LevelFilter::from(settings.level);
    let config = ConfigBuilder::new()
        .set_time_format_custom(format_description!(
            "[hour]:[minute]:[second].[subsecond digits:3]"
        ))
        .set_target_level(LevelFilter::Error)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &settings.file {
        let file = File::create(path)
            .with_context(|| format!("couldn't create log file {}", path.display()))?;
        loggers.push(WriteLogger::new(level, config, file));
    }

    CombinedLogger::init(loggers).context("logger is already initialized")
}
