use crate::error::{Result, StudioError};
use chrono::{DateTime, Utc};
use colored::*;
use log::{Level, LevelFilter, Metadata, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use uuid::Uuid;

static STUDIO_LOGGER: Lazy<StudioLogger> = Lazy::new(StudioLogger::new);

pub fn init() -> Result<()> {
    init_with_config(LoggerConfig::default())
}

/// Installs the crate logger. Calling it again only swaps the configuration.
pub fn init_with_config(config: LoggerConfig) -> Result<()> {
    let max_level = config.max_level_filter();
    STUDIO_LOGGER.update_config(config);

    if log::set_logger(&*STUDIO_LOGGER).is_err() && !STUDIO_LOGGER.is_installed() {
        return Err(StudioError::ConfigError(
            "another logger is already installed".into(),
        ));
    }
    STUDIO_LOGGER.mark_installed();
    log::set_max_level(max_level);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn color(&self) -> Color {
        match self {
            LogLevel::Trace => Color::Cyan,
            LogLevel::Debug => Color::Blue,
            LogLevel::Info => Color::Green,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            LogLevel::Trace => "🔍",
            LogLevel::Debug => "🐛",
            LogLevel::Info => "💡",
            LogLevel::Warn => "⚠️",
            LogLevel::Error => "❌",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }

    // log::Level orders Error lowest, ours orders it highest
    fn admits(self, level: Level) -> bool {
        LogLevel::from(level) >= self
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => LogLevel::Trace,
            Level::Debug => LogLevel::Debug,
            Level::Info => LogLevel::Info,
            Level::Warn => LogLevel::Warn,
            Level::Error => LogLevel::Error,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl LogEntry {
    fn from_record(record: &Record) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            level: record.level().into(),
            target: record.target().to_string(),
            message: record.args().to_string(),
            location: record
                .file()
                .map(|file| format!("{}:{}", file, record.line().unwrap_or(0))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub min_level: LogLevel,
    pub show_colors: bool,
    pub show_emojis: bool,
    pub show_location: bool,
    pub timestamp_format: String,
    pub output_json: bool,
    /// Per-target minimum levels, matched by prefix (e.g. `hyper`).
    pub target_levels: Vec<(String, LogLevel)>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: true,
            show_emojis: true,
            show_location: false,
            timestamp_format: "%Y-%m-%d %H:%M:%S%.3f".to_string(),
            output_json: false,
            target_levels: vec![
                ("hyper".to_string(), LogLevel::Warn),
                ("reqwest".to_string(), LogLevel::Warn),
            ],
        }
    }
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_colors(mut self, enabled: bool) -> Self {
        self.show_colors = enabled;
        self
    }

    pub fn with_json_output(mut self, enabled: bool) -> Self {
        self.output_json = enabled;
        self
    }

    pub fn with_target_level(mut self, target: impl Into<String>, level: LogLevel) -> Self {
        self.target_levels.push((target.into(), level));
        self
    }

    pub fn production() -> Self {
        Self {
            min_level: LogLevel::Info,
            show_colors: false,
            show_emojis: false,
            output_json: true,
            ..Default::default()
        }
    }

    pub fn development() -> Self {
        Self {
            min_level: LogLevel::Debug,
            show_location: true,
            ..Default::default()
        }
    }

    fn threshold_for(&self, target: &str) -> LogLevel {
        self.target_levels
            .iter()
            .filter(|(prefix, _)| target.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, level)| *level)
            .unwrap_or(self.min_level)
    }

    fn max_level_filter(&self) -> LevelFilter {
        self.target_levels
            .iter()
            .map(|(_, level)| *level)
            .chain(std::iter::once(self.min_level))
            .min()
            .unwrap_or(self.min_level)
            .to_level_filter()
    }

    fn format_line(&self, entry: &LogEntry) -> String {
        if self.output_json {
            return serde_json::to_string(entry).unwrap_or_else(|_| entry.message.clone());
        }

        let timestamp = entry.timestamp.format(&self.timestamp_format).to_string();
        let level = if self.show_emojis {
            format!("{} {}", entry.level.emoji(), entry.level.as_str())
        } else {
            entry.level.as_str().to_string()
        };
        let location = match (&entry.location, self.show_location) {
            (Some(location), true) => format!(" ({})", location),
            _ => String::new(),
        };

        if self.show_colors {
            format!(
                "{} [{}] {}: {}{}",
                timestamp.bright_black(),
                level.color(entry.level.color()).bold(),
                entry.target.bright_blue(),
                entry.message,
                location.bright_black()
            )
        } else {
            format!(
                "{} [{}] {}: {}{}",
                timestamp, level, entry.target, entry.message, location
            )
        }
    }
}

pub struct StudioLogger {
    config: RwLock<LoggerConfig>,
    installed: RwLock<bool>,
}

impl StudioLogger {
    fn new() -> Self {
        Self {
            config: RwLock::new(LoggerConfig::default()),
            installed: RwLock::new(false),
        }
    }

    fn update_config(&self, config: LoggerConfig) {
        if let Ok(mut current) = self.config.write() {
            *current = config;
        }
    }

    fn is_installed(&self) -> bool {
        self.installed.read().map(|flag| *flag).unwrap_or(false)
    }

    fn mark_installed(&self) {
        if let Ok(mut flag) = self.installed.write() {
            *flag = true;
        }
    }
}

impl log::Log for StudioLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        match self.config.read() {
            Ok(config) => config
                .threshold_for(metadata.target())
                .admits(metadata.level()),
            Err(_) => true,
        }
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_record(record);
        if let Ok(config) = self.config.read() {
            let line = config.format_line(&entry);
            if entry.level >= LogLevel::Warn {
                let _ = writeln!(io::stderr(), "{}", line);
            } else {
                let _ = writeln!(io::stdout(), "{}", line);
            }
        }
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
    }
}

/// Logs how long a named operation took when dropped.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn new(name: &str) -> Self {
        log::debug!("⏱️  Starting timer: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::info!(
            "⏱️  {} completed in {:.1}s",
            self.name,
            self.elapsed().as_secs_f64()
        );
    }
}

pub fn timer(name: &str) -> Timer {
    Timer::new(name)
}

pub fn log_config_info(config: &crate::config::Config) {
    log::info!("⚙️  Configuration loaded:");
    log::info!("   API base: {}", config.gemini.api_base);
    log::info!("   Image model: {}", config.gemini.image_model);
    log::info!("   Text model: {}", config.gemini.text_model);
    log::info!(
        "   Round: {} variants, {:?} cooldown",
        config.orchestrator.variant_count,
        config.orchestrator.cooldown
    );
    log::info!(
        "   API key: {}",
        if config.credential.is_some() { "✅" } else { "❌" }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        LogEntry {
            id: "id".into(),
            timestamp: Utc::now(),
            level,
            target: "rposeai::orchestrator".into(),
            message: message.into(),
            location: Some("src/orchestrator.rs:10".into()),
        }
    }

    #[test]
    fn test_log_levels() {
        assert_eq!(LogLevel::Info.as_str(), "INFO");
        assert_eq!(LogLevel::Error.emoji(), "❌");
        assert_eq!(LogLevel::Debug.color(), Color::Blue);
        assert!(LogLevel::Info.admits(Level::Error));
        assert!(!LogLevel::Warn.admits(Level::Info));
    }

    #[test]
    fn test_logger_config_presets() {
        let config = LoggerConfig::development();
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(config.show_colors);

        let prod_config = LoggerConfig::production();
        assert!(!prod_config.show_colors);
        assert!(prod_config.output_json);
    }

    #[test]
    fn longest_target_prefix_wins() {
        let config = LoggerConfig::new()
            .with_level(LogLevel::Debug)
            .with_target_level("rposeai::gemini", LogLevel::Error);
        assert_eq!(config.threshold_for("hyper::client"), LogLevel::Warn);
        assert_eq!(config.threshold_for("rposeai::gemini::image_client"), LogLevel::Error);
        assert_eq!(config.threshold_for("rposeai::orchestrator"), LogLevel::Debug);
        assert_eq!(config.max_level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn plain_and_json_formats() {
        let plain = LoggerConfig::new().with_colors(false);
        let line = plain.format_line(&entry(LogLevel::Warn, "Variant 2/4 failed"));
        assert!(line.contains("[⚠️ WARN] rposeai::orchestrator: Variant 2/4 failed"));
        assert!(!line.contains("src/orchestrator.rs"));

        let json = LoggerConfig::production().format_line(&entry(LogLevel::Info, "done"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["level"], "INFO");
        assert_eq!(value["message"], "done");
    }

    #[test]
    fn test_logger_initialization_is_repeatable() {
        assert!(init_with_config(LoggerConfig::development()).is_ok());
        assert!(init_with_config(LoggerConfig::production()).is_ok());
    }
}
