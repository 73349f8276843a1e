use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::defs::{ADVANCE_DELAY, GRID_COLUMNS, INITIAL_PAIRS, Number, PAIRS_INCREMENT, PULSE_DURATION};
use crate::logging::{log_info, log_warning};
use crate::strings::Language;

pub const DEFAULT_CONFIG_PATH: &str = "conf/game.conf";
pub const DEFAULT_LOG_FILE: &str = "logs/cumanes.log";

#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub initial_pairs: Number,
    pub pairs_increment: Number,
    pub pulse_ms: u64,
    pub advance_delay_ms: u64,
    pub auto_advance: bool,
    pub columns: usize,
    pub language: Language,
    pub log_file: Option<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_pairs: INITIAL_PAIRS,
            pairs_increment: PAIRS_INCREMENT,
            pulse_ms: PULSE_DURATION.as_millis() as u64,
            advance_delay_ms: ADVANCE_DELAY.as_millis() as u64,
            auto_advance: true,
            columns: GRID_COLUMNS,
            language: Language::Spanish,
            log_file: Some(DEFAULT_LOG_FILE.to_string()),
        }
    }
}

impl GameConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_str_content(&content)
    }

    pub fn from_str_content(content: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config_map = parse_config(content)?;
        let defaults = Self::default();

        let initial_pairs = config_map.get("initial_pairs")
            .and_then(|v| v.parse::<Number>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(defaults.initial_pairs);

        let pairs_increment = config_map.get("pairs_increment")
            .and_then(|v| v.parse::<Number>().ok())
            .unwrap_or(defaults.pairs_increment);

        let pulse_ms = config_map.get("pulse_ms")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.pulse_ms);

        let advance_delay_ms = config_map.get("advance_delay_ms")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.advance_delay_ms);

        let auto_advance = config_map.get("auto_advance")
            .and_then(|v| parse_bool(v))
            .unwrap_or(defaults.auto_advance);

        let columns = config_map.get("columns")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&v| v > 0)
            .unwrap_or(defaults.columns);

        let language = match config_map.get("language") {
            Some(value) => value.parse::<Language>()?,
            None => defaults.language,
        };

        // An empty value turns file logging off.
        let log_file = match config_map.get("log_file") {
            Some(value) if value.is_empty() => None,
            Some(value) => Some(value.clone()),
            None => defaults.log_file,
        };

        Ok(GameConfig {
            initial_pairs,
            pairs_increment,
            pulse_ms,
            advance_delay_ms,
            auto_advance,
            columns,
            language,
            log_file,
        })
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => {
                log_info(&format!("Loaded game configuration from {}", path.display()));
                config
            }
            Err(e) => {
                log_warning(&format!(
                    "Could not load game config from {}: {e}. Using defaults.",
                    path.display()
                ));
                Self::default()
            }
        }
    }

    pub fn pulse_duration(&self) -> Duration {
        Duration::from_millis(self.pulse_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_config(content: &str) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let mut config = HashMap::new();

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                config.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => return Err(format!("line {}: expected key = value, found '{line}'", line_no + 1).into()),
        }
    }

    Ok(config)
}
