use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub poll_interval_secs: u64,
    pub database_path: Option<PathBuf>,
    pub theme: String,
    pub color_support: String,
    pub border_style: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            poll_interval_secs: 1,
            database_path: None,
            theme: "dark".to_string(),
            color_support: "auto".to_string(),
            border_style: "rounded".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub record: String,
    pub history: String,
    pub interval: String,
    pub help: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            record: "r".to_string(),
            history: "h".to_string(),
            interval: "i".to_string(),
            help: "?".to_string(),
        }
    }
}

pub fn parse_key(s: &str) -> Option<KeyCode> {
    match s {
        "Enter" => Some(KeyCode::Enter),
        "Escape" | "Esc" => Some(KeyCode::Esc),
        "Space" => Some(KeyCode::Char(' ')),
        "Tab" => Some(KeyCode::Tab),
        "Backspace" => Some(KeyCode::Backspace),
        s if s.chars().count() == 1 => s.chars().next().map(KeyCode::Char),
        _ => None,
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vitals").join("config.toml"))
}

/// Default database location when neither the CLI nor the config file names
/// one.
pub fn default_db_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("vitals").join("usage.db"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.poll_interval_secs, 1);
        assert!(config.general.database_path.is_none());
        assert_eq!(config.general.theme, "dark");
        assert_eq!(config.keybinds.quit, "q");
        assert_eq!(config.keybinds.record, "r");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
poll_interval_secs = 5
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.poll_interval_secs, 5);
        // Other fields should be defaults
        assert_eq!(config.general.theme, "dark");
        assert_eq!(config.keybinds.history, "h");
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
poll_interval_secs = 2
database_path = "/tmp/vitals-test.db"
theme = "light"
border_style = "thin"

[keybinds]
quit = "x"
record = "Space"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.poll_interval_secs, 2);
        assert_eq!(
            config.general.database_path.as_deref(),
            Some(Path::new("/tmp/vitals-test.db"))
        );
        assert_eq!(config.general.theme, "light");
        assert_eq!(config.general.border_style, "thin");
        assert_eq!(config.keybinds.quit, "x");
        assert_eq!(config.keybinds.record, "Space");
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.poll_interval_secs, 1);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("vitals_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.general.poll_interval_secs, 1);
        let _ = std::fs::remove_file(&temp);
    }

    #[test]
    fn parse_key_named_and_single_chars() {
        assert_eq!(parse_key("q"), Some(KeyCode::Char('q')));
        assert_eq!(parse_key("?"), Some(KeyCode::Char('?')));
        assert_eq!(parse_key("Enter"), Some(KeyCode::Enter));
        assert_eq!(parse_key("Escape"), Some(KeyCode::Esc));
        assert_eq!(parse_key("Space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("NotAKey"), None);
    }
}
