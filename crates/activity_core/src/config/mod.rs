use crate::display::Tone;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

const APP_DIR_NAME: &str = "activityapp";
const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "ACTIVITYAPP_CONFIG_PATH";
const RESET: &str = "\x1b[0m";

/// ANSI escape per tone; an empty palette paints nothing.
#[derive(Debug, Clone)]
pub struct Palette {
    codes: Option<[&'static str; 8]>,
}

impl Palette {
    pub fn plain() -> Self {
        Self { codes: None }
    }

    pub fn is_plain(&self) -> bool {
        self.codes.is_none()
    }

    pub fn code(&self, tone: Tone) -> &'static str {
        match self.codes {
            Some(codes) => codes[tone_index(tone)],
            None => "",
        }
    }

    pub fn paint(&self, text: &str, tone: Tone) -> String {
        let code = self.code(tone);
        if code.is_empty() {
            text.to_string()
        } else {
            format!("{code}{text}{RESET}")
        }
    }
}

fn tone_index(tone: Tone) -> usize {
    match tone {
        Tone::Green => 0,
        Tone::Blue => 1,
        Tone::Yellow => 2,
        Tone::Red => 3,
        Tone::Orange => 4,
        Tone::Purple => 5,
        Tone::Indigo => 6,
        Tone::Gray => 7,
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.and_then(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            codes: Some([
                "\x1b[38;5;114m",
                "\x1b[38;5;75m",
                "\x1b[38;5;221m",
                "\x1b[38;5;203m",
                "\x1b[38;5;208m",
                "\x1b[38;5;141m",
                "\x1b[38;5;105m",
                "\x1b[38;5;250m",
            ]),
        },
        Some("solarized") => Palette {
            codes: Some([
                "\x1b[38;5;64m",
                "\x1b[38;5;33m",
                "\x1b[38;5;136m",
                "\x1b[38;5;160m",
                "\x1b[38;5;166m",
                "\x1b[38;5;125m",
                "\x1b[38;5;61m",
                "\x1b[38;5;245m",
            ]),
        },
        _ => Palette::plain(),
    }
}

pub fn canonical_theme_name(raw: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        return Some("default".into());
    }

    match trimmed {
        "vanilla" | "light" | "plain" => Some("default".to_string()),
        "dark" | "dark_mode" | "darkmode" => Some("noir".to_string()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    /// JSON seed file replacing the built-in mock data.
    #[serde(default)]
    pub seed_path: Option<PathBuf>,
    /// Pins the offset due dates are rendered in; local time otherwise.
    #[serde(default)]
    pub utc_offset_hours: Option<i8>,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub seed_path: Option<PathBuf>,
    pub utc_offset_hours: Option<i8>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => {
            warn!(error = %err, "cannot locate config file, using defaults");
            ConfigLoad {
                config: Config::default(),
                error: Some(err),
            }
        }
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config file rejected, using defaults");
            ConfigLoad {
                config: Config::default(),
                error: Some(err),
            }
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    validate_offset(config.utc_offset_hours)?;
    Ok(normalize_config_theme(config))
}

pub fn validate_offset(hours: Option<i8>) -> Result<(), AppError> {
    match hours {
        Some(value) if !(-23..=23).contains(&value) => Err(AppError::invalid_data(format!(
            "utc_offset_hours must be between -23 and 23, got {value}"
        ))),
        _ => Ok(()),
    }
}

fn normalize_config_theme(mut config: Config) -> Config {
    config.theme = config.theme.and_then(|name| canonical_theme_name(&name));
    config
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(normalized) = overrides
        .theme
        .as_deref()
        .and_then(canonical_theme_name)
    {
        merged.theme = Some(normalized);
    }
    if let Some(seed_path) = overrides.seed_path.as_ref() {
        merged.seed_path = Some(seed_path.clone());
    }
    if overrides.utc_offset_hours.is_some() {
        merged.utc_offset_hours = overrides.utc_offset_hours;
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{
        Config, ConfigOverrides, canonical_theme_name, load_config_from_path,
        load_config_with_fallback_from_path, merge_overrides, palette_for_theme,
    };
    use crate::display::Tone;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("activityapp-{nanos}-{file_name}"))
    }

    #[test]
    fn load_config_missing_returns_defaults_without_error() {
        let path = temp_path("missing-config.json");
        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
    }

    #[test]
    fn load_config_invalid_returns_defaults_and_error() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);
        fs::remove_file(&path).ok();

        assert_eq!(result.config, Config::default());
        assert_eq!(result.error.map(|err| err.code()), Some("invalid_data"));
    }

    #[test]
    fn load_config_reads_valid_file() {
        let path = temp_path("valid-config.json");
        let content = serde_json::json!({
            "theme": "Dark Mode",
            "seed_path": "/tmp/seed.json",
            "utc_offset_hours": -5
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.theme.as_deref(), Some("noir"));
        assert_eq!(loaded.seed_path, Some(PathBuf::from("/tmp/seed.json")));
        assert_eq!(loaded.utc_offset_hours, Some(-5));
    }

    #[test]
    fn load_config_rejects_out_of_range_offset() {
        let path = temp_path("bad-offset.json");
        fs::write(&path, r#"{"utc_offset_hours": 40}"#).unwrap();

        let err = load_config_from_path(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn merge_overrides_replaces_only_given_fields() {
        let base = Config {
            theme: Some("default".into()),
            seed_path: Some(PathBuf::from("a.json")),
            utc_offset_hours: Some(1),
        };

        let overrides = ConfigOverrides {
            theme: Some("Solarized".into()),
            seed_path: None,
            utc_offset_hours: Some(-3),
        };

        let merged = merge_overrides(&base, &overrides);
        assert_eq!(merged.theme.as_deref(), Some("solarized"));
        assert_eq!(merged.seed_path, Some(PathBuf::from("a.json")));
        assert_eq!(merged.utc_offset_hours, Some(-3));
        assert_eq!(base.theme.as_deref(), Some("default"));

        assert_eq!(merge_overrides(&base, &ConfigOverrides::default()), base);
    }

    #[test]
    fn canonical_theme_name_maps_variants() {
        assert_eq!(canonical_theme_name("Vanilla"), Some("default".into()));
        assert_eq!(canonical_theme_name("Noir"), Some("noir".into()));
        assert_eq!(canonical_theme_name("dark-mode"), Some("noir".into()));
        assert_eq!(canonical_theme_name("  "), Some("default".into()));
    }

    #[test]
    fn palette_paints_tones_per_theme() {
        let plain = palette_for_theme(Some("vanilla"));
        assert!(plain.is_plain());
        assert_eq!(plain.paint("late", Tone::Red), "late");

        let noir = palette_for_theme(Some("noir"));
        assert_eq!(noir.code(Tone::Orange), "\x1b[38;5;208m");
        assert_eq!(noir.paint("late", Tone::Red), "\x1b[38;5;203mlate\x1b[0m");

        assert!(palette_for_theme(Some("oceanic")).is_plain());
        assert!(palette_for_theme(None).is_plain());
    }
}
