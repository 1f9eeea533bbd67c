use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::speech::Voice;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_content_dir")]
    pub content_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default = "default_speech_lang")]
    pub speech_lang: String,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
}

fn default_poll_interval_ms() -> u64 {
    100
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shortglish")
        .to_string_lossy()
        .to_string()
}
fn default_content_dir() -> String {
    "public".to_string()
}
fn default_speech_lang() -> String {
    "en-US".to_string()
}
fn default_speech_rate() -> f32 {
    0.9
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            data_dir: default_data_dir(),
            content_dir: default_content_dir(),
            content_url: None,
            speech_lang: default_speech_lang(),
            speech_rate: default_speech_rate(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shortglish")
            .join("config.toml")
    }

    /// Pull out-of-range values back to something usable.
    pub fn validate(&mut self) {
        self.poll_interval_ms = self.poll_interval_ms.clamp(20, 1000);
        if !self.speech_rate.is_finite() {
            self.speech_rate = default_speech_rate();
        }
        self.speech_rate = self.speech_rate.clamp(0.1, 10.0);
        if self.speech_lang.trim().is_empty() {
            self.speech_lang = default_speech_lang();
        }
        if self.content_url.as_deref().is_some_and(|u| u.trim().is_empty()) {
            self.content_url = None;
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn content_path(&self) -> PathBuf {
        PathBuf::from(&self.content_dir)
    }

    pub fn voice(&self) -> Voice {
        Voice {
            lang: self.speech_lang.clone(),
            rate: self.speech_rate,
            ..Voice::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.content_dir, "public");
        assert_eq!(config.content_url, None);
        assert_eq!(config.speech_lang, "en-US");
        assert!(config.data_dir.contains("shortglish"));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
poll_interval_ms = 250
content_url = "https://example.org/content"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.content_url.as_deref(), Some("https://example.org/content"));
        assert_eq!(config.speech_rate, 0.9);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.poll_interval_ms, deserialized.poll_interval_ms);
        assert_eq!(config.data_dir, deserialized.data_dir);
        assert_eq!(config.content_url, deserialized.content_url);
    }

    #[test]
    fn test_validate_clamps_out_of_range_values() {
        let mut config = Config {
            poll_interval_ms: 1,
            speech_rate: 50.0,
            speech_lang: "  ".to_string(),
            content_url: Some(String::new()),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.poll_interval_ms, 20);
        assert_eq!(config.speech_rate, 10.0);
        assert_eq!(config.speech_lang, "en-US");
        assert_eq!(config.content_url, None);

        config.poll_interval_ms = 60_000;
        config.speech_rate = f32::NAN;
        config.validate();
        assert_eq!(config.poll_interval_ms, 1000);
        assert_eq!(config.speech_rate, 0.9);
    }

    #[test]
    fn test_voice_follows_config() {
        let config = Config {
            speech_lang: "en-GB".to_string(),
            speech_rate: 1.2,
            ..Config::default()
        };
        let voice = config.voice();
        assert_eq!(voice.lang, "en-GB");
        assert_eq!(voice.rate, 1.2);
        assert_eq!(voice.pitch, 1.0);
    }
}
