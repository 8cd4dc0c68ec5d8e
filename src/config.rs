use crate::login::palette::Theme;
use crate::login::phase::PhaseTable;
use crate::login::AnimationSettings;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::UtcOffset;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_display_name")]
    pub display_name: String,

    #[serde(default)]
    pub theme: Theme,

    #[serde(default = "default_fps_cap")]
    pub fps_cap: u32,

    /// Size of the headless surface.
    #[serde(default = "default_viewport")]
    pub viewport: Size,

    #[serde(default)]
    pub animation: Animation,

    #[serde(default)]
    pub notifications: Notifications,

    #[serde(default)]
    pub offline: Offline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    #[serde(default = "default_duration")]
    pub duration_secs: f32,
    /// Boundaries between the four phases.
    #[serde(default = "default_phase_boundaries")]
    pub phase_boundaries: [f32; 3],
    #[serde(default = "default_true")]
    pub high_performance: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notifications {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: f32,
    /// Hours east of UTC used to show timestamps.
    #[serde(default = "default_display_offset")]
    pub display_offset_hours: i8,
    /// Sent as the `Cookie` header.
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offline {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cache_version")]
    pub cache_version: String,
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
            theme: Theme::default(),
            fps_cap: default_fps_cap(),
            viewport: default_viewport(),
            animation: Animation::default(),
            notifications: Notifications::default(),
            offline: Offline::default(),
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
            phase_boundaries: default_phase_boundaries(),
            high_performance: true,
        }
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_secs: default_poll_interval(),
            display_offset_hours: default_display_offset(),
            session: None,
        }
    }
}

impl Default for Offline {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_version: default_cache_version(),
            precache: default_precache(),
        }
    }
}

fn default_display_name() -> String {
    "User".to_string()
}

fn default_fps_cap() -> u32 {
    60
}

fn default_viewport() -> Size {
    Size {
        width: 1280,
        height: 800,
    }
}

fn default_duration() -> f32 {
    10.0
}

fn default_phase_boundaries() -> [f32; 3] {
    [0.2, 0.5, 0.9]
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_poll_interval() -> f32 {
    10.0
}

fn default_display_offset() -> i8 {
    8
}

fn default_cache_version() -> String {
    "glint-v1".to_string()
}

fn default_precache() -> Vec<String> {
    vec!["/".to_string()]
}

impl Animation {
    pub fn settings(&self) -> Result<AnimationSettings> {
        if self.duration_secs.is_nan() || self.duration_secs < 0.0 {
            anyhow::bail!("animation duration must not be negative, got {}", self.duration_secs);
        }
        Ok(AnimationSettings {
            duration: self.duration_secs,
            phases: PhaseTable::from_boundaries(self.phase_boundaries)?,
            high_performance: self.high_performance,
        })
    }
}

impl Notifications {
    pub fn display_offset(&self) -> Result<UtcOffset> {
        Ok(UtcOffset::from_hms(self.display_offset_hours, 0, 0)?)
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join("glint").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::login::phase::Phase;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.display_name, "User");
        assert_eq!(config.notifications.poll_interval_secs, 10.0);
        assert_eq!(config.offline.cache_version, "glint-v1");
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
            theme = "dark"

            [animation]
            duration_secs = 6.0

            [notifications]
            display_offset_hours = -5
            "#,
        )
        .unwrap();
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.animation.duration_secs, 6.0);
        assert_eq!(config.animation.phase_boundaries, [0.2, 0.5, 0.9]);
        assert_eq!(config.notifications.base_url, "http://127.0.0.1:5000");
        assert_eq!(
            config.notifications.display_offset().unwrap(),
            UtcOffset::from_hms(-5, 0, 0).unwrap()
        );
        assert!(config.offline.enabled);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glint").join("config.toml");

        let mut config = Config::default();
        config.display_name = "ada".to_string();
        config.offline.precache.push("/static/app.js".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.display_name, "ada");
        assert_eq!(loaded.offline.precache, vec!["/", "/static/app.js"]);
    }

    #[test]
    fn animation_settings_are_validated() {
        let settings = Animation::default().settings().unwrap();
        assert_eq!(settings.duration, 10.0);
        assert_eq!(settings.phases.resolve(0.6).0, Phase::Charts);

        let bad = Animation {
            phase_boundaries: [0.5, 0.2, 0.9],
            ..Animation::default()
        };
        assert!(bad.settings().is_err());

        let negative = Animation {
            duration_secs: -1.0,
            ..Animation::default()
        };
        assert!(negative.settings().is_err());
    }
}
