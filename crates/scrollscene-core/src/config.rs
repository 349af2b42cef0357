use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::geometry::Axis;
use crate::layout::ElementRef;
use crate::pin::PinOptions;
use crate::scene::{trigger_hook_from_name, SceneDuration, SceneOptions};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub smooth: SmoothConfig,
    /// Breakpoint name -> minimum viewport width
    #[serde(default = "default_breakpoints")]
    pub breakpoints: BTreeMap<String, f64>,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub scenes: Vec<SceneConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Scroll axis
    #[serde(default)]
    pub axis: Axis,
    /// Id of the scrollable element; the window when unset
    #[serde(default)]
    pub container: Option<String>,
    /// Geometry poll interval in milliseconds (0 = disabled)
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,
    /// Start with the smoothed scrolling backend
    #[serde(default)]
    pub smooth_scrolling: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            axis: Axis::default(),
            container: None,
            refresh_interval_ms: default_refresh_interval(),
            smooth_scrolling: false,
        }
    }
}

/// Easing curve for programmatic smoothed scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    /// Jump to the end
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    /// Exponential ease-out
    EaseOut,
    Smoothstep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmoothConfig {
    /// Share of the remaining distance covered per frame (0-1]
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Easing for programmatic scroll-to animations
    #[serde(default)]
    pub easing: EasingType,
    /// Programmatic scroll-to duration in milliseconds
    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u64,
    /// Frame rate the smoothed backend is ticked at
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
}

impl Default for SmoothConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            easing: EasingType::default(),
            animation_duration_ms: default_animation_duration(),
            animation_fps: default_animation_fps(),
        }
    }
}

/// Simulated page used by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_page_width")]
    pub width: f64,
    #[serde(default = "default_page_height")]
    pub height: f64,
    /// Total scrollable length of the document
    #[serde(default = "default_content_length")]
    pub content_length: f64,
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            width: default_page_width(),
            height: default_page_height(),
            content_length: default_content_length(),
            elements: Vec::new(),
        }
    }
}

impl PageConfig {
    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f64 {
        (self.content_length - self.height).max(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementConfig {
    pub id: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Initial inline style
    #[serde(default)]
    pub style: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub trigger_element: Option<String>,
    #[serde(default = "default_trigger_hook")]
    pub trigger_hook: HookValue,
    #[serde(default)]
    pub offset: f64,
    #[serde(default)]
    pub duration: DurationSpec,
    #[serde(default = "default_true")]
    pub reverse: bool,
    #[serde(default)]
    pub pin: Option<PinConfig>,
    /// Per-breakpoint overrides, keyed by breakpoint name
    #[serde(default)]
    pub breakpoints: BTreeMap<String, SceneOverride>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: None,
            trigger_element: None,
            trigger_hook: default_trigger_hook(),
            offset: 0.0,
            duration: DurationSpec::default(),
            reverse: true,
            pin: None,
            breakpoints: BTreeMap::new(),
        }
    }
}

impl SceneConfig {
    /// Build immutable scene options, applying the override for `screen_size`
    pub fn scene_options(&self, screen_size: Option<&str>) -> SceneOptions {
        let patch = screen_size.and_then(|screen| self.breakpoints.get(screen));

        let hook = patch.and_then(|p| p.trigger_hook).unwrap_or(self.trigger_hook);
        let offset = patch.and_then(|p| p.offset).unwrap_or(self.offset);
        let duration = patch.and_then(|p| p.duration).unwrap_or(self.duration);
        let reverse = patch.and_then(|p| p.reverse).unwrap_or(self.reverse);

        let mut builder = SceneOptions::builder()
            .trigger_hook(hook.0)
            .offset(offset)
            .duration(duration.into())
            .reverse(reverse);
        if let Some(name) = &self.name {
            builder = builder.name(name.clone());
        }
        if let Some(element) = &self.trigger_element {
            builder = builder.trigger_element(ElementRef::from(element.as_str()));
        }
        if let Some(pin) = &self.pin {
            builder = builder.pin(pin.into());
        }
        builder.build()
    }
}

/// Fields a breakpoint may override
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneOverride {
    #[serde(default)]
    pub trigger_hook: Option<HookValue>,
    #[serde(default)]
    pub offset: Option<f64>,
    #[serde(default)]
    pub duration: Option<DurationSpec>,
    #[serde(default)]
    pub reverse: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinConfig {
    pub element: String,
    /// Grow the spacer by the scene duration so following content is pushed
    #[serde(default = "default_true")]
    pub push_followers: bool,
    #[serde(default)]
    pub relative_width: bool,
    #[serde(default)]
    pub relative_height: bool,
    #[serde(default)]
    pub auto_full_width: bool,
}

impl From<&PinConfig> for PinOptions {
    fn from(config: &PinConfig) -> Self {
        PinOptions::new(config.element.as_str())
            .push_followers(config.push_followers)
            .relative_width(config.relative_width)
            .relative_height(config.relative_height)
            .auto_full_width(config.auto_full_width)
    }
}

/// Trigger hook value
/// Accepts a number in [0, 1] or one of "onEnter", "onCenter", "onLeave"
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct HookValue(pub f64);

impl<'de> Deserialize<'de> for HookValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct HookVisitor;

        impl<'de> Visitor<'de> for HookVisitor {
            type Value = HookValue;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a number or one of \"onEnter\", \"onCenter\", \"onLeave\"")
            }

            fn visit_f64<E>(self, value: f64) -> Result<HookValue, E>
            where
                E: de::Error,
            {
                Ok(HookValue(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<HookValue, E>
            where
                E: de::Error,
            {
                Ok(HookValue(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<HookValue, E>
            where
                E: de::Error,
            {
                Ok(HookValue(value as f64))
            }

            fn visit_str<E>(self, value: &str) -> Result<HookValue, E>
            where
                E: de::Error,
            {
                trigger_hook_from_name(value)
                    .map(HookValue)
                    .ok_or_else(|| E::custom(format!("unknown trigger hook: {}", value)))
            }
        }

        deserializer.deserialize_any(HookVisitor)
    }
}

/// Scene duration as written in configuration
/// Either a pixel count or a percentage of the container size ("50%")
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationSpec {
    Pixels(f64),
    Ratio(f64),
}

impl Default for DurationSpec {
    fn default() -> Self {
        Self::Pixels(0.0)
    }
}

impl From<DurationSpec> for SceneDuration {
    fn from(value: DurationSpec) -> Self {
        match value {
            DurationSpec::Pixels(px) => SceneDuration::Fixed(px),
            DurationSpec::Ratio(ratio) => SceneDuration::Relative(ratio),
        }
    }
}

impl Serialize for DurationSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Pixels(px) => serializer.serialize_f64(*px),
            Self::Ratio(ratio) => serializer.serialize_str(&format!("{}%", ratio * 100.0)),
        }
    }
}

impl<'de> Deserialize<'de> for DurationSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct DurationVisitor;

        impl<'de> Visitor<'de> for DurationVisitor {
            type Value = DurationSpec;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a pixel count or a percentage string such as \"100%\"")
            }

            fn visit_f64<E>(self, value: f64) -> Result<DurationSpec, E>
            where
                E: de::Error,
            {
                Ok(DurationSpec::Pixels(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<DurationSpec, E>
            where
                E: de::Error,
            {
                Ok(DurationSpec::Pixels(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<DurationSpec, E>
            where
                E: de::Error,
            {
                Ok(DurationSpec::Pixels(value as f64))
            }

            // "120" and "120px" are pixels, "50%" is a ratio of the container size
            fn visit_str<E>(self, value: &str) -> Result<DurationSpec, E>
            where
                E: de::Error,
            {
                let value = value.trim();
                if let Some(percent) = value.strip_suffix('%') {
                    let percent: f64 = percent
                        .trim()
                        .parse()
                        .map_err(|_| E::custom(format!("invalid percentage: {}", value)))?;
                    return Ok(DurationSpec::Ratio(percent / 100.0));
                }
                let pixels = value.strip_suffix("px").unwrap_or(value).trim();
                pixels
                    .parse()
                    .map(DurationSpec::Pixels)
                    .map_err(|_| E::custom(format!("invalid duration: {}", value)))
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    100
}

fn default_damping() -> f64 {
    0.1
}

fn default_animation_duration() -> u64 {
    600
}

fn default_animation_fps() -> u32 {
    60
}

fn default_page_width() -> f64 {
    1280.0
}

fn default_page_height() -> f64 {
    800.0
}

fn default_content_length() -> f64 {
    4000.0
}

fn default_trigger_hook() -> HookValue {
    HookValue(0.5)
}

fn default_breakpoints() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("mobile".to_string(), 0.0),
        ("tablet".to_string(), 768.0),
        ("desktop".to_string(), 1024.0),
    ])
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default_with_breakpoints())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollscene/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollscene")
            .join("config.toml")
    }

    // Derived Default leaves the breakpoint table empty
    fn default_with_breakpoints() -> Self {
        Self {
            breakpoints: default_breakpoints(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[controller]
axis = "vertical"
refresh_interval_ms = 50

[[scenes]]
name = "hero"
trigger_element = "hero"
trigger_hook = "onLeave"
duration = "50%"
some_future_field = true

[scenes.pin]
element = "hero"

[scenes.breakpoints.mobile]
duration = 120

[[scenes]]
trigger_hook = 0.25
duration = 300
reverse = false
"#;

    #[test]
    fn test_parse_sample() {
        let config = AppConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.controller.refresh_interval_ms, 50);
        assert_eq!(config.scenes.len(), 2);

        let hero = &config.scenes[0];
        assert_eq!(hero.trigger_hook, HookValue(0.0));
        assert_eq!(hero.duration, DurationSpec::Ratio(0.5));
        assert!(hero.reverse);
        assert!(hero.pin.as_ref().unwrap().push_followers);

        let second = &config.scenes[1];
        assert_eq!(second.trigger_hook, HookValue(0.25));
        assert_eq!(second.duration, DurationSpec::Pixels(300.0));
        assert!(!second.reverse);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.controller.refresh_interval_ms, 100);
        assert!(!config.controller.smooth_scrolling);
        assert_eq!(config.breakpoints.len(), 3);
        assert_eq!(config.smooth.easing, EasingType::Cubic);
    }

    #[test]
    fn test_duration_strings() {
        #[derive(Deserialize)]
        struct Wrapper {
            d: DurationSpec,
        }
        let parse = |s: &str| toml::from_str::<Wrapper>(s).map(|w| w.d);

        assert_eq!(parse("d = \"100%\"").unwrap(), DurationSpec::Ratio(1.0));
        assert_eq!(parse("d = \"250px\"").unwrap(), DurationSpec::Pixels(250.0));
        assert_eq!(parse("d = 12.5").unwrap(), DurationSpec::Pixels(12.5));
        assert!(parse("d = \"fast\"").is_err());
    }

    #[test]
    fn test_unknown_trigger_hook_rejected() {
        let result = AppConfig::from_toml("[[scenes]]\ntrigger_hook = \"onTop\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_breakpoint_override() {
        let config = AppConfig::from_toml(SAMPLE).unwrap();
        let hero = &config.scenes[0];

        let desktop = hero.scene_options(Some("desktop"));
        assert!(matches!(desktop.duration(), SceneDuration::Relative(r) if (*r - 0.5).abs() < 1e-9));

        let mobile = hero.scene_options(Some("mobile"));
        assert!(matches!(mobile.duration(), SceneDuration::Fixed(d) if *d == 120.0));
        assert_eq!(mobile.trigger_hook(), 0.0);
        assert_eq!(mobile.name(), Some("hero"));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = std::env::temp_dir().join(format!("scrollscene-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");

        let config = AppConfig::from_toml(SAMPLE).unwrap();
        config.save(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.scenes.len(), 2);
        assert_eq!(loaded.scenes[0].duration, DurationSpec::Ratio(0.5));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
