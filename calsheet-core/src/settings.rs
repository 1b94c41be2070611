//! Calsheet settings.
//!
//! Settings are layered: built-in defaults, the user config file at
//! ~/.config/calsheet/config.toml, an explicit file passed on the command
//! line, then `CALSHEET__SECTION__KEY` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CalsheetError, CalsheetResult};

/// Schema version understood by this build.
pub const SETTINGS_VERSION: u32 = 1;

static DEFAULT_ICONS_DIR: &str = "icons";

/// Longest accepted `ics.default_duration`.
pub const MAX_DEFAULT_DURATION: Duration = Duration::from_secs(7 * 24 * 3600);

/// Immutable settings shared by the normalizer, paginator and ICS exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: u32,
    pub title: TitleSettings,
    pub color: ColorSettings,
    pub icon: IconSettings,
    pub render: RenderSettings,
    pub ics: IcsSettings,
}

/// Adaptive title sizing, in em.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleSettings {
    /// Size of a zero-length title before clamping
    pub base: f64,
    pub min: f64,
    pub max: f64,
    pub subtitle: SubtitleRule,
}

/// What a present SUBTITLE does to the title size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtitleRule {
    /// Title size is computed from the title length alone
    Ignore,
    /// Any event with a subtitle gets the minimum title size
    ForceMinimum,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub trigger: ColorTrigger,
    /// Token that requests a generated color when `trigger = "sentinel"`
    pub sentinel: String,
    /// Color used for a missing COLOR cell when `trigger = "sentinel"`
    pub fallback: String,
}

/// When a procedural color replaces the COLOR cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTrigger {
    /// Generate a color when the cell is missing or blank
    Blank,
    /// Generate a color only when the cell equals the sentinel token
    Sentinel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconSettings {
    pub dir: PathBuf,
    pub lookup: IconLookup,
}

/// How an ICON cell maps to a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconLookup {
    /// The cell is the file name, extension included
    Literal,
    /// The cell is a bare name and `.svg` is appended
    ImpliedSvg,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IcsSettings {
    /// Duration for rows without END, e.g. "2h" or "1h 30m"
    pub default_duration: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: SETTINGS_VERSION,
            title: TitleSettings::default(),
            color: ColorSettings::default(),
            icon: IconSettings::default(),
            render: RenderSettings::default(),
            ics: IcsSettings::default(),
        }
    }
}

impl Default for TitleSettings {
    fn default() -> Self {
        TitleSettings {
            base: 8.8,
            min: 2.6,
            max: 5.0,
            subtitle: SubtitleRule::ForceMinimum,
        }
    }
}

impl Default for ColorSettings {
    fn default() -> Self {
        ColorSettings {
            trigger: ColorTrigger::Blank,
            sentinel: "random".to_string(),
            fallback: "#222222".to_string(),
        }
    }
}

impl Default for IconSettings {
    fn default() -> Self {
        IconSettings {
            dir: PathBuf::from(DEFAULT_ICONS_DIR),
            lookup: IconLookup::Literal,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings { page_size: 8 }
    }
}

impl Default for IcsSettings {
    fn default() -> Self {
        IcsSettings {
            default_duration: "2h".to_string(),
        }
    }
}

impl Settings {
    /// Path of the user config file (~/.config/calsheet/config.toml)
    pub fn config_path() -> CalsheetResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalsheetError::Config("Could not determine config directory".into()))?
            .join("calsheet");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from every source. `explicit` must exist when given.
    pub fn load(explicit: Option<&Path>) -> CalsheetResult<Self> {
        let user_path = Self::config_path().ok();
        Self::load_layers(user_path.as_deref(), explicit, environment())
    }

    /// Defaults, then the optional user file, the required explicit file and
    /// `env`, later layers winning.
    fn load_layers(
        user_path: Option<&Path>,
        explicit: Option<&Path>,
        env: Environment,
    ) -> CalsheetResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = user_path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        let settings: Settings = builder
            .add_source(env)
            .build()
            .map_err(|e| CalsheetError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalsheetError::Config(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings from a TOML string, falling back to defaults for missing keys.
    pub fn from_toml(content: &str) -> CalsheetResult<Self> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| CalsheetError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml(&self) -> CalsheetResult<String> {
        toml::to_string_pretty(self).map_err(|e| CalsheetError::Config(e.to_string()))
    }

    /// Reject settings the rest of the pipeline cannot work with.
    pub fn validate(&self) -> CalsheetResult<()> {
        if self.version != SETTINGS_VERSION {
            return Err(CalsheetError::Config(format!(
                "Unsupported settings version {} (expected {})",
                self.version, SETTINGS_VERSION
            )));
        }

        let title = &self.title;
        if !(title.min.is_finite() && title.max.is_finite() && title.base.is_finite()) {
            return Err(CalsheetError::Config("Title sizes must be finite numbers".into()));
        }
        if title.min <= 0.0 || title.min > title.max {
            return Err(CalsheetError::Config(format!(
                "Invalid title size range {}..{}",
                title.min, title.max
            )));
        }

        if self.render.page_size == 0 {
            return Err(CalsheetError::InvalidPageSize);
        }

        if self.default_duration()? > MAX_DEFAULT_DURATION {
            return Err(CalsheetError::Config(format!(
                "ics.default_duration '{}' is longer than {}",
                self.ics.default_duration,
                humantime::format_duration(MAX_DEFAULT_DURATION)
            )));
        }
        Ok(())
    }

    /// Icons directory with `~` expanded.
    pub fn icons_dir(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.icon.dir.to_string_lossy()).into_owned();
        PathBuf::from(expanded)
    }

    /// Parsed `ics.default_duration`.
    pub fn default_duration(&self) -> CalsheetResult<Duration> {
        humantime::parse_duration(&self.ics.default_duration).map_err(|e| {
            CalsheetError::Config(format!(
                "Invalid ics.default_duration '{}': {}",
                self.ics.default_duration, e
            ))
        })
    }
}

/// `CALSHEET__SECTION__KEY` variables.
fn environment() -> Environment {
    Environment::with_prefix("CALSHEET")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
