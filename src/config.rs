//! Chart definition: categories, scale and smoothing parameters, loaded
//! from a TOML file with environment overrides.

use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::Srgba;
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Display color in `#rrggbb` or `#rrggbbaa` form.
#[derive(Debug, Clone, Copy, PartialEq, DeserializeFromStr)]
pub struct HexColor(pub Srgba<f64>);

impl FromStr for HexColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError(s.to_string()))?;
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ParseColorError(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|_| ParseColorError(s.to_string()))
        };

        let (r, g, b) = (channel(0..2)?, channel(2..4)?, channel(4..6)?);
        let a = if hex.len() == 8 { channel(6..8)? } else { 1.0 };
        Ok(HexColor(Srgba::new(r, g, b, a)))
    }
}

#[derive(Debug, Error)]
#[error("invalid color {0:?}, expected #rrggbb")]
pub struct ParseColorError(String);

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CornerOption {
    pub title: String,
    pub description: String,
}

/// One category as it appears in the file. Fields stay optional so a single
/// bad category can be skipped without failing the whole load.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCategory {
    pub name: Option<String>,
    pub color: Option<HexColor>,
    #[serde(default)]
    pub options: Vec<CornerOption>,
}

#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("missing name")]
    MissingName,
    #[error("missing color")]
    MissingColor,
    #[error("expected exactly 3 options, got {0}")]
    WrongOptionCount(usize),
}

impl RawCategory {
    pub fn validate(&self) -> Result<(String, Srgba<f64>, [CornerOption; 3]), CategoryError> {
        let name = self.name.clone().ok_or(CategoryError::MissingName)?;
        let color = self.color.ok_or(CategoryError::MissingColor)?.0;
        let corners: [CornerOption; 3] = self
            .options
            .clone()
            .try_into()
            .map_err(|v: Vec<_>| CategoryError::WrongOptionCount(v.len()))?;
        Ok((name, color, corners))
    }

    #[cfg(test)]
    pub fn for_tests(name: &str) -> Self {
        let option = |title: &str| CornerOption {
            title: title.to_string(),
            description: String::new(),
        };
        Self {
            name: Some(name.to_string()),
            color: Some(HexColor::from_str("#00d1ff").unwrap()),
            options: vec![option("a"), option("b"), option("c")],
        }
    }
}

fn default_scale_step() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub categories: Vec<RawCategory>,
    pub scale_size: usize,
    #[serde(default = "default_scale_step")]
    pub scale_step: usize,
    #[serde(default)]
    pub dual_scale: bool,
    /// Blend between polygon (0) and circle (1) for the background rings.
    #[serde(default)]
    pub smoothing: f64,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to determine config directory")]
    ConfigDirNotFound,
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("chart defines no categories")]
    NoCategories,
    #[error("scale size must be at least 1")]
    ZeroScaleSize,
    #[error("notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "motivrad", "motivrad").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("chart.toml"))
}

fn validate(config: ChartConfig) -> Result<ChartConfig, ConfigError> {
    if config.categories.is_empty() {
        return Err(ConfigError::NoCategories);
    }
    if config.scale_size == 0 {
        return Err(ConfigError::ZeroScaleSize);
    }
    Ok(config)
}

pub fn load_config(path_override: Option<&Path>) -> Result<ChartConfig, ConfigError> {
    let config_path = match path_override {
        Some(p) => p.to_path_buf(),
        None => get_config_path()?,
    };

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(config::Environment::with_prefix("MOTIVRAD"))
        .build()?;

    validate(s.try_deserialize()?)
}

/// Loads the user chart, falling back to the built-in default when the file
/// is absent or rejected. A rejected file is reported, never partially
/// applied.
pub fn load_or_default(path_override: Option<&Path>) -> ChartConfig {
    match load_config(path_override) {
        Ok(c) => c,
        Err(e) => {
            log::error!("failed to load chart definition, using built-in default: {e}");
            builtin_chart()
        }
    }
}

fn builtin_chart() -> ChartConfig {
    let s = config::Config::builder()
        .add_source(config::File::from_str(
            DEFAULT_CHART,
            config::FileFormat::Toml,
        ))
        .build()
        .expect("built-in chart definition is well-formed");
    s.try_deserialize()
        .expect("built-in chart definition matches the schema")
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CHART)?;
    }
    Ok(path)
}

const DEFAULT_CHART: &str = include_str!("default_chart.toml");

/// Watches the chart definition and emits a reload event on changes.
pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("chart watcher error: {e}");
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("failed to create config directory for watching: {e}");
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("failed to create watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("failed to watch config directory: {e}");
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ChartReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("watch error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        let c = HexColor::from_str("#ff8000").unwrap().0;
        assert!((c.red - 1.0).abs() < 1e-9);
        assert!((c.green - 128.0 / 255.0).abs() < 1e-9);
        assert!((c.blue - 0.0).abs() < 1e-9);
        assert_eq!(c.alpha, 1.0);

        let with_alpha = HexColor::from_str("#00000080").unwrap().0;
        assert!((with_alpha.alpha - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["ff8000", "#ff80", "#gggggg", "", "#ff80001"] {
            assert!(HexColor::from_str(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn category_validation_reports_each_defect() {
        let mut raw = RawCategory::for_tests("K");
        assert!(raw.validate().is_ok());

        raw.color = None;
        assert!(matches!(raw.validate(), Err(CategoryError::MissingColor)));

        let mut raw = RawCategory::for_tests("K");
        raw.options.pop();
        assert!(matches!(
            raw.validate(),
            Err(CategoryError::WrongOptionCount(2))
        ));

        let mut raw = RawCategory::for_tests("K");
        raw.name = None;
        assert!(matches!(raw.validate(), Err(CategoryError::MissingName)));
    }

    #[test]
    fn builtin_chart_is_valid() {
        let chart = builtin_chart();
        let validated = validate(chart).unwrap();
        assert!(!validated.categories.is_empty());
        assert!(validated.scale_size >= 1);
        for raw in &validated.categories {
            raw.validate().unwrap();
        }
    }

    #[test]
    fn empty_chart_is_rejected() {
        let config = ChartConfig {
            categories: Vec::new(),
            scale_size: 10,
            scale_step: 1,
            dual_scale: false,
            smoothing: 0.0,
        };
        assert!(matches!(validate(config), Err(ConfigError::NoCategories)));
    }
}
