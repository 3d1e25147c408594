use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bounds::YearBounds;
use crate::colors::Palette;

pub const DEFAULT_MIN_YEAR: i32 = 1980;
pub const DEFAULT_MAX_YEAR: i32 = 2030;
pub const DEFAULT_PLAY_DELAY_MS: u32 = 1500;
// Replace before deploying. Edit mode is a visibility switch, not access control.
pub const DEFAULT_EDIT_KEY: &str = "change_me";
pub const DEFAULT_STORAGE_KEY: &str = "visits";
pub const DEFAULT_BOOTSTRAP_URL: &str = "visits.json";
/// World outlines with ISO 3166 alpha-2 ids, served from a public CDN.
pub const DEFAULT_GEOGRAPHY_URL: &str =
    "https://cdn.jsdelivr.net/npm/@amcharts/amcharts5-geodata@5/json/worldIndiaLow.json";
pub const CONFIG_URL: &str = "config.json";

/// Runtime settings. Every field may be omitted from `config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Timeline bounds used while there are no records.
    pub default_min_year: i32,
    pub default_max_year: i32,
    /// Years offered by the year selector.
    pub selector_min_year: i32,
    pub selector_max_year: i32,
    pub play_delay_ms: u32,
    pub edit_key: String,
    pub storage_key: String,
    pub bootstrap_url: String,
    pub geography_url: String,
    pub palette: Palette,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_min_year: DEFAULT_MIN_YEAR,
            default_max_year: DEFAULT_MAX_YEAR,
            selector_min_year: DEFAULT_MIN_YEAR,
            selector_max_year: DEFAULT_MAX_YEAR,
            play_delay_ms: DEFAULT_PLAY_DELAY_MS,
            edit_key: DEFAULT_EDIT_KEY.to_string(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            bootstrap_url: DEFAULT_BOOTSTRAP_URL.to_string(),
            geography_url: DEFAULT_GEOGRAPHY_URL.to_string(),
            palette: Palette::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        Self::from_value(serde_json::from_str(raw)?)
    }

    /// Only a JSON object is a configuration; anything else is rejected
    /// rather than read as "all defaults".
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if !value.is_object() {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "config must be a JSON object",
            ));
        }
        serde_json::from_value::<Self>(value).map(Self::normalized)
    }

    /// Repair inverted ranges and zero/blank values left by a hand-edited file.
    pub fn normalized(mut self) -> Self {
        if self.default_min_year > self.default_max_year {
            std::mem::swap(&mut self.default_min_year, &mut self.default_max_year);
        }
        if self.selector_min_year > self.selector_max_year {
            std::mem::swap(&mut self.selector_min_year, &mut self.selector_max_year);
        }
        if self.play_delay_ms == 0 {
            self.play_delay_ms = DEFAULT_PLAY_DELAY_MS;
        }
        if self.storage_key.trim().is_empty() {
            self.storage_key = DEFAULT_STORAGE_KEY.to_string();
        }
        self
    }

    pub fn default_bounds(&self) -> YearBounds {
        YearBounds::new(self.default_min_year, self.default_max_year)
    }

    pub fn play_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.play_delay_ms))
    }
}
