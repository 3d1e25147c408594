use serde::{Deserialize, Serialize};

/// An sRGB fill colour. Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Build from a packed `0xRRGGBB` value. Bits above 24 are ignored.
    pub const fn from_u24(packed: u32) -> Self {
        Self(
            ((packed >> 16) & 0xff) as u8,
            ((packed >> 8) & 0xff) as u8,
            (packed & 0xff) as u8,
        )
    }

    /// Pick a colour from a uniform sample in `[0, 1)`.
    pub fn from_unit_sample(sample: f64) -> Self {
        let sample = if sample.is_finite() {
            sample.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self::from_u24((sample * f64::from(0xff_ffff_u32)).floor() as u32)
    }

    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let hex = raw.trim().trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Self::from_u24)
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value).ok_or_else(|| format!("invalid colour `{value}`"))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_css()
    }
}

/// Fixed fills used by the map renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub unvisited: Rgb,
    pub visited: Rgb,
    pub highlight: Rgb,
    pub hover: Rgb,
    pub stroke: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            unvisited: Rgb::from_u24(0xdedede),
            visited: Rgb::from_u24(0x666666),
            highlight: Rgb::from_u24(0xff5722),
            hover: Rgb::from_u24(0xaaaaaa),
            stroke: Rgb::from_u24(0xffffff),
        }
    }
}
