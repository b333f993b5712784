//! `scene.toml` schema for rgbshift.
//!
//! A scene names the hoverable regions, the texture each one reveals, and
//! the tunables of the cursor-following plane. Every field except `version`
//! has a default, so an empty file with `version = 1` reproduces the stock
//! two-region composition.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse scene: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialise scene: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid scene: {0}")]
    Invalid(String),
}

pub const CURRENT_VERSION: u32 = 1;
pub const MAX_PLANE_SEGMENTS: u32 = 256;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    pub version: u32,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_offset_scale")]
    pub offset_scale: f64,
    #[serde(default = "default_perspective")]
    pub perspective: f64,
    #[serde(default = "default_background")]
    pub background: [f64; 3],
    #[serde(default)]
    pub plane: PlaneConfig,
    #[serde(default = "default_regions")]
    pub regions: Vec<RegionConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaneConfig {
    #[serde(default = "default_plane_width")]
    pub width: f64,
    #[serde(default = "default_plane_height")]
    pub height: f64,
    #[serde(default = "default_plane_segments")]
    pub segments: u32,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            width: default_plane_width(),
            height: default_plane_height(),
            segments: default_plane_segments(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegionConfig {
    pub id: String,
    pub texture: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_region_color")]
    pub color: [f64; 4],
}

/// Where a region's texture comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureSource {
    Remote(String),
    Local(PathBuf),
}

impl RegionConfig {
    pub fn texture_source(&self) -> TextureSource {
        let trimmed = self.texture.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            TextureSource::Remote(trimmed.to_string())
        } else {
            TextureSource::Local(PathBuf::from(trimmed))
        }
    }
}

fn default_damping() -> f64 {
    0.1
}

fn default_offset_scale() -> f64 {
    0.0005
}

fn default_perspective() -> f64 {
    1000.0
}

fn default_background() -> [f64; 3] {
    [0.059, 0.063, 0.071]
}

fn default_plane_width() -> f64 {
    250.0
}

fn default_plane_height() -> f64 {
    350.0
}

fn default_plane_segments() -> u32 {
    20
}

fn default_region_color() -> [f64; 4] {
    [1.0, 1.0, 1.0, 0.08]
}

fn default_regions() -> Vec<RegionConfig> {
    vec![
        RegionConfig {
            id: "content-1".into(),
            texture: "https://picsum.photos/200/300".into(),
            x: 120.0,
            y: 160.0,
            width: 360.0,
            height: 120.0,
            color: default_region_color(),
        },
        RegionConfig {
            id: "content-2".into(),
            texture: "https://picsum.photos/seed/picsum/200/300".into(),
            x: 120.0,
            y: 360.0,
            width: 360.0,
            height: 120.0,
            color: default_region_color(),
        },
    ]
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            damping: default_damping(),
            offset_scale: default_offset_scale(),
            perspective: default_perspective(),
            background: default_background(),
            plane: PlaneConfig::default(),
            regions: default_regions(),
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SceneConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CURRENT_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported scene version {}; expected {CURRENT_VERSION}",
                self.version
            )));
        }

        if !(self.damping > 0.0 && self.damping <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "damping must be in (0, 1], got {}",
                self.damping
            )));
        }

        if !self.offset_scale.is_finite() {
            return Err(ConfigError::Invalid("offset_scale must be finite".into()));
        }

        if !(self.perspective.is_finite() && self.perspective > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "perspective must be a positive distance, got {}",
                self.perspective
            )));
        }

        if self
            .background
            .iter()
            .any(|channel| !(0.0..=1.0).contains(channel))
        {
            return Err(ConfigError::Invalid(
                "background channels must be within [0, 1]".into(),
            ));
        }

        if !(self.plane.width > 0.0 && self.plane.height > 0.0) {
            return Err(ConfigError::Invalid(
                "plane width and height must be greater than zero".into(),
            ));
        }

        if self.plane.segments == 0 || self.plane.segments > MAX_PLANE_SEGMENTS {
            return Err(ConfigError::Invalid(format!(
                "plane segments must be between 1 and {MAX_PLANE_SEGMENTS}"
            )));
        }

        if self.regions.is_empty() {
            return Err(ConfigError::Invalid(
                "scene must define at least one region".into(),
            ));
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.id.trim().is_empty() {
                return Err(ConfigError::Invalid("region id may not be empty".into()));
            }
            if !seen.insert(region.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate region id '{}'",
                    region.id
                )));
            }
            if region.texture.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "region '{}' must name a texture",
                    region.id
                )));
            }
            if !(region.width > 0.0 && region.height > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "region '{}' width and height must be greater than zero",
                    region.id
                )));
            }
            if region.color.iter().any(|channel| !(0.0..=1.0).contains(channel)) {
                return Err(ConfigError::Invalid(format!(
                    "region '{}' color channels must be within [0, 1]",
                    region.id
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
version = 1
damping = 0.2
offset_scale = 0.001
background = [0.0, 0.0, 0.0]

[plane]
width = 300
segments = 32

[[regions]]
id = "left"
texture = "textures/left.png"
x = 10
y = 20
width = 200
height = 50

[[regions]]
id = "right"
texture = "https://example.com/right.jpg"
x = 300
y = 20
width = 200
height = 50
color = [1.0, 0.0, 0.0, 0.25]
"#;

    #[test]
    fn parses_sample_scene() {
        let scene = SceneConfig::from_toml_str(SAMPLE).expect("parse scene");
        assert_eq!(scene.damping, 0.2);
        assert_eq!(scene.plane.width, 300.0);
        assert_eq!(scene.plane.height, 350.0);
        assert_eq!(scene.plane.segments, 32);
        assert_eq!(scene.perspective, 1000.0);
        assert_eq!(scene.regions.len(), 2);
        assert_eq!(scene.regions[1].color, [1.0, 0.0, 0.0, 0.25]);
        assert_eq!(
            scene.regions[0].texture_source(),
            TextureSource::Local(PathBuf::from("textures/left.png"))
        );
        assert_eq!(
            scene.regions[1].texture_source(),
            TextureSource::Remote("https://example.com/right.jpg".into())
        );
    }

    #[test]
    fn version_only_matches_stock_scene() {
        let scene = SceneConfig::from_toml_str("version = 1").unwrap();
        assert_eq!(scene, SceneConfig::default());
        assert_eq!(scene.regions.len(), 2);
        assert_eq!(scene.regions[0].id, "content-1");
    }

    #[test]
    fn rejects_out_of_range_damping() {
        for value in ["0", "-0.5", "1.5"] {
            let err = SceneConfig::from_toml_str(&format!("version = 1\ndamping = {value}"))
                .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "damping {value}");
        }
        assert!(SceneConfig::from_toml_str("version = 1\ndamping = 1.0").is_ok());
    }

    #[test]
    fn rejects_duplicate_region_ids() {
        let config = r#"
version = 1

[[regions]]
id = "a"
texture = "a.png"
x = 0
y = 0
width = 10
height = 10

[[regions]]
id = "a"
texture = "b.png"
x = 0
y = 20
width = 10
height = 10
"#;
        let err = SceneConfig::from_toml_str(config).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_explicitly_empty_regions() {
        let err = SceneConfig::from_toml_str("version = 1\nregions = []").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_version() {
        let err = SceneConfig::from_toml_str("version = 2").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn defaults_print_without_float_widening() {
        let rendered = SceneConfig::default().to_toml_string().unwrap();
        assert!(rendered.contains("damping = 0.1\n"), "{rendered}");
        assert!(rendered.contains("offset_scale = 0.0005\n"), "{rendered}");
        assert!(rendered.contains("0.08"), "{rendered}");
    }

    #[test]
    fn toml_round_trip_preserves_scene() {
        let scene = SceneConfig::from_toml_str(SAMPLE).unwrap();
        let rendered = scene.to_toml_string().unwrap();
        assert_eq!(SceneConfig::from_toml_str(&rendered).unwrap(), scene);
    }
}
