//! Burst options and their defaults
//!
//! `ConfettiOptions` is what callers hand in (from JS, JSON or the CLI);
//! every field is optional and decoding never rejects a malformed value,
//! it just falls back to the default. `BurstConfig` is the resolved form
//! the particle factory consumes.

use super::color::{colors, parse_color, Rgb};
use super::Point;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_PARTICLE_COUNT: usize = 50;
pub const DEFAULT_ANGLE: f64 = 90.0;
pub const DEFAULT_SPREAD: f64 = 45.0;
pub const DEFAULT_START_VELOCITY: f64 = 45.0;
pub const DEFAULT_DECAY: f64 = 0.9;
pub const DEFAULT_TICKS: u32 = 200;
pub const DEFAULT_ORIGIN: (f64, f64) = (0.5, 0.5);
pub const DEFAULT_Z_INDEX: i32 = 100;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfettiOptions {
    #[serde(deserialize_with = "loose_number")]
    pub particle_count: Option<f64>,
    /// Launch direction in degrees, 90 is straight up
    #[serde(deserialize_with = "loose_number")]
    pub angle: Option<f64>,
    /// Width of the launch cone in degrees
    #[serde(deserialize_with = "loose_number")]
    pub spread: Option<f64>,
    #[serde(deserialize_with = "loose_number")]
    pub start_velocity: Option<f64>,
    /// Per-tick velocity multiplier
    #[serde(deserialize_with = "loose_number")]
    pub decay: Option<f64>,
    #[serde(deserialize_with = "loose_number")]
    pub ticks: Option<f64>,
    #[serde(deserialize_with = "loose_origin")]
    pub origin: Option<OriginOptions>,
    #[serde(deserialize_with = "loose_number")]
    pub z_index: Option<f64>,
    #[serde(deserialize_with = "loose_colors")]
    pub colors: Option<Vec<String>>,
}

/// Launch point as a fraction of the surface width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OriginOptions {
    #[serde(deserialize_with = "loose_number")]
    pub x: Option<f64>,
    #[serde(deserialize_with = "loose_number")]
    pub y: Option<f64>,
}

/// Fully resolved parameters of one burst.
#[derive(Clone, Debug, PartialEq)]
pub struct BurstConfig {
    pub particle_count: usize,
    /// Degrees
    pub angle: f64,
    /// Degrees
    pub spread: f64,
    pub start_velocity: f64,
    pub decay: f64,
    pub ticks: u32,
    /// Fractional, scaled by the surface size at launch
    pub origin: Point,
    pub z_index: i32,
    /// Cycled per particle; an empty list means the stock palette
    pub colors: Vec<Rgb>,
}

impl Default for BurstConfig {
    fn default() -> Self {
        ConfettiOptions::default().resolve()
    }
}

impl BurstConfig {
    /// Color of the `index`-th particle of the burst, cycling the palette.
    pub fn color_for(&self, index: usize) -> Rgb {
        let palette = if self.colors.is_empty() {
            &colors::PALETTE[..]
        } else {
            &self.colors[..]
        };
        palette[index % palette.len()]
    }

    /// Launch point in pixels on a `width` x `height` surface.
    pub fn pixel_origin(&self, width: u32, height: u32) -> Point {
        Point::new(
            width as f64 * self.origin.x,
            height as f64 * self.origin.y,
        )
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseOptions {
    Options(ConfettiOptions),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

impl ConfettiOptions {
    /// Decode options from any value. Anything that is not a map, such as
    /// `5`, `true` or a bare string, reads as "all defaults".
    pub fn deserialize_lenient<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        Ok(match LooseOptions::deserialize(deserializer)? {
            LooseOptions::Options(options) => options,
            LooseOptions::Other(_) => ConfettiOptions::default(),
        })
    }

    /// Apply defaults to every missing or unusable field.
    pub fn resolve(&self) -> BurstConfig {
        let origin = self.origin.unwrap_or_default();
        let colors = match &self.colors {
            Some(list) if !list.is_empty() => list.iter().map(|c| parse_color(c)).collect(),
            _ => colors::PALETTE.to_vec(),
        };

        BurstConfig {
            particle_count: finite(self.particle_count)
                .map_or(DEFAULT_PARTICLE_COUNT, |n| n.floor().max(0.0) as usize),
            angle: finite(self.angle).unwrap_or(DEFAULT_ANGLE),
            spread: finite(self.spread).unwrap_or(DEFAULT_SPREAD),
            start_velocity: finite(self.start_velocity).unwrap_or(DEFAULT_START_VELOCITY),
            decay: finite(self.decay).unwrap_or(DEFAULT_DECAY),
            // Whole frames only: 2.5 ticks lives 2 frames, not 3
            ticks: finite(self.ticks).map_or(DEFAULT_TICKS, |t| t.floor().max(1.0) as u32),
            origin: Point::new(
                finite(origin.x).unwrap_or(DEFAULT_ORIGIN.0),
                finite(origin.y).unwrap_or(DEFAULT_ORIGIN.1),
            ),
            z_index: finite(self.z_index).map_or(DEFAULT_Z_INDEX, |z| z as i32),
            colors,
        }
    }

    /// Overwrite fields of `self` with every field `other` sets.
    pub fn merge(&mut self, other: ConfettiOptions) {
        fn pick<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }
        pick(&mut self.particle_count, other.particle_count);
        pick(&mut self.angle, other.angle);
        pick(&mut self.spread, other.spread);
        pick(&mut self.start_velocity, other.start_velocity);
        pick(&mut self.decay, other.decay);
        pick(&mut self.ticks, other.ticks);
        pick(&mut self.z_index, other.z_index);
        pick(&mut self.colors, other.colors);
        if let Some(theirs) = other.origin {
            let mine = self.origin.get_or_insert_with(OriginOptions::default);
            pick(&mut mine.x, theirs.x);
            pick(&mut mine.y, theirs.y);
        }
    }
}

// Lenient decoding: anything that is not a usable value becomes `None`.

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
    Bool(bool),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

fn loose_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<LooseNumber>::deserialize(deserializer)? {
        Some(LooseNumber::Number(n)) => Some(n),
        Some(LooseNumber::Text(s)) => s.trim().parse().ok(),
        Some(LooseNumber::Bool(b)) => Some(if b { 1.0 } else { 0.0 }),
        Some(LooseNumber::Other(_)) | None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseOrigin {
    Point(OriginOptions),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

fn loose_origin<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<OriginOptions>, D::Error> {
    Ok(match Option::<LooseOrigin>::deserialize(deserializer)? {
        Some(LooseOrigin::Point(origin)) => Some(origin),
        Some(LooseOrigin::Other(_)) | None => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseColor {
    Text(String),
    Number(f64),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseColors {
    List(Vec<LooseColor>),
    #[allow(dead_code)]
    Other(IgnoredAny),
}

fn loose_colors<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Option::<LooseColors>::deserialize(deserializer)? {
        Some(LooseColors::List(list)) => Some(
            list.into_iter()
                .map(|color| match color {
                    LooseColor::Text(s) => s,
                    LooseColor::Number(n) => n.to_string(),
                    LooseColor::Other(_) => String::new(),
                })
                .collect(),
        ),
        Some(LooseColors::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> ConfettiOptions {
        serde_json::from_str(json).expect("options should always decode")
    }

    #[test]
    fn test_defaults() {
        let config = BurstConfig::default();
        assert_eq!(config.particle_count, 50);
        assert_eq!(config.angle, 90.0);
        assert_eq!(config.spread, 45.0);
        assert_eq!(config.start_velocity, 45.0);
        assert_eq!(config.decay, 0.9);
        assert_eq!(config.ticks, 200);
        assert_eq!(config.origin, Point::new(0.5, 0.5));
        assert_eq!(config.z_index, 100);
        assert_eq!(config.colors, colors::PALETTE.to_vec());
    }

    #[test]
    fn test_decode_camel_case() {
        let config = decode(
            r##"{
                "particleCount": 3,
                "startVelocity": 0,
                "decay": 1,
                "ticks": 5,
                "zIndex": 7,
                "origin": { "x": 0.25 },
                "colors": ["#ff0000"]
            }"##,
        )
        .resolve();
        assert_eq!(config.particle_count, 3);
        assert_eq!(config.start_velocity, 0.0);
        assert_eq!(config.decay, 1.0);
        assert_eq!(config.ticks, 5);
        assert_eq!(config.z_index, 7);
        assert_eq!(config.origin, Point::new(0.25, 0.5));
        assert_eq!(config.colors, vec![Rgb::new(255, 0, 0)]);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = decode(
            r#"{
                "particleCount": "12.9",
                "angle": null,
                "spread": {},
                "ticks": 0,
                "origin": 4,
                "colors": []
            }"#,
        )
        .resolve();
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.angle, DEFAULT_ANGLE);
        assert_eq!(config.spread, DEFAULT_SPREAD);
        assert_eq!(config.ticks, 1);
        assert_eq!(config.origin, Point::new(0.5, 0.5));
        assert_eq!(config.colors, colors::PALETTE.to_vec());
    }

    #[test]
    fn test_non_object_options_use_defaults() {
        for json in ["5", "true", r#""party""#, "null", "[]"] {
            let value: serde_json::Value = serde_json::from_str(json).unwrap();
            let options = ConfettiOptions::deserialize_lenient(value).unwrap();
            assert_eq!(options, ConfettiOptions::default(), "decoding {}", json);
        }

        let value = serde_json::json!({ "spread": 12, "colors": 3 });
        let options = ConfettiOptions::deserialize_lenient(value).unwrap();
        assert_eq!(options.spread, Some(12.0));
        assert_eq!(options.colors, None);
    }

    #[test]
    fn test_fractional_ticks_round_down() {
        assert_eq!(decode(r#"{ "ticks": 2.5 }"#).resolve().ticks, 2);
        assert_eq!(decode(r#"{ "ticks": 0.5 }"#).resolve().ticks, 1);
    }

    #[test]
    fn test_negative_and_non_finite_counts() {
        let options = ConfettiOptions {
            particle_count: Some(-4.0),
            decay: Some(f64::NAN),
            ..Default::default()
        };
        let config = options.resolve();
        assert_eq!(config.particle_count, 0);
        assert_eq!(config.decay, DEFAULT_DECAY);
    }

    #[test]
    fn test_color_cycle() {
        let config = decode(r##"{ "colors": ["#000", "#fff"] }"##).resolve();
        assert_eq!(config.color_for(0), Rgb::new(0, 0, 0));
        assert_eq!(config.color_for(1), Rgb::new(255, 255, 255));
        assert_eq!(config.color_for(4), Rgb::new(0, 0, 0));
    }

    #[test]
    fn test_pixel_origin() {
        let config = decode(r#"{ "origin": { "x": 0.1, "y": 1 } }"#).resolve();
        let origin = config.pixel_origin(800, 600);
        assert!((origin.x - 80.0).abs() < 1e-9);
        assert_eq!(origin.y, 600.0);
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = decode(r#"{ "ticks": 10, "spread": 30, "origin": { "x": 0.2, "y": 0.9 } }"#);
        base.merge(decode(r#"{ "ticks": 20, "origin": { "y": 0.1 } }"#));
        let config = base.resolve();
        assert_eq!(config.ticks, 20);
        assert_eq!(config.spread, 30.0);
        assert_eq!(config.origin, Point::new(0.2, 0.1));
    }
}
