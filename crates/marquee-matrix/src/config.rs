use std::f32::consts::PI;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Normalized RGB color, each channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn lerp(a: Rgb, b: Rgb, t: f32) -> Rgb {
        Rgb::new(
            a.r + (b.r - a.r) * t,
            a.g + (b.g - a.g) * t,
            a.b + (b.b - a.b) * t,
        )
    }

    #[inline]
    pub fn scale(self, s: f32) -> Rgb {
        Rgb::new(self.r * s, self.g * s, self.b * s)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn is_normalized(self) -> bool {
        let ok = |c: f32| (0.0..=1.0).contains(&c);
        ok(self.r) && ok(self.g) && ok(self.b)
    }
}

/// How text occupancy maps onto matrix rows (one builder/shader pair, two
/// tagged modes; see `matrix` and `marquee-shade`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixMode {
    /// Matrix spans the whole sphere; text occupies a sub-range of rows,
    /// the rest stay permanently unset.
    FullSphere,
    /// Matrix has a single row; text lives in a thin latitude band and
    /// everything outside renders as the background color.
    #[default]
    BandOnly,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    /// Message shown on the orb.
    pub text: String,
    pub radius: f32,
    /// Scroll offset units per second (one unit = one full turn).
    pub scroll_speed: f32,
    /// Mirror the reading direction of the scroll.
    pub reverse_scroll: bool,
    /// Steady self-rotation of the orb mesh, radians per second.
    pub spin_speed: f32,

    pub mode: MatrixMode,
    /// Total angular height of the text band (band-only mode), radians.
    pub band_height: f32,
    /// Fraction range of matrix rows that text occupies (full-sphere mode).
    pub row_band: [f32; 2],
    /// Angular size of one LED row, radians in (0, PI).
    pub latitude_pitch: f32,
    /// Angular size of one LED column, radians in (0, 2*PI).
    pub longitude_pitch: f32,

    /// Bulb grid pitch in parametric surface units.
    pub led_pitch_u: f32,
    pub led_pitch_v: f32,
    /// Bulb smoothstep radii as fractions of the LED pitch.
    pub bulb_inner: f32,
    pub bulb_outer: f32,

    /// Glyph coverage required for an occupancy pixel to count as set.
    pub coverage_threshold: f32,
    pub dim_color: Rgb,
    pub bright_color: Rgb,
    pub background_color: Rgb,
    pub emissive_strength: f32,

    /// Rasterizer canvas, pixels.
    pub canvas_width: usize,
    pub canvas_height: usize,
    /// Rendered glyph height on the canvas, pixels.
    pub glyph_height: u32,
    /// Gap between message repetitions, canvas pixels.
    pub gap: u32,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            text: "ROADHERO".to_string(),
            radius: 1.0,
            scroll_speed: 0.25,
            reverse_scroll: false,
            spin_speed: 0.1,
            mode: MatrixMode::BandOnly,
            band_height: 0.2,
            row_band: [0.4, 0.6],
            latitude_pitch: 0.05,
            longitude_pitch: 0.05,
            led_pitch_u: 0.05,
            led_pitch_v: 0.05,
            bulb_inner: 0.28,
            bulb_outer: 0.40,
            coverage_threshold: 0.5,
            dim_color: Rgb::new(0.1, 0.1, 0.15),
            bright_color: Rgb::new(0.0, 1.0, 0.3),
            background_color: Rgb::new(0.05, 0.05, 0.1),
            emissive_strength: 2.0,
            canvas_width: 2048,
            canvas_height: 256,
            glyph_height: 120,
            gap: 200,
        }
    }
}

impl OrbConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let cfg: OrbConfig = toml::from_str(toml_str).map_err(|source| ConfigError::Parse {
            path: "<inline>".into(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: OrbConfig = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Fail fast on parameters that would render nothing sensible.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let deg = |msg: String| Err(ConfigError::Degenerate(msg));
        if !(self.radius > 0.0) {
            return deg(format!("radius must be positive, got {}", self.radius));
        }
        if !(self.latitude_pitch > 0.0 && self.latitude_pitch < PI) {
            return deg(format!(
                "latitude_pitch must be in (0, PI), got {}",
                self.latitude_pitch
            ));
        }
        if !(self.longitude_pitch > 0.0 && self.longitude_pitch < 2.0 * PI) {
            return deg(format!(
                "longitude_pitch must be in (0, 2*PI), got {}",
                self.longitude_pitch
            ));
        }
        if !(self.band_height > 0.0 && self.band_height < PI) {
            return deg(format!(
                "band_height must be in (0, PI), got {}",
                self.band_height
            ));
        }
        let [lo, hi] = self.row_band;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || !(lo < hi) {
            return deg(format!("row_band must satisfy 0 <= lo < hi <= 1, got [{lo}, {hi}]"));
        }
        if !(self.led_pitch_u > 0.0 && self.led_pitch_u <= 1.0)
            || !(self.led_pitch_v > 0.0 && self.led_pitch_v <= 1.0)
        {
            return deg(format!(
                "led pitch must be in (0, 1], got ({}, {})",
                self.led_pitch_u, self.led_pitch_v
            ));
        }
        if !(self.bulb_inner > 0.0 && self.bulb_inner < self.bulb_outer) {
            return deg(format!(
                "bulb radii must satisfy 0 < inner < outer, got ({}, {})",
                self.bulb_inner, self.bulb_outer
            ));
        }
        if !(0.0..=1.0).contains(&self.coverage_threshold) {
            return deg(format!(
                "coverage_threshold must be in [0, 1], got {}",
                self.coverage_threshold
            ));
        }
        for (name, c) in [
            ("dim_color", self.dim_color),
            ("bright_color", self.bright_color),
            ("background_color", self.background_color),
        ] {
            if !c.is_normalized() {
                return deg(format!("{name} channels must be in [0, 1], got {c:?}"));
            }
        }
        if self.emissive_strength < 0.0 {
            return deg(format!(
                "emissive_strength must be non-negative, got {}",
                self.emissive_strength
            ));
        }
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return deg(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            ));
        }
        if self.glyph_height == 0 {
            return deg("glyph_height must be positive".to_string());
        }
        if self.gap == 0 {
            return deg("gap must be positive".to_string());
        }
        Ok(())
    }

    /// Half the angular height of the text band (band-only mode).
    #[inline]
    pub fn band_half_height(&self) -> f32 {
        self.band_height * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        OrbConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let base = OrbConfig::default();

        let mut c = base.clone();
        c.radius = 0.0;
        assert!(matches!(c.validate(), Err(ConfigError::Degenerate(_))));

        let mut c = base.clone();
        c.latitude_pitch = PI; // boundary: pitch must be strictly below PI
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.longitude_pitch = -0.1;
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.bulb_inner = 0.5; // inner >= outer
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.bright_color = Rgb::new(0.0, 2.0, 0.0);
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.row_band = [0.6, 0.4];
        assert!(c.validate().is_err());

        let mut c = base.clone();
        c.canvas_width = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg = OrbConfig::from_toml_str(
            r#"
            text = "HELLO"
            scroll_speed = 0.5
            mode = "full_sphere"
            dim_color = { r = 0.2, g = 0.2, b = 0.2 }
            "#,
        )
        .unwrap();
        assert_eq!(cfg.text, "HELLO");
        assert_eq!(cfg.mode, MatrixMode::FullSphere);
        assert_eq!(cfg.scroll_speed, 0.5);
        // untouched fields keep their defaults
        assert_eq!(cfg.canvas_width, 2048);
        assert_eq!(cfg.gap, 200);
    }

    #[test]
    fn invalid_toml_reports_parse_error() {
        let err = OrbConfig::from_toml_str("text = 42").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
