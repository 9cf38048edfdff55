//! Pure per-fragment LED shading: the CPU twin of `assets/shaders/led_orb.fs`.
//!
//! Everything a fragment needs is captured in an immutable [`FrameParams`]
//! snapshot taken once per frame, so shading is a pure function of
//! `(normal, uv, matrix, params)` with no shared mutable state.
#![forbid(unsafe_code)]

use std::f32::consts::{FRAC_PI_2, PI};

use marquee_geom::{Vec3, latitude, normalized_longitude, wrap01};
use marquee_matrix::{LedMatrix, MatrixMode, OrbConfig, Rgb};

/// Immutable per-frame shading parameters.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    pub scroll_offset: f32,
    pub reverse_scroll: bool,
    pub mode: MatrixMode,
    pub band_half_height: f32,
    pub led_pitch_u: f32,
    pub led_pitch_v: f32,
    /// Bulb smoothstep radii, fractions of the LED pitch.
    pub bulb_inner: f32,
    pub bulb_outer: f32,
    pub dim: Rgb,
    pub bright: Rgb,
    pub background: Rgb,
    pub emissive_strength: f32,
}

impl FrameParams {
    pub fn from_config(cfg: &OrbConfig, scroll_offset: f32) -> Self {
        Self {
            scroll_offset,
            reverse_scroll: cfg.reverse_scroll,
            mode: cfg.mode,
            band_half_height: cfg.band_half_height(),
            led_pitch_u: cfg.led_pitch_u,
            led_pitch_v: cfg.led_pitch_v,
            bulb_inner: cfg.bulb_inner,
            bulb_outer: cfg.bulb_outer,
            dim: cfg.dim_color,
            bright: cfg.bright_color,
            background: cfg.background_color,
            emissive_strength: cfg.emissive_strength,
        }
    }
}

/// Final fragment output. `emissive` is an additive boost on top of `color`
/// (the GPU shader adds `bright * emissive`); keeping it separate lets the
/// host key bloom on it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shaded {
    pub color: Rgb,
    pub emissive: f32,
}

impl Shaded {
    #[inline]
    fn background(p: &FrameParams) -> Self {
        Self {
            color: p.background,
            emissive: 0.0,
        }
    }
}

/// Hermite smoothstep, GLSL semantics.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Soft circular bulb footprint for the LED cell containing `(u, v)`,
/// in `[0, 1]`: 1 at the cell center, falling to 0 past the outer radius.
/// Independent of matrix content; this is what makes the dots discrete.
#[inline]
pub fn bulb_mask(u: f32, v: f32, p: &FrameParams) -> f32 {
    let cell_u = (u / p.led_pitch_u).floor() * p.led_pitch_u;
    let cell_v = (v / p.led_pitch_v).floor() * p.led_pitch_v;
    let du = u - (cell_u + p.led_pitch_u * 0.5);
    let dv = v - (cell_v + p.led_pitch_v * 0.5);
    let dist = (du * du + dv * dv).sqrt();
    let pitch = p.led_pitch_u.min(p.led_pitch_v);
    1.0 - smoothstep(p.bulb_inner * pitch, p.bulb_outer * pitch, dist)
}

/// Longitude fraction after applying the scroll. Default direction moves
/// content toward +longitude (content at column c appears one column later
/// per quarter-turn of offset); `reverse_scroll` mirrors it.
#[inline]
pub fn scrolled_longitude(norm_lon: f32, p: &FrameParams) -> f32 {
    if p.reverse_scroll {
        wrap01(norm_lon + p.scroll_offset)
    } else {
        wrap01(norm_lon - p.scroll_offset)
    }
}

/// Matrix cell under a surface point, or `None` outside the band
/// (band-only mode). Boundary samples floor down.
#[inline]
pub fn lookup_led(normal: Vec3, matrix: &LedMatrix, p: &FrameParams) -> Option<bool> {
    let lat = latitude(normal);
    let row = match p.mode {
        MatrixMode::BandOnly => {
            if lat.abs() > p.band_half_height {
                return None;
            }
            0
        }
        MatrixMode::FullSphere => {
            let frac = (lat + FRAC_PI_2) / PI;
            ((frac * matrix.rows() as f32) as usize).min(matrix.rows() - 1)
        }
    };
    let scrolled = scrolled_longitude(normalized_longitude(normal), p);
    let col = ((scrolled * matrix.cols() as f32) as usize).min(matrix.cols() - 1);
    Some(matrix.get(row, col))
}

/// Shade one visible surface point. `normal` is the unit surface normal
/// (the position on the unit sphere); `(u, v)` is the parametric surface
/// coordinate in `[0, 1)^2`.
pub fn shade(normal: Vec3, u: f32, v: f32, matrix: &LedMatrix, p: &FrameParams) -> Shaded {
    let Some(led_on) = lookup_led(normal, matrix, p) else {
        // Outside the band: plain dark sphere, no matrix lookup, no glow.
        return Shaded::background(p);
    };

    let mask = bulb_mask(u, v, p);
    // Boolean key: select rather than interpolate, so a fully-on bulb is
    // exactly the configured bright color.
    let base = if led_on { p.bright } else { p.dim };
    Shaded {
        color: base.scale(mask),
        emissive: if led_on {
            p.emissive_strength * mask
        } else {
            0.0
        },
    }
}
