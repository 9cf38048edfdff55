use std::fmt;

use marquee_font as font;

use crate::config::OrbConfig;
use crate::error::RebuildError;

/// Binary glyph-coverage canvas for one message, tiled horizontally so the
/// wrap boundary lands mid-repetition instead of mid-glyph.
///
/// Working buffer only: consumed by `build_matrix` and then dropped.
pub struct OccupancyBitmap {
    width: usize,
    height: usize,
    /// Width of one message repetition plus the inter-repetition gap, in
    /// canvas pixels. Anchors the column fold in `matrix`.
    instance_width: f32,
    bits: Vec<bool>,
}

impl OccupancyBitmap {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn instance_width(&self) -> f32 {
        self.instance_width
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.height);
        self.bits[y * self.width + x]
    }

    #[inline]
    fn set(&mut self, x: usize, y: usize) {
        self.bits[y * self.width + x] = true;
    }

    /// True if at least one pixel is set.
    pub fn any_set(&self) -> bool {
        self.bits.iter().any(|&b| b)
    }
}

// Summarize rather than dump the bit vector.
impl fmt::Debug for OccupancyBitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OccupancyBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("instance_width", &self.instance_width)
            .field("lit", &self.bits.iter().filter(|&&b| b).count())
            .finish()
    }
}

/// Render `text` into an occupancy bitmap sized by the config's canvas.
///
/// The message is drawn left-to-right, vertically centered, with the glyph
/// face scaled to `glyph_height` pixels (nearest-neighbor). It is repeated
/// `ceil(W / S) + 2` times at stride `S = text_width + gap`, starting one
/// instance left of the canvas, with repetition 0 centered at `W/2`; the
/// extra copies on both sides keep the wrap boundary seam-free.
///
/// Empty text succeeds and yields an all-clear bitmap (all-dark matrix).
pub fn rasterize_message(text: &str, cfg: &OrbConfig) -> Result<OccupancyBitmap, RebuildError> {
    let width = cfg.canvas_width;
    let height = cfg.canvas_height;
    if width == 0 || height == 0 || cfg.glyph_height == 0 {
        return Err(RebuildError::UnavailableSurface { width, height });
    }

    let scale = cfg.glyph_height as f32 / font::GLYPH_HEIGHT as f32;
    let text_width = font::text_width(text) as f32 * scale;
    let instance_width = text_width + cfg.gap as f32;

    let mut bitmap = OccupancyBitmap {
        width,
        height,
        instance_width,
        bits: vec![false; width * height],
    };
    if text.is_empty() {
        return Ok(bitmap);
    }

    let glyph_px_h = font::GLYPH_HEIGHT as f32 * scale;
    let glyph_px_w = font::GLYPH_WIDTH as f32 * scale;
    let top = height as f32 * 0.5 - glyph_px_h * 0.5;

    let repetitions = (width as f32 / instance_width).ceil() as i64 + 2;
    let chars: Vec<char> = text.chars().collect();
    for i in -1..repetitions {
        let center = width as f32 * 0.5 + i as f32 * instance_width;
        let left = center - text_width * 0.5;
        for (ci, &c) in chars.iter().enumerate() {
            draw_glyph(&mut bitmap, c, left + ci as f32 * glyph_px_w, top, scale, cfg);
        }
    }
    Ok(bitmap)
}

/// Stamp one scaled glyph whose top-left corner is at `(gx0, gy0)` canvas
/// pixels. Each canvas pixel samples the underlying font cell; the sample is
/// kept when its coverage clears the configured brightness threshold.
fn draw_glyph(
    bitmap: &mut OccupancyBitmap,
    c: char,
    gx0: f32,
    gy0: f32,
    scale: f32,
    cfg: &OrbConfig,
) {
    let glyph_px_w = font::GLYPH_WIDTH as f32 * scale;
    let glyph_px_h = font::GLYPH_HEIGHT as f32 * scale;
    let x_start = gx0.floor().max(0.0) as i64;
    let x_end = ((gx0 + glyph_px_w).ceil() as i64).min(bitmap.width as i64);
    let y_start = gy0.floor().max(0.0) as i64;
    let y_end = ((gy0 + glyph_px_h).ceil() as i64).min(bitmap.height as i64);

    for y in y_start..y_end {
        let gy = ((y as f32 + 0.5 - gy0) / scale).floor();
        if gy < 0.0 {
            continue;
        }
        for x in x_start..x_end {
            let gx = ((x as f32 + 0.5 - gx0) / scale).floor();
            if gx < 0.0 {
                continue;
            }
            // Binary face: sampled coverage is 0 or 1.
            let coverage = if font::pixel_set(c, gx as usize, gy as usize) {
                1.0
            } else {
                0.0
            };
            if coverage >= cfg.coverage_threshold {
                bitmap.set(x as usize, y as usize);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cfg() -> OrbConfig {
        OrbConfig {
            canvas_width: 512,
            canvas_height: 64,
            glyph_height: 32, // scale 4
            gap: 64,
            ..OrbConfig::default()
        }
    }

    #[test]
    fn empty_text_is_all_clear() {
        let bm = rasterize_message("", &test_cfg()).unwrap();
        assert!(!bm.any_set());
        // instance width degenerates to the gap alone
        assert_eq!(bm.instance_width(), 64.0);
    }

    #[test]
    fn instance_width_is_text_plus_gap() {
        let bm = rasterize_message("HI", &test_cfg()).unwrap();
        // 2 chars * 8 px * scale 4 + 64 gap
        assert_eq!(bm.instance_width(), 2.0 * 8.0 * 4.0 + 64.0);
    }

    #[test]
    fn zero_canvas_is_unavailable_surface() {
        let mut cfg = test_cfg();
        cfg.canvas_width = 0;
        let err = rasterize_message("HI", &cfg).unwrap_err();
        assert!(matches!(err, RebuildError::UnavailableSurface { .. }));
    }

    #[test]
    fn glyph_lands_where_metrics_say() {
        let cfg = test_cfg();
        let bm = rasterize_message("I", &cfg).unwrap();
        assert!(bm.any_set());
        // Center instance: 1 char * 32 px wide, centered at x=256 -> left 240.
        // 'I' row 0 is 0x7E (glyph cols 1..=6 lit); canvas rows for glyph
        // row 0 are top..top+4 with top = 32 - 16 = 16.
        let left = 240.0;
        let top = 16usize;
        // glyph col 0 unlit, col 1 lit
        assert!(!bm.get(left as usize, top));
        assert!(bm.get(left as usize + 4, top));
        // vertical center of 'I' is the 0x18 stem: glyph cols 3,4
        let mid_y = 32;
        assert!(bm.get(left as usize + 3 * 4, mid_y));
        assert!(!bm.get(left as usize, mid_y));
    }

    #[test]
    fn repetitions_tile_at_instance_stride() {
        let cfg = test_cfg();
        let bm = rasterize_message("I", &cfg).unwrap();
        let s = bm.instance_width() as usize;
        // A lit pixel repeats one full stride away (both copies on-canvas).
        let x = 240 + 4;
        let y = 16;
        assert!(bm.get(x, y));
        assert!(bm.get(x + s, y));
    }

    #[test]
    fn deterministic_for_same_input() {
        let cfg = test_cfg();
        let a = rasterize_message("ORB", &cfg).unwrap();
        let b = rasterize_message("ORB", &cfg).unwrap();
        assert_eq!(a.bits, b.bits);
    }
}
