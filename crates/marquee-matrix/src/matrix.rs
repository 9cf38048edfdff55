use std::f32::consts::PI;

use crate::config::{MatrixMode, OrbConfig};
use crate::error::{ConfigError, RebuildError};
use crate::raster::OccupancyBitmap;

/// The retained display state: one cell per logical LED, row-major,
/// row 0 = south pole side. Rebuilt as a fresh snapshot whenever the
/// message or pitch parameters change; never mutated in place between
/// rebuilds, so an in-flight shading pass can keep reading the old one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl LedMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        debug_assert!(row < self.rows && col < self.cols);
        self.cells[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, on: bool) {
        debug_assert!(row < self.rows && col < self.cols);
        self.cells[row * self.cols + col] = on;
    }

    /// Row-major cell view, for texture upload.
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn any_lit(&self) -> bool {
        self.cells.iter().any(|&c| c)
    }

    /// Number of lit cells in one column, across all rows.
    pub fn column_lit_count(&self, col: usize) -> usize {
        (0..self.rows).filter(|&r| self.get(r, col)).count()
    }
}

/// Matrix shape for a config: `rows = ceil(PI / latitude_pitch)` and
/// `cols = ceil(2*PI / longitude_pitch)`; band-only mode collapses the row
/// dimension to one. Shapes with zero rows or columns are rejected.
pub fn matrix_shape(cfg: &OrbConfig) -> Result<(usize, usize), RebuildError> {
    let rows = match cfg.mode {
        MatrixMode::FullSphere => (PI / cfg.latitude_pitch).ceil() as usize,
        MatrixMode::BandOnly => 1,
    };
    let cols = (2.0 * PI / cfg.longitude_pitch).ceil() as usize;
    if rows == 0 || cols == 0 {
        return Err(ConfigError::Degenerate(format!(
            "pitch parameters produce a {rows}x{cols} matrix"
        ))
        .into());
    }
    Ok((rows, cols))
}

/// Fold an occupancy column onto its destination matrix column.
///
/// The wrapped x-position `x mod instance_width` is normalized by the
/// instance width and scaled to the column count, so every repetition of the
/// message in the canvas lands on the same canonical copy; without the fold,
/// repeated instances would stack onto distinct columns.
#[inline]
pub fn fold_column(x: usize, instance_width: f32, cols: usize) -> usize {
    let wrapped = (x as f32).rem_euclid(instance_width);
    let frac = wrapped / instance_width;
    ((frac * cols as f32) as usize).min(cols - 1)
}

/// Populate a fresh matrix from an occupancy bitmap. A cell is lit if any
/// occupancy pixel folding onto it is set (logical OR). Deterministic:
/// identical inputs produce bit-identical matrices.
pub fn build_matrix(
    bitmap: &OccupancyBitmap,
    cfg: &OrbConfig,
) -> Result<LedMatrix, RebuildError> {
    let (rows, cols) = matrix_shape(cfg)?;
    // Fresh allocation: no stale cells from a previous message can survive.
    let mut matrix = LedMatrix::new(rows, cols);
    if bitmap.instance_width() <= 0.0 {
        return Ok(matrix);
    }

    let height = bitmap.height();
    let [band_lo, band_hi] = cfg.row_band;
    for y in 0..height {
        let row = match cfg.mode {
            MatrixMode::BandOnly => 0,
            MatrixMode::FullSphere => {
                // Canvas top maps to the matrix's north edge of the band.
                let normalized_y = 1.0 - y as f32 / height as f32;
                let frac = band_lo + normalized_y * (band_hi - band_lo);
                ((frac * rows as f32) as usize).min(rows - 1)
            }
        };
        for x in 0..bitmap.width() {
            if bitmap.get(x, y) {
                let col = fold_column(x, bitmap.instance_width(), cols);
                matrix.set(row, col, true);
            }
        }
    }
    log::debug!(
        "built {}x{} matrix ({} lit cells)",
        rows,
        cols,
        matrix.cells().iter().filter(|&&c| c).count()
    );
    Ok(matrix)
}
