//! CPU core of the LED marquee orb: message rasterization, spherical LED
//! matrix construction, and scroll state.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod matrix;
pub mod raster;
pub mod scroll;

// Re-exports for convenience
pub use config::{MatrixMode, OrbConfig, Rgb};
pub use error::{ConfigError, RebuildError};
pub use matrix::{LedMatrix, build_matrix, fold_column, matrix_shape};
pub use raster::{OccupancyBitmap, rasterize_message};
pub use scroll::ScrollState;
