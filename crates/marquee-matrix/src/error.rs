use std::path::PathBuf;

use thiserror::Error;

/// Configuration-stage failures. These are deterministic: the same config
/// fails the same way every time, so there is nothing to retry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// Parameters that would produce an unrenderable display (zero rows or
    /// columns, non-normalized colors, inverted bulb radii, ...). Rejected
    /// up front rather than silently rendering an empty sphere.
    #[error("degenerate configuration: {0}")]
    Degenerate(String),
}

/// Failures local to a matrix rebuild. A failed rebuild must leave any
/// previously built matrix untouched; an in-flight shading pass keeps
/// sampling the last good snapshot.
#[derive(Debug, Error)]
pub enum RebuildError {
    /// The rasterizer could not create its drawing surface.
    #[error("rendering surface unavailable ({width}x{height} canvas)")]
    UnavailableSurface { width: usize, height: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
}
