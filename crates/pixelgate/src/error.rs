use std::path::PathBuf;

use thiserror::Error;

/// Failure modes of a single comparison call.
///
/// A dimension mismatch between the two inputs is deliberately *not* here —
/// it is a first-class outcome (`ComparisonResult::size_mismatch`), since a
/// layout shift is exactly the kind of regression a caller wants surfaced,
/// not thrown away as an error.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path} as PNG")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{0}")]
    Validation(String),

    #[error("failed to write diff artifact {path}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
