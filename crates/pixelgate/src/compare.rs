use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use serde::Serialize;
use tracing::{debug, warn};

use crate::artifact::diff_artifact_path;
use crate::diff::{self, DiffOptions};
use crate::error::CompareError;

/// Outcome of comparing a reference image against a candidate image.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    /// Fraction of compared pixels classified as different (0.0-1.0).
    pub diff_ratio: f64,
    pub diff_pixels: u64,
    pub total_pixels: u64,
    /// The two inputs had unequal dimensions, so no pixel comparison ran and
    /// `diff_ratio` is pinned to the worst case.
    pub size_mismatch: bool,
    /// Where the diff visualization was written. Present for every outcome.
    pub artifact_path: PathBuf,
}

impl ComparisonResult {
    /// Pass/fail gate: true when the mismatch ratio is within `max_ratio`.
    pub fn within(&self, max_ratio: f64) -> bool {
        self.diff_ratio <= max_ratio
    }
}

/// Compare the image at `reference` against the image at `candidate`.
///
/// Decodes both PNGs, runs the pixel-level diff, and writes a visualization
/// next to the candidate (see [`diff_artifact_path`]). When the two images
/// have different dimensions no pixel comparison is attempted: the artifact
/// becomes a side-by-side composite for human inspection and the result
/// reports `size_mismatch = true` with a worst-case ratio of 1.0. Cropping or
/// scaling to force a comparison would hide a real layout shift, so dimension
/// mismatch is surfaced, never resolved automatically.
///
/// Exactly one artifact file is written per successful call; callers rely on
/// it existing afterward for reporting.
pub fn compare_files(
    reference: &Path,
    candidate: &Path,
    options: &DiffOptions,
) -> Result<ComparisonResult, CompareError> {
    diff::validate_threshold(options.threshold).map_err(CompareError::Validation)?;

    let reference_img = load_png(reference)?;
    let candidate_img = load_png(candidate)?;
    let artifact_path = diff_artifact_path(candidate);

    debug!(
        reference = %reference.display(),
        candidate = %candidate.display(),
        threshold = options.threshold,
        "comparing"
    );

    if reference_img.dimensions() != candidate_img.dimensions() {
        warn!(
            reference_w = reference_img.width(),
            reference_h = reference_img.height(),
            candidate_w = candidate_img.width(),
            candidate_h = candidate_img.height(),
            "dimension mismatch, skipping pixel comparison"
        );
        let composite = side_by_side(&reference_img, &candidate_img);
        write_artifact(&composite, &artifact_path)?;

        let total_pixels =
            (reference_img.width().max(candidate_img.width()) as u64)
                * (reference_img.height().max(candidate_img.height()) as u64);
        return Ok(ComparisonResult {
            diff_ratio: 1.0,
            diff_pixels: total_pixels,
            total_pixels,
            size_mismatch: true,
            artifact_path,
        });
    }

    let outcome = diff::diff(&reference_img, &candidate_img, options)?;
    write_artifact(&outcome.image, &artifact_path)?;

    let diff_ratio = outcome.diff_pixels as f64 / outcome.total_pixels as f64;
    debug!(
        diff_pixels = outcome.diff_pixels,
        total_pixels = outcome.total_pixels,
        diff_ratio,
        "comparison finished"
    );

    Ok(ComparisonResult {
        diff_ratio,
        diff_pixels: outcome.diff_pixels,
        total_pixels: outcome.total_pixels,
        size_mismatch: false,
        artifact_path,
    })
}

fn load_png(path: &Path) -> Result<RgbaImage, CompareError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            CompareError::FileNotFound {
                path: path.to_owned(),
            }
        } else {
            CompareError::Io {
                path: path.to_owned(),
                source,
            }
        }
    })?;

    let img = image::load_from_memory(&bytes)
        .map_err(|source| CompareError::Decode {
            path: path.to_owned(),
            source,
        })?
        .to_rgba8();

    if img.width() == 0 || img.height() == 0 {
        return Err(CompareError::Validation(format!(
            "{} decoded to zero-sized dimensions ({}x{})",
            path.display(),
            img.width(),
            img.height(),
        )));
    }

    Ok(img)
}

/// Paste reference and candidate onto a white canvas of `max_w * 2` by
/// `max_h`, reference on the left half, candidate on the right.
fn side_by_side(reference: &RgbaImage, candidate: &RgbaImage) -> RgbaImage {
    let max_w = reference.width().max(candidate.width());
    let max_h = reference.height().max(candidate.height());
    let mut canvas = RgbaImage::from_pixel(max_w * 2, max_h, Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut canvas, reference, 0, 0);
    image::imageops::overlay(&mut canvas, candidate, max_w as i64, 0);
    canvas
}

fn write_artifact(img: &RgbaImage, path: &Path) -> Result<(), CompareError> {
    img.save(path).map_err(|source| CompareError::Artifact {
        path: path.to_owned(),
        source,
    })
}
