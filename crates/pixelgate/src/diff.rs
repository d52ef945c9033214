use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::CompareError;

/// Maximum possible per-pixel delta in YIQ color space (used by dify internally).
const MAX_YIQ_POSSIBLE_DELTA: f32 = 35215.0;

/// Blend factor applied to unchanged pixels in the diff visualization, so
/// matching content stays visible as faint context behind the highlights.
const UNCHANGED_BLEND: f32 = 0.1;

pub fn validate_threshold(v: f64) -> Result<f64, String> {
    if !(0.0..=1.0).contains(&v) {
        return Err(format!("threshold must be between 0.0 and 1.0, got {v}"));
    }
    Ok(v)
}

/// Knobs for a single pixel-level comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Per-channel color-distance threshold (0.0-1.0) below which two pixels
    /// count as equal. Expressed as a fraction of the maximum YIQ delta.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Count anti-aliased edge pixels as plain differences instead of
    /// classifying them separately and leaving them out of the count.
    #[serde(default)]
    pub include_anti_aliased: bool,
}

fn default_threshold() -> f64 {
    // Tolerates antialiasing/font-hinting deltas between a design-tool export
    // and a live browser render.
    0.15
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            include_anti_aliased: false,
        }
    }
}

impl DiffOptions {
    /// dify/pixelmatch express the threshold in YIQ space as `max_delta * t^2`.
    fn yiq_threshold(&self) -> f32 {
        MAX_YIQ_POSSIBLE_DELTA * (self.threshold * self.threshold) as f32
    }
}

/// Result of diffing two equally-sized pixel buffers.
#[derive(Debug)]
pub struct DiffOutcome {
    /// Pixels classified as different (above threshold, not anti-aliasing
    /// unless opted in).
    pub diff_pixels: u64,
    pub total_pixels: u64,
    /// Full-resolution visualization: faded reference for matching pixels,
    /// red for mismatches, yellow for anti-aliasing classifications.
    pub image: RgbaImage,
}

/// Classify, pixel by pixel, whether two equally-sized buffers differ
/// meaningfully under the given options.
///
/// Per-pixel distance is the YIQ-weighted perceptual delta over all four
/// channels (alpha blended against a neutral background), with a 3x3
/// neighborhood interpolation check to recognize anti-aliased edges.
/// Deterministic for fixed inputs and options.
pub fn diff(
    reference: &RgbaImage,
    candidate: &RgbaImage,
    options: &DiffOptions,
) -> Result<DiffOutcome, CompareError> {
    validate_threshold(options.threshold).map_err(CompareError::Validation)?;

    for (label, img) in [("reference", reference), ("candidate", candidate)] {
        if img.width() == 0 || img.height() == 0 {
            return Err(CompareError::Validation(format!(
                "{label} buffer has zero-sized dimensions ({}x{})",
                img.width(),
                img.height(),
            )));
        }
    }

    if reference.dimensions() != candidate.dimensions() {
        return Err(CompareError::Validation(format!(
            "buffer dimensions differ: {}x{} vs {}x{}",
            reference.width(),
            reference.height(),
            candidate.width(),
            candidate.height(),
        )));
    }

    let total_pixels = (reference.width() as u64) * (reference.height() as u64);

    let output_base = Some(dify::cli::OutputImageBase::LeftImage);
    let block_out: Option<std::collections::HashSet<(u32, u32)>> = None;

    let outcome = dify::diff::get_results(
        reference.clone(),
        candidate.clone(),
        options.yiq_threshold(),
        !options.include_anti_aliased,
        Some(UNCHANGED_BLEND),
        &output_base,
        &block_out,
    );

    match outcome {
        Some((diff_count, image)) => Ok(DiffOutcome {
            diff_pixels: diff_count.max(0) as u64,
            total_pixels,
            image,
        }),
        // No differing pixels: dify produces no image, but callers rely on a
        // visualization for every comparison, so render the unchanged-pixel
        // convention (faded grayscale reference) ourselves.
        None => Ok(DiffOutcome {
            diff_pixels: 0,
            total_pixels,
            image: faded_base(reference),
        }),
    }
}

/// Grayscale rendition of `src` blended toward white, matching how the diff
/// visualization draws unchanged pixels.
fn faded_base(src: &RgbaImage) -> RgbaImage {
    let mut out = RgbaImage::new(src.width(), src.height());
    for (x, y, px) in src.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *px;
        let luma = 0.298_895_31 * r as f32 + 0.586_622_47 * g as f32 + 0.114_482_23 * b as f32;
        let factor = UNCHANGED_BLEND * a as f32 / 255.0;
        let val = (255.0 + (luma - 255.0) * factor).round().clamp(0.0, 255.0) as u8;
        out.put_pixel(x, y, Rgba([val, val, val, 255]));
    }
    out
}
