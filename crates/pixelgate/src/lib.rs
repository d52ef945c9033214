//! Perceptual image comparison with a tolerance gate, for visual-regression
//! pipelines.
//!
//! The crate compares a reference PNG (e.g. a design-tool export) against a
//! candidate PNG (e.g. a browser screenshot): [`compare_files`] decodes both,
//! runs a YIQ-weighted per-pixel diff with optional anti-aliasing
//! classification, writes a diff visualization next to the candidate, and
//! returns a [`ComparisonResult`] whose mismatch ratio callers gate on.
//! Images with unequal dimensions are never force-compared; they come back as
//! a first-class `size_mismatch` outcome with a side-by-side artifact.
//!
//! Every call is synchronous, independent, and deterministic; callers may
//! parallelize freely since artifact paths derive from the (unique) candidate
//! path.

mod artifact;
mod compare;
mod diff;
mod error;

pub use artifact::diff_artifact_path;
pub use compare::{ComparisonResult, compare_files};
pub use diff::{DiffOptions, DiffOutcome, diff, validate_threshold};
pub use error::CompareError;
