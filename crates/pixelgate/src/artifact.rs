use std::path::{Path, PathBuf};

/// Derive the diff-artifact path from a candidate image path.
///
/// The artifact lands next to the candidate with a `-diff` marker before the
/// extension: `shots/button.png` -> `shots/button-diff.png`. Pure string
/// transformation, no filesystem access, so callers can predict the location
/// before (or without) running a comparison.
pub fn diff_artifact_path(candidate: &Path) -> PathBuf {
    let stem = candidate
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match candidate.extension() {
        Some(ext) => format!("{stem}-diff.{}", ext.to_string_lossy()),
        None => format!("{stem}-diff"),
    };

    candidate.with_file_name(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_png_suffix() {
        assert_eq!(
            diff_artifact_path(Path::new("button.png")),
            PathBuf::from("button-diff.png")
        );
    }

    #[test]
    fn keeps_parent_directory() {
        assert_eq!(
            diff_artifact_path(Path::new("shots/primary/button.png")),
            PathBuf::from("shots/primary/button-diff.png")
        );
    }

    #[test]
    fn extensionless_path_gets_bare_marker() {
        assert_eq!(
            diff_artifact_path(Path::new("shots/button")),
            PathBuf::from("shots/button-diff")
        );
    }

    #[test]
    fn only_trailing_suffix_is_touched() {
        assert_eq!(
            diff_artifact_path(Path::new("button.v2.png")),
            PathBuf::from("button.v2-diff.png")
        );
    }
}
