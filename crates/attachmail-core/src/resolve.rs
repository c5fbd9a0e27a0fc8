//! Attachment path resolution.
//!
//! A bare filename is looked up under the input resource root first. If it
//! is not there, the output resource root is used without checking that
//! the file exists; a missing file then surfaces when it is read.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::DeliveryConfig;

/// Resolves filenames against the configured resource roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    input_root: Option<PathBuf>,
    output_root: Option<PathBuf>,
}

impl PathResolver {
    /// Creates a resolver, making relative roots absolute against `cwd`.
    #[must_use]
    pub fn new(input_root: Option<&Path>, output_root: Option<&Path>, cwd: &Path) -> Self {
        Self {
            input_root: input_root.map(|root| absolutize(root, cwd)),
            output_root: output_root.map(|root| absolutize(root, cwd)),
        }
    }

    /// Creates a resolver from the configured roots and the current
    /// working directory.
    #[must_use]
    pub fn from_config(config: &DeliveryConfig) -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::new(
            config.input_root.as_deref(),
            config.output_root.as_deref(),
            &cwd,
        )
    }

    /// Returns the path to use for `filename`, or `None` when no root is
    /// configured.
    ///
    /// With only an input root configured, a missing candidate under it
    /// is still returned.
    #[must_use]
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let candidate = self
            .input_root
            .as_ref()
            .map(|root| under_root(root, filename));
        if let Some(path) = &candidate
            && path.exists()
        {
            debug!(path = %path.display(), "attachment found under input root");
            return candidate;
        }

        let resolved = self
            .output_root
            .as_ref()
            .map(|root| under_root(root, filename))
            .or(candidate);
        debug!(path = ?resolved, "attachment path resolved");
        resolved
    }
}

fn absolutize(root: &Path, cwd: &Path) -> PathBuf {
    if root.is_absolute() {
        root.to_path_buf()
    } else {
        cwd.join(root)
    }
}

/// Joins `filename` under `root`. Leading separators in the filename are
/// dropped so the result always stays under the root.
fn under_root(root: &Path, filename: &str) -> PathBuf {
    root.join(filename.trim_start_matches(['/', '\\']))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn prefers_existing_file_in_input_root() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("report.pdf"), b"pdf").unwrap();
        fs::write(output.path().join("report.pdf"), b"pdf").unwrap();

        let resolver = PathResolver::new(Some(input.path()), Some(output.path()), Path::new("/"));
        assert_eq!(
            resolver.resolve("report.pdf"),
            Some(input.path().join("report.pdf"))
        );
    }

    #[test]
    fn falls_back_to_output_root_without_checking() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let resolver = PathResolver::new(Some(input.path()), Some(output.path()), Path::new("/"));
        let resolved = resolver.resolve("missing.csv").unwrap();
        assert_eq!(resolved, output.path().join("missing.csv"));
        assert!(!resolved.exists());
    }

    #[test]
    fn input_root_only_keeps_missing_candidate() {
        let input = tempfile::tempdir().unwrap();
        let resolver = PathResolver::new(Some(input.path()), None, Path::new("/"));
        assert_eq!(
            resolver.resolve("missing.csv"),
            Some(input.path().join("missing.csv"))
        );
    }

    #[test]
    fn no_roots_no_path() {
        let resolver = PathResolver::new(None, None, Path::new("/"));
        assert_eq!(resolver.resolve("report.pdf"), None);
    }

    #[test]
    fn relative_roots_use_cwd() {
        let resolver = PathResolver::new(None, Some(Path::new("workspace/out/")), Path::new("/srv/agent"));
        assert_eq!(
            resolver.resolve("chart.png"),
            Some(PathBuf::from("/srv/agent/workspace/out/chart.png"))
        );
    }

    #[test]
    fn leading_separator_stays_under_root() {
        let resolver = PathResolver::new(None, Some(Path::new("/srv/out")), Path::new("/"));
        assert_eq!(
            resolver.resolve("/etc/passwd"),
            Some(PathBuf::from("/srv/out/etc/passwd"))
        );
        assert_eq!(
            resolver.resolve("nested/file.txt"),
            Some(PathBuf::from("/srv/out/nested/file.txt"))
        );
    }
}
