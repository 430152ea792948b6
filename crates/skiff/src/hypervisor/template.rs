//! Location of the hypervisor argument template file.

use std::path::{Path, PathBuf};

use skiff_common::paths::HYPERVISOR_ARGS_FILE;
use skiff_common::{SkiffError, SkiffPaths, SkiffResult};

/// Determine the full path to the hypervisor argument template.
///
/// Priority order: bundle directory, sysconfdir, defaultsdir.
///
/// # Errors
///
/// Returns [`SkiffError::TemplateNotFound`] if no candidate exists.
pub fn resolve_args_file(bundle_path: &Path, paths: &SkiffPaths) -> SkiffResult<PathBuf> {
    let candidates = [
        bundle_path.join(HYPERVISOR_ARGS_FILE),
        paths.sysconfdir.join(HYPERVISOR_ARGS_FILE),
        paths.defaultsdir.join(HYPERVISOR_ARGS_FILE),
    ];

    for candidate in candidates {
        if candidate.exists() {
            tracing::debug!(path = %candidate.display(), "using hypervisor args template");
            return Ok(candidate);
        }
    }

    Err(SkiffError::TemplateNotFound {
        filename: HYPERVISOR_ARGS_FILE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn roots() -> (tempfile::TempDir, PathBuf, SkiffPaths) {
        let root = tempfile::tempdir().unwrap();
        let bundle = root.path().join("bundle");
        let paths = SkiffPaths::with_root(root.path());
        fs::create_dir_all(&bundle).unwrap();
        fs::create_dir_all(&paths.sysconfdir).unwrap();
        fs::create_dir_all(&paths.defaultsdir).unwrap();
        (root, bundle, paths)
    }

    #[test]
    fn bundle_file_wins() {
        let (_root, bundle, paths) = roots();
        fs::write(bundle.join(HYPERVISOR_ARGS_FILE), "qemu\n").unwrap();
        fs::write(paths.sysconfdir.join(HYPERVISOR_ARGS_FILE), "other\n").unwrap();

        let found = resolve_args_file(&bundle, &paths).unwrap();
        assert_eq!(found, bundle.join(HYPERVISOR_ARGS_FILE));
    }

    #[test]
    fn sysconfdir_beats_defaultsdir() {
        let (_root, bundle, paths) = roots();
        fs::write(paths.sysconfdir.join(HYPERVISOR_ARGS_FILE), "a\n").unwrap();
        fs::write(paths.defaultsdir.join(HYPERVISOR_ARGS_FILE), "b\n").unwrap();

        let found = resolve_args_file(&bundle, &paths).unwrap();
        assert_eq!(found, paths.sysconfdir.join(HYPERVISOR_ARGS_FILE));
    }

    #[test]
    fn defaultsdir_is_the_last_resort() {
        let (_root, bundle, paths) = roots();
        fs::write(paths.defaultsdir.join(HYPERVISOR_ARGS_FILE), "b\n").unwrap();

        let found = resolve_args_file(&bundle, &paths).unwrap();
        assert_eq!(found, paths.defaultsdir.join(HYPERVISOR_ARGS_FILE));
    }

    #[test]
    fn missing_everywhere_is_an_error() {
        let (_root, bundle, paths) = roots();

        let err = resolve_args_file(&bundle, &paths).unwrap_err();
        assert!(matches!(err, SkiffError::TemplateNotFound { .. }));
    }
}
