//! Standard filesystem paths and well-known file names for Skiff.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

/// Name of the hypervisor argument template file.
pub const HYPERVISOR_ARGS_FILE: &str = "hypervisor.args";

/// Name of the OCI configuration file inside a bundle.
pub const CONFIG_FILE: &str = "config.json";

/// Name of the socket used to control an already running VM.
pub const HYPERVISOR_SOCKET: &str = "hypervisor.sock";

/// Name of the socket used to determine whether the VM is still running.
pub const PROCESS_SOCKET: &str = "process.sock";

/// Name of the socket used as a console device.
pub const CONSOLE_SOCKET: &str = "console.sock";

/// Per-instance metadata file below the runtime directory.
pub const STATE_FILE: &str = "state.json";

/// Default system configuration directory.
pub static SKIFF_SYSCONFDIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("SKIFF_SYSCONFDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/etc/skiff"))
});

/// Default stateless defaults directory.
pub static SKIFF_DEFAULTSDIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("SKIFF_DEFAULTSDIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/usr/share/defaults/skiff"))
});

/// Default directory below which container-specific runtime directories are
/// created.
pub static SKIFF_RUNTIME_DIR: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("SKIFF_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/run/skiff/containers"))
});

/// Resolution context for the directories Skiff reads configuration from.
///
/// The system directories are configuration, not constants: tests (and
/// packagers) re-point them at alternate roots.
#[derive(Debug, Clone)]
pub struct SkiffPaths {
    /// System configuration directory (default: /etc/skiff).
    pub sysconfdir: PathBuf,
    /// Stateless defaults directory (default: /usr/share/defaults/skiff).
    pub defaultsdir: PathBuf,
    /// Directory holding per-container runtime directories
    /// (default: /run/skiff/containers).
    pub runtime_dir: PathBuf,
}

impl SkiffPaths {
    /// Create paths with the default locations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create paths rooted below a single directory.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            sysconfdir: root.join("etc"),
            defaultsdir: root.join("defaults"),
            runtime_dir: root.join("run"),
        }
    }

    /// Runtime directory for a specific container.
    #[must_use]
    pub fn container_runtime_dir(&self, id: &str) -> PathBuf {
        self.runtime_dir.join(id)
    }

    /// Socket used to control the hypervisor of a container.
    #[must_use]
    pub fn comms_socket(&self, id: &str) -> PathBuf {
        self.container_runtime_dir(id).join(HYPERVISOR_SOCKET)
    }

    /// Socket used to determine when a container's VM has shut down.
    #[must_use]
    pub fn process_socket(&self, id: &str) -> PathBuf {
        self.container_runtime_dir(id).join(PROCESS_SOCKET)
    }

    /// Console socket for a container.
    #[must_use]
    pub fn console_socket(&self, id: &str) -> PathBuf {
        self.container_runtime_dir(id).join(CONSOLE_SOCKET)
    }

    /// State file for a container.
    #[must_use]
    pub fn state_file(&self, id: &str) -> PathBuf {
        self.container_runtime_dir(id).join(STATE_FILE)
    }
}

impl Default for SkiffPaths {
    fn default() -> Self {
        Self {
            sysconfdir: SKIFF_SYSCONFDIR.clone(),
            defaultsdir: SKIFF_DEFAULTSDIR.clone(),
            runtime_dir: SKIFF_RUNTIME_DIR.clone(),
        }
    }
}

/// Path of a file below a container's bundle directory.
///
/// Returns `None` if either component is empty.
#[must_use]
pub fn bundle_file(bundle_path: &Path, file: &str) -> Option<PathBuf> {
    if bundle_path.as_os_str().is_empty() || file.is_empty() {
        return None;
    }
    Some(bundle_path.join(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_root() {
        let paths = SkiffPaths::with_root("/tmp/skiff-test");
        assert_eq!(paths.sysconfdir, PathBuf::from("/tmp/skiff-test/etc"));
        assert_eq!(paths.defaultsdir, PathBuf::from("/tmp/skiff-test/defaults"));
        assert_eq!(
            paths.container_runtime_dir("abc123"),
            PathBuf::from("/tmp/skiff-test/run/abc123")
        );
    }

    #[test]
    fn container_sockets() {
        let paths = SkiffPaths::with_root("/r");
        assert_eq!(
            paths.comms_socket("c1"),
            PathBuf::from("/r/run/c1/hypervisor.sock")
        );
        assert_eq!(
            paths.process_socket("c1"),
            PathBuf::from("/r/run/c1/process.sock")
        );
        assert_eq!(
            paths.console_socket("c1"),
            PathBuf::from("/r/run/c1/console.sock")
        );
    }

    #[test]
    fn bundle_file_joins() {
        let path = bundle_file(Path::new("/bundles/c1"), CONFIG_FILE).unwrap();
        assert_eq!(path, PathBuf::from("/bundles/c1/config.json"));
    }

    #[test]
    fn bundle_file_rejects_empty() {
        assert!(bundle_file(Path::new(""), CONFIG_FILE).is_none());
        assert!(bundle_file(Path::new("/bundles/c1"), "").is_none());
    }
}
