//! Container state document.
//!
//! The state file is written below the per-container runtime directory and
//! lets commands other than "start" find the VM again.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::VmConfig;

/// Status of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    /// Container has been created but not started.
    Created,
    /// Container's VM is running.
    Running,
    /// Container is paused.
    Paused,
    /// Container has exited.
    Stopped,
    /// Container is shutting down.
    Stopping,
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
            Self::Stopping => write!(f, "stopping"),
        }
    }
}

/// Metadata about a running container instance, as stored in its state file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OciState {
    /// OCI version of the bundle the container was created from.
    pub oci_version: String,

    /// Container ID.
    pub id: String,

    /// Process ID of the VM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Container status.
    pub status: ContainerStatus,

    /// Path to the OCI bundle.
    pub bundle_path: PathBuf,

    /// Socket used to control the hypervisor.
    pub comms_path: PathBuf,

    /// Socket used to determine when the VM has shut down.
    pub procsock_path: PathBuf,

    /// ISO 8601 creation timestamp.
    pub create_time: String,

    /// Console device in use, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console: Option<String>,

    /// Whether the console is a socket rather than a pty device.
    #[serde(default)]
    pub use_socket_console: bool,

    /// VM configuration the container was launched with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm: Option<VmConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_round_trips_through_json() {
        let state = OciState {
            oci_version: "1.0.0-rc1".to_string(),
            id: "c1".to_string(),
            pid: Some(4242),
            status: ContainerStatus::Running,
            bundle_path: PathBuf::from("/bundles/c1"),
            comms_path: PathBuf::from("/run/skiff/containers/c1/hypervisor.sock"),
            procsock_path: PathBuf::from("/run/skiff/containers/c1/process.sock"),
            create_time: "2016-09-30T12:00:00Z".to_string(),
            console: None,
            use_socket_console: true,
            vm: None,
        };

        let json = serde_json::to_string(&state).unwrap();
        let back: OciState = serde_json::from_str(&json).unwrap();

        assert_eq!(back.id, "c1");
        assert_eq!(back.status, ContainerStatus::Running);
        assert!(back.use_socket_console);
    }

    #[test]
    fn status_display() {
        assert_eq!(ContainerStatus::Running.to_string(), "running");
        assert_eq!(ContainerStatus::Stopping.to_string(), "stopping");
    }
}
