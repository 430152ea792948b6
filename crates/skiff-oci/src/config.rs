//! Launch configuration for one container.
//!
//! A [`Config`] is the aggregate owned for the lifetime of a single
//! container-launch attempt: the OCI metadata parsed from the bundle, the VM
//! descriptor, the network descriptor and the per-instance runtime state.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use skiff_common::{SkiffError, SkiffPaths};

/// The main object holding all configuration data for one launch attempt.
///
/// The dispatch engine fills this in from the parsed bundle document; the
/// hypervisor argument builder later consumes it. `vm` and `bundle_path` must
/// be populated before argument building.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Official OCI configuration parameters.
    pub oci: OciConfig,

    /// VM configuration.
    pub vm: Option<VmConfig>,

    /// Network configuration.
    pub net: NetConfig,

    /// Container-specific runtime state paths.
    pub state: RuntimeState,

    /// Path to the directory containing the OCI bundle to run.
    pub bundle_path: Option<PathBuf>,

    /// Path to the device to use for console I/O.
    pub console: Option<String>,

    /// If `true`, `console` is a socket rather than a pty device.
    pub use_socket_console: bool,
}

impl Config {
    /// Create a configuration for the given bundle directory.
    #[must_use]
    pub fn for_bundle(bundle_path: impl Into<PathBuf>) -> Self {
        Self {
            bundle_path: Some(bundle_path.into()),
            ..Self::default()
        }
    }
}

/// OCI runtime schema parameters, as read from the bundle's `config.json`.
#[derive(Debug, Clone, Default)]
pub struct OciConfig {
    /// OCI specification version the bundle declares.
    pub version: String,

    /// Container hostname.
    pub hostname: Option<String>,

    /// Platform the bundle targets.
    pub platform: Platform,

    /// Container root filesystem.
    pub root: Root,

    /// Workload process configuration.
    pub process: Process,

    /// Additional mounts.
    pub mounts: Vec<Mount>,

    /// Annotations (key-value pairs).
    pub annotations: HashMap<String, String>,

    /// Lifecycle hooks.
    pub hooks: Hooks,

    /// Linux namespaces to join or create.
    pub namespaces: Vec<Namespace>,
}

/// Platform the bundle targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system (expected: "linux").
    pub os: String,
    /// Architecture (expected: "amd64").
    pub arch: String,
}

/// Container root filesystem configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Root {
    /// Full path to the workload root directory.
    pub path: PathBuf,
    /// Whether the root filesystem is read-only.
    #[serde(default)]
    pub readonly: bool,
}

/// Workload process configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    /// Command arguments (`args[0]` is the executable).
    pub args: Vec<String>,
    /// Environment variables in `KEY=value` form.
    #[serde(default)]
    pub env: Vec<String>,
    /// Working directory for the workload.
    pub cwd: PathBuf,
    /// Whether the container has an associated terminal.
    #[serde(default)]
    pub terminal: bool,
    /// User to run the workload as.
    #[serde(default)]
    pub user: User,
}

/// User and group IDs for the workload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    pub uid: u32,
    /// Group ID.
    pub gid: u32,
    /// Extra group IDs to set the workload as a member of.
    #[serde(default)]
    pub additional_gids: Vec<u32>,
}

/// A single mount entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mount {
    /// Destination inside the container.
    pub destination: PathBuf,
    /// Filesystem type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Mount source.
    pub source: Option<PathBuf>,
    /// Mount options.
    #[serde(default)]
    pub options: Vec<String>,
}

/// A lifecycle hook command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hook {
    /// Command to run.
    pub path: PathBuf,
    /// Arguments to the command (`args[0]` is the first argument).
    #[serde(default)]
    pub args: Vec<String>,
    /// Environment variables to set.
    #[serde(default)]
    pub env: Vec<String>,
    /// Timeout in seconds.
    pub timeout: Option<u32>,
}

/// Lifecycle hooks by phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hooks {
    /// Hooks run before the workload starts.
    #[serde(default)]
    pub prestart: Vec<Hook>,
    /// Hooks run after the workload starts.
    #[serde(default)]
    pub poststart: Vec<Hook>,
    /// Hooks run after the workload stops.
    #[serde(default)]
    pub poststop: Vec<Hook>,
}

/// Linux namespace kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamespaceKind {
    /// Process ID namespace.
    Pid,
    /// Network namespace.
    Network,
    /// Mount namespace.
    Mount,
    /// IPC namespace.
    Ipc,
    /// UTS namespace.
    Uts,
    /// User namespace.
    User,
    /// Cgroup namespace.
    Cgroup,
}

impl FromStr for NamespaceKind {
    type Err = SkiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pid" => Ok(Self::Pid),
            "network" => Ok(Self::Network),
            "mount" => Ok(Self::Mount),
            "ipc" => Ok(Self::Ipc),
            "uts" => Ok(Self::Uts),
            "user" => Ok(Self::User),
            "cgroup" => Ok(Self::Cgroup),
            other => Err(SkiffError::Spec {
                message: format!("unknown namespace type: {other}"),
            }),
        }
    }
}

/// A namespace to create or join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    /// Namespace kind.
    #[serde(rename = "type")]
    pub kind: NamespaceKind,
    /// Existing namespace to join; a new one is created when absent.
    pub path: Option<PathBuf>,
}

/// VM configuration data for the hypervisor launch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VmConfig {
    /// Full path to the hypervisor binary.
    pub hypervisor_path: PathBuf,
    /// Full path to the guest disk image.
    pub image_path: PathBuf,
    /// Full path to the kernel to boot the VM with.
    pub kernel_path: PathBuf,
    /// Kernel parameters (may be empty).
    #[serde(default)]
    pub kernel_params: String,
}

/// Network configuration for the VM.
#[derive(Debug, Clone, Default)]
pub struct NetConfig {
    /// Hostname passed on the kernel command line.
    pub hostname: String,

    /// Network gateway (xxx.xxx.xxx.xxx).
    pub gateway: Option<String>,

    /// Primary DNS IP.
    pub dns_primary: Option<String>,

    /// Secondary DNS IP.
    pub dns_secondary: Option<String>,

    /// Network interfaces, in insertion order.
    ///
    /// Order matters: the first interface is wired as the primary hypervisor
    /// device, the second as the secondary. No more than two are ever wired.
    pub interfaces: Vec<NetInterfaceConfig>,
}

/// Configuration for one network interface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetInterfaceConfig {
    /// Name of the interface within the namespace, and within the VM.
    pub ifname: String,

    /// Name of the host-side tap device backing the interface.
    pub tap_device: String,

    /// MAC address with colon separators (xx:xx:xx:xx:xx:xx).
    pub mac_address: Option<String>,

    /// IPv4 address (xxx.xxx.xxx.xxx).
    pub ip_address: Option<String>,

    /// IPv4 subnet mask (xxx.xxx.xxx.xxx).
    pub subnet_mask: Option<String>,

    /// IPv6 address.
    pub ipv6_address: Option<String>,

    /// Bridge connecting the interface to the tap device.
    pub bridge: Option<String>,
}

/// Per-instance runtime state paths.
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// Container-specific directory below the runtime directory prefix.
    pub runtime_dir: PathBuf,

    /// Socket used to control the hypervisor.
    pub comms_socket: PathBuf,

    /// Socket used to determine when the hypervisor has shut down.
    pub process_socket: PathBuf,
}

impl RuntimeState {
    /// Derive the runtime state paths for a container.
    #[must_use]
    pub fn for_container(paths: &SkiffPaths, id: &str) -> Self {
        Self {
            runtime_dir: paths.container_runtime_dir(id),
            comms_socket: paths.comms_socket(id),
            process_socket: paths.process_socket(id),
        }
    }
}
