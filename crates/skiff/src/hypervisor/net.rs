//! Expansion of the network configuration into hypervisor parameters.
//!
//! Two independent pure functions over the network descriptor: the kernel
//! `ip=` boot parameter, and the backend/device argument pairs for up to two
//! virtual network interfaces.

use skiff_oci::{NetConfig, NetInterfaceConfig};

/// Flag introducing a tap backend argument.
const NETDEV_FLAG: &str = "-netdev";

/// Flag introducing a guest device argument.
const DEVICE_FLAG: &str = "-device";

/// Legacy flag/value pair disabling a network slot.
const NET_DISABLED_FLAG: &str = "-net";
const NET_DISABLED_PARAMS: &str = "none";

/// One backend/device argument pair attaching a virtual network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePair {
    /// Backend flag (`-netdev`, or `-net` when disabled).
    pub backend_flag: String,
    /// Backend parameters.
    pub backend_params: String,
    /// Device flag (`-device`, or `-net` when disabled).
    pub device_flag: String,
    /// Device parameters.
    pub device_params: String,
}

impl DevicePair {
    fn disabled() -> Self {
        Self {
            backend_flag: NET_DISABLED_FLAG.to_string(),
            backend_params: NET_DISABLED_PARAMS.to_string(),
            device_flag: NET_DISABLED_FLAG.to_string(),
            device_params: NET_DISABLED_PARAMS.to_string(),
        }
    }

    fn for_interface(if_cfg: &NetInterfaceConfig) -> Self {
        Self {
            backend_flag: NETDEV_FLAG.to_string(),
            backend_params: netdev_params(if_cfg),
            device_flag: DEVICE_FLAG.to_string(),
            device_params: device_params(if_cfg),
        }
    }

    /// Whether this pair is the disabled `-net none` form.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.backend_flag == NET_DISABLED_FLAG
    }
}

/// The hypervisor network arguments for one launch: at most two wired
/// interfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkArgs {
    /// First wired interface, or the disabled form.
    pub primary: DevicePair,
    /// Second wired interface, or the disabled form.
    pub secondary: DevicePair,
}

fn netdev_params(if_cfg: &NetInterfaceConfig) -> String {
    format!(
        "tap,ifname={tap},script=no,downscript=no,id={tap}",
        tap = if_cfg.tap_device
    )
}

fn device_params(if_cfg: &NetInterfaceConfig) -> String {
    match &if_cfg.mac_address {
        None => format!("driver=virtio-net,netdev={}", if_cfg.tap_device),
        Some(mac) => format!("driver=virtio-net,netdev={},mac={}", if_cfg.tap_device, mac),
    }
}

/// Generate the expanded kernel network IP configuration to pass to the
/// kernel.
///
/// Field order follows the kernel's nfsroot documentation:
/// `ip=<client-ip>:<server-ip>:<gw-ip>:<netmask>:<hostname>:<device>:<autoconf>:<dns0-ip>:<dns1-ip>`
///
/// Only the first configured interface ever contributes: the target kernel
/// networking stack does not accept multiple `ip=` parameters.
#[must_use]
pub fn kernel_ip_param(net: &NetConfig) -> String {
    let Some(if_cfg) = net.interfaces.first() else {
        return format!("ip=::::{}::off::", net.hostname);
    };

    if let Some(ip) = &if_cfg.ip_address {
        return format!(
            "ip={}::{}:{}:{}:{}:off::",
            ip,
            net.gateway.as_deref().unwrap_or_default(),
            if_cfg.subnet_mask.as_deref().unwrap_or_default(),
            net.hostname,
            if_cfg.ifname
        );
    }

    if let Some(ipv6) = &if_cfg.ipv6_address {
        return format!(
            "ip=[{}]::::{}:{}:off::",
            ipv6, net.hostname, if_cfg.ifname
        );
    }

    String::new()
}

/// Generate the backend/device argument pairs for the configured interfaces.
///
/// Interfaces are wired in insertion order; everything past the second is
/// ignored. Unused slots degrade to the legacy `-net none` disable form.
#[must_use]
pub fn expand_network(net: &NetConfig) -> NetworkArgs {
    if net.interfaces.is_empty() {
        return NetworkArgs {
            primary: DevicePair::disabled(),
            secondary: DevicePair::disabled(),
        };
    }

    tracing::debug!(count = net.interfaces.len(), "network interfaces");

    let mut primary = None;
    let mut secondary = None;

    for (index, if_cfg) in net.interfaces.iter().enumerate() {
        tracing::debug!(index, ifname = %if_cfg.ifname, "processing interface");

        // Duplicate names are detected and logged only; the interface is
        // still wired.
        if net.interfaces[..index]
            .iter()
            .any(|prev| prev.ifname == if_cfg.ifname)
        {
            tracing::debug!(index, ifname = %if_cfg.ifname, "duplicate interface name");
        }

        if primary.is_none() {
            primary = Some(DevicePair::for_interface(if_cfg));
            continue;
        }

        if secondary.is_none() {
            secondary = Some(DevicePair::for_interface(if_cfg));
            // only two interfaces are supported
            break;
        }
    }

    NetworkArgs {
        primary: primary.unwrap_or_else(DevicePair::disabled),
        secondary: secondary.unwrap_or_else(DevicePair::disabled),
    }
}
