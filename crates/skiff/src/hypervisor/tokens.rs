//! Replacement of placeholder tokens in the hypervisor argument template.
//!
//! Each line of the template is one shell token. Per line: the first line is
//! the executable and gets resolved against the search path; `#` comments
//! are stripped; every placeholder from a fixed table is replaced with its
//! value computed for this launch. The table is built fresh per build since
//! its values (UUID, sockets, console) are unique per launch.

use std::fs;
use std::path::Path;

use skiff_common::{SkiffError, SkiffResult};
use skiff_oci::Config;
use uuid::Uuid;

use super::{console, net};

/// Validate the launch preconditions.
///
/// Called before any template I/O: a broken configuration must never get as
/// far as reading the template.
///
/// # Errors
///
/// [`SkiffError::MissingConfig`] when the VM descriptor or bundle path was
/// never populated; [`SkiffError::PathValidation`] when the image, kernel or
/// workload root path is missing or has the wrong type.
pub fn validate(config: &Config) -> SkiffResult<()> {
    let Some(vm) = &config.vm else {
        return Err(SkiffError::MissingConfig { what: "vm" });
    };

    if config.bundle_path.is_none() {
        return Err(SkiffError::MissingConfig {
            what: "bundle path",
        });
    }

    if vm.image_path.as_os_str().is_empty() || !vm.image_path.exists() {
        return Err(SkiffError::PathValidation {
            what: "image file",
            path: vm.image_path.clone(),
        });
    }

    if vm.kernel_path.as_os_str().is_empty() || !vm.kernel_path.exists() {
        return Err(SkiffError::PathValidation {
            what: "kernel image",
            path: vm.kernel_path.clone(),
        });
    }

    let root = &config.oci.root.path;
    if root.as_os_str().is_empty() || !root.is_dir() {
        return Err(SkiffError::PathValidation {
            what: "workload directory",
            path: root.clone(),
        });
    }

    Ok(())
}

/// Replace any special tokens found in `args` with their expanded values.
///
/// Decides the console transport for this launch (see the console module)
/// and generates the per-launch UUID as side effects.
///
/// # Errors
///
/// Fails on violated preconditions, on console setup failure, and on a
/// placeholder that occurs in a line but has no value.
pub fn expand_args(config: &mut Config, args: &mut [String]) -> SkiffResult<()> {
    validate(config)?;

    let console_device = console::setup_console(config)?;

    let vm = config.vm.as_ref().ok_or(SkiffError::MissingConfig { what: "vm" })?;
    let image_size = fs::metadata(&vm.image_path)?.len().to_string();

    let uuid = Uuid::new_v4().to_string();
    // short name: the last group of the UUID
    let name = uuid.rsplit('-').next().unwrap_or(uuid.as_str()).to_string();

    let comms_socket = if config.state.comms_socket.as_os_str().is_empty() {
        None
    } else {
        Some(config.state.comms_socket.display().to_string())
    };

    let procsock_device = if config.state.process_socket.as_os_str().is_empty() {
        None
    } else {
        Some(format!(
            "socket,id=procsock,path={},server,nowait",
            config.state.process_socket.display()
        ))
    };

    let net_args = net::expand_network(&config.net);

    let special_tags: [(&str, Option<String>); 18] = [
        ("@WORKLOAD_DIR@", Some(config.oci.root.path.display().to_string())),
        ("@KERNEL@", Some(vm.kernel_path.display().to_string())),
        ("@KERNEL_PARAMS@", Some(vm.kernel_params.clone())),
        ("@IMAGE@", Some(vm.image_path.display().to_string())),
        ("@SIZE@", Some(image_size)),
        ("@COMMS_SOCKET@", comms_socket),
        ("@PROCESS_SOCKET@", procsock_device),
        ("@CONSOLE_DEVICE@", Some(console_device)),
        ("@NAME@", Some(name)),
        ("@UUID@", Some(uuid)),
        ("@NETDEV@", Some(net_args.primary.backend_flag)),
        ("@NETDEV_PARAMS@", Some(net_args.primary.backend_params)),
        ("@NETDEVICE@", Some(net_args.primary.device_flag)),
        ("@NETDEVICE_PARAMS@", Some(net_args.primary.device_params)),
        ("@NETDEV2@", Some(net_args.secondary.backend_flag)),
        ("@NETDEV2_PARAMS@", Some(net_args.secondary.backend_params)),
        ("@NETDEVICE2@", Some(net_args.secondary.device_flag)),
        ("@NETDEVICE2_PARAMS@", Some(net_args.secondary.device_params)),
    ];

    for (index, arg) in args.iter_mut().enumerate() {
        if index == 0 {
            // command must be the first entry
            resolve_executable(arg);
        }

        // a line whose first character is '#' is a comment
        if arg.starts_with('#') {
            arg.clear();
            continue;
        }

        if let Some(pos) = trailing_comment(arg) {
            arg.truncate(pos);
        }

        for (token, value) in &special_tags {
            if !arg.contains(token) {
                continue;
            }
            match value {
                Some(value) => *arg = arg.replace(token, value),
                None => {
                    return Err(SkiffError::TokenSubstitution {
                        token: (*token).to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Resolve a non-absolute executable name against the search path.
///
/// An unresolved name is left as-is; the spawn downstream reports the
/// failure.
fn resolve_executable(arg: &mut String) {
    if Path::new(arg.as_str()).is_absolute() {
        return;
    }
    if let Ok(resolved) = which::which(arg.as_str()) {
        *arg = resolved.to_string_lossy().into_owned();
    }
}

/// Byte offset of the first `#` preceded by whitespace, if any.
///
/// A `#` not preceded by whitespace is literal content.
fn trailing_comment(line: &str) -> Option<usize> {
    let mut prev: Option<char> = None;
    for (index, ch) in line.char_indices() {
        if ch == '#' {
            if let Some(prev) = prev {
                if prev.is_whitespace() {
                    return Some(index);
                }
            }
        }
        prev = Some(ch);
    }
    None
}
