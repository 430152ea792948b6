//! Integration tests for the hypervisor invocation builder.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use skiff::hypervisor;
use skiff_common::paths::HYPERVISOR_ARGS_FILE;
use skiff_common::{SkiffError, SkiffPaths};
use skiff_oci::{Config, NetInterfaceConfig, SpecNode, VmConfig, process_spec, START_HANDLERS};
use tempfile::TempDir;

const IMAGE_SIZE: usize = 512 * 1024;

/// A bundle with rootfs, kernel and image on disk, plus a config wired to
/// them.
fn scaffold(root: &Path) -> Config {
    let bundle = root.join("bundle");
    let rootfs = bundle.join("rootfs");
    fs::create_dir_all(&rootfs).unwrap();

    let image = root.join("image.img");
    fs::write(&image, vec![0u8; IMAGE_SIZE]).unwrap();
    let kernel = root.join("vmlinux");
    fs::write(&kernel, b"not really a kernel").unwrap();

    let mut config = Config::for_bundle(&bundle);
    config.vm = Some(VmConfig {
        hypervisor_path: PathBuf::from("/usr/bin/qemu-system-x86"),
        image_path: image,
        kernel_path: kernel,
        kernel_params: "root=/dev/pmem0p1 rw".to_string(),
    });
    config.oci.root.path = rootfs;
    config.state.runtime_dir = root.join("run/c1");
    config.state.comms_socket = root.join("run/c1/hypervisor.sock");
    config.state.process_socket = root.join("run/c1/process.sock");
    // serial console keeps the build independent of the test harness tty
    config.console = Some("/dev/pts/5".to_string());
    config
}

const TEMPLATE: &str = "\
/usr/bin/qemu-system-x86
-name
@NAME@
# machine setup
-m
2G,slots=2,maxmem=3G   # plenty for a test
-kernel
@KERNEL@
-append
@KERNEL_PARAMS@
-drive
file=@IMAGE@,size=@SIZE@,if=virtio,format=raw
-chardev
socket,id=charch0,path=@COMMS_SOCKET@
-chardev
@PROCESS_SOCKET@
-chardev
@CONSOLE_DEVICE@
-uuid
@UUID@
@NETDEV@
@NETDEV_PARAMS@
@NETDEVICE@
@NETDEVICE_PARAMS@
@NETDEV2@
@NETDEV2_PARAMS@
@NETDEVICE2@
@NETDEVICE2_PARAMS@

";

fn eth0() -> NetInterfaceConfig {
    NetInterfaceConfig {
        ifname: "eth0".to_string(),
        tap_device: "tap0".to_string(),
        ip_address: Some("10.0.2.15".to_string()),
        subnet_mask: Some("255.255.255.0".to_string()),
        ..NetInterfaceConfig::default()
    }
}

#[test]
fn build_with_one_interface() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let mut config = scaffold(dir.path());
    config.net.hostname = "vm1".to_string();
    config.net.gateway = Some("10.0.2.2".to_string());
    config.net.interfaces.push(eth0());

    let bundle = config.bundle_path.clone().unwrap();
    fs::write(bundle.join(HYPERVISOR_ARGS_FILE), TEMPLATE)?;

    let paths = SkiffPaths::with_root(dir.path().join("sys"));
    let args = hypervisor::vm_args(&mut config, &paths)?;

    // executable first, comments gone, every survivor trimmed and non-empty
    assert_eq!(args[0], "/usr/bin/qemu-system-x86");
    assert!(args.iter().all(|arg| !arg.is_empty()));
    assert!(args.iter().all(|arg| arg.trim() == arg));
    assert!(!args.iter().any(|arg| arg.contains('#')));
    assert!(!args.iter().any(|arg| arg.contains('@')));

    // trailing comment truncated, surviving value kept
    assert!(args.contains(&"2G,slots=2,maxmem=3G".to_string()));

    // kernel and image wiring
    let kernel = dir.path().join("vmlinux").display().to_string();
    assert!(args.contains(&kernel));
    assert!(args.contains(&"root=/dev/pmem0p1 rw".to_string()));
    let drive = format!(
        "file={},size={IMAGE_SIZE},if=virtio,format=raw",
        dir.path().join("image.img").display()
    );
    assert!(args.contains(&drive));

    // primary interface wired, secondary disabled
    assert!(args.contains(&"-netdev".to_string()));
    assert!(args.contains(&"tap,ifname=tap0,script=no,downscript=no,id=tap0".to_string()));
    assert!(args.contains(&"-device".to_string()));
    assert!(args.contains(&"driver=virtio-net,netdev=tap0".to_string()));
    assert_eq!(args.iter().filter(|arg| arg.as_str() == "-net").count(), 2);
    assert_eq!(args.iter().filter(|arg| arg.as_str() == "none").count(), 2);

    // console and sockets
    assert!(args.contains(&"serial,id=charconsole0,path=/dev/pts/5".to_string()));
    let comms = format!(
        "socket,id=charch0,path={}",
        dir.path().join("run/c1/hypervisor.sock").display()
    );
    assert!(args.contains(&comms));
    let procsock = format!(
        "socket,id=procsock,path={},server,nowait",
        dir.path().join("run/c1/process.sock").display()
    );
    assert!(args.contains(&procsock));

    // the kernel ip line for the same descriptor matches the fixed field order
    assert_eq!(
        hypervisor::net::kernel_ip_param(&config.net),
        "ip=10.0.2.15::10.0.2.2:255.255.255.0:vm1:eth0:off::"
    );

    Ok(())
}

#[test]
fn third_interface_never_reaches_the_command_line() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let mut config = scaffold(dir.path());
    config.net.interfaces.push(eth0());
    config.net.interfaces.push(NetInterfaceConfig {
        ifname: "eth1".to_string(),
        tap_device: "tap1".to_string(),
        mac_address: Some("02:00:ca:fe:00:02".to_string()),
        ..NetInterfaceConfig::default()
    });
    config.net.interfaces.push(NetInterfaceConfig {
        ifname: "eth2".to_string(),
        tap_device: "tap2".to_string(),
        ..NetInterfaceConfig::default()
    });

    let bundle = config.bundle_path.clone().unwrap();
    fs::write(bundle.join(HYPERVISOR_ARGS_FILE), TEMPLATE)?;

    let paths = SkiffPaths::with_root(dir.path().join("sys"));
    let args = hypervisor::vm_args(&mut config, &paths)?;

    assert!(args.contains(&"tap,ifname=tap1,script=no,downscript=no,id=tap1".to_string()));
    assert!(args.contains(&"driver=virtio-net,netdev=tap1,mac=02:00:ca:fe:00:02".to_string()));
    assert!(!args.iter().any(|arg| arg.contains("tap2")));
    // both slots wired, so no disabled forms remain
    assert!(!args.contains(&"-net".to_string()));

    Ok(())
}

#[test]
fn template_is_found_in_sysconfdir() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;
    let mut config = scaffold(dir.path());

    let paths = SkiffPaths::with_root(dir.path().join("sys"));
    fs::create_dir_all(&paths.sysconfdir)?;
    fs::write(paths.sysconfdir.join(HYPERVISOR_ARGS_FILE), TEMPLATE)?;

    let args = hypervisor::vm_args(&mut config, &paths)?;
    assert_eq!(args[0], "/usr/bin/qemu-system-x86");

    Ok(())
}

#[test]
fn missing_template_everywhere_fails() {
    let dir = TempDir::new().unwrap();
    let mut config = scaffold(dir.path());

    let paths = SkiffPaths::with_root(dir.path().join("sys"));
    let err = hypervisor::vm_args(&mut config, &paths).unwrap_err();

    assert!(matches!(err, SkiffError::TemplateNotFound { .. }));
}

#[test]
fn path_validation_precedes_template_io() {
    let dir = TempDir::new().unwrap();
    let mut config = scaffold(dir.path());
    // break the image; also provide no template anywhere
    config.vm.as_mut().unwrap().image_path = dir.path().join("gone.img");

    let paths = SkiffPaths::with_root(dir.path().join("sys"));
    let err = hypervisor::vm_args(&mut config, &paths).unwrap_err();

    // a PathValidation failure, not TemplateNotFound: validation runs first
    assert!(matches!(
        err,
        SkiffError::PathValidation { what: "image file", .. }
    ));
}

#[test]
fn dispatch_then_build() -> Result<(), Box<dyn Error>> {
    let dir = TempDir::new()?;

    let bundle = dir.path().join("bundle");
    fs::create_dir_all(bundle.join("rootfs"))?;
    let image = dir.path().join("image.img");
    fs::write(&image, vec![0u8; 4096])?;
    let kernel = dir.path().join("vmlinux");
    fs::write(&kernel, b"kernel")?;

    let document = serde_json::json!({
        "ociVersion": "1.0.0-rc1",
        "hostname": "vm1",
        "platform": { "os": "linux", "arch": "amd64" },
        "root": { "path": "rootfs", "readonly": false },
        "process": {
            "terminal": false,
            "cwd": "/",
            "args": ["sh"],
            "env": ["PATH=/usr/bin"],
            "user": { "uid": 0, "gid": 0 }
        },
        "vm": {
            "path": "/usr/bin/qemu-system-x86",
            "image": image.display().to_string(),
            "kernel": { "path": kernel.display().to_string(), "parameters": "quiet" }
        }
    });

    let mut config = Config::for_bundle(&bundle);
    process_spec(
        &SpecNode::from_document(&document),
        &mut config,
        START_HANDLERS,
    )?;

    assert_eq!(config.oci.version, "1.0.0-rc1");
    assert_eq!(config.oci.hostname.as_deref(), Some("vm1"));
    assert_eq!(config.oci.root.path, bundle.join("rootfs"));

    // runtime paths an external setup step would have provided
    config.state.runtime_dir = dir.path().join("run/c1");
    config.state.comms_socket = dir.path().join("run/c1/hypervisor.sock");
    config.state.process_socket = dir.path().join("run/c1/process.sock");
    config.console = Some("/dev/pts/5".to_string());

    fs::write(bundle.join(HYPERVISOR_ARGS_FILE), TEMPLATE)?;
    let paths = SkiffPaths::with_root(dir.path().join("sys"));
    let args = hypervisor::vm_args(&mut config, &paths)?;

    assert_eq!(args[0], "/usr/bin/qemu-system-x86");
    assert!(args.contains(&"quiet".to_string()));

    Ok(())
}
