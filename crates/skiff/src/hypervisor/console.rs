//! Console transport wiring for the VM.
//!
//! When the caller supplies no console device, one of two transports is
//! chosen: a pipe chardev symlinked to the supervisor's pre-created named
//! pipes when standard input is not an interactive terminal, or a Unix
//! domain socket below the runtime directory otherwise.

use std::path::Path;

use skiff_common::paths::CONSOLE_SOCKET;
use skiff_common::{SkiffError, SkiffResult};
use skiff_oci::Config;

/// Base name of the pipe console below the bundle directory. The hypervisor
/// opens `<base>.in` and `<base>.out`.
const PIPE_CONSOLE: &str = "skiff-std";

/// Named pipes pre-created by the supervisor below the bundle directory.
const INIT_STDOUT: &str = "init-stdout";
const INIT_STDIN: &str = "init-stdin";

/// Decide the console transport for this launch and return the chardev
/// description for the hypervisor command line.
///
/// Mutates `config`: records the chosen console path and whether it is a
/// socket.
pub(crate) fn setup_console(config: &mut Config) -> SkiffResult<String> {
    let interactive = rustix::termios::isatty(std::io::stdin());
    console_device(config, interactive)
}

/// `setup_console` with the interactivity decision made explicit.
fn console_device(config: &mut Config, interactive: bool) -> SkiffResult<String> {
    if let Some(console) = config.console.as_deref() {
        if !console.is_empty() {
            return Ok(format!("serial,id=charconsole0,path={console}"));
        }
    }

    config.use_socket_console = true;

    if interactive {
        // No console specified, so have the hypervisor create a Unix domain
        // socket. The path must not be quoted: the hypervisor fails to bind
        // a quoted socket path. signal=off keeps CONTROL+c from killing the
        // VM.
        let console = config.state.runtime_dir.join(CONSOLE_SOCKET);
        tracing::debug!(path = %console.display(), "no console device provided, using socket");

        let device = format!(
            "socket,path={},server,nowait,id=charconsole0,signal=off",
            console.display()
        );
        config.console = Some(console.display().to_string());
        return Ok(device);
    }

    // Not attached to a terminal: use a pipe chardev wired to the
    // supervisor's named pipes, via symlinks in the layout the hypervisor
    // expects.
    let bundle = config
        .bundle_path
        .clone()
        .ok_or(SkiffError::MissingConfig {
            what: "bundle path",
        })?;

    let console = bundle.join(PIPE_CONSOLE);
    tracing::debug!(path = %console.display(), "no console device provided, using pipe");

    link_pipe(
        &bundle.join(INIT_STDOUT),
        &bundle.join(format!("{PIPE_CONSOLE}.out")),
        "output",
    )?;
    link_pipe(
        &bundle.join(INIT_STDIN),
        &bundle.join(format!("{PIPE_CONSOLE}.in")),
        "input",
    )?;

    let device = format!("pipe,id=charconsole0,path={}", console.display());
    config.console = Some(console.display().to_string());
    Ok(device)
}

fn link_pipe(target: &Path, link: &Path, what: &str) -> SkiffResult<()> {
    std::os::unix::fs::symlink(target, link).map_err(|source| SkiffError::ConsoleSetup {
        message: format!("failed to create symlink for {what} pipe"),
        source,
    })
}
