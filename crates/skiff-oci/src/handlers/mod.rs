//! Section handlers for the bundle configuration document.
//!
//! One handler per recognized top-level section. The [`START_HANDLERS`] table
//! is the set used when processing a bundle for container start.

mod annotations;
mod hooks;
mod linux;
mod mounts;
mod platform;
mod process;
mod root;
mod vm;

use crate::dispatch::SpecHandler;

/// Handlers used to process a bundle document on container start.
pub const START_HANDLERS: &[SpecHandler] = &[
    SpecHandler {
        name: "annotations",
        handle: annotations::handle,
    },
    SpecHandler {
        name: "hooks",
        handle: hooks::handle,
    },
    SpecHandler {
        name: "mounts",
        handle: mounts::handle,
    },
    SpecHandler {
        name: "platform",
        handle: platform::handle,
    },
    SpecHandler {
        name: "process",
        handle: process::handle,
    },
    SpecHandler {
        name: "root",
        handle: root::handle,
    },
    SpecHandler {
        name: "vm",
        handle: vm::handle,
    },
    SpecHandler {
        name: "linux",
        handle: linux::handle,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_names_are_unique() {
        for (i, handler) in START_HANDLERS.iter().enumerate() {
            for other in &START_HANDLERS[i + 1..] {
                assert_ne!(handler.name, other.name);
            }
        }
    }
}
