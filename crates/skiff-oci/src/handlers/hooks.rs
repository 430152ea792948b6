//! Handler for the `hooks` section.

use std::path::PathBuf;

use skiff_common::{SkiffError, SkiffResult};

use crate::config::{Config, Hook};
use crate::spec::SpecNode;

fn parse_hooks(phase: &SpecNode) -> SkiffResult<Vec<Hook>> {
    let mut hooks = Vec::with_capacity(phase.children.len());

    for entry in &phase.children {
        let path = entry.child_value("path").unwrap_or_default();
        if path.is_empty() {
            return Err(SkiffError::Spec {
                message: format!("hooks section: {} hook with no path", phase.label),
            });
        }

        let timeout = match entry.child_value("timeout") {
            None => None,
            Some(raw) => Some(raw.parse().map_err(|_| SkiffError::Spec {
                message: format!("hooks section: invalid timeout: {raw}"),
            })?),
        };

        hooks.push(Hook {
            path: PathBuf::from(path),
            args: entry
                .child("args")
                .map(SpecNode::child_labels)
                .unwrap_or_default(),
            env: entry
                .child("env")
                .map(SpecNode::child_labels)
                .unwrap_or_default(),
            timeout,
        });
    }

    Ok(hooks)
}

pub(crate) fn handle(node: &SpecNode, config: &mut Config) -> SkiffResult<()> {
    for phase in &node.children {
        match phase.label.as_str() {
            "prestart" => config.oci.hooks.prestart = parse_hooks(phase)?,
            "poststart" => config.oci.hooks.poststart = parse_hooks(phase)?,
            "poststop" => config.oci.hooks.poststop = parse_hooks(phase)?,
            _ => {}
        }
    }

    Ok(())
}
