//! Handler for the `mounts` section.

use std::path::PathBuf;

use skiff_common::{SkiffError, SkiffResult};

use crate::config::{Config, Mount};
use crate::spec::SpecNode;

pub(crate) fn handle(node: &SpecNode, config: &mut Config) -> SkiffResult<()> {
    let mut mounts = Vec::with_capacity(node.children.len());

    for entry in &node.children {
        let destination = entry.child_value("destination").unwrap_or_default();
        if destination.is_empty() {
            return Err(SkiffError::Spec {
                message: "mounts section: mount with no destination".to_string(),
            });
        }

        mounts.push(Mount {
            destination: PathBuf::from(destination),
            kind: entry.child_value("type").map(str::to_string),
            source: entry.child_value("source").map(PathBuf::from),
            options: entry
                .child("options")
                .map(SpecNode::child_labels)
                .unwrap_or_default(),
        });
    }

    config.oci.mounts = mounts;
    Ok(())
}
