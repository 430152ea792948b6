//! Handler for the `linux` section.

use std::path::PathBuf;

use skiff_common::SkiffResult;

use crate::config::{Config, Namespace};
use crate::spec::SpecNode;

pub(crate) fn handle(node: &SpecNode, config: &mut Config) -> SkiffResult<()> {
    let Some(namespaces) = node.child("namespaces") else {
        return Ok(());
    };

    let mut parsed = Vec::with_capacity(namespaces.children.len());
    for entry in &namespaces.children {
        let kind = entry.child_value("type").unwrap_or_default().parse()?;
        parsed.push(Namespace {
            kind,
            path: entry
                .child_value("path")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        });
    }

    config.oci.namespaces = parsed;
    Ok(())
}
