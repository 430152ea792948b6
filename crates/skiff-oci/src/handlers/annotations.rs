//! Handler for the `annotations` section.

use skiff_common::SkiffResult;

use crate::config::Config;
use crate::spec::SpecNode;

pub(crate) fn handle(node: &SpecNode, config: &mut Config) -> SkiffResult<()> {
    for child in &node.children {
        if child.label.is_empty() {
            continue;
        }
        config.oci.annotations.insert(
            child.label.clone(),
            child.value().unwrap_or_default().to_string(),
        );
    }

    Ok(())
}
