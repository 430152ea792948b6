//! Handler for the `root` section.

use std::path::PathBuf;

use skiff_common::{SkiffError, SkiffResult};

use crate::config::Config;
use crate::spec::SpecNode;

pub(crate) fn handle(node: &SpecNode, config: &mut Config) -> SkiffResult<()> {
    let path = node.child_value("path").unwrap_or_default();
    if path.is_empty() {
        return Err(SkiffError::Spec {
            message: "root section: no path".to_string(),
        });
    }

    // A relative rootfs path is resolved against the bundle directory.
    let path = PathBuf::from(path);
    config.oci.root.path = if path.is_absolute() {
        path
    } else {
        match &config.bundle_path {
            Some(bundle) => bundle.join(path),
            None => path,
        }
    };

    config.oci.root.readonly = node.child_value("readonly") == Some("true");

    Ok(())
}
