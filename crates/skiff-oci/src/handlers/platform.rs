//! Handler for the `platform` section.

use skiff_common::SkiffResult;

use crate::config::Config;
use crate::spec::SpecNode;

pub(crate) fn handle(node: &SpecNode, config: &mut Config) -> SkiffResult<()> {
    if let Some(os) = node.child_value("os") {
        config.oci.platform.os = os.to_string();
    }
    if let Some(arch) = node.child_value("arch") {
        config.oci.platform.arch = arch.to_string();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn platform_fields_are_copied() {
        let doc = SpecNode::from_document(&json!({
            "platform": { "os": "linux", "arch": "amd64" }
        }));
        let mut config = Config::default();

        handle(doc.child("platform").unwrap(), &mut config).unwrap();

        assert_eq!(config.oci.platform.os, "linux");
        assert_eq!(config.oci.platform.arch, "amd64");
    }
}
