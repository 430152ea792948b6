//! Handler for the `process` section.

use std::path::PathBuf;

use skiff_common::{SkiffError, SkiffResult};

use crate::config::Config;
use crate::spec::SpecNode;

fn parse_id(node: &SpecNode, label: &str) -> SkiffResult<u32> {
    match node.child_value(label) {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|_| SkiffError::Spec {
            message: format!("process section: invalid {label}: {raw}"),
        }),
    }
}

pub(crate) fn handle(node: &SpecNode, config: &mut Config) -> SkiffResult<()> {
    let process = &mut config.oci.process;

    for child in &node.children {
        match child.label.as_str() {
            "terminal" => process.terminal = child.value() == Some("true"),
            "cwd" => process.cwd = PathBuf::from(child.value().unwrap_or_default()),
            "args" => process.args = child.child_labels(),
            "env" => process.env = child.child_labels(),
            "user" => {
                process.user.uid = parse_id(child, "uid")?;
                process.user.gid = parse_id(child, "gid")?;
                if let Some(gids) = child.child("additionalGids") {
                    process.user.additional_gids = gids
                        .child_labels()
                        .iter()
                        .map(|gid| {
                            gid.parse().map_err(|_| SkiffError::Spec {
                                message: format!(
                                    "process section: invalid additional gid: {gid}"
                                ),
                            })
                        })
                        .collect::<SkiffResult<_>>()?;
                }
            }
            _ => {}
        }
    }

    if process.args.is_empty() {
        return Err(SkiffError::Spec {
            message: "process section: no args".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(value: serde_json::Value) -> SpecNode {
        let doc = SpecNode::from_document(&json!({ "process": value }));
        doc.child("process").unwrap().clone()
    }

    #[test]
    fn full_process_section() {
        let node = section(json!({
            "terminal": true,
            "cwd": "/",
            "args": ["sh", "-c", "echo hi"],
            "env": ["PATH=/usr/bin", "TERM=xterm"],
            "user": { "uid": 1000, "gid": 1000, "additionalGids": [4, 27] }
        }));
        let mut config = Config::default();

        handle(&node, &mut config).unwrap();

        let process = &config.oci.process;
        assert!(process.terminal);
        assert_eq!(process.cwd, PathBuf::from("/"));
        assert_eq!(process.args, vec!["sh", "-c", "echo hi"]);
        assert_eq!(process.env.len(), 2);
        assert_eq!(process.user.uid, 1000);
        assert_eq!(process.user.additional_gids, vec![4, 27]);
    }

    #[test]
    fn empty_args_fail() {
        let node = section(json!({ "cwd": "/" }));
        let mut config = Config::default();

        assert!(handle(&node, &mut config).is_err());
    }

    #[test]
    fn bad_uid_fails() {
        let node = section(json!({
            "args": ["true"],
            "user": { "uid": "root" }
        }));
        let mut config = Config::default();

        assert!(handle(&node, &mut config).is_err());
    }
}
