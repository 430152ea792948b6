//! Handler for the `vm` section.

use std::path::PathBuf;

use skiff_common::{SkiffError, SkiffResult};

use crate::config::{Config, VmConfig};
use crate::spec::SpecNode;

pub(crate) fn handle(node: &SpecNode, config: &mut Config) -> SkiffResult<()> {
    let mut vm = VmConfig::default();

    for child in &node.children {
        match child.label.as_str() {
            "path" => {
                vm.hypervisor_path = PathBuf::from(child.value().unwrap_or_default());
            }
            "image" => {
                vm.image_path = PathBuf::from(child.value().unwrap_or_default());
            }
            "kernel" => {
                for member in &child.children {
                    match member.label.as_str() {
                        "path" => {
                            vm.kernel_path = PathBuf::from(member.value().unwrap_or_default());
                        }
                        "parameters" => {
                            // single string or array of words
                            vm.kernel_params = member.child_labels().join(" ");
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    if vm.hypervisor_path.as_os_str().is_empty() {
        return Err(SkiffError::Spec {
            message: "vm section: no hypervisor path".to_string(),
        });
    }
    if vm.image_path.as_os_str().is_empty() {
        return Err(SkiffError::Spec {
            message: "vm section: no image path".to_string(),
        });
    }
    if vm.kernel_path.as_os_str().is_empty() {
        return Err(SkiffError::Spec {
            message: "vm section: no kernel path".to_string(),
        });
    }

    config.vm = Some(vm);
    Ok(())
}
