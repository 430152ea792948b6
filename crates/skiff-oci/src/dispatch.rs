//! Dispatch of document sections to registered handlers.
//!
//! Each top-level section of the parsed bundle document is routed by name to
//! a [`SpecHandler`] that consumes the subtree and fills in the shared
//! [`Config`]. Sections with no registered handler are ignored so newer
//! bundle documents keep working against older runtimes.

use skiff_common::{SkiffError, SkiffResult};

use crate::config::Config;
use crate::spec::SpecNode;

/// A named handler for one top-level document section.
///
/// Handler names must be unique within one registered set; the dispatcher
/// takes the first match and does not enforce uniqueness.
pub struct SpecHandler {
    /// Section name this handler consumes (exact, case-sensitive match).
    pub name: &'static str,
    /// Handler function: consumes the section subtree and mutates the
    /// configuration.
    pub handle: fn(&SpecNode, &mut Config) -> SkiffResult<()>,
}

/// Find and run the registered handler for each child of the document root.
///
/// The two top-level scalar fields `ociVersion` and `hostname` are copied
/// into the configuration directly, independently of handler lookup. A
/// failing handler aborts the whole dispatch; later sections are not
/// processed.
///
/// # Errors
///
/// Returns [`SkiffError::Handler`] naming the handler that failed.
pub fn process_spec(
    root: &SpecNode,
    config: &mut Config,
    handlers: &[SpecHandler],
) -> SkiffResult<()> {
    for node in &root.children {
        if node.label.is_empty() {
            continue;
        }

        if !node.children.is_empty() {
            if node.label == "ociVersion" {
                if let Some(version) = node.value() {
                    config.oci.version = version.to_string();
                }
            }

            if node.label == "hostname" {
                if let Some(hostname) = node.value() {
                    config.oci.hostname = Some(hostname.to_string());
                }
            }
        }

        if let Some(handler) = handlers.iter().find(|h| h.name == node.label) {
            if let Err(err) = (handler.handle)(node, config) {
                tracing::error!(handler = handler.name, %err, "failed spec handler");
                return Err(SkiffError::Handler {
                    name: handler.name,
                    message: err.to_string(),
                });
            }
        }
    }

    Ok(())
}
