//! Hypervisor invocation builder.
//!
//! Turns a validated launch [`Config`] into the exact argument vector used
//! to start the hypervisor: resolve the argument template, expand network
//! parameters and placeholder tokens, then compact the result.

mod console;
pub mod net;
pub mod template;
pub mod tokens;

use std::fs;

use skiff_common::{SkiffError, SkiffPaths, SkiffResult};
use skiff_oci::Config;

/// Generate the expanded list of hypervisor arguments for one launch.
///
/// The first element of the returned vector is the hypervisor executable
/// (resolved to an absolute path when possible), the remainder its
/// arguments, one per surviving template line, in template order.
///
/// # Errors
///
/// Fails on violated preconditions (before any template I/O), when no
/// template file exists in any search location, when the template cannot be
/// read, and when token substitution fails.
pub fn vm_args(config: &mut Config, paths: &SkiffPaths) -> SkiffResult<Vec<String>> {
    tokens::validate(config)?;

    let bundle = config
        .bundle_path
        .clone()
        .ok_or(SkiffError::MissingConfig {
            what: "bundle path",
        })?;

    let args_file = template::resolve_args_file(&bundle, paths)?;

    let contents = fs::read_to_string(&args_file).map_err(|source| SkiffError::TemplateRead {
        path: args_file.clone(),
        source,
    })?;
    let mut args: Vec<String> = contents.lines().map(str::to_string).collect();

    tokens::expand_args(config, &mut args)?;

    Ok(compact(args))
}

/// Drop lines emptied by comment stripping and trim the survivors.
///
/// The trim is load-bearing: container launch fails if an argument keeps
/// surrounding whitespace.
fn compact(args: Vec<String>) -> Vec<String> {
    args.into_iter()
        .map(|arg| arg.trim().to_string())
        .filter(|arg| !arg.is_empty())
        .collect()
}
