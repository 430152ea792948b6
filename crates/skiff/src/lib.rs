//! # Skiff
//!
//! Skiff is the core of an OCI-compatible container runtime that launches
//! workloads inside a lightweight virtual machine instead of a bare process.
//!
//! This crate turns a populated launch configuration into the exact argument
//! vector used to start the hypervisor:
//!
//! ```no_run
//! use skiff::hypervisor;
//! use skiff_common::SkiffPaths;
//! use skiff_oci::Config;
//!
//! # fn example() -> skiff_common::SkiffResult<()> {
//! let mut config = Config::for_bundle("/bundles/c1");
//! // ... populate config.vm, config.net, config.state ...
//! let args = hypervisor::vm_args(&mut config, &SkiffPaths::new())?;
//! // args[0] is the hypervisor executable, the rest its arguments
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod hypervisor;
