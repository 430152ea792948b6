//! # skiff-oci
//!
//! OCI (Open Container Initiative) configuration handling for Skiff.
//!
//! This crate provides:
//! - The launch [`Config`] aggregate populated from an OCI bundle
//! - A generic labelled tree ([`SpecNode`]) representing the parsed
//!   configuration document
//! - The dispatch engine that routes top-level document sections to
//!   registered [`SpecHandler`]s
//! - Container state document types

#![warn(missing_docs)]

pub mod config;
pub mod dispatch;
pub mod handlers;
pub mod spec;
pub mod state;

pub use config::{Config, NetConfig, NetInterfaceConfig, VmConfig};
pub use dispatch::{SpecHandler, process_spec};
pub use handlers::START_HANDLERS;
pub use spec::SpecNode;
pub use state::{ContainerStatus, OciState};
