//! Workspace umbrella crate.
//!
//! Exposes the `core-service` facade behind the workspace feature flags so a
//! host application can depend on `keepitfit-workspace` without wiring each
//! crate individually.

#[cfg(feature = "desktop-shims")]
pub use core_service::*;
