//! Per-table text transformations applied by the archive pipeline.
//!
//! Each function takes decoded table text and returns the rewritten text
//! plus the counts needed for reporting. Wiring them into a registry chain
//! happens in [`crate::config`].

pub mod bikes_allowed;
pub mod location_type;
pub mod quotes;
