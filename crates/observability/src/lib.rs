//! Tracing/logging setup shared by native binaries.
//!
//! The browser build does not install a subscriber; its `tracing` events are
//! dropped unless the host page wires one up.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
