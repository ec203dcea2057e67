//! Tracing/logging setup shared by every binary in the workspace.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, UnknownLogFormat};

/// Initialize process-wide tracing.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_with(format: LogFormat) {
    tracing::init(format);
}
