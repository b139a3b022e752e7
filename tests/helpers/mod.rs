//! Test Helper Utilities
//!
//! Shared utilities for testing the acquisition layer

pub mod log_capture;
pub mod provider;

// Re-export commonly used items
pub use log_capture::{init_test_logging, LogCapture};
pub use provider::{spawn_provider, unreachable_url};
