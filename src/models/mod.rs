//! Canonical data model shared across the acquisition layer.

pub mod borough;
pub mod record;
