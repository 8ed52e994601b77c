//! fq-admin library - catalog loading and retention jobs
//!
//! The binary is a thin clap wrapper; the jobs live here so they can be
//! driven from tests against an in-memory store.

pub mod commands;
pub mod manifest;
pub mod resize;

pub use commands::{cleanup_images, load_catalog, purge_sessions, LoadReport, TierLimits};
pub use manifest::{CatalogManifest, ManifestEntry};
