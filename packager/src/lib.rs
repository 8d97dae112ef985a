//! Plugin packaging library.
//!
//! This crate turns a resolved artifact graph into host plugin outputs: an
//! installable bundle archive with its code-only companion, or a
//! development link descriptor dropped into the host's plugin directory.
//! Library resolution and manifest assembly live in [`pluginpack`]; this
//! crate owns the filesystem side and the `pluginpack` CLI surface.
//!
//! # Modules
//!
//! - [`archive`] - Deterministic zip writing with include/exclude filters
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Error types carrying the failed operation and path
//! - [`link`] - Link descriptor emission into the host plugin directory
//! - [`pipeline`] - Bundle, link and classpath orchestration
//! - [`stager`] - Exploded staging directory preparation

pub mod archive;
pub mod cli;
pub mod error;
pub mod link;
pub mod pipeline;
pub mod stager;
