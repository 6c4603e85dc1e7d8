//! pyscope-packages: package location and table-of-contents building
//!
//! This crate provides:
//! - Site-packages directory discovery
//! - Package resolution to a `PackageInfo` value object
//! - Depth-bounded submodule tree traversal into a `TableOfContents`
//!
//! Both entry points treat "not found" as data: malformed, unknown, or
//! unloadable names yield well-formed empty results, never errors.

pub mod locator;
pub mod toc;

pub use locator::PackageFinder;

// Re-exported for callers that only depend on this crate.
pub use pyscope_core::{PackageInfo, TableOfContents};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{PackageFinder, PackageInfo, TableOfContents};
}
