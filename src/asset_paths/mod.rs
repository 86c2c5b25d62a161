//! Helpers for resolving library identifiers and deployment asset paths.
//!
//! The same code is shared between the build-time resolver, which needs on-disk library
//! paths for concatenation, and the run-time loader, which needs stylesheet hrefs.

mod filters;
mod library;
mod table;

pub use filters::is_absolute_reference;
pub use library::{make_library_path, stylesheet_href};
pub use table::{AssetPathTable, PathTableOptions};
