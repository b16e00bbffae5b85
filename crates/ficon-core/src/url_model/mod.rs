//! URL modeling: caller targets, candidate construction, and filename derivation.
//!
//! Everything here is pure; no network I/O happens in this module.

mod content_disposition;
mod path;
mod resolve;
mod sanitize;
mod target;

pub use content_disposition::{icon_filename, inline_disposition, DEFAULT_ICON_FILENAME};
pub use path::filename_from_url_path;
pub use resolve::resolve_reference;
pub use sanitize::sanitize_header_filename;
pub use target::{Target, TargetError};
