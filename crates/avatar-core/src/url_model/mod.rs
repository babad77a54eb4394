//! URL modeling for stored profile images.
//!
//! The asset extension comes from the URL path only; response headers are
//! never consulted.

mod extension;
mod path;

pub use extension::{extension_for_url, ImageExtension};
pub use path::last_path_segment;
