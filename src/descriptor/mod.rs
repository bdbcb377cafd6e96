//! Image descriptors.
//!
//! - [`PyramidDescriptor`]: pyramid metadata parsed from a DZI document
//! - [`ImageLocation`]: where an image's descriptor is served, derived from
//!   the viewer page URL

mod dzi;
mod location;

pub use dzi::{ceil_log2, PyramidDescriptor};
pub use location::{ImageLocation, DESCRIPTOR_FILE, IMAGE_ID_PARAM};
