//! Map view math: image extent, view fitting and the scale bar.
//!
//! - [`Extent`]: `[min_x, min_y, max_x, max_y]` rectangles in map units
//! - [`View`]: center and resolution over a tile grid's resolution ladder
//! - [`ScaleLine`]: metric scale bar for the current resolution

mod extent;
mod fit;
mod scale_line;

pub use extent::Extent;
pub use fit::View;
pub use scale_line::{ScaleBar, ScaleLine, DEFAULT_METERS_PER_PIXEL, DEFAULT_MIN_WIDTH};
