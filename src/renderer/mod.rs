//! Presentation collaborators
//!
//! The relaxation core only hands over ball records; this module turns them
//! into pixels in a buffer borrowed from a [`PixelSurface`].

pub mod raster;
pub mod surface;

pub use raster::{colors, rasterize};
pub use surface::{HostSurface, MappedPixels, PixelSurface};
