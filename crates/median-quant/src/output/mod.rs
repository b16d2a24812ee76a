//! The palette-indexed output image.
//!
//! [`IndexedImage`] is what the pixel mapper hands to an encoder: one `u8`
//! palette index per pixel plus the [`Palette`](crate::Palette) those
//! indices point into.

mod indexed_image;

pub use indexed_image::IndexedImage;
