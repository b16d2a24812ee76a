//! pngquant - lossy PNG compression by palette reduction
//!
//! Reads a true-color PNG, reduces it to at most 256 colors with
//! [`median_quant`] and writes a palette PNG.
//! This library exposes modules for integration testing.

pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
