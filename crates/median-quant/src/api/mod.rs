//! Public API: the [`Quantizer`] builder and its [`QuantizeError`].

mod builder;
mod error;

pub use builder::Quantizer;
pub use error::QuantizeError;
