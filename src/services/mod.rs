pub mod converter;

pub use converter::{ConvertSummary, Converter};
