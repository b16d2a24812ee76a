pub mod config;

pub use config::{validate_paths, ConvertConfig};
