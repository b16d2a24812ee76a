use std::path::PathBuf;

use median_quant::{ParseColorError, QuantizeError, UnknownAlgorithmError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Invalid paths: {0}")]
    InvalidPaths(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid background color: {0}")]
    Background(#[from] ParseColorError),

    #[error("Invalid dither kernel: {0}")]
    Kernel(#[from] UnknownAlgorithmError),

    #[error("Quantization error: {0}")]
    Quantize(#[from] QuantizeError),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_paths_message() {
        let error = ConvertError::InvalidPaths("input and output are the same file".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid paths: input and output are the same file"
        );
    }

    #[test]
    fn test_quantize_error_converts() {
        let error: ConvertError = QuantizeError::UnsupportedColorCount(0).into();
        assert_eq!(
            error.to_string(),
            "Quantization error: color count must be between 1 and 256, got 0"
        );
    }

    #[test]
    fn test_kernel_error_converts() {
        let error: ConvertError = "zigzag"
            .parse::<median_quant::DitherAlgorithm>()
            .unwrap_err()
            .into();
        assert_eq!(
            error.to_string(),
            "Invalid dither kernel: unknown dither algorithm \"zigzag\""
        );
    }

    #[test]
    fn test_write_error_names_path() {
        let error = ConvertError::Write {
            path: PathBuf::from("/tmp/out.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(error.to_string(), "Failed to write /tmp/out.png: denied");
    }

    #[test]
    fn test_background_error_converts() {
        let error: ConvertError = ParseColorError::InvalidLength.into();
        assert!(error.to_string().starts_with("Invalid background color"));
    }
}
