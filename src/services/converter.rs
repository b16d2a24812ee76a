use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::error::ConvertError;
use crate::models::{validate_paths, ConvertConfig};
use crate::rendering::{decode_png, encode_indexed_png};

/// What a finished conversion produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    pub width: u32,
    pub height: u32,
    /// Entries in the written palette, sentinel included
    pub palette_len: usize,
    /// Whether palette index 0 is the transparency sentinel
    pub transparent: bool,
    /// Size of the written file
    pub bytes: usize,
}

/// File-to-file PNG conversion: decode, quantize, encode, write.
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Convert `input` into a palette PNG at `output`.
    ///
    /// Paths and settings are checked before the input is opened. If the
    /// output cannot be created, an existing file at that path is left
    /// alone; a file that was created but not fully written is removed.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<ConvertSummary, ConvertError> {
        validate_paths(input, output)?;
        let quantizer = self.config.quantizer()?;

        let data = fs::read(input).map_err(|source| ConvertError::Read {
            path: input.to_path_buf(),
            source,
        })?;
        let source = decode_png(&data)?;
        let indexed = quantizer.quantize(&source)?;
        let png_bytes = encode_indexed_png(&indexed, self.config.optimize)?;

        write_output(output, &png_bytes)?;

        let summary = ConvertSummary {
            width: indexed.width(),
            height: indexed.height(),
            palette_len: indexed.palette().len(),
            transparent: indexed.palette().transparent_index().is_some(),
            bytes: png_bytes.len(),
        };
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            width = summary.width,
            height = summary.height,
            colors = summary.palette_len,
            transparent = summary.transparent,
            bytes = summary.bytes,
            "Converted image"
        );
        Ok(summary)
    }
}

/// Write `bytes` to `path`.
///
/// If the file cannot be created, nothing is touched: the path may hold a
/// file this run never opened. Once created, a failed write or sync removes
/// the partial file.
fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ConvertError> {
    let write_error = |source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(write_error)?;
    if let Err(source) = file.write_all(bytes).and_then(|()| file.sync_all()) {
        drop(file);
        if let Err(e) = fs::remove_file(path) {
            tracing::debug!(%e, path = %path.display(), "Failed to remove partial output");
        }
        return Err(write_error(source));
    }
    Ok(())
}
