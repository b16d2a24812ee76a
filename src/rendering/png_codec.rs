//! PNG decode to RGBA8 and indexed PNG encode.

use std::io::Cursor;

use median_quant::{IndexedImage, Rgba8, SourceImage};

use crate::error::ConvertError;

/// Decode any PNG into an RGBA8 [`SourceImage`].
///
/// Indexed, greyscale, greyscale+alpha, RGB and 16-bit inputs are all
/// normalized to 8-bit RGBA. A `tRNS` chunk becomes real alpha.
pub fn decode_png(bytes: &[u8]) -> Result<SourceImage, ConvertError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| ConvertError::PngDecode(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ConvertError::PngDecode(e.to_string()))?;

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::Indexed => {
            return Err(ConvertError::PngDecode(
                "indexed data was not expanded".to_string(),
            ))
        }
    };

    let row_bytes = info.width as usize * channels;
    let mut pixels = Vec::with_capacity(info.width as usize * info.height as usize);
    for line in buf[..info.buffer_size()].chunks_exact(info.line_size) {
        pixels.extend(line[..row_bytes].chunks_exact(channels).map(|c| match c {
            [v] => Rgba8::opaque(*v, *v, *v),
            [v, a] => Rgba8::new(*v, *v, *v, *a),
            [r, g, b] => Rgba8::opaque(*r, *g, *b),
            [r, g, b, a] => Rgba8::new(*r, *g, *b, *a),
            _ => Rgba8::TRANSPARENT,
        }));
    }

    tracing::debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "Decoded PNG"
    );
    Ok(SourceImage::new(info.width, info.height, pixels)?)
}

/// Encode a palette-indexed image as a color type 3 PNG.
///
/// - `PLTE` carries every palette entry in order.
/// - `tRNS` is written only when some entry is not opaque, and stops at the
///   last such entry (PNG treats missing entries as opaque).
/// - The bit depth is the smallest of 1, 2, 4 or 8 that addresses the
///   palette.
///
/// With `optimize`, the result is recompressed with oxipng. oxipng may
/// reorder or shrink the palette but never changes decoded pixels. If it
/// fails, the plain encoding is returned.
pub fn encode_indexed_png(image: &IndexedImage, optimize: bool) -> Result<Vec<u8>, ConvertError> {
    let colors = image.palette().colors();

    let (depth, bits) = match colors.len() {
        0..=2 => (png::BitDepth::One, 1),
        3..=4 => (png::BitDepth::Two, 2),
        5..=16 => (png::BitDepth::Four, 4),
        _ => (png::BitDepth::Eight, 8),
    };
    let plte: Vec<u8> = colors.iter().flat_map(|c| [c.r, c.g, c.b]).collect();
    let trns: Option<Vec<u8>> = colors
        .iter()
        .rposition(|c| !c.is_opaque())
        .map(|last| colors[..=last].iter().map(|c| c.a).collect());

    let packed = if bits == 8 {
        image.indices().to_vec()
    } else {
        pack_nbits(image.indices(), image.width(), bits)
    };

    // Fast deflate when oxipng will redo it anyway.
    let compression = if optimize {
        png::Compression::Fast
    } else {
        png::Compression::Best
    };

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width(), image.height());
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(depth);
        encoder.set_compression(compression);
        encoder.set_filter(png::FilterType::NoFilter);
        encoder.set_palette(plte);
        if let Some(trns) = trns {
            encoder.set_trns(trns);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ConvertError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&packed)
            .map_err(|e| ConvertError::PngEncode(e.to_string()))?;
    }
    let png_bytes = buf.into_inner();

    if !optimize {
        return Ok(png_bytes);
    }

    // Re-compress with oxipng (zopfli + adaptive filter selection)
    match oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    ) {
        Ok(optimized) => {
            tracing::debug!(
                before = png_bytes.len(),
                after = optimized.len(),
                "Recompressed PNG"
            );
            Ok(optimized)
        }
        Err(e) => {
            tracing::warn!(%e, "oxipng failed, keeping unoptimized PNG");
            Ok(png_bytes)
        }
    }
}

/// Pack indices into N-bit PNG rows (1, 2 or 4 bits per pixel), MSB first.
/// Each row starts on a byte boundary.
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len().checked_div(width as usize).unwrap_or(0);
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        for group in row.chunks(pixels_per_byte) {
            let byte = group.iter().enumerate().fold(0u8, |byte, (i, &idx)| {
                byte | (idx & mask) << (8 - bits - i as u8 * bits)
            });
            packed.push(byte);
        }
    }

    packed
}
