//! PNG fixtures and decoding helpers.

use std::io::Cursor;
use std::path::Path;

/// Four distinct opaque colors in row-major order.
pub const QUAD: [[u8; 4]; 4] = [
    [255, 0, 0, 255],
    [0, 255, 0, 255],
    [0, 0, 255, 255],
    [255, 255, 0, 255],
];

/// Write an 8-bit RGBA PNG.
pub fn write_rgba_png(path: &Path, width: u32, height: u32, pixels: &[[u8; 4]]) {
    let data: Vec<u8> = pixels.iter().flatten().copied().collect();
    write_png(path, width, height, png::ColorType::Rgba, &data);
}

/// Write an 8-bit greyscale PNG.
pub fn write_gray_png(path: &Path, width: u32, height: u32, values: &[u8]) {
    write_png(path, width, height, png::ColorType::Grayscale, values);
}

fn write_png(path: &Path, width: u32, height: u32, color: png::ColorType, data: &[u8]) {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(data).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

/// A horizontal gradient with a transparent left column and a
/// half-transparent right column.
pub fn gradient_with_alpha(width: u32, height: u32) -> Vec<[u8; 4]> {
    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = (x * 255 / (width - 1)) as u8;
            let w = (y * 255 / (height - 1)) as u8;
            let a = match x {
                0 => 0,
                x if x == width - 1 => 128,
                _ => 255,
            };
            pixels.push([v, w, 255 - v, a]);
        }
    }
    pixels
}

/// Decoded view of a written PNG.
pub struct Decoded {
    pub width: u32,
    pub height: u32,
    pub color_type: png::ColorType,
    pub palette: Option<Vec<[u8; 3]>>,
    pub trns: Option<Vec<u8>>,
    /// Pixels expanded to RGBA8
    pub rgba: Vec<[u8; 4]>,
}

/// Read a PNG file, keeping the raw header facts and the expanded pixels.
pub fn read_png(path: &Path) -> Decoded {
    let bytes = std::fs::read(path).unwrap();

    let raw = png::Decoder::new(Cursor::new(&bytes)).read_info().unwrap();
    let info = raw.info();
    let color_type = info.color_type;
    let palette = info
        .palette
        .as_ref()
        .map(|p| p.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect());
    let trns = info.trns.as_ref().map(|t| t.to_vec());

    let mut decoder = png::Decoder::new(Cursor::new(&bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).unwrap();
    buf.truncate(frame.buffer_size());

    let rgba = match frame.color_type {
        png::ColorType::Rgba => buf.chunks_exact(4).map(|c| [c[0], c[1], c[2], c[3]]).collect(),
        png::ColorType::Rgb => buf.chunks_exact(3).map(|c| [c[0], c[1], c[2], 255]).collect(),
        png::ColorType::GrayscaleAlpha => {
            buf.chunks_exact(2).map(|c| [c[0], c[0], c[0], c[1]]).collect()
        }
        png::ColorType::Grayscale => buf.iter().map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => unreachable!("expanded by normalize_to_color8"),
    };

    Decoded {
        width: frame.width,
        height: frame.height,
        color_type,
        palette,
        trns,
        rgba,
    }
}
