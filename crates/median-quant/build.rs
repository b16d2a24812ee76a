use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Number of entries in the gamma table.
const LUT_SIZE: usize = 4096;

/// IEC 61966-2-1 exact formula: sRGB to linear
fn srgb_to_linear_exact(srgb: f64) -> f64 {
    if srgb <= 0.04045 {
        srgb / 12.92
    } else {
        ((srgb + 0.055) / 1.055).powf(2.4)
    }
}

fn write_table(
    out: &mut impl Write,
    name: &str,
    doc: &str,
    convert: fn(f64) -> f64,
) -> io::Result<()> {
    writeln!(out, "/// {doc}")?;
    writeln!(out, "pub static {name}: [f32; {LUT_SIZE}] = [")?;
    for i in 0..LUT_SIZE {
        if i > 0 && i % 8 == 0 {
            writeln!(out)?;
        }
        let x = i as f64 / (LUT_SIZE - 1) as f64;
        write!(out, "    {:.9},", convert(x) as f32)?;
    }
    writeln!(out, "\n];")?;
    writeln!(out)
}

fn main() -> io::Result<()> {
    let out_dir = env::var("OUT_DIR").expect("cargo sets OUT_DIR for build scripts");
    let dest_path = Path::new(&out_dir).join("gamma_lut.rs");
    let mut out = BufWriter::new(File::create(&dest_path)?);

    write_table(
        &mut out,
        "SRGB_TO_LINEAR",
        "sRGB (index / 4095) to linear light",
        srgb_to_linear_exact,
    )?;
    out.flush()?;

    println!("cargo::rerun-if-changed=build.rs");
    Ok(())
}
