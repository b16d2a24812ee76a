use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pngquant::models::ConvertConfig;
use pngquant::services::Converter;

#[derive(Parser)]
#[command(name = "pngquant")]
#[command(about = "Reduce a PNG to a palette of at most 256 colors")]
#[command(version)]
struct Cli {
    /// Input PNG file
    #[arg(long = "in", value_name = "PATH")]
    input: PathBuf,

    /// Output PNG file (must differ from the input)
    #[arg(long = "out", value_name = "PATH")]
    output: PathBuf,

    /// Palette size, 1 to 256 [default: 256]
    #[arg(short = 'n', long)]
    colors: Option<usize>,

    /// Map pixels to the nearest color without error diffusion
    #[arg(long)]
    nodither: bool,

    /// Diffusion kernel (floyd-steinberg, sierra-lite, atkinson, ...)
    #[arg(long)]
    kernel: Option<String>,

    /// Keep fully transparent pixels transparent
    #[arg(long)]
    keep_alpha: bool,

    /// Background that translucent pixels are flattened onto, as hex RGB
    #[arg(long, value_name = "HEX")]
    background: Option<String>,

    /// Per-channel clamp for diffused error
    #[arg(long)]
    error_clamp: Option<f32>,

    /// Skip oxipng recompression
    #[arg(long)]
    no_optimize: bool,

    /// YAML settings file; flags take precedence
    #[arg(long, value_name = "YAML")]
    config: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> anyhow::Result<ConvertConfig> {
        let mut config = match &self.config {
            Some(path) => ConvertConfig::load(path)?,
            None => ConvertConfig::default(),
        };

        if let Some(colors) = self.colors {
            config.colors = colors;
        }
        if self.nodither {
            config.dither = false;
        }
        if let Some(kernel) = &self.kernel {
            config.kernel = kernel.clone();
        }
        if self.keep_alpha {
            config.preserve_transparency = true;
        }
        if let Some(background) = &self.background {
            config.background = background.clone();
        }
        if let Some(error_clamp) = self.error_clamp {
            config.error_clamp = error_clamp;
        }
        if self.no_optimize {
            config.optimize = false;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pngquant=warn,median_quant=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = cli.resolve_config()?;
    let summary = Converter::new(config).convert(&cli.input, &cli.output)?;

    println!(
        "Wrote {} ({}x{}, {} colors{}, {} bytes)",
        cli.output.display(),
        summary.width,
        summary.height,
        summary.palette_len,
        if summary.transparent { " incl. transparent" } else { "" },
        summary.bytes
    );

    Ok(())
}
