use std::path::Path;

use median_quant::{DitherAlgorithm, Quantizer, Rgba8, Srgb};
use serde::Deserialize;

use crate::error::ConvertError;

/// Conversion settings, loaded from YAML and overridden by CLI flags.
///
/// Every field is optional in the file:
///
/// ```yaml
/// colors: 64
/// dither: true
/// kernel: floyd-steinberg
/// preserve_transparency: true
/// background: "#202020"
/// error_clamp: 0.4
/// optimize: false
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Palette size, 1..=256
    pub colors: usize,

    /// Error diffusion on/off
    pub dither: bool,

    /// Diffusion kernel name (see [`DitherAlgorithm`])
    pub kernel: String,

    /// Reserve palette index 0 for fully transparent pixels
    pub preserve_transparency: bool,

    /// Hex color that translucent pixels are flattened onto
    pub background: String,

    /// Per-channel error clamp for dithering
    pub error_clamp: f32,

    /// Recompress the encoded PNG with oxipng
    pub optimize: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            colors: 256,
            dither: true,
            kernel: DitherAlgorithm::SierraLite.name().to_string(),
            preserve_transparency: false,
            background: "#FFFFFF".to_string(),
            error_clamp: 0.5,
            optimize: true,
        }
    }
}

impl ConvertConfig {
    /// Load settings from a YAML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConvertError> {
        // An empty file deserializes as unit, not as an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// The mapping strategy: the configured kernel, or none when dithering
    /// is off.
    pub fn algorithm(&self) -> Result<DitherAlgorithm, ConvertError> {
        if !self.dither {
            return Ok(DitherAlgorithm::None);
        }
        Ok(self.kernel.parse()?)
    }

    pub fn background_color(&self) -> Result<Rgba8, ConvertError> {
        let srgb: Srgb = self.background.parse()?;
        let [r, g, b] = srgb.to_bytes();
        Ok(Rgba8::opaque(r, g, b))
    }

    /// Build the core quantizer, rejecting any invalid setting.
    pub fn quantizer(&self) -> Result<Quantizer, ConvertError> {
        if self.error_clamp.is_nan() || self.error_clamp < 0.0 {
            return Err(ConvertError::InvalidConfig(format!(
                "error_clamp must be a non-negative number, got {}",
                self.error_clamp
            )));
        }
        Ok(Quantizer::new(self.colors)?
            .dither(self.algorithm()?)
            .preserve_transparency(self.preserve_transparency)
            .background(self.background_color()?)
            .error_clamp(self.error_clamp))
    }
}

/// Reject empty or identical input/output paths.
///
/// Paths are compared as given and, when both exist, after canonicalization,
/// so `./a.png` and `a.png` count as the same file.
pub fn validate_paths(input: &Path, output: &Path) -> Result<(), ConvertError> {
    if input.as_os_str().is_empty() {
        return Err(ConvertError::InvalidPaths("input path is empty".to_string()));
    }
    if output.as_os_str().is_empty() {
        return Err(ConvertError::InvalidPaths("output path is empty".to_string()));
    }

    let same = input == output
        || matches!(
            (input.canonicalize(), output.canonicalize()),
            (Ok(a), Ok(b)) if a == b
        );
    if same {
        return Err(ConvertError::InvalidPaths(format!(
            "input and output are the same file: {}",
            input.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::default();
        assert_eq!(config.colors, 256);
        assert!(config.dither);
        assert_eq!(config.kernel, "sierra-lite");
        assert!(!config.preserve_transparency);
        assert_eq!(config.background, "#FFFFFF");
        assert_eq!(config.error_clamp, 0.5);
        assert!(config.optimize);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let yaml = r##"
colors: 16
kernel: atkinson
background: "#000"
"##;
        let config = ConvertConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.colors, 16);
        assert_eq!(config.algorithm().unwrap(), DitherAlgorithm::Atkinson);
        assert_eq!(config.background_color().unwrap(), Rgba8::opaque(0, 0, 0));
        assert!(config.optimize, "unset keys keep defaults");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(ConvertConfig::from_yaml("").unwrap(), ConvertConfig::default());
        assert_eq!(ConvertConfig::from_yaml("\n  \n").unwrap(), ConvertConfig::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = ConvertConfig::from_yaml("colours: 8\n");
        assert!(matches!(result, Err(ConvertError::ConfigParse(_))));
    }

    #[test]
    fn test_dither_off_overrides_kernel() {
        let config = ConvertConfig {
            dither: false,
            kernel: "stucki".to_string(),
            ..Default::default()
        };
        assert_eq!(config.algorithm().unwrap(), DitherAlgorithm::None);
    }

    #[test]
    fn test_quantizer_rejects_invalid_settings() {
        for colors in [0, 257] {
            let config = ConvertConfig {
                colors,
                ..Default::default()
            };
            assert!(matches!(config.quantizer(), Err(ConvertError::Quantize(_))));
        }

        let config = ConvertConfig {
            background: "#12345".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.quantizer(), Err(ConvertError::Background(_))));

        let config = ConvertConfig {
            kernel: "ordered".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.quantizer(), Err(ConvertError::Kernel(_))));

        let config = ConvertConfig {
            error_clamp: -0.1,
            ..Default::default()
        };
        assert!(matches!(config.quantizer(), Err(ConvertError::InvalidConfig(_))));
    }

    #[test]
    fn test_quantizer_carries_settings() {
        let config = ConvertConfig {
            colors: 8,
            kernel: "burkes".to_string(),
            ..Default::default()
        };
        let quantizer = config.quantizer().unwrap();
        assert_eq!(quantizer.max_colors(), 8);
        assert_eq!(quantizer.algorithm(), DitherAlgorithm::Burkes);
    }

    #[test]
    fn test_validate_paths() {
        let a = PathBuf::from("in.png");
        let b = PathBuf::from("out.png");
        assert!(validate_paths(&a, &b).is_ok());
        assert!(matches!(
            validate_paths(&a, &a),
            Err(ConvertError::InvalidPaths(_))
        ));
        assert!(matches!(
            validate_paths(Path::new(""), &b),
            Err(ConvertError::InvalidPaths(_))
        ));
        assert!(matches!(
            validate_paths(&a, Path::new("")),
            Err(ConvertError::InvalidPaths(_))
        ));
    }

    #[test]
    fn test_validate_paths_resolves_aliases() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("image.png");
        std::fs::write(&file, b"x").unwrap();
        let alias = dir.path().join(".").join("image.png");
        assert!(matches!(
            validate_paths(&file, &alias),
            Err(ConvertError::InvalidPaths(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pngquant.yaml");
        std::fs::write(&path, "colors: 4\npreserve_transparency: true\n").unwrap();
        let config = ConvertConfig::load(&path).unwrap();
        assert_eq!(config.colors, 4);
        assert!(config.preserve_transparency);

        let missing = ConvertConfig::load(&dir.path().join("nope.yaml"));
        assert!(matches!(missing, Err(ConvertError::Read { .. })));
    }
}
