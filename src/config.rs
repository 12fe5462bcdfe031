use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::gradient::GradientNorm;
use crate::hysteresis::validate_thresholds;
use crate::smooth::validate_kernel;

/// Tunables of the detector.
///
/// Any subset of fields can be given in a TOML file, the rest falls back to the defaults:
///
/// ```toml
/// low_threshold = 50.0
/// high_threshold = 150.0
/// kernel_size = 7
/// sigma = 2.0
/// norm = "l2"
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CannyParams {
    /// Magnitudes above this are weak edges.
    pub low_threshold: f32,
    /// Magnitudes above this are strong edges.
    pub high_threshold: f32,
    /// Width of the Gaussian kernel, a positive odd number.
    pub kernel_size: usize,
    /// Standard deviation of the Gaussian kernel.
    pub sigma: f32,
    /// How the gradient magnitude is computed.
    pub norm: GradientNorm,
}

impl Default for CannyParams {
    fn default() -> CannyParams {
        CannyParams {
            low_threshold: 100.0,
            high_threshold: 200.0,
            kernel_size: 5,
            sigma: 1.4,
            norm: GradientNorm::L1,
        }
    }
}

impl CannyParams {
    /// Returns a copy with the given thresholds.
    pub fn with_thresholds(self, low: f32, high: f32) -> CannyParams {
        CannyParams {
            low_threshold: low,
            high_threshold: high,
            ..self
        }
    }

    /// Checks every parameter, failing with `InvalidParameter` on the first bad one.
    pub fn validate(&self) -> Result<()> {
        validate_kernel(self.kernel_size, self.sigma)?;
        validate_thresholds(self.low_threshold, self.high_threshold)
    }

    /// Parses parameters from a TOML document.
    pub fn from_toml(s: &str) -> std::result::Result<CannyParams, toml::de::Error> {
        toml::from_str(s)
    }
}

/// Reads detector parameters from a TOML file. The parameters are validated.
pub fn load_params<P: AsRef<Path>>(path: P) -> Result<CannyParams> {
    let path = path.as_ref();
    let config_err = |message: String| Error::Config {
        path: path.to_path_buf(),
        message,
    };
    let data = fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
    let params = CannyParams::from_toml(&data).map_err(|e| config_err(e.to_string()))?;
    params.validate()?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = CannyParams::default();
        assert!(params.validate().is_ok());
        assert_eq!((params.low_threshold, params.high_threshold), (100.0, 200.0));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let params = CannyParams::from_toml("high_threshold = 300.0\nnorm = \"l2\"\n").unwrap();
        assert_eq!(params.high_threshold, 300.0);
        assert_eq!(params.norm, GradientNorm::L2);
        assert_eq!(params.low_threshold, 100.0);
        assert_eq!(params.kernel_size, 5);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(CannyParams::from_toml("treshold = 1.0").is_err());
    }

    #[test]
    fn validate_rejects_even_kernel_and_swapped_thresholds() {
        let even = CannyParams {
            kernel_size: 4,
            ..CannyParams::default()
        };
        assert!(matches!(even.validate(), Err(Error::InvalidParameter(_))));
        let swapped = CannyParams::default().with_thresholds(200.0, 100.0);
        assert!(matches!(swapped.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn load_params_reports_missing_file() {
        let res = load_params("does/not/exist.toml");
        assert!(matches!(res, Err(Error::Config { .. })));
    }

    #[test]
    fn load_params_from_file() {
        let path = std::env::temp_dir().join(format!("canny-params-{}.toml", std::process::id()));
        fs::write(&path, "low_threshold = 20.0\nhigh_threshold = 60.0\nsigma = 2.0\n").unwrap();
        let params = load_params(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(params.low_threshold, 20.0);
        assert_eq!(params.sigma, 2.0);
    }

    #[test]
    fn load_params_validates() {
        let path = std::env::temp_dir()
            .join(format!("canny-bad-params-{}.toml", std::process::id()));
        fs::write(&path, "kernel_size = 2\n").unwrap();
        let res = load_params(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(res, Err(Error::InvalidParameter(_))));
    }
}
