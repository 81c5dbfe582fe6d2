//! Decoder configuration

use bfd_core::{Error, Result};
use std::collections::HashMap;

/// Optional validation rules on top of the mandatory RFC 5880 checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Reject packets whose Detect Mult is zero
    pub reject_zero_detect_mult: bool,
}

impl DecoderConfig {
    pub fn with_reject_zero_detect_mult(mut self, reject: bool) -> Self {
        self.reject_zero_detect_mult = reject;
        self
    }

    /// Build a configuration from `key=value` parameters
    ///
    /// Unknown keys are an error so that typos do not silently fall back to
    /// defaults.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();

        for (key, value) in params {
            match key.as_str() {
                "reject_zero_detect_mult" => {
                    config.reject_zero_detect_mult = parse_bool(key, value)?;
                }
                _ => {
                    return Err(Error::invalid_parameter(
                        key.as_str(),
                        "unknown decoder parameter",
                    ))
                }
            }
        }

        Ok(config)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::invalid_parameter(name, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_is_permissive() {
        assert!(!DecoderConfig::default().reject_zero_detect_mult);
    }

    #[test]
    fn test_from_params() {
        let config = DecoderConfig::from_params(&params(&[("reject_zero_detect_mult", "yes")]))
            .unwrap();
        assert!(config.reject_zero_detect_mult);

        let config = DecoderConfig::from_params(&params(&[("reject_zero_detect_mult", "0")]))
            .unwrap();
        assert!(!config.reject_zero_detect_mult);

        let config = DecoderConfig::from_params(&HashMap::new()).unwrap();
        assert_eq!(config, DecoderConfig::default());
    }

    #[test]
    fn test_from_params_rejects_bad_input() {
        let err = DecoderConfig::from_params(&params(&[("reject_zero_detect_mult", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));

        let err = DecoderConfig::from_params(&params(&[("strict", "true")])).unwrap_err();
        assert!(err.to_string().contains("unknown decoder parameter"));
    }
}
