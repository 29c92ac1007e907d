//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.loading.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "loading.supported_formats must not be empty".into(),
            ));
        }
        if self.loading.select_every_nth == 0 {
            return Err(ConfigError::ValidationError(
                "loading.select_every_nth must be >= 1".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if !(1..=100).contains(&self.save.quality) {
            return Err(ConfigError::ValidationError(
                "save.quality must be between 1 and 100".into(),
            ));
        }
        if !(1..=120).contains(&self.save.frame_rate) {
            return Err(ConfigError::ValidationError(
                "save.frame_rate must be between 1 and 120".into(),
            ));
        }
        if self.save.video_quality > 51 {
            return Err(ConfigError::ValidationError(
                "save.video_quality must be between 0 and 51".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_stride() {
        let mut config = Config::default();
        config.loading.select_every_nth = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("select_every_nth"));
    }

    #[test]
    fn test_validate_rejects_empty_formats() {
        let mut config = Config::default();
        config.loading.supported_formats.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("supported_formats"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_quality() {
        let mut config = Config::default();
        config.save.quality = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("save.quality"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_frame_rate() {
        let mut config = Config::default();
        config.save.frame_rate = 121;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("frame_rate"));

        config.save.frame_rate = 0;
        assert!(config.validate().is_err());
    }
}
