//! Binary configuration storage
//!
//! Configuration is serialized with postcard so it can be embedded in the
//! firmware image or kept in flash. Decoded configurations are validated
//! before they are handed out.

use super::types::{ConfigError, ControllerConfig};

/// Upper bound on the encoded configuration size
pub const MAX_CONFIG_SIZE: usize = 256;

impl ControllerConfig {
    /// Decode and validate a stored configuration
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: ControllerConfig =
            postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode this configuration into `buf`
    ///
    /// Returns the used part of the buffer.
    pub fn to_slice<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PresetPosition;

    #[test]
    fn test_stored_config_decodes() {
        let mut config = ControllerConfig::default();
        config.filter.smoothing = 6;
        config.presets.capture = PresetPosition {
            lift: Some(1800),
            tilt: None,
            gripper: Some(600),
        };

        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let used = config.to_slice(&mut buf).unwrap().len();
        let decoded = ControllerConfig::from_bytes(&buf[..used]).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_invalid_stored_config_rejected() {
        let mut config = ControllerConfig::default();
        config.filter.smoothing = 0;

        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let used = config.to_slice(&mut buf).unwrap().len();
        assert_eq!(
            ControllerConfig::from_bytes(&buf[..used]),
            Err(ConfigError::InvalidSmoothing)
        );
    }

    #[test]
    fn test_truncated_config_rejected() {
        let config = ControllerConfig::default();
        let mut buf = [0u8; MAX_CONFIG_SIZE];
        let used = config.to_slice(&mut buf).unwrap().len();
        assert_eq!(
            ControllerConfig::from_bytes(&buf[..used / 2]),
            Err(ConfigError::Decode)
        );
    }

    #[test]
    fn test_small_buffer_rejected() {
        let config = ControllerConfig::default();
        let mut buf = [0u8; 4];
        assert_eq!(config.to_slice(&mut buf), Err(ConfigError::Encode));
    }
}
