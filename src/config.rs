//! Upload settings.
//!
//! Every field has a default matching the stock firmware, so the YAML file is
//! optional and may set any subset of fields:
//!
//! ```yaml
//! device_name: GuitarTrainer
//! scan_timeout_secs: 15
//! frame_size: 180
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::{Uuid, uuid};

use crate::error::ConfigError;

/// Nordic UART service, as exposed by the practice device firmware.
pub const UART_SERVICE_UUID: Uuid = uuid!("6e400001-b5a3-f393-e0a9-e50e24dcca9e");
/// Characteristic the client writes frames to.
pub const UART_RX_UUID: Uuid = uuid!("6e400002-b5a3-f393-e0a9-e50e24dcca9e");
/// Characteristic the device notifies replies on.
pub const UART_TX_UUID: Uuid = uuid!("6e400003-b5a3-f393-e0a9-e50e24dcca9e");

pub const DEFAULT_DEVICE_NAME: &str = "GuitarTrainer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Advertised local name of the device. When empty, any device
    /// advertising `service_uuid` matches.
    pub device_name: String,
    pub service_uuid: Uuid,
    pub rx_uuid: Uuid,
    pub tx_uuid: Uuid,
    /// How long to scan before giving up.
    pub scan_timeout_secs: u64,
    /// How long to wait for the device to confirm the upload.
    pub ack_timeout_secs: u64,
    /// Largest single characteristic write, in bytes.
    pub frame_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            service_uuid: UART_SERVICE_UUID,
            rx_uuid: UART_RX_UUID,
            tx_uuid: UART_TX_UUID,
            scan_timeout_secs: 10,
            ack_timeout_secs: 5,
            // default ATT MTU (23) minus the 3 byte write header
            frame_size: 20,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = serde_yaml::from_str(&yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_size == 0 {
            return Err(ConfigError::ZeroFrameSize);
        }
        Ok(())
    }

    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }

    pub fn ack_timeout(&self) -> Duration {
        Duration::from_secs(self.ack_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.yml");
        fs::write(&path, "device_name: Trainer2\nscan_timeout_secs: 3\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.device_name, "Trainer2");
        assert_eq!(config.scan_timeout(), Duration::from_secs(3));
        assert_eq!(config.frame_size, 20);
        assert_eq!(config.rx_uuid, UART_RX_UUID);
    }

    #[test]
    fn test_zero_frame_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.yml");
        fs::write(&path, "frame_size: 0\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::ZeroFrameSize)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.yml");
        fs::write(&path, "device: Trainer2\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file(Path::new("/nonexistent/upload.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
