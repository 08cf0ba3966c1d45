use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::TransmitError;

/// Longest readiness window a configuration may ask for.
pub const MAX_READINESS_TIMEOUT_MICROS: u64 = 1_000_000;

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct TransmitterConfig {
    /// Upper bound for a single readiness probe.
    pub readiness_timeout_micros: u64,
    /// `SO_SNDBUF` override. The kernel default is kept when unset.
    pub send_buffer_bytes: Option<usize>,
}

impl Default for TransmitterConfig {
    fn default() -> Self {
        Self {
            readiness_timeout_micros: 100,
            send_buffer_bytes: None,
        }
    }
}

impl TransmitterConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, TransmitError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would turn the readiness probe into a blocking wait.
    pub fn validate(&self) -> Result<(), TransmitError> {
        if self.readiness_timeout_micros > MAX_READINESS_TIMEOUT_MICROS {
            return Err(TransmitError::ReadinessTimeoutTooLong {
                micros: self.readiness_timeout_micros,
                max: MAX_READINESS_TIMEOUT_MICROS,
            });
        }
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TransmitError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| TransmitError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!("Loaded transmitter config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_micros(self.readiness_timeout_micros)
    }
}
