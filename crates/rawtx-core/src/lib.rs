pub mod config;
pub mod error;
pub mod packet;

pub use config::{TransmitterConfig, MAX_READINESS_TIMEOUT_MICROS};
pub use error::TransmitError;
pub use packet::Packet;
