//! # rawtx-transport
//!
//! Header-included raw IPv4 transmission. The caller hands over finished
//! datagrams; the kernel routes them but never rewrites the IP header.

pub use rawtx_core::{Packet, TransmitError, TransmitterConfig};
pub mod destination;
pub mod readiness;
pub mod sender;

pub use destination::Destination;
pub use sender::RawTransmitter;
