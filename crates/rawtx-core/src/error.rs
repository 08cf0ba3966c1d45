use std::io;
use std::net::IpAddr;
use std::path::PathBuf;

/// Every failure a transmitter can report.
///
/// `ResourceExhausted` is the only fatal kind: construction aborts and there is
/// nothing to retry against. The rest are surfaced at the call that caused them.
#[derive(Debug, thiserror::Error)]
pub enum TransmitError {
    #[error("{context}: {source}")]
    ResourceExhausted {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{context}: {source}")]
    Os {
        context: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("unsupported address family for {0}: only IPv4 is supported")]
    UnsupportedAddressFamily(IpAddr),

    #[error("no destination configured")]
    UnknownDestination,

    #[error("invalid transmitter configuration: {0}")]
    InvalidConfig(#[from] toml::de::Error),

    #[error("readiness_timeout_micros = {micros} exceeds the {max} µs limit")]
    ReadinessTimeoutTooLong { micros: u64, max: u64 },

    #[error("could not read configuration {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl TransmitError {
    /// Classifies a failing syscall. Kernel memory and buffer exhaustion become
    /// `ResourceExhausted`, everything else `Os`. Descriptor limits stay `Os`:
    /// the caller can free descriptors and retry.
    pub fn from_os(context: &'static str, source: io::Error) -> Self {
        if is_exhaustion(&source) {
            TransmitError::ResourceExhausted { context, source }
        } else {
            TransmitError::Os { context, source }
        }
    }

    /// The errno behind an OS-level failure, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            TransmitError::ResourceExhausted { source, .. }
            | TransmitError::Os { source, .. }
            | TransmitError::ConfigIo { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, TransmitError::ResourceExhausted { .. })
    }
}

fn is_exhaustion(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::OutOfMemory {
        return true;
    }
    matches!(
        err.raw_os_error(),
        Some(libc::ENOMEM | libc::ENOBUFS)
    )
}
