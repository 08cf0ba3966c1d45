use std::net::IpAddr;
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, RawFd};
use std::time::Duration;

use rawtx_core::{Packet, TransmitError, TransmitterConfig};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::destination::Destination;
use crate::readiness;

/// A raw IPv4 socket in header-included mode, bound to one destination at a time.
///
/// ## Ownership
/// The socket belongs to this value alone and is closed exactly once, when it
/// is dropped. There is no way to duplicate the handle through this type.
///
/// ## Threading
/// Retargeting needs `&mut self`; sends and probes only read. Sharing one
/// transmitter between threads therefore needs external serialization, which
/// the borrow checker asks for anyway.
#[derive(Debug)]
pub struct RawTransmitter {
    socket: Socket,
    // The native address is cached next to its source so the send path does
    // not rebuild it, and so neither half can be observed without the other.
    target: Option<(Destination, SockAddr)>,
    readiness_timeout: Duration,
}

impl RawTransmitter {
    pub fn new() -> Result<Self, TransmitError> {
        Self::with_config(&TransmitterConfig::default())
    }

    /// Opens `socket(AF_INET, SOCK_RAW, IPPROTO_RAW)` and enables `IP_HDRINCL`.
    ///
    /// Usually needs `CAP_NET_RAW`; without it this fails with
    /// [`TransmitError::Os`] carrying `EPERM`.
    pub fn with_config(config: &TransmitterConfig) -> Result<Self, TransmitError> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::from(libc::IPPROTO_RAW)))
            .map_err(|e| TransmitError::from_os("could not create raw socket", e))?;

        // Any early return below drops `socket`, which closes it.
        socket
            .set_header_included(true)
            .map_err(|source| TransmitError::Os {
                context: "could not set socket option IP_HDRINCL",
                source,
            })?;

        tracing::debug!("Opened raw IPv4 socket (fd {}) with IP_HDRINCL", socket.as_raw_fd());
        Self::from_socket(socket, config)
    }

    /// Wraps an already opened socket and applies the remaining options.
    pub(crate) fn from_socket(socket: Socket, config: &TransmitterConfig) -> Result<Self, TransmitError> {
        config.validate()?;
        if let Some(bytes) = config.send_buffer_bytes {
            socket
                .set_send_buffer_size(bytes)
                .map_err(|source| TransmitError::Os {
                    context: "could not set socket option SO_SNDBUF",
                    source,
                })?;
        }

        Ok(Self {
            socket,
            target: None,
            readiness_timeout: config.readiness_timeout(),
        })
    }

    /// Points subsequent sends at `addr:port`.
    ///
    /// Only IPv4 is accepted; anything else fails with
    /// [`TransmitError::UnsupportedAddressFamily`] and keeps the previous target.
    pub fn set_destination(&mut self, addr: IpAddr, port: u16) -> Result<(), TransmitError> {
        let dest = Destination::from_ip(addr, port).inspect_err(|_| {
            tracing::warn!("Rejected destination {} port {}: not IPv4", addr, port);
        })?;
        self.retarget(dest);
        Ok(())
    }

    pub fn set_destination_v4(&mut self, dest: impl Into<Destination>) {
        self.retarget(dest.into());
    }

    pub fn clear_destination(&mut self) {
        self.target = None;
    }

    fn retarget(&mut self, dest: Destination) {
        tracing::debug!("Raw transmitter fd {} now targets {}", self.socket.as_raw_fd(), dest);
        self.target = Some((dest, dest.sock_addr()));
    }

    pub fn destination(&self) -> Option<Destination> {
        self.target.as_ref().map(|(dest, _)| *dest)
    }

    /// Copy of the native address handed to `sendto`, for diagnostics.
    pub fn sock_addr(&self) -> Option<SockAddr> {
        self.target.as_ref().map(|(_, addr)| addr.clone())
    }

    /// Emits `packet` verbatim, IP header included, as one datagram.
    ///
    /// Returns the byte count the kernel accepted. Nothing is retried; whether
    /// a full send buffer blocks or fails depends on the socket's blocking
    /// mode, which is left at the OS default.
    pub fn send<P: Packet + ?Sized>(&self, packet: &P) -> Result<usize, TransmitError> {
        let (_, addr) = self.target.as_ref().ok_or(TransmitError::UnknownDestination)?;
        self.socket
            .send_to(packet.as_bytes(), addr)
            .map_err(|source| TransmitError::Os {
                context: "sendto failed",
                source,
            })
    }

    /// Advisory write-readiness check bounded by the configured timeout.
    ///
    /// Poll failures read as "not ready". Use [`poll_writable`](Self::poll_writable)
    /// when a failing socket must not be mistaken for a busy one.
    pub fn socket_ready(&self) -> bool {
        match readiness::poll_writable(self.socket.as_fd(), self.readiness_timeout) {
            Ok(ready) => ready,
            Err(errno) => {
                tracing::trace!("Readiness probe on fd {} failed: {}", self.socket.as_raw_fd(), errno);
                false
            }
        }
    }

    pub fn poll_writable(&self, timeout: Duration) -> Result<bool, TransmitError> {
        readiness::poll_writable(self.socket.as_fd(), timeout).map_err(|errno| TransmitError::Os {
            context: "poll for write readiness failed",
            source: errno.into(),
        })
    }

    pub fn readiness_timeout(&self) -> Duration {
        self.readiness_timeout
    }
}

impl AsFd for RawTransmitter {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.socket.as_fd()
    }
}

impl AsRawFd for RawTransmitter {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}

impl Drop for RawTransmitter {
    fn drop(&mut self) {
        // `socket` closes itself right after this; close errors are discarded.
        tracing::trace!("Closing raw transmitter fd {}", self.socket.as_raw_fd());
    }
}
