use std::fmt;
use std::mem;
use std::net::{IpAddr, Ipv4Addr, SocketAddrV4};

use socket2::SockAddr;
use static_assertions::assert_eq_size;

use crate::TransmitError;

assert_eq_size!(libc::sockaddr_in, [u8; 16]);

/// An IPv4 endpoint in host representation.
///
/// The kernel only ever sees it through [`Destination::to_sockaddr_in`] or
/// [`Destination::sock_addr`]; no other code touches the native layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Destination {
    addr: Ipv4Addr,
    port: u16,
}

impl Destination {
    pub const fn new(addr: Ipv4Addr, port: u16) -> Self {
        Self { addr, port }
    }

    /// Accepts any IP address value, rejecting every family but IPv4.
    pub fn from_ip(addr: IpAddr, port: u16) -> Result<Self, TransmitError> {
        match addr {
            IpAddr::V4(v4) => Ok(Self::new(v4, port)),
            IpAddr::V6(_) => Err(TransmitError::UnsupportedAddressFamily(addr)),
        }
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Native `sockaddr_in`, address and port in network byte order.
    pub fn to_sockaddr_in(&self) -> libc::sockaddr_in {
        // SAFETY: sockaddr_in is plain old data; all-zero is a valid value.
        let mut raw: libc::sockaddr_in = unsafe { mem::zeroed() };
        raw.sin_family = libc::AF_INET as libc::sa_family_t;
        raw.sin_port = self.port.to_be();
        raw.sin_addr = libc::in_addr {
            s_addr: u32::from(self.addr).to_be(),
        };
        raw
    }

    /// Inverse of [`to_sockaddr_in`](Self::to_sockaddr_in). `None` when the
    /// structure does not describe an `AF_INET` endpoint.
    pub fn from_sockaddr_in(raw: &libc::sockaddr_in) -> Option<Self> {
        if raw.sin_family != libc::AF_INET as libc::sa_family_t {
            return None;
        }
        Some(Self {
            addr: Ipv4Addr::from(u32::from_be(raw.sin_addr.s_addr)),
            port: u16::from_be(raw.sin_port),
        })
    }

    pub fn sock_addr(&self) -> SockAddr {
        SockAddr::from(SocketAddrV4::from(*self))
    }
}

impl From<SocketAddrV4> for Destination {
    fn from(addr: SocketAddrV4) -> Self {
        Self::new(*addr.ip(), addr.port())
    }
}

impl From<Destination> for SocketAddrV4 {
    fn from(dest: Destination) -> Self {
        SocketAddrV4::new(dest.addr, dest.port)
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_layout_is_network_byte_order() {
        let dest = Destination::new(Ipv4Addr::new(192, 0, 2, 1), 53);
        let raw = dest.to_sockaddr_in();

        assert_eq!(raw.sin_family, libc::AF_INET as libc::sa_family_t);
        assert_eq!(raw.sin_port.to_ne_bytes(), 53u16.to_be_bytes());
        assert_eq!(raw.sin_addr.s_addr.to_ne_bytes(), [192, 0, 2, 1]);
        assert_eq!(raw.sin_zero, [0; 8]);
    }

    #[test]
    fn native_layout_reads_back_identically() {
        let samples = [
            (Ipv4Addr::UNSPECIFIED, 0),
            (Ipv4Addr::LOCALHOST, 53),
            (Ipv4Addr::new(198, 51, 100, 7), 5353),
            (Ipv4Addr::new(10, 255, 0, 1), 0x1234),
            (Ipv4Addr::BROADCAST, u16::MAX),
        ];
        for (addr, port) in samples {
            let dest = Destination::new(addr, port);
            let back = Destination::from_sockaddr_in(&dest.to_sockaddr_in());
            assert_eq!(back, Some(dest), "{}", dest);
        }
    }

    #[test]
    fn broadcast_is_an_ordinary_destination() {
        let dest = Destination::new(Ipv4Addr::BROADCAST, 53);
        assert_eq!(dest.to_sockaddr_in().sin_addr.s_addr, u32::MAX);
        assert_eq!(dest.to_string(), "255.255.255.255:53");
    }

    #[test]
    fn foreign_family_does_not_decode() {
        let mut raw = Destination::new(Ipv4Addr::LOCALHOST, 53).to_sockaddr_in();
        raw.sin_family = libc::AF_INET6 as libc::sa_family_t;
        assert_eq!(Destination::from_sockaddr_in(&raw), None);
    }

    #[test]
    fn ipv6_input_is_rejected() {
        let v6: IpAddr = "2001:db8::53".parse().unwrap();
        let err = Destination::from_ip(v6, 53).unwrap_err();
        assert!(matches!(err, TransmitError::UnsupportedAddressFamily(a) if a == v6));

        let mapped: IpAddr = "::ffff:192.0.2.1".parse().unwrap();
        assert!(Destination::from_ip(mapped, 53).is_err());
    }

    #[test]
    fn sock_addr_matches_std_representation() {
        let dest = Destination::new(Ipv4Addr::new(192, 0, 2, 1), 53);
        let sock = dest.sock_addr();
        assert_eq!(sock.as_socket_ipv4(), Some(SocketAddrV4::from(dest)));
    }
}
