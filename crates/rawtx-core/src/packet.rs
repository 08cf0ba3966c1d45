use bytes::{Bytes, BytesMut};

/// A complete datagram, IP header included, owned by the caller.
///
/// Transmitters only borrow the bytes for the duration of one send. The
/// contents are never inspected: header correctness is the producer's job.
pub trait Packet {
    fn as_bytes(&self) -> &[u8];

    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl Packet for [u8] {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl<const N: usize> Packet for [u8; N] {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl Packet for Vec<u8> {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl Packet for Bytes {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl Packet for BytesMut {
    fn as_bytes(&self) -> &[u8] {
        self
    }
}

impl<P: Packet + ?Sized> Packet for &P {
    fn as_bytes(&self) -> &[u8] {
        (**self).as_bytes()
    }
}
