//! Sends a single DNS query over a raw socket with a caller-built IP header.
//!
//! ```text
//! sudo cargo run --example raw_send -- 192.0.2.1 [config.toml]
//! ```

use rawtx_core::TransmitterConfig;
use rawtx_transport::RawTransmitter;
use std::net::{IpAddr, Ipv4Addr};

const DNS_PORT: u16 = 53;
const SOURCE_PORT: u16 = 40053;

fn query_datagram(src: Ipv4Addr, dst: Ipv4Addr) -> Vec<u8> {
    // example.com. A, recursion desired.
    let mut dns = vec![0x13, 0x37, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
    for label in ["example", "com"] {
        dns.push(label.len() as u8);
        dns.extend_from_slice(label.as_bytes());
    }
    dns.extend_from_slice(&[0x00, 0x00, 0x01, 0x00, 0x01]);

    let udp_len = (8 + dns.len()) as u16;
    let total_len = 20 + udp_len;

    let mut pkt = Vec::with_capacity(total_len as usize);
    pkt.extend_from_slice(&[0x45, 0x00]);
    pkt.extend_from_slice(&total_len.to_be_bytes());
    pkt.extend_from_slice(&[0x00, 0x00, 0x40, 0x00, 64, 17, 0x00, 0x00]);
    pkt.extend_from_slice(&src.octets());
    pkt.extend_from_slice(&dst.octets());
    pkt.extend_from_slice(&SOURCE_PORT.to_be_bytes());
    pkt.extend_from_slice(&DNS_PORT.to_be_bytes());
    pkt.extend_from_slice(&udp_len.to_be_bytes());
    pkt.extend_from_slice(&[0x00, 0x00]);
    pkt.extend_from_slice(&dns);
    pkt
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let target: Ipv4Addr = args.next().as_deref().unwrap_or("127.0.0.1").parse()?;
    let config = match args.next() {
        Some(path) => TransmitterConfig::load(path)?,
        None => TransmitterConfig::default(),
    };

    let mut tx = RawTransmitter::with_config(&config)?;
    tx.set_destination(IpAddr::V4(target), DNS_PORT)?;

    // A zero source address is filled in by the kernel.
    let pkt = query_datagram(Ipv4Addr::UNSPECIFIED, target);
    while !tx.socket_ready() {
        std::hint::spin_loop();
    }
    let sent = tx.send(&pkt)?;

    tracing::info!("Sent {} of {} bytes to {:?}", sent, pkt.len(), tx.sock_addr());
    Ok(())
}
