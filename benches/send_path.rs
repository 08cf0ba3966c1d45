use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rawtx_transport::{Destination, RawTransmitter};
use std::net::{IpAddr, Ipv4Addr};

fn bench_destination_encoding(c: &mut Criterion) {
    let dest = Destination::new(Ipv4Addr::new(192, 0, 2, 1), 53);

    c.bench_function("destination_to_sockaddr_in", |b| {
        b.iter(|| black_box(black_box(dest).to_sockaddr_in()))
    });
}

fn bench_hot_loop(c: &mut Criterion) {
    // Needs CAP_NET_RAW; without it only the encoding bench runs.
    let mut tx = match RawTransmitter::new() {
        Ok(tx) => tx,
        Err(e) => {
            eprintln!("send_path: skipping raw socket benches: {}", e);
            return;
        }
    };

    c.bench_function("socket_ready_probe", |b| b.iter(|| black_box(tx.socket_ready())));

    // Loopback keeps the datagrams on the host.
    tx.set_destination(IpAddr::V4(Ipv4Addr::LOCALHOST), 9).unwrap();
    let mut pkt = [0u8; 40];
    pkt[0] = 0x45;
    pkt[2..4].copy_from_slice(&40u16.to_be_bytes());
    pkt[8] = 64;
    pkt[9] = 17;
    pkt[12..16].copy_from_slice(&Ipv4Addr::LOCALHOST.octets());
    pkt[16..20].copy_from_slice(&Ipv4Addr::LOCALHOST.octets());
    pkt[22..24].copy_from_slice(&9u16.to_be_bytes());
    pkt[24..26].copy_from_slice(&20u16.to_be_bytes());

    c.bench_function("probe_then_send_40b", |b| {
        b.iter(|| {
            if tx.socket_ready() {
                let _ = black_box(tx.send(&pkt));
            }
        })
    });
}

criterion_group!(benches, bench_destination_encoding, bench_hot_loop);
criterion_main!(benches);
