//! 客户端 IP 解析性能基准测试

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use geoinfo::services::{ClientIpResolver, ForwardHeaders};
use geoinfo::utils::ip::{PrivateRangeTable, is_public, parse_ip_literal, peer_ip};
use std::hint::black_box;
use std::net::IpAddr;

// ============== 地址分类 ==============

fn bench_is_public(c: &mut Criterion) {
    let public: IpAddr = "8.8.8.8".parse().unwrap();
    let private: IpAddr = "192.168.1.1".parse().unwrap();
    let mapped: IpAddr = "::ffff:10.0.0.1".parse().unwrap();
    let v6: IpAddr = "2001:4860:4860::8888".parse().unwrap();

    let mut group = c.benchmark_group("is_public");
    group.bench_function("v4_public", |b| b.iter(|| is_public(black_box(&public))));
    group.bench_function("v4_private", |b| b.iter(|| is_public(black_box(&private))));
    group.bench_function("v4_mapped", |b| b.iter(|| is_public(black_box(&mapped))));
    group.bench_function("v6_public", |b| b.iter(|| is_public(black_box(&v6))));
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_ip_literal", |b| {
        b.iter(|| parse_ip_literal(black_box(" 2001:db8::1 ")))
    });
    c.bench_function("peer_ip", |b| {
        b.iter(|| peer_ip(black_box("[2001:db8::42]:8443")))
    });
}

// ============== 解析顺序 ==============

fn bench_resolve_sources(c: &mut Criterion) {
    let resolver = ClientIpResolver::new(PrivateRangeTable::global());
    let xff = ForwardHeaders::new(Some("10.0.0.5, 203.0.113.9, 198.51.100.2"), None);
    let real_ip = ForwardHeaders::new(Some("10.0.0.5"), Some("203.0.113.9"));
    let empty = ForwardHeaders::default();

    let mut group = c.benchmark_group("resolve");
    group.bench_function("override", |b| {
        b.iter(|| resolver.resolve(Some("10.0.0.1:80"), &xff, black_box(Some("8.8.8.8"))))
    });
    group.bench_function("forwarded_for", |b| {
        b.iter(|| resolver.resolve(Some("10.0.0.1:80"), black_box(&xff), None))
    });
    group.bench_function("real_ip", |b| {
        b.iter(|| resolver.resolve(Some("10.0.0.1:80"), black_box(&real_ip), None))
    });
    group.bench_function("peer", |b| {
        b.iter(|| resolver.resolve(black_box(Some("198.51.100.7:54321")), &empty, None))
    });
    group.finish();
}

fn bench_forwarded_for_chain_length(c: &mut Criterion) {
    let resolver = ClientIpResolver::new(PrivateRangeTable::global());
    let mut group = c.benchmark_group("resolve/chain_length");

    for hops in [1usize, 8, 32] {
        // 公网地址在最左侧，需要扫描整条链
        let mut entries = vec!["203.0.113.9".to_string()];
        entries.extend((0..hops).map(|i| format!("10.0.{}.{}", i / 256, i % 256)));
        let headers = ForwardHeaders::new(Some(&entries.join(", ")), None);

        group.throughput(Throughput::Elements(hops as u64 + 1));
        group.bench_with_input(BenchmarkId::from_parameter(hops), &headers, |b, headers| {
            b.iter(|| resolver.resolve(None, black_box(headers), None))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_is_public,
    bench_parse,
    bench_resolve_sources,
    bench_forwarded_for_chain_length
);
criterion_main!(benches);
