//! 工具函数性能基准测试

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use sharelink::utils::{
    CodeGenerator, HostAllowList, HttpUrlPolicy, UrlPolicy, canonicalize_url,
    generate_random_code, is_valid_short_code,
};
use std::hint::black_box;

// ============== is_valid_short_code 基准测试 ==============

fn bench_is_valid_short_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/is_valid_short_code");

    group.bench_function("valid", |b| {
        b.iter(|| {
            assert!(is_valid_short_code(black_box("Kx9Q")));
        });
    });

    // 0/O/I/l 不在字母表中
    group.bench_function("invalid_ambiguous", |b| {
        b.iter(|| {
            assert!(!is_valid_short_code(black_box("O0Il")));
        });
    });

    group.finish();
}

// ============== 短码生成基准测试 ==============

fn bench_generate_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/generate_code");
    let generator = CodeGenerator::default();

    for length in [4usize, 5, 8] {
        group.bench_with_input(BenchmarkId::new("generator", length), &length, |b, &len| {
            b.iter(|| generator.generate(black_box(len)));
        });
    }

    group.bench_function("free_fn_4", |b| {
        b.iter(|| generate_random_code(black_box(4)));
    });

    group.finish();
}

// ============== URL 规范化与策略基准测试 ==============

fn bench_canonicalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("utils/canonicalize_url");

    group.bench_function("simple", |b| {
        b.iter(|| canonicalize_url(black_box("https://mapzamurai.com/?id=1")));
    });

    group.bench_function("untrimmed_mixed_case", |b| {
        b.iter(|| {
            canonicalize_url(black_box(
                "  HTTPS://MapZamurai.com/share?utm_source=a&id=123456789  ",
            ))
        });
    });

    let (_, parsed) = canonicalize_url("https://mapzamurai.com/?id=1").unwrap();
    let allow_list = HostAllowList::new(["mapzamurai.com", "www.mapzamurai.com"]);

    group.bench_function("policy_http", |b| {
        b.iter(|| HttpUrlPolicy.check(black_box(&parsed)));
    });

    group.bench_function("policy_allow_list", |b| {
        b.iter(|| allow_list.check(black_box(&parsed)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_is_valid_short_code,
    bench_generate_code,
    bench_canonicalize
);
criterion_main!(benches);
