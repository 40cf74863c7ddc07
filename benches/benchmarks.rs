use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use authdemo::auth::{
    InMemoryUserStore, TokenService, User, UserStore, extract_bearer_token, hash_password,
    verify_password,
};
use authdemo::config::{AuthConfig, LookupMode};

fn test_users(count: usize) -> Vec<User> {
    (0..count)
        .map(|i| User::plaintext(&format!("user_{:04}", i), &format!("secret_{}", i)))
        .collect()
}

fn bench_tokens(c: &mut Criterion) {
    let tokens = TokenService::from_config(&AuthConfig::default()).unwrap();
    let with_subject = tokens.issue(Some("one")).unwrap();
    let header = format!("Bearer {}", with_subject);

    c.bench_function("token_issue", |b| {
        b.iter(|| black_box(tokens.issue(Some("one"))))
    });

    c.bench_function("token_decode_verified", |b| {
        b.iter(|| black_box(tokens.decode(&with_subject)))
    });

    c.bench_function("token_decode_unverified", |b| {
        b.iter(|| black_box(tokens.decode_unverified(&with_subject)))
    });

    c.bench_function("extract_bearer_token", |b| {
        b.iter(|| black_box(extract_bearer_token(&header)))
    });
}

fn bench_password(c: &mut Criterion) {
    let hash = hash_password("secret_one").unwrap();
    let mut group = c.benchmark_group("argon2");
    group.sample_size(10);

    group.bench_function("hash", |b| b.iter(|| black_box(hash_password("secret_one"))));

    group.bench_function("verify_match", |b| {
        b.iter(|| black_box(verify_password("secret_one", &hash)))
    });

    group.bench_function("verify_mismatch", |b| {
        b.iter(|| black_box(verify_password("secret_two", &hash)))
    });

    group.finish();
}

fn bench_user_lookup(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("user_lookup");

    for size in [10usize, 100, 1000] {
        for lookup in [LookupMode::Substring, LookupMode::Exact] {
            let store = InMemoryUserStore::new(test_users(size), lookup);
            let target = format!("user_{:04}", size - 1);
            let id = BenchmarkId::new(format!("{:?}", lookup).to_lowercase(), size);

            group.bench_with_input(id, &target, |b, target| {
                b.to_async(&rt)
                    .iter(|| async { black_box(store.find_by_username(target).await) })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_tokens, bench_password, bench_user_lookup);
criterion_main!(benches);
