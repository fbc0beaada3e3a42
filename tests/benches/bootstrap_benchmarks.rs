//! # FlightSurety Client Benchmarks
//!
//! | Subsystem | Path | Expectation |
//! |-----------|------|-------------|
//! | fs-01 Contract Gateway | ABI calldata encoding | < 1µs per call |
//! | fs-02 Convergence Cache | envelope load of a converged pool | < 100µs |
//! | fs-03 Bootstrap | full pass over simulated contracts | linear in candidates |
//! | fs-03 Bootstrap | converged cache hit | independent of candidates |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fs_01_contract_gateway::domain::abi::{encode_call, Token};
use fs_01_contract_gateway::{Address, ContractMethod, InMemoryChain, U256};
use fs_02_convergence_cache::{ConvergenceCache, SeedDigest, REGISTERED_AIRLINES_KEY};
use fs_03_bootstrap::{AirlineRecord, SeedDataset, SeedFlight};
use std::sync::Arc;
use std::time::Duration;
use surety_runtime::{CacheMode, Session, SuretyConfig};
use tokio::runtime::Runtime;

fn seed(candidates: usize) -> SeedDataset {
    SeedDataset {
        first_airline: Some("Udacity Air".to_string()),
        airlines: (0..candidates).map(|i| format!("Airline {i}")).collect(),
        flights: (0..candidates)
            .map(|i| SeedFlight {
                flight: format!("FS{i:04}"),
                timestamp: "2024-06-01T08:15:00Z".to_string(),
            })
            .collect(),
        passengers: vec!["Alice".to_string()],
    }
}

fn config(candidates: usize) -> SuretyConfig {
    let mut config = SuretyConfig::default();
    config.roles.passenger_offset = 1 + candidates;
    config
}

// ============================================================================
// FS-01: ABI encoding
// ============================================================================

fn bench_abi_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("fs-01-abi");
    let airline = Address::new([0x22; 20]);

    group.bench_function("encode_register_airline", |b| {
        b.iter(|| {
            black_box(encode_call(
                ContractMethod::RegisterAirline,
                &[
                    Token::Address(airline),
                    Token::String("Delta Air Lines".to_string()),
                ],
            ))
        })
    });

    group.bench_function("encode_register_flight", |b| {
        b.iter(|| {
            black_box(encode_call(
                ContractMethod::RegisterFlight,
                &[
                    Token::Uint(U256::from(1_717_229_700_000u64)),
                    Token::String("ND1309".to_string()),
                ],
            ))
        })
    });

    group.finish();
}

// ============================================================================
// FS-02: cache envelope reads
// ============================================================================

fn bench_cache_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("fs-02-cache");

    for size in [10usize, 100, 1000] {
        let digest = SeedDigest::of_json(&seed(size).airlines);
        let cache = ConvergenceCache::in_memory();
        let records: Vec<AirlineRecord> = (0..size)
            .map(|i| AirlineRecord {
                address: Address::new([(i % 256) as u8; 20]),
                name: format!("Airline {i}"),
            })
            .collect();
        cache
            .store(REGISTERED_AIRLINES_KEY, &digest, &records)
            .unwrap();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("load_airlines", size), &cache, |b, cache| {
            b.iter(|| {
                let loaded: Option<Vec<AirlineRecord>> =
                    cache.load(REGISTERED_AIRLINES_KEY, &digest).unwrap();
                black_box(loaded)
            })
        });
    }

    group.finish();
}

// ============================================================================
// FS-03: bootstrap passes
// ============================================================================

fn bench_bootstrap(c: &mut Criterion) {
    let mut group = c.benchmark_group("fs-03-bootstrap");
    group.measurement_time(Duration::from_secs(10));
    let rt = Runtime::new().unwrap();

    for candidates in [5usize, 20, 50] {
        let accounts = 2 + candidates;

        group.throughput(Throughput::Elements(candidates as u64));
        group.bench_with_input(
            BenchmarkId::new("full_pass", candidates),
            &candidates,
            |b, &candidates| {
                b.iter(|| {
                    rt.block_on(async {
                        let chain = Arc::new(InMemoryChain::new(accounts));
                        let session = Session::open(
                            chain,
                            &config(candidates),
                            seed(candidates),
                            CacheMode::Memory,
                        )
                        .await
                        .unwrap();
                        black_box(session.bootstrap().await.is_converged())
                    })
                })
            },
        );

        let chain = Arc::new(InMemoryChain::new(accounts));
        let session = rt.block_on(async {
            let session = Session::open(
                chain,
                &config(candidates),
                seed(candidates),
                CacheMode::Memory,
            )
            .await
            .unwrap();
            session.bootstrap().await;
            session
        });
        group.bench_with_input(
            BenchmarkId::new("cache_hit", candidates),
            &session,
            |b, session| b.iter(|| rt.block_on(async { black_box(session.bootstrap().await) })),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_abi_encoding, bench_cache_load, bench_bootstrap);

criterion_main!(benches);
