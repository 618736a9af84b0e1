//! # PolyBridge Consensus Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Aggregated seal verification, 100 validators | < 5ms |
//! | Extra encode + decode | < 50µs |
//! | Checkpoint event root, 1,000 events | < 10ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pb_01_header_extra::{
    AggregatedSignature, Bitmap, CheckpointData, Extra, ValidatorMetadata, ValidatorSetDelta,
};
use pb_02_bls_signer::{aggregate_signatures, Domain, PrivateKey};
use pb_03_validator_set::ValidatorSet;
use pb_04_checkpoint::{event_root, StateSyncEvent};
use shared_types::U256;
use std::time::Duration;

fn roster(size: usize) -> (ValidatorSet, Vec<PrivateKey>) {
    let keys: Vec<PrivateKey> = (0..size).map(|_| PrivateKey::generate().unwrap()).collect();
    let validators = keys
        .iter()
        .enumerate()
        .map(|(i, k)| {
            let mut address = [0u8; 20];
            address[..8].copy_from_slice(&(i as u64).to_be_bytes());
            ValidatorMetadata::new(address, k.public_key(), U256::one())
        })
        .collect();
    (ValidatorSet::new(1, validators).unwrap(), keys)
}

fn bench_seal_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("pb-03-seal-verification");
    group.measurement_time(Duration::from_secs(10));

    for size in [4, 20, 100] {
        let (set, keys) = roster(size);
        let message = [7u8; 32];
        let quorum = size * 2 / 3 + 1;
        let signatures: Vec<_> = keys[..quorum]
            .iter()
            .map(|k| k.sign(&message, Domain::CheckpointManager))
            .collect();
        let seal = AggregatedSignature::new(
            aggregate_signatures(&signatures).unwrap().to_bytes().to_vec(),
            Bitmap::from_indices(0..quorum),
        );

        group.throughput(Throughput::Elements(quorum as u64));
        group.bench_with_input(BenchmarkId::new("verify_aggregated", size), &seal, |b, seal| {
            b.iter(|| {
                black_box(
                    set.verify_aggregated(seal, &message, Domain::CheckpointManager)
                        .unwrap(),
                )
            })
        });
    }
    group.finish();
}

fn bench_extra_codec(c: &mut Criterion) {
    let (set, keys) = roster(10);
    let extra = Extra {
        validators: Some(ValidatorSetDelta {
            added: vec![ValidatorMetadata::new([0xee; 20], keys[0].public_key(), U256::one())],
            removed: Bitmap::from_indices([1, 3]),
        }),
        parent: Some(AggregatedSignature::new(vec![1; 96], Bitmap::from_indices(0..7))),
        committed: Some(AggregatedSignature::new(vec![2; 96], Bitmap::from_indices(0..7))),
        checkpoint: Some(CheckpointData {
            epoch_number: 3,
            current_validators_hash: set.hash(),
            next_validators_hash: set.hash(),
            ..CheckpointData::default()
        }),
    };
    let encoded = extra.encode();

    let mut group = c.benchmark_group("pb-01-extra");
    group.bench_function("encode", |b| b.iter(|| black_box(extra.encode())));
    group.bench_function("decode", |b| {
        b.iter(|| black_box(Extra::decode(&encoded).unwrap()))
    });
    group.finish();
}

fn bench_event_root(c: &mut Criterion) {
    let mut group = c.benchmark_group("pb-04-event-root");
    for count in [10u64, 100, 1_000] {
        let events: Vec<StateSyncEvent> = (1..=count)
            .map(|id| StateSyncEvent {
                id,
                sender: [1; 20],
                receiver: [2; 20],
                data: id.to_be_bytes().to_vec(),
            })
            .collect();
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &events, |b, events| {
            b.iter(|| black_box(event_root(events)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_seal_verification,
    bench_extra_codec,
    bench_event_root
);
criterion_main!(benches);
