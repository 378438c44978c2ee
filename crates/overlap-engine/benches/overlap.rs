use std::hint::black_box;

use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;
use criterion::{criterion_group, criterion_main, Criterion};
use overlap_engine::{
    normalize, resolve, AvailabilitySet, GamePreferenceList, Granularity, Participant,
    RankingPolicy, ResolveOptions, TimeInterval,
};

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap()
}

/// A week of scattered, overlapping, unaligned slots.
fn messy_week(seed: i64, count: i64) -> Vec<TimeInterval> {
    (0..count)
        .map(|i| {
            let offset = (i * 97 + seed * 13) % (7 * 24 * 60);
            let length = 20 + (i * 31 + seed) % 200;
            let start = base() + Duration::minutes(offset);
            TimeInterval::new(start, start + Duration::minutes(length)).unwrap()
        })
        .collect()
}

fn participant(seed: i64, count: i64) -> Participant {
    Participant::new(
        AvailabilitySet::new(&messy_week(seed, count), Granularity::default(), Tz::UTC),
        ["Valorant", "Chess", "Tetris", "Rocket League"]
            .into_iter()
            .collect::<GamePreferenceList>(),
    )
}

fn normalization(c: &mut Criterion) {
    let raw = messy_week(1, 500);
    let granularity = Granularity::default();

    c.bench_function("normalize_500", |b| {
        b.iter(|| black_box(normalize(black_box(&raw), granularity, Tz::UTC)))
    });
}

fn resolution(c: &mut Criterion) {
    let alice = participant(3, 200);
    let bob = participant(7, 200);
    let longest = ResolveOptions::default();
    let evening = ResolveOptions {
        ranking: RankingPolicy::EveningFirst,
        ..ResolveOptions::default()
    };

    c.bench_function("resolve_longest_first", |b| {
        b.iter(|| black_box(resolve(&alice, &bob, &longest)))
    });

    c.bench_function("resolve_evening_first", |b| {
        b.iter(|| black_box(resolve(&alice, &bob, &evening)))
    });
}

criterion_group!(benches, normalization, resolution);
criterion_main!(benches);
