//! # Moodlog Performance Benchmarks
//!
//! Benchmarks for the in-memory stages of the analysis pipeline. Network
//! collaborators are left out; these cover what runs between requests.
//!
//! ## Benchmark Categories
//!
//! - **Grouping**: year and month bucketing of a library
//! - **Aggregation**: popularity and positivity folds over a bucket
//! - **Merge**: joining a classifier answer back onto a bucket by id
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark group
//! cargo bench grouping
//! cargo bench aggregation
//! ```

use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::collections::HashMap;
use std::hint::black_box;

use moodlog::aggregate::aggregate;
use moodlog::classifier::{ClassificationResult, ClassifierTrack};
use moodlog::grouping::{group_by_month_in, group_by_year_in};
use moodlog::orchestrator::merge_classifications;
use moodlog::range_filter::{filter_years, YearFilter};
use moodlog::taxonomy::Category;
use moodlog::track::{ClassifiedTrack, LibraryEntry};

/// A library liked at a steady pace, one track every nine hours from 2015.
fn create_library(count: usize) -> Vec<LibraryEntry> {
    let start = Utc.with_ymd_and_hms(2015, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| LibraryEntry {
            uri: format!("spotify:track:{i:022}"),
            id: format!("{i:022}"),
            title: format!("Track {i}"),
            artists: vec![format!("Artist {}", i % 97)],
            date_liked: start + Duration::hours(9 * i as i64),
        })
        .collect()
}

fn classified(entries: &[LibraryEntry]) -> Vec<ClassifiedTrack> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| ClassifiedTrack {
            entry: entry.clone(),
            category: Category::ALL[i % Category::ALL.len()],
            positivity: (i % 201) as f64 - 100.0,
            popularity: (i * 37 % 101) as u8,
        })
        .collect()
}

fn classifier_answer(entries: &[LibraryEntry]) -> ClassificationResult {
    let tracks: Vec<ClassifierTrack> = entries
        .iter()
        .map(|e| ClassifierTrack {
            id: e.id.clone(),
            title: e.title.clone(),
            artist: e.artist_line(),
            category: Category::Mellow,
            positivity: 12.0,
        })
        .collect();
    ClassificationResult {
        typical_track: tracks[0].clone(),
        tracks,
        sentiment: Category::Mellow,
    }
}

/// Benchmark year and month bucketing
fn benchmark_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");

    for size in [100, 1_000, 10_000].iter() {
        let library = create_library(*size);

        group.bench_with_input(BenchmarkId::new("group_by_year", size), &library, |b, library| {
            b.iter(|| group_by_year_in(black_box(library.clone()), &Utc))
        });

        let years = group_by_year_in(library.clone(), &Utc);
        group.bench_with_input(BenchmarkId::new("group_by_month", size), &years, |b, years| {
            b.iter(|| group_by_month_in(black_box(years), &Utc))
        });
    }

    let years = group_by_year_in(create_library(10_000), &Utc);
    group.bench_function("filter_range", |b| {
        b.iter(|| filter_years(black_box(years.clone()), &YearFilter::range(Some(2016), Some(2018))))
    });

    group.finish();
}

/// Benchmark bucket aggregation
fn benchmark_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for size in [10, 100, 1_000].iter() {
        let tracks = classified(&create_library(*size));
        let typical = classifier_answer(&create_library(1)).typical_track;

        group.bench_with_input(BenchmarkId::new("aggregate", size), &tracks, |b, tracks| {
            b.iter(|| aggregate(black_box(tracks.clone()), Category::Calm, typical.clone()))
        });
    }

    group.finish();
}

/// Benchmark merging classifier output by id
fn benchmark_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for size in [10, 100, 1_000].iter() {
        let library = create_library(*size);
        let answer = classifier_answer(&library);
        let popularity: HashMap<String, u8> = library.iter().map(|e| (e.id.clone(), 50)).collect();

        group.bench_with_input(BenchmarkId::new("merge_classifications", size), &library, |b, library| {
            b.iter(|| merge_classifications(black_box(library), black_box(&answer), black_box(&popularity)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_grouping, benchmark_aggregation, benchmark_merge);

criterion_main!(benches);
