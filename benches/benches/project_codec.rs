//! Benchmark suite for project file encoding and decoding
//!
//! This benchmark measures the substitution cipher on its own and full
//! project round-trips for both layout lineages.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use gmk_benches::{generate_payload, generate_project};
use gmk_types::file::{JunkSize, Project, SaveOptions, SwapTables};
use std::hint::black_box;

/// Benchmark table derivation, which runs once per seed
fn bench_table_derivation(c: &mut Criterion) {
	c.bench_function("cipher_derive_tables", |b| {
		b.iter(|| SwapTables::derive(black_box(12345)));
	});
}

/// Benchmark in-place deciphering over growing payloads
fn bench_cipher(c: &mut Criterion) {
	let mut group = c.benchmark_group("cipher");
	let tables = SwapTables::derive(12345);

	for size in [4 * 1024, 64 * 1024, 1024 * 1024] {
		let payload = tables_encrypt(&tables, generate_payload(size));
		group.throughput(Throughput::Bytes(size as u64));
		group.bench_with_input(BenchmarkId::new("decrypt", size), &payload, |b, payload| {
			b.iter(|| {
				let mut data = payload.clone();
				tables.decrypt_in_place(black_box(&mut data));
				black_box(data)
			});
		});
	}

	group.finish();
}

fn tables_encrypt(tables: &SwapTables, mut data: Vec<u8>) -> Vec<u8> {
	tables.encrypt_in_place(&mut data);
	data
}

/// Benchmark full project decoding for both lineages
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("project_decode");

	for scale in [8, 64] {
		let mut project = generate_project(scale);
		let fixed = JunkSize::Fixed {
			before: 128,
			after: 128,
		};

		let variants = [("gm7", SaveOptions::gm7()), ("gm81", SaveOptions::gm81(12345).with_junk(fixed))];
		for (name, options) in variants {
			let bytes = match project.to_bytes(&options) {
				Ok(bytes) => bytes,
				Err(e) => {
					eprintln!("Warning: Could not encode {name} project at scale {scale}: {e}");
					continue;
				}
			};

			group.throughput(Throughput::Bytes(bytes.len() as u64));
			group.bench_with_input(BenchmarkId::new(name, scale), &bytes, |b, bytes| {
				b.iter(|| {
					let result = Project::from_bytes(black_box(bytes));
					black_box(result)
				});
			});
		}
	}

	group.finish();
}

/// Benchmark full project encoding with a fixed seed
fn bench_encode(c: &mut Criterion) {
	let mut group = c.benchmark_group("project_encode");

	for scale in [8, 64] {
		let mut project = generate_project(scale);
		let options = SaveOptions::gm81(12345);
		group.bench_function(BenchmarkId::new("gm81", scale), |b| {
			b.iter(|| {
				let result = project.to_bytes(black_box(&options));
				black_box(result)
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_table_derivation, bench_cipher, bench_decode, bench_encode);
criterion_main!(benches);
