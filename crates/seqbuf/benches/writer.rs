// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![expect(missing_docs, reason = "Benchmark code")]

use std::alloc::System;
use std::hint::black_box;

use alloc_tracker::{Allocator, Session};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use seqbuf::{BufferWriter, ChainOutput, GrowableOutput, HexEncoding, SliceOutput};
use seqbuf_text::StandardFormat;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<System> = Allocator::system();

const LINE: &str = "The quick brown fox jumps over the lazy dog.";
const LINES: usize = 100;

fn entrypoint(c: &mut Criterion) {
    let allocs = Session::new();

    let mut group = c.benchmark_group("BufferWriter");

    let slice_allocs = allocs.operation("write_u64_slice");
    group.bench_function("write_u64_slice", |b| {
        let mut memory = [0_u8; 32];

        b.iter(|| {
            let _span = slice_allocs.measure_thread();
            let mut writer = BufferWriter::new(SliceOutput::new(&mut memory));
            writer
                .write(black_box(&60_000_000_000_000_000_u64), StandardFormat::DEFAULT)
                .unwrap();
            black_box(writer.written_len())
        });
    });

    group.bench_function("write_u64_growing", |b| {
        b.iter_batched_ref(
            || BufferWriter::new(GrowableOutput::new(4)),
            |writer| {
                writer
                    .write(black_box(&60_000_000_000_000_000_u64), StandardFormat::DEFAULT)
                    .unwrap();
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("write_f64_slice", |b| {
        let mut memory = [0_u8; 64];

        b.iter(|| {
            let mut writer = BufferWriter::new(SliceOutput::new(&mut memory));
            writer.write(black_box(&1234.5678_f64), StandardFormat::DEFAULT).unwrap();
            black_box(writer.written_len())
        });
    });

    let lines_allocs = allocs.operation("write_lines_growable");
    group.bench_function("write_lines_growable", |b| {
        b.iter(|| {
            let _span = lines_allocs.measure_thread();
            let mut writer = BufferWriter::new(GrowableOutput::new(256));

            for _ in 0..LINES {
                writer.write_line(LINE).unwrap();
            }

            black_box(writer.into_inner().into_vec())
        });
    });

    let chain_allocs = allocs.operation("write_lines_chain");
    group.bench_function("write_lines_chain", |b| {
        b.iter(|| {
            let _span = chain_allocs.measure_thread();
            let mut writer = BufferWriter::new(ChainOutput::new(1024));

            for _ in 0..LINES {
                writer.write_line(LINE).unwrap();
            }

            black_box(writer.into_inner().into_chain())
        });
    });

    group.bench_function("write_hex_transformed", |b| {
        b.iter_batched_ref(
            || BufferWriter::new(GrowableOutput::new(128)),
            |writer| {
                writer
                    .write_str_with(black_box(LINE), &[&HexEncoding::lower()])
                    .unwrap();
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();

    allocs.print_to_stdout();
}
