//! Benchmark tests for videoholic-core operations
//!
//! Run with: cargo bench -p videoholic-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::rc::Rc;

use videoholic_core::source::infer_stream_type;
use videoholic_core::*;

// ============================================================================
// Helpers
// ============================================================================

/// Handler that never matches, used to pad the registry
struct NeverMatches;

impl MediaStreamHandler for NeverMatches {
    fn is_supported(&self) -> bool {
        true
    }

    fn can_handle_stream(&self, _stream: &MediaStream) -> bool {
        false
    }

    fn attach(&self, _surface: &dyn RenderingSurface, _stream: &MediaStream) -> Result<()> {
        Ok(())
    }

    fn detach(&self, _surface: &dyn RenderingSurface) {}
}

fn padded_registry(padding: usize) -> StreamHandlerRegistry {
    let mut registry = StreamHandlerRegistry::with_builtins(&Capabilities::all(), StreamEngines::new());
    for _ in 0..padding {
        registry.register(Rc::new(NeverMatches));
    }
    registry
}

// ============================================================================
// Source Inference
// ============================================================================

fn bench_infer_stream_type(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stream Type Inference");

    let sources = [
        ("relative", "video.mp4"),
        ("absolute", "https://cdn.example.com/live/master.m3u8?token=abcdef"),
        ("unknown", "https://cdn.example.com/watch?v=123"),
    ];

    for (label, src) in sources {
        group.bench_with_input(BenchmarkId::from_parameter(label), &src, |b, src| {
            b.iter(|| infer_stream_type(black_box(src)))
        });
    }

    group.finish();
}

// ============================================================================
// Resolution
// ============================================================================

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resolution");
    let sources = SourceHandlerRegistry::with_builtins();
    let src = MediaSource::from("https://cdn.example.com/video.webm");

    for padding in [0, 8, 64] {
        let streams = padded_registry(padding);
        group.bench_with_input(BenchmarkId::new("padded", padding), &streams, |b, streams| {
            b.iter(|| resolve(black_box(&src), &sources, streams).map(|r| r.stream))
        });
    }

    group.finish();
}

// ============================================================================
// Source Switching
// ============================================================================

fn bench_source_switching(c: &mut Criterion) {
    let mut controller = PlayerController::new(ControllerConfig::new(Capabilities::all())).unwrap();
    controller.set_surface(Rc::new(HeadlessSurface::new())).unwrap();

    let a = MediaSource::from("a.mp4");
    let b = MediaSource::from("b.webm");

    c.bench_function("switch_source", |bench| {
        let mut flip = false;
        bench.iter(|| {
            flip = !flip;
            let next = if flip { a.clone() } else { b.clone() };
            controller.set_source(black_box(next)).unwrap();
        })
    });

    c.bench_function("playback_state", |bench| {
        bench.iter(|| black_box(controller.playback_state()))
    });
}

criterion_group!(
    benches,
    bench_infer_stream_type,
    bench_resolution,
    bench_source_switching,
);
criterion_main!(benches);
