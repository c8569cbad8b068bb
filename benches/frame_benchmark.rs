//! Frame pipeline benchmark: simulation step and ANSI presentation cost.
//!
//! Target: simulate + diff a 200×50 grid well inside one 33ms frame.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glyphrain::surface::AnsiPresenter;
use glyphrain::{Frame, RainEngine, Rgb, Settings};

/// Engine warmed into a steady state with rain, words, and glitching.
fn busy_engine(cols: usize, rows: usize) -> RainEngine {
    let mut settings = Settings::default();
    settings.rain_spawn_rate = 120.0;
    settings.glitch_chance = 5.0;
    settings.ghosting_effect = true;

    let cell = settings.cell_size;
    let mut engine = RainEngine::with_seed(settings, 99);
    engine.resize(cols as f32 * cell, rows as f32 * cell);
    engine.push_text("all signal on its way down");
    for _ in 0..120 {
        engine.render_frame(16.0);
    }
    engine
}

fn simulate_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_frame_by_size");

    for (cols, rows) in [(80, 24), (120, 40), (200, 50)] {
        let mut engine = busy_engine(cols, rows);
        group.bench_function(
            BenchmarkId::new("steady_state", format!("{cols}x{rows}")),
            |b| b.iter(|| engine.render_frame(black_box(16.0))),
        );
    }

    group.finish();
}

fn present_consecutive_frames(c: &mut Criterion) {
    let mut engine = busy_engine(200, 50);
    engine.render_frame(16.0);
    let prev = engine.frame().clone();
    engine.render_frame(16.0);
    let next = engine.frame().clone();

    c.bench_function("present_diff_200x50_frame_step", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(16384);
            let mut presenter = AnsiPresenter::new();
            presenter.render_diff(black_box(&prev), black_box(&next), &mut output);
            output
        });
    });
}

fn present_identical_frames(c: &mut Criterion) {
    let mut engine = busy_engine(200, 50);
    engine.render_frame(16.0);
    let frame = engine.frame().clone();
    let same = frame.clone();

    c.bench_function("present_diff_200x50_identical", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(256);
            let mut presenter = AnsiPresenter::new();
            presenter.render_diff(black_box(&frame), black_box(&same), &mut output);
            output
        });
    });
}

fn present_full_frame(c: &mut Criterion) {
    let mut engine = busy_engine(200, 50);
    engine.render_frame(16.0);
    let frame = engine.frame().clone();

    c.bench_function("present_full_200x50", |b| {
        b.iter(|| {
            let mut output = Vec::with_capacity(65536);
            let mut presenter = AnsiPresenter::new();
            presenter.render_full(black_box(&frame), &mut output);
            output
        });
    });
}

fn fade_pass(c: &mut Criterion) {
    let mut engine = busy_engine(200, 50);
    engine.render_frame(16.0);
    let base = engine.frame().clone();

    c.bench_function("fade_toward_200x50", |b| {
        b.iter_batched(
            || base.clone(),
            |mut frame: Frame| {
                frame.fade_toward(black_box(Rgb::BLACK), 0.1);
                frame
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    simulate_frame,
    present_consecutive_frames,
    present_identical_frames,
    present_full_frame,
    fade_pass,
);
criterion_main!(benches);
