// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size};
use understory_placement::{
    HorizontalPreference, PlacementOptions, VerticalPreference, Viewport,
    calculate_in_place_position, calculate_position,
};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_f64(&mut self) -> f64 {
        // xorshift64*
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let v = self.0.wrapping_mul(0x2545_F491_4F6C_DD1D);
        (v >> 11) as f64 / (1_u64 << 53) as f64
    }
}

/// Triggers scattered over (and slightly past) the viewport.
fn gen_triggers(n: usize, viewport: Viewport) -> Vec<(Rect, Size)> {
    let mut rng = Rng::new(0x5eed);
    (0..n)
        .map(|_| {
            let x = rng.next_f64() * (viewport.size.width + 100.0) - 50.0;
            let y = rng.next_f64() * (viewport.size.height + 100.0) - 50.0;
            let w = 40.0 + rng.next_f64() * 160.0;
            let h = 20.0 + rng.next_f64() * 30.0;
            let floating = Size::new(100.0 + rng.next_f64() * 300.0, 50.0 + rng.next_f64() * 400.0);
            (Rect::new(x, y, x + w, y + h), floating)
        })
        .collect()
}

fn bench_calculate(c: &mut Criterion) {
    let viewport = Viewport::new(1280.0, 800.0).with_scroll(0.0, 240.0);
    let inputs = gen_triggers(1024, viewport);

    let mut group = c.benchmark_group("calculate_position");
    group.throughput(Throughput::Elements(inputs.len() as u64));

    group.bench_function("auto_fresh", |b| {
        let options = PlacementOptions::default();
        b.iter(|| {
            for (trigger, floating) in &inputs {
                black_box(calculate_position(
                    black_box(*trigger),
                    black_box(*floating),
                    viewport,
                    &options,
                ));
            }
        });
    });

    group.bench_function("auto_with_previous", |b| {
        b.iter(|| {
            let mut options = PlacementOptions::default();
            for (trigger, floating) in &inputs {
                let placed = calculate_position(*trigger, *floating, viewport, &options);
                options.previous_horizontal = Some(placed.horizontal);
                options.previous_vertical = Some(placed.vertical);
                black_box(placed);
            }
        });
    });

    group.bench_function("explicit_matched_width", |b| {
        let options = PlacementOptions {
            horizontal: HorizontalPreference::Center,
            vertical: VerticalPreference::Above,
            match_trigger_width: true,
            ..Default::default()
        };
        b.iter(|| {
            for (trigger, floating) in &inputs {
                black_box(calculate_position(*trigger, *floating, viewport, &options));
            }
        });
    });

    group.bench_function("in_place", |b| {
        let options = PlacementOptions {
            vertical: VerticalPreference::Above,
            ..Default::default()
        };
        b.iter(|| {
            for (trigger, floating) in &inputs {
                black_box(calculate_in_place_position(
                    *trigger, *floating, viewport, &options,
                ));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_calculate);
criterion_main!(benches);
