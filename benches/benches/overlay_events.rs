// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Rect;
use understory_box_tree::NodeId;
use understory_overlay::adapters::box_tree::SceneSurface;
use understory_overlay::{
    EnvironmentEvent, Overlay, OverlayConfig, OverlayRegistry, PointerInput, SharedRegistry,
};

/// A chain of `depth` overlays, each triggered from inside the previous panel.
fn nested_chain(depth: usize) -> (SceneSurface, SharedRegistry<NodeId>, Vec<Overlay<NodeId>>, NodeId) {
    let mut surface = SceneSurface::new(1280.0, 800.0);
    let registry = OverlayRegistry::new_shared();
    let mut overlays = Vec::with_capacity(depth);
    let mut parent = surface.document();
    let mut deepest = parent;
    for i in 0..depth {
        let x = 10.0 + i as f64 * 20.0;
        let trigger = surface.insert(parent, Rect::new(x, 10.0, x + 80.0, 40.0));
        let mut overlay = Overlay::new(
            &mut surface,
            registry.clone(),
            trigger,
            OverlayConfig::default(),
        )
        .expect("fresh ids never collide");
        let panel = surface.insert(overlay.outlet(), Rect::new(0.0, 0.0, 200.0, 300.0));
        overlay.set_content(&mut surface, Some(panel));
        overlay.open(&mut surface);
        overlays.push(overlay);
        parent = panel;
        deepest = panel;
    }
    (surface, registry, overlays, deepest)
}

fn bench_dismissal(c: &mut Criterion) {
    let mut group = c.benchmark_group("dismissal");
    for depth in [1_usize, 8, 32] {
        group.bench_function(format!("nested_inside_depth_{depth}"), |b| {
            let (mut surface, _registry, mut overlays, deepest) = nested_chain(depth);
            b.iter(|| {
                let root = &mut overlays[0];
                black_box(root.handle_pointer(&mut surface, PointerInput::pointer_down(deepest)));
            });
        });
    }
    group.finish();
}

fn bench_reposition(c: &mut Criterion) {
    c.bench_function("scroll_reposition_open_and_close", |b| {
        b.iter_batched(
            || nested_chain(1),
            |(mut surface, _registry, mut overlays, _)| {
                let overlay = &mut overlays[0];
                for step in 0..64 {
                    surface.scroll_to(0.0, f64::from(step) * 4.0);
                    black_box(overlay.handle_environment(&mut surface, &EnvironmentEvent::Scroll));
                }
                overlay.close(&mut surface, true);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_dismissal, bench_reposition);
criterion_main!(benches);
