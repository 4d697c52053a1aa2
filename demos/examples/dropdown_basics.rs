// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dropdown basics.
//!
//! Open a dropdown near the right edge of the page, follow a resize, let the
//! show transition finish, and dismiss it with a press elsewhere.
//!
//! Run:
//! - `RUST_LOG=understory_overlay=trace cargo run -p understory_demos --example dropdown_basics`

use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_overlay::adapters::box_tree::SceneSurface;
use understory_overlay::{
    EnvironmentEvent, Overlay, OverlayConfig, OverlayEvent, OverlayId, OverlayRegistry,
    PointerInput, Transition,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut page = SceneSurface::new(600.0, 800.0);
    let registry = OverlayRegistry::new_shared();
    let trigger = page.insert(page.document(), Rect::new(500.0, 100.0, 600.0, 130.0));

    let mut menu = Overlay::new(
        &mut page,
        registry.clone(),
        trigger,
        OverlayConfig {
            id: Some(OverlayId::new("account-menu")),
            ..Default::default()
        },
    )
    .expect("id is unique on this page");
    let panel = page.insert(menu.outlet(), Rect::new(0.0, 0.0, 300.0, 150.0));
    menu.set_content(&mut page, Some(panel));
    println!("content id: {}", menu.content_id());

    assert_eq!(menu.trigger_clicked(&mut page), Transition::Opened);
    println!("first placement: {:?}", menu.current_placement());
    println!("style written before paint: {:?}", page.applied_style(panel));

    // The viewport shrinks until the panel no longer fits below the trigger.
    page.set_viewport_size(600.0, 250.0);
    let changes = menu.handle_environment(&mut page, &EnvironmentEvent::Resize);
    println!("after resize: {changes:?}");

    for done in menu.frame(&mut page) {
        println!("transition finished: {done:?}");
    }
    println!("panel classes: {:?}", page.classes(panel));

    // Press on an empty spot of the page.
    let target = page
        .element_at(Point::new(50.0, 600.0))
        .expect("the document covers the viewport");
    let outcome = menu.handle_pointer(&mut page, PointerInput::pointer_down(target));
    println!("press outside: {outcome:?}");

    for event in menu.take_events() {
        match event {
            OverlayEvent::Opened => println!("event: opened"),
            OverlayEvent::Closed => println!("event: closed"),
            OverlayEvent::PlacementChanged(p) => println!("event: placed {p:?}"),
        }
    }

    // The exit copy is removed once its (absent) animation completes.
    println!("exit: {:?}", menu.frame(&mut page));
    menu.destroy(&mut page);
}
