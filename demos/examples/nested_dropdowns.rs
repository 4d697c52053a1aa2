// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Nested dropdowns and an asynchronous close gate.
//!
//! A "File" menu holds a "Recent" submenu. Pressing inside the submenu keeps
//! both open; pressing elsewhere closes the submenu at once and asks the outer
//! menu's gate, which answers later through a channel.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example nested_dropdowns`

use futures::channel::oneshot;
use futures::future::poll_fn;
use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use understory_overlay::adapters::box_tree::SceneSurface;
use understory_overlay::{
    Gate, GateError, Overlay, OverlayConfig, OverlayId, OverlayRegistry, PointerInput, Transition,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut page = SceneSurface::new(1024.0, 768.0);
    let registry = OverlayRegistry::new_shared();
    let body = page.document();

    let file_trigger = page.insert(body, Rect::new(10.0, 10.0, 80.0, 40.0));
    let mut file = Overlay::new(
        &mut page,
        registry.clone(),
        file_trigger,
        OverlayConfig {
            id: Some(OverlayId::new("file")),
            ..Default::default()
        },
    )
    .expect("id is unique on this page");
    let file_panel = page.insert(file.outlet(), Rect::new(10.0, 40.0, 210.0, 240.0));
    file.set_content(&mut page, Some(file_panel));

    let recent_trigger = page.insert(file_panel, Rect::new(10.0, 80.0, 210.0, 110.0));
    let mut recent = Overlay::new(
        &mut page,
        registry.clone(),
        recent_trigger,
        OverlayConfig {
            id: Some(OverlayId::new("recent")),
            ..Default::default()
        },
    )
    .expect("id is unique on this page");
    let recent_panel = page.insert(recent.outlet(), Rect::new(210.0, 80.0, 410.0, 200.0));
    let recent_item = page.insert(recent_panel, Rect::new(210.0, 80.0, 410.0, 100.0));
    recent.set_content(&mut page, Some(recent_panel));

    // The outer menu asks before closing; the answer arrives over a channel.
    let (answer_tx, answer_rx) = oneshot::channel::<bool>();
    let mut answer = Some(answer_rx);
    file.set_before_close(Some(Gate::deferred(move || {
        let rx = answer.take();
        async move {
            match rx {
                Some(rx) => Ok::<bool, GateError>(rx.await?),
                None => Ok(true),
            }
        }
    })));

    file.trigger_clicked(&mut page);
    recent.trigger_clicked(&mut page);
    tracing::info!(file = file.is_open(), recent = recent.is_open(), "menus open");

    let inside = PointerInput::pointer_down(recent_item);
    let file_outcome = file.handle_pointer(&mut page, inside);
    let recent_outcome = recent.handle_pointer(&mut page, inside);
    println!("press in submenu: file={file_outcome:?} recent={recent_outcome:?}");

    let elsewhere = page.insert(body, Rect::new(600.0, 600.0, 700.0, 700.0));
    let outside = PointerInput::pointer_down(elsewhere);
    let recent_outcome = recent.handle_pointer(&mut page, outside);
    let file_outcome = file.handle_pointer(&mut page, outside);
    println!("press outside: file={file_outcome:?} recent={recent_outcome:?}");
    assert_eq!(file_outcome, Transition::Pending);

    answer_tx.send(true).expect("gate is still waiting");
    let resolved = futures::executor::block_on(poll_fn(|cx| file.poll_gate(cx, &mut page)));
    println!("gate answered: {resolved:?}");

    recent.destroy(&mut page);
    file.destroy(&mut page);
    println!("registered overlays left: {}", registry.borrow().len());
}
