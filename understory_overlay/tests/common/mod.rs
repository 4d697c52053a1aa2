// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared page fixtures for the integration tests.

#![allow(dead_code, reason = "Not every test file uses every fixture.")]

use kurbo::Rect;
use understory_box_tree::NodeId;
use understory_overlay::adapters::box_tree::SceneSurface;
use understory_overlay::{Overlay, OverlayConfig, OverlayId, OverlayRegistry, SharedRegistry};

pub struct Page {
    pub surface: SceneSurface,
    pub registry: SharedRegistry<NodeId>,
}

impl Page {
    pub fn new() -> Self {
        Self {
            surface: SceneSurface::new(600.0, 800.0),
            registry: OverlayRegistry::new_shared(),
        }
    }

    pub fn element(&mut self, parent: NodeId, bounds: Rect) -> NodeId {
        self.surface.insert(parent, bounds)
    }

    pub fn body(&self) -> NodeId {
        self.surface.document()
    }

    /// A trigger under `parent` and an overlay for it.
    pub fn overlay(&mut self, id: &str, parent: NodeId, trigger: Rect) -> Overlay<NodeId> {
        self.overlay_with(parent, trigger, OverlayConfig {
            id: Some(OverlayId::new(id)),
            ..Default::default()
        })
    }

    pub fn overlay_with(
        &mut self,
        parent: NodeId,
        trigger: Rect,
        config: OverlayConfig,
    ) -> Overlay<NodeId> {
        let trigger = self.surface.insert(parent, trigger);
        Overlay::new(&mut self.surface, self.registry.clone(), trigger, config).unwrap()
    }

    /// Mount content of the given size in the outlet.
    pub fn mount(&mut self, overlay: &mut Overlay<NodeId>, width: f64, height: f64) -> NodeId {
        let panel = self
            .surface
            .insert(overlay.outlet(), Rect::new(0.0, 0.0, width, height));
        overlay.set_content(&mut self.surface, Some(panel));
        panel
    }
}
