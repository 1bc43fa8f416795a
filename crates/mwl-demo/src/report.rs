use std::fmt::Write as _;

use mwl_core::geometry::{Axis, Rect};
use mwl_layout::{
    Arrangement, CommittedSize, Composer, DividerDragEffect, GridStyle, LayoutNode, PlacedDivider,
    PlacedKind, PlacedRegion,
};
use serde::Serialize;

use crate::script::DragRecord;

/// Grid template and committed sizes of one container.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerReport {
    pub key: String,
    pub axis: Axis,
    pub split: bool,
    pub style: GridStyle,
    pub sizes: Vec<CommittedSize>,
}

/// Everything `mwl arrange` prints.
#[derive(Debug, Clone, Serialize)]
pub struct ArrangeReport {
    pub viewport: Rect,
    pub regions: Vec<PlacedRegion>,
    pub dividers: Vec<PlacedDivider>,
    pub containers: Vec<ContainerReport>,
    pub drags: Vec<DragRecord>,
}

impl ArrangeReport {
    #[must_use]
    pub fn collect(
        composer: &Composer,
        root: &LayoutNode,
        viewport: Rect,
        arrangement: Arrangement,
        drags: Vec<DragRecord>,
    ) -> Self {
        let mut containers = Vec::new();
        root.visit(&mut |node| {
            let LayoutNode::Container {
                key, axis, split, ..
            } = node
            else {
                return;
            };
            let Some(style) = composer.grid_style(key, *axis) else {
                return;
            };
            let sizes = match composer.split(key) {
                Some(state) => state.committed_sizes(),
                None => composer
                    .tracks(key)
                    .map(|tracks| tracks.committed_sizes())
                    .unwrap_or_default(),
            };
            containers.push(ContainerReport {
                key: key.clone(),
                axis: *axis,
                split: *split,
                style,
                sizes,
            });
        });
        Self {
            viewport,
            regions: arrangement.regions,
            dividers: arrangement.dividers,
            containers,
            drags,
        }
    }

    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "viewport {}x{}", self.viewport.width, self.viewport.height);

        let key_width = self
            .regions
            .iter()
            .map(|r| r.key.len())
            .chain(self.dividers.iter().map(|d| d.key.len()))
            .max()
            .unwrap_or(0);

        let _ = writeln!(out, "\nregions:");
        for region in &self.regions {
            let kind = match region.kind {
                PlacedKind::Leaf => "leaf",
                PlacedKind::Spacer => "spacer",
                PlacedKind::Container => "container",
            };
            let _ = writeln!(
                out,
                "  {:<key_width$}  {:<9}  {}",
                region.key,
                kind,
                format_rect(region.rect)
            );
        }

        if !self.dividers.is_empty() {
            let _ = writeln!(out, "\ndividers:");
            for divider in &self.dividers {
                let _ = writeln!(
                    out,
                    "  {:<key_width$}  {}#{}  {}{}",
                    divider.key,
                    divider.container,
                    divider.slot,
                    format_rect(divider.rect),
                    if divider.interactive { "" } else { "  (fixed)" }
                );
            }
        }

        let _ = writeln!(out, "\ncontainers:");
        for container in &self.containers {
            let _ = writeln!(out, "  {}  {}", container.key, container.style);
        }

        if !self.drags.is_empty() {
            let _ = writeln!(out, "\ndrags:");
            for drag in &self.drags {
                let outcome = match drag.last().map(|t| t.effect) {
                    Some(DividerDragEffect::Committed { delta, .. }) => {
                        format!("committed {delta:+}px")
                    }
                    Some(DividerDragEffect::StartRejected { .. }) => "rejected".to_owned(),
                    _ => "ignored".to_owned(),
                };
                let _ = writeln!(out, "  {}  {}  {}", drag.script, drag.divider, outcome);
            }
        }
        out
    }
}

fn format_rect(rect: Rect) -> String {
    format!("{},{} {}x{}", rect.x, rect.y, rect.width, rect.height)
}
