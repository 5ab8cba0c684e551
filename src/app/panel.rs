use std::sync::Arc;

use eframe::egui::{
    self, Align, Color32, Context, CornerRadius, Layout, Painter, Pos2, Rect, Sense, Stroke, Ui,
};

use crate::scaffold::{
    AssemblyModel, ChainBuilder, ChainTree, DEFAULT_BUDGET, LatticeGraph, Linkage, MarkerState,
    Phase, SlotPos, layout_tree, linkage_records, records_json,
};

use super::ViewModel;
use super::render_utils::{
    MARKER_RADIUS, PanelTransform, SLOT_RADIUS, arrowhead, perpendicular_offset,
};

impl ViewModel {
    pub(in crate::app) fn new(tree: Option<ChainTree>) -> Self {
        let lattice = Arc::new(LatticeGraph::pentamer());
        let builder = ChainBuilder::new(Arc::clone(&lattice), DEFAULT_BUDGET);
        let simulated = tree.map(|tree| layout_tree(&tree, &lattice));
        Self {
            lattice,
            builder,
            simulated,
            export_notice: None,
        }
    }

    pub(in crate::app) fn replace_tree(&mut self, tree: ChainTree) {
        self.simulated = Some(layout_tree(&tree, &self.lattice));
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        tree_path: Option<&str>,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("ubi-scaffold");
                    ui.separator();
                    ui.label(format!("slots: {}", self.lattice.len()));
                    ui.label(format!("edges: {}", self.lattice.edges().len()));
                    ui.label(format!("budget: {}", self.builder.budget()));
                    if let Some(path) = tree_path {
                        ui.label(format!("tree: {path}"));
                        let reload_button =
                            ui.add_enabled(!is_loading, egui::Button::new("Reload tree"));
                        if reload_button.clicked() {
                            *reload_requested = true;
                        }
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.phase_text());
                    });
                });
            });

        egui::SidePanel::right("assembly")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_assembly_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.simulated.is_some() {
                ui.columns(2, |columns| {
                    columns[0].label("Interactive build");
                    self.interactive_panel(&mut columns[0]);
                    columns[1].label("Planned assembly");
                    self.frozen_panel(&mut columns[1]);
                });
            } else {
                ui.label("Interactive build");
                self.interactive_panel(ui);
            }
        });
    }

    fn phase_text(&self) -> String {
        let phase = match self.builder.phase() {
            Phase::Idle => "idle",
            Phase::Building => "building",
            Phase::Full => "full",
        };
        format!("{phase} ({} units left)", self.builder.remaining())
    }

    fn interactive_panel(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click());
        let transform = PanelTransform::fit(rect);

        if response.clicked()
            && let Some(pointer) = response.interact_pointer_pos()
            && let Some(slot) = self.hit_slot(transform, pointer)
            && self.builder.select(slot)
        {
            self.export_notice = None;
        }

        let model = self.builder.model();
        draw_scaffold(&ui.painter_at(rect), rect, transform, &self.lattice, &model);
    }

    fn frozen_panel(&self, ui: &mut Ui) {
        let Some(model) = &self.simulated else {
            return;
        };
        let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
        let transform = PanelTransform::fit(rect);
        draw_scaffold(&ui.painter_at(rect), rect, transform, &self.lattice, model);
    }

    fn hit_slot(&self, transform: PanelTransform, pointer: Pos2) -> Option<usize> {
        let local = transform.to_lattice(pointer);
        (0..self.lattice.len()).find(|&id| {
            let pos = self.lattice.pos(id);
            let dx = pos.x - local.x;
            let dy = pos.y - local.y;
            (dx * dx + dy * dy).sqrt() <= SLOT_RADIUS
        })
    }

    fn draw_assembly_panel(&mut self, ui: &mut Ui) {
        ui.heading("Assembly");
        ui.separator();
        ui.label(format!(
            "units placed: {} / {}",
            self.builder.state().total,
            self.builder.budget()
        ));
        if ui.button("Reset build").clicked() {
            self.builder.reset();
            self.export_notice = None;
        }

        ui.separator();
        ui.label("Linkages");
        let records = linkage_records(&self.builder.state().arrows);
        if records.is_empty() {
            ui.weak("none yet; click a slot above an activated one");
        }
        for record in &records {
            ui.monospace(format!(
                "{} -> {} ({})",
                record.from, record.to, record.linkage
            ));
        }
        if ui.button("Copy as JSON").clicked() {
            match records_json(&self.builder.state().arrows) {
                Ok(json) => {
                    ui.ctx().copy_text(json);
                    self.export_notice = Some("copied to clipboard".to_owned());
                }
                Err(error) => self.export_notice = Some(format!("{error:#}")),
            }
        }
        if let Some(notice) = &self.export_notice {
            ui.weak(notice.as_str());
        }

        if let Some(model) = &self.simulated {
            ui.separator();
            ui.label("Planned assembly");
            ui.label(format!("units: {}", model.total_activation()));
            ui.label(format!("markers: {}", model.markers.len()));
            for record in linkage_records(&model.arrows) {
                ui.monospace(format!(
                    "{} -> {} ({})",
                    record.from, record.to, record.linkage
                ));
            }
        }
    }
}

fn draw_scaffold(
    painter: &Painter,
    rect: Rect,
    transform: PanelTransform,
    lattice: &LatticeGraph,
    model: &AssemblyModel,
) {
    painter.rect_filled(rect, CornerRadius::same(12), Color32::from_rgb(16, 16, 16));

    let edge_stroke = Stroke::new(2.0 * transform.scale, Color32::from_rgb(170, 170, 170));
    for &(a, b) in lattice.edges() {
        painter.line_segment(
            [
                transform.to_screen(lattice.pos(a)),
                transform.to_screen(lattice.pos(b)),
            ],
            edge_stroke,
        );
    }

    for arrow in &model.arrows {
        let (color, side) = match arrow.linkage {
            Some(Linkage::K48) => (Color32::from_rgb(255, 0, 0), -1.0),
            Some(Linkage::K63) => (Color32::from_rgb(0, 0, 255), 1.0),
            None => (Color32::from_rgb(128, 128, 128), -1.0),
        };

        let a = transform.to_screen(lattice.pos(arrow.from));
        let b = transform.to_screen(lattice.pos(arrow.to));
        let shift = perpendicular_offset(a, b, side, 5.0 * transform.scale);
        let start = a + shift;
        let end = b + shift;
        painter.line_segment([start, end], Stroke::new(2.0 * transform.scale, color));

        let head = arrowhead(start, end, 10.0 * transform.scale);
        painter.add(egui::Shape::convex_polygon(
            head.to_vec(),
            color,
            Stroke::NONE,
        ));
    }

    for (id, &count) in model.activations.iter().enumerate() {
        let fill = match count {
            0 => Color32::from_rgb(221, 221, 221),
            1 => Color32::from_rgb(255, 153, 153),
            _ => Color32::from_rgb(204, 102, 102),
        };
        let center = transform.to_screen(lattice.pos(id));
        painter.circle_filled(center, SLOT_RADIUS * transform.scale, fill);
        painter.circle_stroke(
            center,
            SLOT_RADIUS * transform.scale,
            Stroke::new(2.0 * transform.scale, Color32::BLACK),
        );
    }

    for marker in &model.markers {
        let color = match marker.state {
            MarkerState::Unprotected => continue,
            MarkerState::Aboc => Color32::from_rgba_unmultiplied(255, 100, 100, 178),
            MarkerState::Smac => Color32::from_rgba_unmultiplied(100, 100, 255, 178),
        };
        let center = transform.to_screen(SlotPos {
            x: marker.x,
            y: marker.y,
        });
        painter.circle_filled(center, MARKER_RADIUS * transform.scale, color);
        painter.circle_stroke(
            center,
            MARKER_RADIUS * transform.scale,
            Stroke::new(transform.scale, Color32::BLACK),
        );
    }
}
