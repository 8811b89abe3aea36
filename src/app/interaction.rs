use eframe::egui::{self, Pos2, Rect, Ui, Vec2};

use crate::sim::Simulation;

use super::ViewModel;
use super::render_utils::screen_to_world;

const ZOOM_MIN: f32 = 0.1;
const ZOOM_MAX: f32 = 4.0;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom_about(rect, pointer, zoom_factor);
    }

    pub(in crate::app) fn zoom_about(&mut self, rect: Rect, anchor: Pos2, factor: f32) {
        let world_before = screen_to_world(rect, self.pan, self.zoom, anchor);
        self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        self.pan = (anchor - rect.left_top()) - world_before * self.zoom;
    }

    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        screen_positions: &[Pos2],
        screen_radii: &[f32],
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;

        (0..screen_positions.len())
            .filter_map(|index| {
                let distance = screen_positions[index].distance(pointer);
                (distance <= screen_radii[index].max(6.0)).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _distance)| index)
    }

    // Translates pointer gestures into the engine's drag contract: start pins
    // the node to the pointer, move re-pins, end releases it mid-flight.
    pub(in crate::app) fn handle_node_drag(
        rect: Rect,
        response: &egui::Response,
        pan: Vec2,
        zoom: f32,
        dragged: &mut Option<usize>,
        hovered: Option<usize>,
        sim: &mut Simulation,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
            && let Some(pointer) = response.interact_pointer_pos()
        {
            *dragged = Some(index);
            sim.drag_start(index, screen_to_world(rect, pan, zoom, pointer));
        } else if response.dragged_by(egui::PointerButton::Primary)
            && let Some(index) = *dragged
            && let Some(pointer) = response.interact_pointer_pos()
        {
            sim.drag_move(index, screen_to_world(rect, pan, zoom, pointer));
        }

        if response.drag_stopped_by(egui::PointerButton::Primary)
            && let Some(index) = dragged.take()
        {
            sim.drag_end(index);
        }
    }
}
