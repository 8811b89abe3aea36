use eframe::egui::{self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Stroke, Ui, Vec2, vec2};

use crate::knowledge::{KnowledgeGraph, KnowledgeNode, build_graph};
use crate::sim::Simulation;
use crate::util::truncate_label;

use super::render_utils::{
    FOCAL_FILL, difficulty_color, difficulty_stroke_width, draw_arrowhead, draw_background,
    link_color, node_fill, with_alpha, world_to_screen,
};
use super::{GraphView, ViewModel};

const RESET_REHEAT_ALPHA: f32 = 0.3;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let Some(focal_id) = self.requested_focal.clone() else {
            return;
        };

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_graph_zoom(ui, rect, &response);

        if let Some(factor) = self.pending_zoom.take() {
            self.zoom_about(rect, rect.center(), factor);
        }
        let reset_requested = std::mem::take(&mut self.pending_reset);
        if reset_requested {
            self.pan = Vec2::ZERO;
            self.zoom = 1.0;
        }

        let needs_rebuild = self
            .graph_view
            .as_ref()
            .is_none_or(|view| view.focal_id != focal_id);
        if needs_rebuild {
            self.rebuild_graph_view(&focal_id, rect);
        }

        let Some(view) = self.graph_view.as_mut() else {
            return;
        };

        if (rect.size() - view.viewport).length() > 0.5 {
            view.viewport = rect.size();
            view.sim.set_viewport(rect.width(), rect.height());
        }
        if reset_requested {
            view.sim.reheat(RESET_REHEAT_ALPHA);
        }

        if view.graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Nothing to show for this post.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            self.hovered = None;
            return;
        }

        let zoom = self.zoom;
        let compact = view.sim.is_compact();
        let node_count = view.sim.node_count();

        // Hit testing runs against the pre-step positions; the draw pass
        // below recomputes screen space after the simulation advances.
        let mut screen_positions = Vec::with_capacity(node_count);
        let mut screen_radii = Vec::with_capacity(node_count);
        for index in 0..node_count {
            screen_positions.push(world_to_screen(rect, self.pan, zoom, view.sim.position(index)));
            screen_radii.push(view.sim.display_radius(index) * zoom);
        }

        let hovered = Self::hovered_index(ui, &screen_positions, &screen_radii);
        self.hovered = hovered;

        Self::handle_node_drag(
            rect,
            &response,
            self.pan,
            zoom,
            &mut self.dragged,
            hovered,
            &mut view.sim,
        );

        let node_drag_active = self.dragged.is_some();
        if (response.dragged_by(egui::PointerButton::Primary) && !node_drag_active)
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }

        if hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let mut clicked_node = None;
        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
        {
            clicked_node = Some(view.graph.nodes[index].id.clone());
        }

        let frame_delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        let moving = view.sim.step(frame_delta_seconds);
        if moving || response.dragged() {
            ui.ctx().request_repaint();
        }

        let pan = self.pan;
        screen_positions.clear();
        screen_radii.clear();
        for index in 0..node_count {
            screen_positions.push(world_to_screen(rect, pan, zoom, view.sim.position(index)));
            screen_radii.push(view.sim.display_radius(index) * zoom);
        }

        for (link_index, link) in view.graph.links.iter().enumerate() {
            let (source_world, target_world) = view.sim.segment(link_index);
            let start = world_to_screen(rect, pan, zoom, source_world);
            let end = world_to_screen(rect, pan, zoom, target_world);

            let alpha = match hovered {
                Some(h) => {
                    let hovered_id = view.graph.nodes[h].id.as_str();
                    if link.source == hovered_id || link.target == hovered_id {
                        255
                    } else {
                        50
                    }
                }
                None => 153,
            };
            let color = with_alpha(link_color(link.relationship), alpha);
            painter.line_segment([start, end], Stroke::new(link.strength * 3.0 * zoom, color));

            let span = end - start;
            if span.length_sq() > f32::EPSILON {
                let target_index = view.index_by_id[&link.target];
                let tip = end - span.normalized() * (screen_radii[target_index] + 3.0 * zoom);
                draw_arrowhead(&painter, start, tip, (6.0 * zoom).clamp(3.0, 14.0), color);
            }
        }

        let label_size = if compact { 10.0 } else { 12.0 };
        let label_font = FontId::proportional((label_size * zoom).clamp(5.0, 26.0));
        let label_max_chars = if compact { 15 } else { 20 };

        for (index, node) in view.graph.nodes.iter().enumerate() {
            let position = screen_positions[index];
            let radius = screen_radii[index];
            let is_focal = node.id == view.focal_id;

            let alpha = match hovered {
                Some(h) if h == index => 255,
                Some(h) => {
                    let hovered_id = view.graph.nodes[h].id.as_str();
                    if is_connected(&view.graph, hovered_id, &node.id) {
                        204
                    } else {
                        77
                    }
                }
                None if is_focal => 255,
                None => 204,
            };

            painter.circle_filled(position, radius, with_alpha(node_fill(node.kind, is_focal), alpha));
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(
                    difficulty_stroke_width(node.difficulty_level) * zoom.clamp(0.5, 2.0),
                    with_alpha(Color32::WHITE, alpha),
                ),
            );

            painter.text(
                position + vec2(0.0, radius + 5.0 * zoom),
                Align2::CENTER_TOP,
                truncate_label(&node.title, label_max_chars),
                label_font.clone(),
                with_alpha(Color32::from_gray(225), alpha.max(140)),
            );
        }

        if self.show_legend {
            draw_legend(&painter, rect);
        }

        if let Some(index) = hovered
            && let Some(pointer) = ui.input(|input| input.pointer.hover_pos())
        {
            draw_node_tooltip(&painter, rect, pointer, &view.graph.nodes[index]);
        }

        if let Some(id) = clicked_node {
            self.focus_node(&id);
        }
    }

    fn rebuild_graph_view(&mut self, focal_id: &str, rect: Rect) {
        let graph = build_graph(self.store.posts(), focal_id);
        let index_by_id = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();
        let sim = Simulation::new(&graph, rect.width(), rect.height());

        self.graph_view = Some(GraphView {
            focal_id: focal_id.to_string(),
            graph,
            index_by_id,
            sim,
            viewport: rect.size(),
        });
        self.hovered = None;
        self.dragged = None;
    }

    // Concept placeholders have no backing post and are not navigable.
    fn focus_node(&mut self, id: &str) {
        let Some(post) = self.store.find(id) else {
            return;
        };
        if self.requested_focal.as_deref() == Some(id) {
            return;
        }

        let title = post.title.clone();
        self.breadcrumb.push(title);
        self.requested_focal = Some(id.to_string());
    }
}

fn is_connected(graph: &KnowledgeGraph, a: &str, b: &str) -> bool {
    graph.links.iter().any(|link| {
        (link.source == a && link.target == b) || (link.source == b && link.target == a)
    })
}

fn draw_legend(painter: &Painter, rect: Rect) {
    const ENTRIES: [(&str, Color32); 5] = [
        ("Selected", FOCAL_FILL),
        ("Prerequisite", Color32::from_rgb(16, 185, 129)),
        ("Follow-up", Color32::from_rgb(239, 68, 68)),
        ("Related post", Color32::from_rgb(107, 114, 128)),
        ("Concept", Color32::from_rgb(139, 92, 246)),
    ];

    const ROW_HEIGHT: f32 = 18.0;
    let width = 136.0;
    let height = 34.0 + ENTRIES.len() as f32 * ROW_HEIGHT;
    let min = rect.right_top() + vec2(-(width + 12.0), 12.0);
    let legend_rect = Rect::from_min_size(min, vec2(width, height));

    painter.rect_filled(legend_rect, 6.0, Color32::from_rgba_unmultiplied(24, 29, 36, 235));
    painter.rect_stroke(
        legend_rect,
        6.0,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(90, 100, 112, 200)),
        egui::StrokeKind::Inside,
    );
    painter.text(
        min + vec2(10.0, 8.0),
        Align2::LEFT_TOP,
        "Legend",
        FontId::proportional(13.0),
        Color32::from_gray(235),
    );

    for (index, (label, color)) in ENTRIES.iter().enumerate() {
        let y = min.y + 34.0 + (index as f32 + 0.5) * ROW_HEIGHT;
        painter.circle_filled(Pos2::new(min.x + 16.0, y), 5.0, *color);
        painter.text(
            Pos2::new(min.x + 28.0, y),
            Align2::LEFT_CENTER,
            *label,
            FontId::proportional(12.0),
            Color32::from_gray(220),
        );
    }
}

fn draw_node_tooltip(painter: &Painter, rect: Rect, pointer: Pos2, node: &KnowledgeNode) {
    const WRAP_WIDTH: f32 = 260.0;
    const PADDING: f32 = 10.0;

    let title = painter.layout(
        node.title.clone(),
        FontId::proportional(14.0),
        Color32::from_gray(240),
        WRAP_WIDTH,
    );
    let snippet = (!node.snippet.is_empty()).then(|| {
        painter.layout(
            truncate_label(&node.snippet, 160),
            FontId::proportional(12.0),
            Color32::from_gray(205),
            WRAP_WIDTH,
        )
    });
    let meta = painter.layout_no_wrap(
        format!("{}  |  {}", node.difficulty_level.label(), node.kind.label()),
        FontId::proportional(11.0),
        difficulty_color(node.difficulty_level),
    );

    let mut content_width = title.size().x.max(meta.size().x);
    let mut content_height = title.size().y + 6.0 + meta.size().y;
    if let Some(snippet) = &snippet {
        content_width = content_width.max(snippet.size().x);
        content_height += snippet.size().y + 6.0;
    }

    let box_size = vec2(content_width + PADDING * 2.0, content_height + PADDING * 2.0);
    let mut min = pointer + vec2(14.0, 14.0);
    if min.x + box_size.x > rect.right() - 6.0 {
        min.x = pointer.x - box_size.x - 14.0;
    }
    if min.y + box_size.y > rect.bottom() - 6.0 {
        min.y = pointer.y - box_size.y - 14.0;
    }

    let tooltip_rect = Rect::from_min_size(min, box_size);
    painter.rect_filled(tooltip_rect, 6.0, Color32::from_rgba_unmultiplied(24, 29, 36, 242));
    painter.rect_stroke(
        tooltip_rect,
        6.0,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(90, 100, 112, 200)),
        egui::StrokeKind::Inside,
    );

    let mut cursor = min + vec2(PADDING, PADDING);
    let title_height = title.size().y;
    painter.galley(cursor, title, Color32::from_gray(240));
    cursor.y += title_height + 6.0;

    if let Some(snippet) = snippet {
        let snippet_height = snippet.size().y;
        painter.galley(cursor, snippet, Color32::from_gray(205));
        cursor.y += snippet_height + 6.0;
    }

    painter.galley(cursor, meta, Color32::from_gray(205));
}
