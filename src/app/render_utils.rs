use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, vec2};

use crate::content::DifficultyLevel;
use crate::knowledge::{NodeKind, Relationship};

pub(super) const FOCAL_FILL: Color32 = Color32::from_rgb(59, 130, 246);

pub(super) fn node_fill(kind: NodeKind, is_focal: bool) -> Color32 {
    if is_focal {
        return FOCAL_FILL;
    }

    match kind {
        NodeKind::Prerequisite => Color32::from_rgb(16, 185, 129),
        NodeKind::FollowUp => Color32::from_rgb(239, 68, 68),
        NodeKind::Concept => Color32::from_rgb(139, 92, 246),
        NodeKind::Post => Color32::from_rgb(107, 114, 128),
    }
}

pub(super) fn link_color(relationship: Relationship) -> Color32 {
    match relationship {
        Relationship::Prerequisite => Color32::from_rgb(59, 130, 246),
        Relationship::Related => Color32::from_rgb(16, 185, 129),
        Relationship::FollowUp => Color32::from_rgb(239, 68, 68),
        Relationship::Similar => Color32::from_rgb(156, 163, 175),
    }
}

pub(super) fn difficulty_stroke_width(level: DifficultyLevel) -> f32 {
    match level {
        DifficultyLevel::Beginner => 2.0,
        DifficultyLevel::Intermediate => 3.0,
        DifficultyLevel::Advanced => 4.0,
    }
}

pub(super) fn difficulty_color(level: DifficultyLevel) -> Color32 {
    match level {
        DifficultyLevel::Beginner => Color32::from_rgb(110, 198, 122),
        DifficultyLevel::Intermediate => Color32::from_rgb(233, 196, 106),
        DifficultyLevel::Advanced => Color32::from_rgb(235, 112, 101),
    }
}

pub(super) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (20.0 * zoom.clamp(0.6, 2.2)).max(10.0);
    let origin = rect.left_top() + pan;
    let dot = Color32::from_rgba_unmultiplied(72, 82, 94, 90);

    let mut y = (origin.y - rect.top()).rem_euclid(step) + rect.top();
    while y < rect.bottom() {
        let mut x = (origin.x - rect.left()).rem_euclid(step) + rect.left();
        while x < rect.right() {
            painter.circle_filled(Pos2::new(x, y), 1.0, dot);
            x += step;
        }
        y += step;
    }
}

pub(super) fn draw_arrowhead(painter: &Painter, from: Pos2, to: Pos2, size: f32, color: Color32) {
    let direction = to - from;
    if direction.length_sq() <= f32::EPSILON {
        return;
    }

    let direction = direction.normalized();
    let normal = vec2(-direction.y, direction.x);
    let base = to - direction * size;

    painter.add(eframe::egui::Shape::convex_polygon(
        vec![
            to,
            base + normal * (size * 0.5),
            base - normal * (size * 0.5),
        ],
        color,
        Stroke::NONE,
    ));
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.left_top() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.left_top() - pan) / zoom
}
