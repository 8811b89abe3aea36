use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::Quadtree;
use super::{LayoutParams, SimLink, SimNode};

const BARNES_HUT_THETA: f32 = 0.9;
const MIN_CHARGE_DISTANCE_SQ: f32 = 1.0;

struct CollisionPass<'a> {
    projected: &'a [Vec2],
    radii: &'a [f32],
    max_pair_distance_sq: f32,
}

// Deterministic stand-in for a random nudge when two points coincide.
fn jiggle(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin()) * 1e-4
}

pub(super) fn apply_link_force(
    nodes: &mut [SimNode],
    links: &[SimLink],
    degrees: &[f32],
    params: LayoutParams,
    alpha: f32,
) {
    for (link_index, link) in links.iter().enumerate() {
        let source_projected = nodes[link.source].pos + nodes[link.source].vel;
        let target_projected = nodes[link.target].pos + nodes[link.target].vel;

        let mut delta = target_projected - source_projected;
        if delta.length_sq() <= f32::EPSILON {
            delta = jiggle(link_index, link.target);
        }

        let distance = delta.length();
        let rest = params.link_base_distance + link.strength * params.link_strength_scale;
        let correction = delta * ((distance - rest) / distance * alpha * link.strength);

        // Endpoints with fewer links absorb more of the correction, so the
        // hub of a star stays put while its leaves settle around it.
        let bias = degrees[link.source] / (degrees[link.source] + degrees[link.target]);
        nodes[link.target].vel -= correction * bias;
        nodes[link.source].vel += correction * (1.0 - bias);
    }
}

pub(super) fn apply_charge_force(
    nodes: &mut [SimNode],
    positions: &[Vec2],
    charge_strength: f32,
    alpha: f32,
) {
    let Some(tree) = Quadtree::build(positions) else {
        return;
    };

    for index in 0..nodes.len() {
        let mut force = Vec2::ZERO;
        accumulate_charge(
            &tree,
            Quadtree::ROOT,
            index,
            positions,
            charge_strength * alpha,
            &mut force,
        );
        nodes[index].vel += force;
    }
}

fn accumulate_charge(
    tree: &Quadtree,
    cell_index: usize,
    index: usize,
    positions: &[Vec2],
    scaled_strength: f32,
    force: &mut Vec2,
) {
    let cell = tree.cell(cell_index);
    if cell.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.points {
            if other == index {
                continue;
            }

            let mut delta = positions[other] - point;
            if delta.length_sq() <= f32::EPSILON {
                delta = jiggle(index, other);
            }

            let distance_sq = delta.length_sq().max(MIN_CHARGE_DISTANCE_SQ);
            *force += delta * (scaled_strength / distance_sq);
        }
        return;
    }

    let delta = cell.center_of_mass - point;
    let distance_sq = delta.length_sq().max(MIN_CHARGE_DISTANCE_SQ);
    let distance = distance_sq.sqrt();
    if !cell.bounds.contains(point) && (cell.bounds.side() / distance) < BARNES_HUT_THETA {
        *force += delta * (scaled_strength * cell.mass / distance_sq);
        return;
    }

    for child in cell.children.iter().flatten() {
        accumulate_charge(tree, *child, index, positions, scaled_strength, force);
    }
}

pub(super) fn apply_center_force(nodes: &mut [SimNode], center: Vec2, strength: f32) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.pos;
    }
    centroid /= nodes.len() as f32;

    let shift = (centroid - center) * strength;
    for node in nodes.iter_mut() {
        node.pos -= shift;
    }
}

pub(super) fn apply_collision_force(nodes: &mut [SimNode], projected: &[Vec2], radii: &[f32]) {
    let Some(tree) = Quadtree::build(projected) else {
        return;
    };

    let max_radius = radii.iter().copied().fold(0.0_f32, f32::max);
    let max_pair_distance = max_radius * 2.0;
    let pass = CollisionPass {
        projected,
        radii,
        max_pair_distance_sq: max_pair_distance * max_pair_distance,
    };

    collide_cells(&tree, Quadtree::ROOT, Quadtree::ROOT, true, &pass, nodes);
}

fn collide_cells(
    tree: &Quadtree,
    a: usize,
    b: usize,
    same_cell: bool,
    pass: &CollisionPass,
    nodes: &mut [SimNode],
) {
    let cell_a = tree.cell(a);
    let cell_b = tree.cell(b);
    if cell_a.bounds.gap_sq(cell_b.bounds) > pass.max_pair_distance_sq {
        return;
    }

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for i in 0..cell_a.points.len() {
                for j in (i + 1)..cell_a.points.len() {
                    resolve_overlap(cell_a.points[i], cell_a.points[j], pass, nodes);
                }
            }
        } else {
            for &i in &cell_a.points {
                for &j in &cell_b.points {
                    resolve_overlap(i, j, pass, nodes);
                }
            }
        }
        return;
    }

    if same_cell {
        for first in 0..4 {
            let Some(child_a) = cell_a.children[first] else {
                continue;
            };

            collide_cells(tree, child_a, child_a, true, pass, nodes);

            for second in (first + 1)..4 {
                let Some(child_b) = cell_a.children[second] else {
                    continue;
                };
                collide_cells(tree, child_a, child_b, false, pass, nodes);
            }
        }
        return;
    }

    let split_a = if cell_a.is_leaf() {
        false
    } else if cell_b.is_leaf() {
        true
    } else {
        cell_a.bounds.half_extent >= cell_b.bounds.half_extent
    };

    if split_a {
        for child in cell_a.children.iter().flatten() {
            collide_cells(tree, *child, b, false, pass, nodes);
        }
    } else {
        for child in cell_b.children.iter().flatten() {
            collide_cells(tree, a, *child, false, pass, nodes);
        }
    }
}

fn resolve_overlap(i: usize, j: usize, pass: &CollisionPass, nodes: &mut [SimNode]) {
    let combined = pass.radii[i] + pass.radii[j];
    let mut delta = pass.projected[i] - pass.projected[j];
    let mut distance_sq = delta.length_sq();
    if distance_sq >= combined * combined {
        return;
    }

    if distance_sq <= f32::EPSILON {
        delta = jiggle(i, j);
        distance_sq = delta.length_sq();
    }

    let distance = distance_sq.sqrt();
    let push = delta * ((combined - distance) / distance);

    // The larger circle moves less, split by squared radius.
    let ratio =
        (pass.radii[j] * pass.radii[j]) / (pass.radii[i] * pass.radii[i] + pass.radii[j] * pass.radii[j]);
    nodes[i].vel += push * ratio;
    nodes[j].vel -= push * (1.0 - ratio);
}
