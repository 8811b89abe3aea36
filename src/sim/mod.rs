mod forces;
mod quadtree;

use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use crate::knowledge::KnowledgeGraph;
use crate::util::stable_pair;

pub const MOBILE_BREAKPOINT: f32 = 768.0;

const ALPHA_INITIAL: f32 = 1.0;
const ALPHA_MIN: f32 = 0.001;
const ALPHA_DECAY_STEPS: f32 = 300.0;
const DRAG_ALPHA_TARGET: f32 = 0.3;
const VELOCITY_DECAY: f32 = 0.4;
const CENTER_STRENGTH: f32 = 1.0;
const FOCAL_WARMUP_SECS: f32 = 1.0;

// The builder always emits the focal node first.
const FOCAL_INDEX: usize = 0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutParams {
    pub link_base_distance: f32,
    pub link_strength_scale: f32,
    pub charge_strength: f32,
    pub collision_radius_scale: f32,
    pub collision_padding: f32,
}

impl LayoutParams {
    pub const REGULAR: Self = Self {
        link_base_distance: 100.0,
        link_strength_scale: 50.0,
        charge_strength: -300.0,
        collision_radius_scale: 1.0,
        collision_padding: 10.0,
    };

    pub const COMPACT: Self = Self {
        link_base_distance: 80.0,
        link_strength_scale: 30.0,
        charge_strength: -200.0,
        collision_radius_scale: 0.8,
        collision_padding: 10.0,
    };

    // Discrete switch, not a continuous scale.
    pub fn for_viewport(width: f32) -> Self {
        if width < MOBILE_BREAKPOINT {
            Self::COMPACT
        } else {
            Self::REGULAR
        }
    }
}

struct SimNode {
    pos: Vec2,
    vel: Vec2,
    pin: Option<Vec2>,
    size: f32,
}

struct SimLink {
    source: usize,
    target: usize,
    strength: f32,
}

#[derive(Default)]
struct ForceScratch {
    positions: Vec<Vec2>,
    projected: Vec<Vec2>,
    radii: Vec<f32>,
}

pub struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    degrees: Vec<f32>,
    alpha: f32,
    alpha_decay: f32,
    alpha_target: f32,
    velocity_decay: f32,
    params: LayoutParams,
    center: Vec2,
    clock: f32,
    focal_release_at: Option<f32>,
    dragging: Option<usize>,
    scratch: ForceScratch,
}

impl Simulation {
    pub fn new(graph: &KnowledgeGraph, width: f32, height: f32) -> Self {
        let params = LayoutParams::for_viewport(width);
        let center = vec2(width, height) * 0.5;

        let mut index_by_id = HashMap::with_capacity(graph.nodes.len());
        for (index, node) in graph.nodes.iter().enumerate() {
            index_by_id.insert(node.id.as_str(), index);
        }

        let node_count = graph.nodes.len().max(1);
        let nodes = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let angle = (index as f32 / node_count as f32) * TAU;
                let (jx, jy) = stable_pair(&node.id);
                let ring = vec2(angle.cos(), angle.sin()) * params.link_base_distance;
                let jitter = vec2(jx, jy) * (params.link_base_distance * 0.25);

                SimNode {
                    pos: center + ring + jitter,
                    vel: Vec2::ZERO,
                    pin: None,
                    size: node.size as f32,
                }
            })
            .collect::<Vec<_>>();

        let mut degrees = vec![0.0_f32; nodes.len()];
        let links = graph
            .links
            .iter()
            .map(|link| {
                // Endpoint ids are guaranteed present by the builder; a miss
                // here is a builder bug and panics.
                let source = index_by_id[link.source.as_str()];
                let target = index_by_id[link.target.as_str()];
                degrees[source] += 1.0;
                degrees[target] += 1.0;

                SimLink {
                    source,
                    target,
                    strength: link.strength,
                }
            })
            .collect();

        let mut simulation = Self {
            nodes,
            links,
            degrees,
            alpha: ALPHA_INITIAL,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / ALPHA_DECAY_STEPS),
            alpha_target: 0.0,
            velocity_decay: VELOCITY_DECAY,
            params,
            center,
            clock: 0.0,
            focal_release_at: None,
            dragging: None,
            scratch: ForceScratch::default(),
        };

        if !simulation.nodes.is_empty() {
            simulation.nodes[FOCAL_INDEX].pos = center;
            simulation.nodes[FOCAL_INDEX].pin = Some(center);
            simulation.focal_release_at = Some(FOCAL_WARMUP_SECS);
        }

        simulation
    }

    // Advances the simulation by one discrete step; `dt` only drives the
    // focal warm-up timer. Returns false once the simulation has cooled.
    pub fn step(&mut self, dt: f32) -> bool {
        if self.nodes.is_empty() {
            return false;
        }

        self.clock += dt;
        if let Some(release_at) = self.focal_release_at
            && self.clock >= release_at
        {
            self.focal_release_at = None;
            if self.dragging != Some(FOCAL_INDEX) {
                self.nodes[FOCAL_INDEX].pin = None;
            }
        }

        if !self.is_active() {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        if self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN {
            return false;
        }

        self.scratch.positions.clear();
        self.scratch
            .positions
            .extend(self.nodes.iter().map(|node| node.pos));

        forces::apply_link_force(
            &mut self.nodes,
            &self.links,
            &self.degrees,
            self.params,
            self.alpha,
        );
        forces::apply_charge_force(
            &mut self.nodes,
            &self.scratch.positions,
            self.params.charge_strength,
            self.alpha,
        );
        forces::apply_center_force(&mut self.nodes, self.center, CENTER_STRENGTH);

        self.scratch.projected.clear();
        self.scratch
            .projected
            .extend(self.nodes.iter().map(|node| node.pos + node.vel));
        self.scratch.radii.clear();
        self.scratch.radii.extend(
            self.nodes
                .iter()
                .map(|node| self.params.collision_radius_scale * node.size + self.params.collision_padding),
        );
        forces::apply_collision_force(&mut self.nodes, &self.scratch.projected, &self.scratch.radii);

        let retain = 1.0 - self.velocity_decay;
        for node in &mut self.nodes {
            if let Some(pin) = node.pin {
                node.pos = pin;
                node.vel = Vec2::ZERO;
            } else {
                node.vel *= retain;
                node.pos += node.vel;
            }
        }

        true
    }

    pub fn drag_start(&mut self, index: usize, position: Vec2) {
        self.alpha_target = DRAG_ALPHA_TARGET;
        self.dragging = Some(index);
        self.nodes[index].pin = Some(position);
    }

    pub fn drag_move(&mut self, index: usize, position: Vec2) {
        self.nodes[index].pin = Some(position);
    }

    pub fn drag_end(&mut self, index: usize) {
        self.alpha_target = 0.0;
        self.dragging = None;
        self.nodes[index].pin = None;
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.center = vec2(width, height) * 0.5;
        self.params = LayoutParams::for_viewport(width);

        // A focal node still in warm-up follows the center to the new midpoint.
        if self.focal_release_at.is_some() && self.dragging != Some(FOCAL_INDEX) {
            self.nodes[FOCAL_INDEX].pin = Some(self.center);
        }
    }

    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(ALPHA_MIN, ALPHA_INITIAL);
    }

    pub fn is_active(&self) -> bool {
        self.alpha >= ALPHA_MIN || self.alpha_target >= ALPHA_MIN
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn params(&self) -> LayoutParams {
        self.params
    }

    pub fn is_compact(&self) -> bool {
        self.params == LayoutParams::COMPACT
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn position(&self, index: usize) -> Vec2 {
        self.nodes[index].pos
    }

    pub fn display_radius(&self, index: usize) -> f32 {
        self.nodes[index].size * self.params.collision_radius_scale
    }

    pub fn segment(&self, link_index: usize) -> (Vec2, Vec2) {
        let link = &self.links[link_index];
        (self.nodes[link.source].pos, self.nodes[link.target].pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_class_switches_below_breakpoint() {
        assert_eq!(LayoutParams::for_viewport(1280.0), LayoutParams::REGULAR);
        assert_eq!(LayoutParams::for_viewport(768.0), LayoutParams::REGULAR);
        assert_eq!(LayoutParams::for_viewport(767.9), LayoutParams::COMPACT);
    }

    #[test]
    fn alpha_decay_matches_cooling_horizon() {
        let simulation = Simulation::new(&KnowledgeGraph::default(), 1024.0, 768.0);
        // 300 steps from 1.0 down to the halt threshold.
        let steps = (ALPHA_MIN.ln() / (1.0 - simulation.alpha_decay).ln()).round();
        assert_eq!(steps, ALPHA_DECAY_STEPS);
    }
}
