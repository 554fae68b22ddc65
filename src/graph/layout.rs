//! Force-directed layout.
//!
//! A d3-style alpha loop over the node arena:
//! - Link force (springs toward a per-edge rest length)
//! - Charge repulsion between all nodes - O(n log n) via Barnes-Hut
//! - Centering correction toward the canvas center
//! - Collision resolution between node discs
//!
//! Alpha decays toward `alpha_target` each tick; below `alpha_min` with a
//! zero target the step is a no-op and the layout counts as settled.

use super::quadtree::Quadtree;
use super::types::GraphState;
use egui::{Pos2, Vec2};

/// Force-directed layout parameters and energy state
pub struct ForceLayout {
    /// Spring strength of the link force
    pub link_strength: f32,
    /// Many-body strength; negative repels (d3 convention)
    pub charge: f32,
    /// Centering correction strength
    pub center_strength: f32,
    /// Node disc radius for collision resolution
    pub collision_radius: f32,
    /// Fraction of each overlap resolved per tick
    pub collision_strength: f32,
    /// Velocity multiplier applied each tick (1.0 = frictionless)
    pub velocity_decay: f32,
    /// Minimum distance to prevent division blowup
    pub min_distance: f32,
    /// Maximum velocity
    pub max_velocity: f32,

    /// Current energy
    pub alpha: f32,
    /// Energy floor below which the simulation stops moving
    pub alpha_min: f32,
    /// Per-tick interpolation factor toward `alpha_target`
    pub alpha_decay: f32,
    /// Energy level the loop converges to (raised during drags)
    pub alpha_target: f32,

    /// Collision force toggle; off while a node is dragged so the dragged
    /// node may overlap its snap candidate
    pub collisions_enabled: bool,
    /// Arena index whose charge contribution is muted (the dragged node)
    pub charge_muted: Option<usize>,
}

impl Default for ForceLayout {
    fn default() -> Self {
        Self {
            link_strength: 0.8,
            charge: -250.0,
            center_strength: 0.3,
            collision_radius: 30.0,
            collision_strength: 0.8,
            velocity_decay: 0.6,
            min_distance: 1.0,
            max_velocity: 50.0,

            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: 0.0228, // 1 - alpha_min^(1/300)
            alpha_target: 0.0,

            collisions_enabled: true,
            charge_muted: None,
        }
    }
}

impl ForceLayout {
    /// Run one tick of the simulation over the arena.
    pub fn step(&mut self, state: &mut GraphState, center: Pos2) {
        if state.nodes.is_empty() || self.is_settled() {
            return;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

        let mut forces: Vec<Vec2> = vec![Vec2::ZERO; state.nodes.len()];

        self.apply_link_force(state, &mut forces);
        self.apply_charge_force(state, &mut forces);

        // Integrate velocities, then positions
        for (node, force) in state.nodes.iter_mut().zip(&forces) {
            node.vel = (node.vel + *force * self.alpha) * self.velocity_decay;
            if node.vel.length() > self.max_velocity {
                node.vel = node.vel.normalized() * self.max_velocity;
            }
            node.pos += node.vel;
        }

        self.apply_center_force(state, center);

        if self.collisions_enabled {
            self.resolve_collisions(state);
        }

        // Pins override everything a force did this tick
        for node in &mut state.nodes {
            if let Some(pin) = node.pinned {
                node.pos = pin;
                node.vel = Vec2::ZERO;
            }
        }

        state.remember_positions();
    }

    /// Spring each edge toward its rest length, splitting the displacement
    /// evenly between the endpoints.
    fn apply_link_force(&self, state: &GraphState, forces: &mut [Vec2]) {
        for edge in &state.edges {
            let source = &state.nodes[edge.source];
            let target = &state.nodes[edge.target];

            let delta = target.pos - source.pos;
            let distance = delta.length().max(self.min_distance);
            let displacement = (distance - edge.rest_length()) / distance;

            let force = delta * displacement * self.link_strength * 0.5;
            forces[edge.source] += force;
            forces[edge.target] -= force;
        }
    }

    /// Many-body repulsion via the quadtree. A muted node (the one being
    /// dragged) is left out of the tree: it must not push away the nodes it
    /// is being dragged toward, while everything else keeps full charge.
    fn apply_charge_force(&self, state: &GraphState, forces: &mut [Vec2]) {
        let bodies: Vec<Pos2> = state
            .nodes
            .iter()
            .enumerate()
            .filter(|(i, _)| self.charge_muted != Some(*i))
            .map(|(_, n)| n.pos)
            .collect();

        let tree = Quadtree::build(&bodies, 1.0);

        for (i, node) in state.nodes.iter().enumerate() {
            forces[i] += tree.force_at(node.pos, self.charge, self.min_distance);
        }
    }

    /// d3-style centering: translate the whole arena so its mean position
    /// eases toward the canvas center. Keeps the layout from drifting
    /// off-screen without fighting individual forces.
    fn apply_center_force(&self, state: &mut GraphState, center: Pos2) {
        let count = state.nodes.len();
        if count == 0 {
            return;
        }

        let mut sum = Vec2::ZERO;
        for node in &state.nodes {
            sum += node.pos.to_vec2();
        }
        let mean = sum / count as f32;
        let shift = (center.to_vec2() - mean) * self.center_strength;

        for node in &mut state.nodes {
            node.pos += shift;
        }
    }

    /// Pairwise positional separation of overlapping discs. Arena sizes here
    /// stay small enough that the O(n²) pass is cheaper than a second tree.
    fn resolve_collisions(&self, state: &mut GraphState) {
        let separation = self.collision_radius * 2.0;

        for i in 0..state.nodes.len() {
            for j in (i + 1)..state.nodes.len() {
                let delta = state.nodes[j].pos - state.nodes[i].pos;
                let distance = delta.length();
                if distance >= separation {
                    continue;
                }

                let distance = distance.max(0.01);
                let overlap = (separation - distance) * self.collision_strength * 0.5;
                let push = (delta / distance) * overlap;

                state.nodes[i].pos -= push;
                state.nodes[j].pos += push;
            }
        }
    }

    /// Has the energy decayed past the floor with nothing keeping it up?
    pub fn is_settled(&self) -> bool {
        self.alpha < self.alpha_min && self.alpha_target < self.alpha_min
    }

    /// Restart from full energy (fresh data set)
    pub fn restart(&mut self) {
        self.alpha = 1.0;
    }

    /// Raise energy to at least `alpha` without resetting a hotter run
    pub fn reheat(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha);
    }

    /// Zero the energy. Always safe; the next step is a no-op.
    pub fn stop(&mut self) {
        self.alpha = 0.0;
        self.alpha_target = 0.0;
    }
}
