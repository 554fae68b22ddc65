//! Scene builder: turns the external entry/relationship lists into the
//! simulation arena, merging in position memory so nodes that survive a
//! data change keep their coordinates.

use super::types::{GraphData, GraphState, SimEdge, SimNode};
use egui::{Pos2, Vec2};
use rand::Rng;
use std::f32::consts::TAU;

/// Rebuild the arena from fresh data. Non-destructive merge: ids found in
/// position memory carry their last-known position forward (velocity is
/// zeroed, they count as settled); only genuinely new ids get seeded
/// placements. Edges referencing unknown ids are dropped here; the API
/// client filters them too, but the simulation relies on every index being
/// valid.
pub fn rebuild(state: &mut GraphState, data: &GraphData, viewport: Vec2, rng: &mut impl Rng) {
    let total = data.entries.len();

    state.nodes.clear();
    state.edges.clear();
    state.index.clear();

    for (i, entry) in data.entries.iter().enumerate() {
        let (pos, vel) = match state.memory.get(&entry.id) {
            Some(&(pos, _)) => (pos, Vec2::ZERO),
            None => (seed_position(i, total, viewport, rng), Vec2::ZERO),
        };

        state.index.insert(entry.id.clone(), i);
        state.nodes.push(SimNode {
            id: entry.id.clone(),
            title: entry.title.clone(),
            category: entry.category.clone(),
            enabled: entry.enabled,
            pos,
            vel,
            pinned: None,
        });
    }

    for relation in &data.relations {
        let (source, target) = match (
            state.index.get(&relation.source),
            state.index.get(&relation.target),
        ) {
            (Some(&s), Some(&t)) => (s, t),
            _ => {
                tracing::warn!(id = %relation.id, "dropping edge with unknown endpoint");
                continue;
            }
        };

        state.edges.push(SimEdge {
            id: relation.id.clone(),
            source,
            target,
            kind: relation.kind,
            weight: relation.weight.clamp(1, 10),
        });
    }

    // Seed memory immediately so a second rebuild before any tick is stable.
    state.remember_positions();
}

/// Initial placement for a node not found in position memory.
///
/// A single node lands at the canvas center. Small sets (2-5) go on an
/// evenly spaced circle. Larger sets get radius/angle jitter so the
/// simulation does not start from a symmetric layout it converges out of
/// slowly.
fn seed_position(index: usize, total: usize, viewport: Vec2, rng: &mut impl Rng) -> Pos2 {
    let center = Pos2::new(viewport.x / 2.0, viewport.y / 2.0);
    let extent = viewport.x.min(viewport.y);

    if total <= 1 {
        return center;
    }

    if total <= 5 {
        let radius = extent * 0.35;
        let angle = index as f32 / total as f32 * TAU;
        return center + Vec2::angled(angle) * radius;
    }

    let base_radius = extent * 0.30;
    let radius = base_radius + (rng.gen::<f32>() - 0.5) * base_radius * 0.2;
    let base_angle = index as f32 / total as f32 * TAU;
    let angle = base_angle + (rng.gen::<f32>() - 0.5) * 0.1;
    center + Vec2::angled(angle) * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::{Entity, Relation, RelationKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn entry(id: &str) -> Entity {
        Entity {
            id: id.into(),
            title: id.to_uppercase(),
            category: "Concept".into(),
            enabled: true,
            description: String::new(),
            tags: Vec::new(),
        }
    }

    fn relation(id: &str, source: &str, target: &str) -> Relation {
        Relation {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: RelationKind::RelatedTo,
            weight: 5,
        }
    }

    fn viewport() -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    #[test]
    fn single_node_lands_at_center() {
        let mut state = GraphState::new();
        let data = GraphData {
            entries: vec![entry("a")],
            relations: vec![],
        };
        rebuild(&mut state, &data, viewport(), &mut StdRng::seed_from_u64(1));
        assert_eq!(state.nodes[0].pos, Pos2::new(400.0, 300.0));
    }

    #[test]
    fn small_sets_spread_on_a_circle() {
        let mut state = GraphState::new();
        let data = GraphData {
            entries: vec![entry("a"), entry("b"), entry("c")],
            relations: vec![],
        };
        rebuild(&mut state, &data, viewport(), &mut StdRng::seed_from_u64(1));

        let center = Pos2::new(400.0, 300.0);
        for node in &state.nodes {
            let radius = (node.pos - center).length();
            assert!((radius - 210.0).abs() < 0.1, "radius was {radius}");
        }
        // Evenly spaced: no two coincide
        assert_ne!(state.nodes[0].pos, state.nodes[1].pos);
        assert_ne!(state.nodes[1].pos, state.nodes[2].pos);
    }

    #[test]
    fn large_sets_get_jittered_radius() {
        let mut state = GraphState::new();
        let data = GraphData {
            entries: (0..8).map(|i| entry(&format!("n{i}"))).collect(),
            relations: vec![],
        };
        rebuild(&mut state, &data, viewport(), &mut StdRng::seed_from_u64(7));

        let center = Pos2::new(400.0, 300.0);
        let base = 600.0 * 0.30;
        for node in &state.nodes {
            let radius = (node.pos - center).length();
            assert!(radius >= base * 0.9 - 0.1 && radius <= base * 1.1 + 0.1);
        }
    }

    #[test]
    fn positions_survive_rebuild_with_memory() {
        let mut state = GraphState::new();
        let data = GraphData {
            entries: vec![entry("a"), entry("b"), entry("c")],
            relations: vec![relation("r1", "a", "b")],
        };
        rebuild(&mut state, &data, viewport(), &mut StdRng::seed_from_u64(1));

        // Simulate some movement, then record it
        state.nodes[0].pos = Pos2::new(12.0, 34.0);
        state.nodes[0].vel = Vec2::new(1.0, 1.0);
        state.remember_positions();

        // A data change that adds a node must not move the survivors
        let grown = GraphData {
            entries: vec![entry("a"), entry("b"), entry("c"), entry("d")],
            relations: vec![relation("r1", "a", "b")],
        };
        rebuild(&mut state, &grown, viewport(), &mut StdRng::seed_from_u64(99));

        let a = state.node("a").unwrap();
        assert_eq!(a.pos, Pos2::new(12.0, 34.0));
        // Carried-forward nodes restart settled
        assert_eq!(a.vel, Vec2::ZERO);
        assert!(state.node("d").is_some());
    }

    #[test]
    fn rebuild_is_stable_without_intervening_ticks() {
        let mut state = GraphState::new();
        let data = GraphData {
            entries: (0..10).map(|i| entry(&format!("n{i}"))).collect(),
            relations: vec![],
        };
        rebuild(&mut state, &data, viewport(), &mut StdRng::seed_from_u64(3));
        let first: Vec<Pos2> = state.nodes.iter().map(|n| n.pos).collect();

        rebuild(&mut state, &data, viewport(), &mut StdRng::seed_from_u64(4));
        let second: Vec<Pos2> = state.nodes.iter().map(|n| n.pos).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn dangling_edges_are_dropped() {
        let mut state = GraphState::new();
        let data = GraphData {
            entries: vec![entry("a"), entry("b")],
            relations: vec![relation("r1", "a", "b"), relation("r2", "a", "ghost")],
        };
        rebuild(&mut state, &data, viewport(), &mut StdRng::seed_from_u64(1));
        assert_eq!(state.edges.len(), 1);
        assert_eq!(state.edges[0].id, "r1");
    }

    #[test]
    fn edge_weights_are_clamped() {
        let mut state = GraphState::new();
        let mut bad = relation("r1", "a", "b");
        bad.weight = 42;
        let data = GraphData {
            entries: vec![entry("a"), entry("b")],
            relations: vec![bad],
        };
        rebuild(&mut state, &data, viewport(), &mut StdRng::seed_from_u64(1));
        assert_eq!(state.edges[0].weight, 10);
    }
}
