//! Pointer interaction state machine for node dragging and drop-to-connect.
//!
//! Exactly one of three states at any time: idle, dragging, or dragging
//! with a live snap target. The controller is the only writer of node pins
//! and of the layout's drag exemptions (charge mute, collision toggle).

use super::layout::ForceLayout;
use super::types::GraphState;
use egui::Pos2;

/// Snap detection radius in simulation units
pub const SNAP_RADIUS: f32 = 50.0;

/// Energy target held while a drag is active
const DRAG_ALPHA_TARGET: f32 = 0.3;
/// Energy pulse on release, to resolve residual overlap smoothly
const RELEASE_ALPHA: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging {
        node: usize,
    },
    Snapped {
        node: usize,
        target: usize,
    },
}

#[derive(Default)]
pub struct DragController {
    phase: DragPhase,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.phase, DragPhase::Idle)
    }

    pub fn dragged_node(&self) -> Option<usize> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Dragging { node } | DragPhase::Snapped { node, .. } => Some(node),
        }
    }

    pub fn snap_target(&self) -> Option<usize> {
        match self.phase {
            DragPhase::Snapped { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Pointer-down on a node: pin it where it stands, mute its charge,
    /// disable collisions globally, and keep the simulation energized.
    pub fn begin(&mut self, state: &mut GraphState, layout: &mut ForceLayout, node: usize) {
        if self.is_dragging() || node >= state.nodes.len() {
            return;
        }

        state.nodes[node].pinned = Some(state.nodes[node].pos);
        layout.charge_muted = Some(node);
        layout.collisions_enabled = false;
        layout.alpha_target = DRAG_ALPHA_TARGET;
        layout.reheat(DRAG_ALPHA_TARGET);

        self.phase = DragPhase::Dragging { node };
    }

    /// Pointer move: re-pin to the pointer and rescan for a snap target.
    pub fn update(&mut self, state: &mut GraphState, pointer: Pos2) {
        let Some(node) = self.dragged_node() else {
            return;
        };

        state.nodes[node].pinned = Some(pointer);

        self.phase = match Self::scan(state, node, pointer) {
            Some(target) => DragPhase::Snapped { node, target },
            None => DragPhase::Dragging { node },
        };
    }

    /// Pointer-up: unpin, restore charge/collision defaults, drop the
    /// energy target, and pulse alpha so the layout absorbs the release.
    /// Returns the (source, target) ids exactly when a snap target was
    /// active at release.
    pub fn finish(
        &mut self,
        state: &mut GraphState,
        layout: &mut ForceLayout,
    ) -> Option<(String, String)> {
        let phase = std::mem::take(&mut self.phase);

        let node = match phase {
            DragPhase::Idle => return None,
            DragPhase::Dragging { node } | DragPhase::Snapped { node, .. } => node,
        };

        state.nodes[node].pinned = None;
        layout.charge_muted = None;
        layout.collisions_enabled = true;
        layout.alpha_target = 0.0;
        layout.reheat(RELEASE_ALPHA);

        match phase {
            DragPhase::Snapped { node, target } => Some((
                state.nodes[node].id.clone(),
                state.nodes[target].id.clone(),
            )),
            _ => None,
        }
    }

    /// Nearest other node within the snap radius of the pointer. Exact
    /// distance ties break to the lowest arena index; the arena preserves
    /// external list order, so the rule is stable across frames.
    fn scan(state: &GraphState, dragged: usize, pointer: Pos2) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;

        for (i, node) in state.nodes.iter().enumerate() {
            if i == dragged {
                continue;
            }
            let distance = (node.pos - pointer).length();
            if distance < SNAP_RADIUS && best.map_or(true, |(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }

        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::SimNode;
    use egui::Vec2;

    fn node(id: &str, x: f32, y: f32) -> SimNode {
        SimNode {
            id: id.into(),
            title: id.to_uppercase(),
            category: String::new(),
            enabled: true,
            pos: Pos2::new(x, y),
            vel: Vec2::ZERO,
            pinned: None,
        }
    }

    fn state_of(nodes: Vec<SimNode>) -> GraphState {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        GraphState {
            nodes,
            edges: Vec::new(),
            index,
            memory: Default::default(),
        }
    }

    #[test]
    fn begin_pins_and_exempts_the_node() {
        let mut state = state_of(vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)]);
        let mut layout = ForceLayout::default();
        let mut drag = DragController::new();

        drag.begin(&mut state, &mut layout, 0);

        assert_eq!(drag.phase(), DragPhase::Dragging { node: 0 });
        assert_eq!(state.nodes[0].pinned, Some(Pos2::new(0.0, 0.0)));
        assert_eq!(layout.charge_muted, Some(0));
        assert!(!layout.collisions_enabled);
        assert_eq!(layout.alpha_target, 0.3);
    }

    #[test]
    fn snap_picks_nearest_node_within_radius() {
        let mut state = state_of(vec![
            node("a", 0.0, 0.0),
            node("b", 300.0, 0.0),
            node("c", 400.0, 0.0),
        ]);
        let mut layout = ForceLayout::default();
        let mut drag = DragController::new();

        drag.begin(&mut state, &mut layout, 0);

        // Out of range of everything
        drag.update(&mut state, Pos2::new(100.0, 0.0));
        assert_eq!(drag.snap_target(), None);

        // 40 from b, 60 from c: b wins
        drag.update(&mut state, Pos2::new(340.0, 0.0));
        assert_eq!(drag.snap_target(), Some(1));

        // 80 from b, 20 from c: c wins
        drag.update(&mut state, Pos2::new(380.0, 0.0));
        assert_eq!(drag.snap_target(), Some(2));

        // Leaves the radius again
        drag.update(&mut state, Pos2::new(100.0, 0.0));
        assert_eq!(drag.snap_target(), None);
    }

    #[test]
    fn equidistant_candidates_break_to_lowest_index() {
        let mut state = state_of(vec![
            node("dragged", 0.0, 0.0),
            node("left", 320.0, 0.0),
            node("right", 360.0, 0.0),
        ]);
        let mut layout = ForceLayout::default();
        let mut drag = DragController::new();

        drag.begin(&mut state, &mut layout, 0);
        // Exactly 20 from each candidate
        drag.update(&mut state, Pos2::new(340.0, 0.0));
        assert_eq!(drag.snap_target(), Some(1));
    }

    #[test]
    fn release_over_target_emits_exactly_one_drop() {
        let mut state = state_of(vec![node("c", 0.0, 0.0), node("b", 300.0, 0.0)]);
        let mut layout = ForceLayout::default();
        let mut drag = DragController::new();

        drag.begin(&mut state, &mut layout, 0);
        drag.update(&mut state, Pos2::new(290.0, 0.0));

        let dropped = drag.finish(&mut state, &mut layout);
        assert_eq!(dropped, Some(("c".into(), "b".into())));

        // The release restored simulation defaults immediately
        assert_eq!(state.nodes[0].pinned, None);
        assert_eq!(layout.charge_muted, None);
        assert!(layout.collisions_enabled);
        assert_eq!(layout.alpha_target, 0.0);

        // A second release must not re-fire
        assert_eq!(drag.finish(&mut state, &mut layout), None);
        assert_eq!(drag.phase(), DragPhase::Idle);
    }

    #[test]
    fn release_without_target_emits_nothing() {
        let mut state = state_of(vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)]);
        let mut layout = ForceLayout::default();
        let mut drag = DragController::new();

        drag.begin(&mut state, &mut layout, 0);
        drag.update(&mut state, Pos2::new(100.0, 0.0));
        assert_eq!(drag.finish(&mut state, &mut layout), None);
        assert!(layout.collisions_enabled);
    }

    #[test]
    fn pin_follows_the_pointer() {
        let mut state = state_of(vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)]);
        let mut layout = ForceLayout::default();
        let mut drag = DragController::new();

        drag.begin(&mut state, &mut layout, 0);
        drag.update(&mut state, Pos2::new(50.0, 60.0));
        assert_eq!(state.nodes[0].pinned, Some(Pos2::new(50.0, 60.0)));
    }

    #[test]
    fn begin_while_dragging_is_ignored() {
        let mut state = state_of(vec![node("a", 0.0, 0.0), node("b", 300.0, 0.0)]);
        let mut layout = ForceLayout::default();
        let mut drag = DragController::new();

        drag.begin(&mut state, &mut layout, 0);
        drag.begin(&mut state, &mut layout, 1);
        assert_eq!(drag.dragged_node(), Some(0));
        assert_eq!(state.nodes[1].pinned, None);
    }
}
