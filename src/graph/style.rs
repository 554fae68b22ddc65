//! Visual state projector: derives per-node and per-edge rendering
//! attributes from selection, hover, and pending-connection state.
//!
//! Pure derivation over the arena; physics owns position/velocity, this
//! owns opacity/stroke, and neither touches the other.

use super::types::GraphState;

/// Base node radius in simulation units
pub const NODE_RADIUS: f32 = 20.0;
/// Gap between a node's rim and the start of an outgoing edge line
pub const EDGE_SOURCE_OFFSET: f32 = 23.0;
/// Gap at the target end, sized so an arrowhead covers the line end
pub const EDGE_TARGET_OFFSET: f32 = 28.0;

const DIMMED_NODE_OPACITY: f32 = 0.5;
const DIMMED_EDGE_OPACITY: f32 = 0.1;

/// Rendering attributes for one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeVisual {
    pub opacity: f32,
    /// Outer ring radius
    pub radius: f32,
    /// Inner category-colored disc radius
    pub fill_radius: f32,
    pub ring_width: f32,
    pub ring_opacity: f32,
    /// Candidate-not-yet-confirmed marker for the pending target
    pub ring_dashed: bool,
}

/// Rendering attributes for one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeVisual {
    pub opacity: f32,
    /// Use the active stroke color instead of the default
    pub active: bool,
    pub arrow: bool,
    pub label: bool,
}

/// Recompute visuals for the whole arena. Output vectors are parallel to
/// `state.nodes` / `state.edges`.
pub fn project(
    state: &GraphState,
    selected: Option<&str>,
    hovered: Option<&str>,
    pending: Option<&str>,
) -> (Vec<NodeVisual>, Vec<EdgeVisual>) {
    let selected_idx = selected.and_then(|id| state.node_idx(id));
    let hovered_idx = hovered.and_then(|id| state.node_idx(id));
    let pending_idx = pending.and_then(|id| state.node_idx(id));

    // Nodes adjacent to the selection (either direction) stay opaque
    let mut connected = vec![false; state.nodes.len()];
    if let Some(sel) = selected_idx {
        connected[sel] = true;
        for edge in &state.edges {
            if edge.source == sel {
                connected[edge.target] = true;
            }
            if edge.target == sel {
                connected[edge.source] = true;
            }
        }
    }

    let nodes = state
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let is_selected = selected_idx == Some(i);
            let is_hovered = hovered_idx == Some(i);
            let is_pending = pending_idx == Some(i);
            let emphasized = is_selected || is_hovered || is_pending;

            let opacity = if selected_idx.is_none() || is_pending || connected[i] {
                1.0
            } else {
                DIMMED_NODE_OPACITY
            };

            // Enabled entries get the heavier ring; hover widens it one
            // step, selection/pending two
            let ring_width = match (node.enabled, is_selected || is_pending, is_hovered) {
                (true, true, _) => 5.0,
                (true, false, true) => 4.0,
                (true, false, false) => 3.0,
                (false, true, _) => 4.0,
                (false, false, true) => 3.0,
                (false, false, false) => 2.0,
            };

            let base_fill = if node.enabled {
                NODE_RADIUS - 4.0
            } else {
                NODE_RADIUS
            };

            NodeVisual {
                opacity,
                radius: if emphasized { NODE_RADIUS + 2.0 } else { NODE_RADIUS },
                fill_radius: if emphasized { base_fill + 2.0 } else { base_fill },
                ring_width,
                ring_opacity: if is_pending { 0.5 } else { 1.0 },
                ring_dashed: is_pending,
            }
        })
        .collect();

    let edges = state
        .edges
        .iter()
        .map(|edge| {
            // Outgoing relationships of the focused node are the primary
            // information surface; everything else recedes
            let outgoing = selected_idx == Some(edge.source);
            let opacity = match selected_idx {
                None => 1.0,
                Some(_) if outgoing => 1.0,
                Some(_) => DIMMED_EDGE_OPACITY,
            };

            EdgeVisual {
                opacity,
                active: outgoing,
                arrow: outgoing,
                label: outgoing,
            }
        })
        .collect();

    (nodes, edges)
}
