//! Graph data types: the wire format served by the data service and the
//! simulation arena derived from it.

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Relationship kind. Closed set; unknown wire values collapse to `RelatedTo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "&'static str")]
pub enum RelationKind {
    BelongsTo,
    Contains,
    #[default]
    RelatedTo,
    SimilarTo,
    Homonym,
}

impl RelationKind {
    /// Human label, also used as the rendered edge label
    pub fn label(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongs to",
            RelationKind::Contains => "contains",
            RelationKind::RelatedTo => "related to",
            RelationKind::SimilarTo => "similar to",
            RelationKind::Homonym => "homonym",
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongs-to",
            RelationKind::Contains => "contains",
            RelationKind::RelatedTo => "related-to",
            RelationKind::SimilarTo => "similar-to",
            RelationKind::Homonym => "homonym",
        }
    }

    /// Semantic inverse. belongs-to/contains invert each other; the rest are
    /// self-inverse. The data service maintains inverse consistency between
    /// stored rows; we only use this to label incoming relations in the
    /// detail panel.
    pub fn inverse(&self) -> RelationKind {
        match self {
            RelationKind::BelongsTo => RelationKind::Contains,
            RelationKind::Contains => RelationKind::BelongsTo,
            RelationKind::RelatedTo => RelationKind::RelatedTo,
            RelationKind::SimilarTo => RelationKind::SimilarTo,
            RelationKind::Homonym => RelationKind::Homonym,
        }
    }

    /// All kinds, for UI iteration
    pub fn all() -> &'static [RelationKind] {
        &[
            RelationKind::BelongsTo,
            RelationKind::Contains,
            RelationKind::RelatedTo,
            RelationKind::SimilarTo,
            RelationKind::Homonym,
        ]
    }
}

impl From<String> for RelationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "belongs-to" | "BELONGS_TO" => RelationKind::BelongsTo,
            "contains" | "CONTAINS" => RelationKind::Contains,
            "related-to" | "RELATED_TO" => RelationKind::RelatedTo,
            "similar-to" | "SIMILAR_TO" => RelationKind::SimilarTo,
            "homonym" | "HOMONYM" => RelationKind::Homonym,
            _ => RelationKind::RelatedTo,
        }
    }
}

impl From<RelationKind> for &'static str {
    fn from(kind: RelationKind) -> Self {
        kind.wire_name()
    }
}

/// A knowledge-base entry as served by the data service
#[derive(Debug, Clone, Deserialize)]
pub struct Entity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

/// A directed, typed, weighted relationship between two entries
#[derive(Debug, Clone, Deserialize)]
pub struct Relation {
    pub id: String,
    #[serde(alias = "sourceId")]
    pub source: String,
    #[serde(alias = "targetId")]
    pub target: String,
    #[serde(alias = "type")]
    pub kind: RelationKind,
    pub weight: i32,
}

/// Complete graph data from the data service
#[derive(Debug, Clone, Default)]
pub struct GraphData {
    pub entries: Vec<Entity>,
    pub relations: Vec<Relation>,
}

/// A node in the simulation arena. Position and velocity are mutated in
/// place by the force pass; `pinned` overrides the position while the node
/// is dragged.
#[derive(Debug, Clone)]
pub struct SimNode {
    pub id: String,
    pub title: String,
    pub category: String,
    pub enabled: bool,
    pub pos: Pos2,
    pub vel: Vec2,
    pub pinned: Option<Pos2>,
}

/// An edge in the simulation arena. Endpoints are arena indices so force
/// calculations read current positions directly; the scene builder
/// guarantees they are in range.
#[derive(Debug, Clone)]
pub struct SimEdge {
    pub id: String,
    pub source: usize,
    pub target: usize,
    pub kind: RelationKind,
    pub weight: i32,
}

impl SimEdge {
    /// Target rest length of the link force: heavier edges pull closer.
    pub fn rest_length(&self) -> f32 {
        (200.0 - self.weight as f32 * 15.0).max(60.0)
    }
}

/// Last-known position and velocity per node id, carried across scene
/// rebuilds so surviving nodes do not jump when the data set changes.
/// Entries for removed nodes are unreachable garbage; churn is low and the
/// map is bounded by dataset size, so there is no eviction.
pub type PositionMemory = HashMap<String, (Pos2, Vec2)>;

/// Runtime simulation state: the node arena, index-resolved edges, and the
/// id lookup for everything that still addresses nodes by id.
#[derive(Default)]
pub struct GraphState {
    pub nodes: Vec<SimNode>,
    pub edges: Vec<SimEdge>,
    pub index: HashMap<String, usize>,
    pub memory: PositionMemory,
}

impl GraphState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_idx(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&SimNode> {
        self.node_idx(id).map(|i| &self.nodes[i])
    }

    /// Refresh position memory from the live arena. Called after every
    /// simulation step and after every rebuild.
    pub fn remember_positions(&mut self) {
        for node in &self.nodes {
            self.memory.insert(node.id.clone(), (node.pos, node.vel));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_falls_back_to_related() {
        let kind: RelationKind = serde_json::from_str("\"ownership\"").unwrap();
        assert_eq!(kind, RelationKind::RelatedTo);
    }

    #[test]
    fn kind_roundtrips_wire_names() {
        for &kind in RelationKind::all() {
            let json = serde_json::to_string(&kind).unwrap();
            let back: RelationKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn legacy_uppercase_kinds_are_accepted() {
        let kind: RelationKind = serde_json::from_str("\"BELONGS_TO\"").unwrap();
        assert_eq!(kind, RelationKind::BelongsTo);
    }

    #[test]
    fn inverse_is_involutive() {
        for &kind in RelationKind::all() {
            assert_eq!(kind.inverse().inverse(), kind);
        }
        assert_eq!(RelationKind::BelongsTo.inverse(), RelationKind::Contains);
    }

    #[test]
    fn rest_length_clamps_at_minimum() {
        let mut edge = SimEdge {
            id: "r1".into(),
            source: 0,
            target: 1,
            kind: RelationKind::RelatedTo,
            weight: 1,
        };
        assert_eq!(edge.rest_length(), 185.0);
        edge.weight = 10;
        assert_eq!(edge.rest_length(), 60.0);
    }
}
