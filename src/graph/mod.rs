//! Graph engine: data model, scene building, force layout, camera,
//! pointer interaction, and visual projection.

pub mod camera;
pub mod interact;
pub mod layout;
pub mod quadtree;
pub mod scene;
pub mod style;
pub mod types;

pub use camera::{Camera, CameraCommand};
pub use interact::DragController;
pub use layout::ForceLayout;
pub use types::{GraphData, GraphState, RelationKind};
