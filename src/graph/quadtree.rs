//! Barnes-Hut quadtree for the many-body charge force.
//!
//! Instead of evaluating repulsion between all pairs of nodes O(n²),
//! distant groups are approximated by their centroid. The tree is built in
//! bulk from a position slice into a flat cell arena; traversal is
//! iterative, so there is no pointer chasing and no recursion limit to
//! defend.

use egui::{Pos2, Vec2};

const NO_CELL: u32 = u32::MAX;
/// Subdivision stops here; coincident points collapse into one cell
const MAX_DEPTH: u32 = 24;

#[derive(Debug, Clone, Copy)]
struct Cell {
    /// Centroid of all bodies at or below this cell
    centroid: Pos2,
    /// Number of bodies at or below this cell
    count: u32,
    /// Cell edge length, for the opening criterion
    size: f32,
    /// Child cell indices (NW, NE, SW, SE); `NO_CELL` where empty.
    /// A cell with no children holds its bodies directly.
    children: [u32; 4],
}

pub struct Quadtree {
    cells: Vec<Cell>,
    /// Opening criterion: a cell is far enough to approximate when
    /// size / distance < theta. Higher = faster but less accurate; 1.0 is
    /// fine for visualization.
    theta: f32,
}

impl Quadtree {
    pub fn build(positions: &[Pos2], theta: f32) -> Self {
        let mut tree = Self {
            cells: Vec::with_capacity(positions.len() * 2),
            theta,
        };

        if positions.is_empty() {
            return tree;
        }

        let mut min = positions[0];
        let mut max = positions[0];
        for p in positions {
            min = min.min(*p);
            max = max.max(*p);
        }

        // Square cell around everything, with padding so boundary points
        // do not land exactly on an edge
        let size = (max.x - min.x).max(max.y - min.y) + 200.0;
        let origin = Pos2::new(min.x - 100.0, min.y - 100.0);

        let mut scratch = positions.to_vec();
        tree.subdivide(&mut scratch, origin, size, 0);
        tree
    }

    /// Build the cell for `bodies` and return its index. Bodies are
    /// reordered in place while partitioning into quadrants.
    fn subdivide(&mut self, bodies: &mut [Pos2], origin: Pos2, size: f32, depth: u32) -> u32 {
        let count = bodies.len() as u32;
        let mut sum = Vec2::ZERO;
        for b in bodies.iter() {
            sum += b.to_vec2();
        }
        let centroid = (sum / count as f32).to_pos2();

        let index = self.cells.len() as u32;
        self.cells.push(Cell {
            centroid,
            count,
            size,
            children: [NO_CELL; 4],
        });

        if bodies.len() > 1 && depth < MAX_DEPTH {
            let center = origin + Vec2::splat(size / 2.0);
            let quadrant = |p: &Pos2| -> usize {
                let east = p.x >= center.x;
                let south = p.y >= center.y;
                (south as usize) * 2 + east as usize
            };

            // Partition into the four quadrants, one stable pass each
            let mut start = 0;
            let half = size / 2.0;
            for q in 0..4 {
                let slice = &mut bodies[start..];
                let mid = partition(slice, |p| quadrant(p) == q);
                if mid > 0 {
                    let child_origin = Pos2::new(
                        origin.x + (q % 2) as f32 * half,
                        origin.y + (q / 2) as f32 * half,
                    );
                    let child =
                        self.subdivide(&mut bodies[start..start + mid], child_origin, half, depth + 1);
                    self.cells[index as usize].children[q] = child;
                }
                start += mid;
            }
        }

        index
    }

    /// Many-body force on a probe at `pos`. Follows the d3 sign convention:
    /// negative `strength` repels, positive attracts.
    pub fn force_at(&self, pos: Pos2, strength: f32, min_distance: f32) -> Vec2 {
        let mut force = Vec2::ZERO;
        if self.cells.is_empty() {
            return force;
        }

        let mut stack: Vec<u32> = vec![0];
        while let Some(index) = stack.pop() {
            let cell = &self.cells[index as usize];
            let delta = pos - cell.centroid;
            let distance = delta.length().max(min_distance);

            let is_leaf = cell.children == [NO_CELL; 4];
            if is_leaf || cell.size / distance < self.theta {
                // Skip the probe's own body (and anything coincident)
                if delta.length() < 0.01 {
                    continue;
                }
                let magnitude = -strength * cell.count as f32 / (distance * distance);
                force += (delta / distance) * magnitude;
            } else {
                for &child in &cell.children {
                    if child != NO_CELL {
                        stack.push(child);
                    }
                }
            }
        }

        force
    }

    #[cfg(test)]
    fn body_count(&self) -> u32 {
        self.cells.first().map_or(0, |c| c.count)
    }
}

/// Stable partition: move elements matching `pred` to the front of `slice`,
/// preserving relative order, and return how many matched.
fn partition<F: Fn(&Pos2) -> bool>(slice: &mut [Pos2], pred: F) -> usize {
    let mut matched = 0;
    for i in 0..slice.len() {
        if pred(&slice[i]) {
            slice[matched..=i].rotate_right(1);
            matched += 1;
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_counts_bodies() {
        let positions = vec![
            Pos2::new(0.0, 0.0),
            Pos2::new(100.0, 0.0),
            Pos2::new(0.0, 100.0),
            Pos2::new(100.0, 100.0),
        ];

        let tree = Quadtree::build(&positions, 1.0);
        assert_eq!(tree.body_count(), 4);
    }

    #[test]
    fn negative_strength_repels() {
        let positions = vec![Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0)];
        let tree = Quadtree::build(&positions, 1.0);

        // Force on the left body should push it further left
        let force = tree.force_at(Pos2::new(0.0, 0.0), -250.0, 1.0);
        assert!(force.x < 0.0, "force should push left: {force:?}");
    }

    #[test]
    fn empty_tree_exerts_nothing() {
        let tree = Quadtree::build(&[], 1.0);
        assert_eq!(tree.force_at(Pos2::new(5.0, 5.0), -250.0, 1.0), Vec2::ZERO);
    }

    #[test]
    fn coincident_bodies_do_not_blow_up() {
        let positions = vec![Pos2::new(10.0, 10.0); 8];
        let tree = Quadtree::build(&positions, 1.0);
        assert_eq!(tree.body_count(), 8);

        let force = tree.force_at(Pos2::new(200.0, 10.0), -250.0, 1.0);
        assert!(force.x > 0.0);
        assert!(force.is_finite());
    }

    #[test]
    fn approximation_tracks_direct_summation() {
        let positions: Vec<Pos2> = (0..40)
            .map(|i| Pos2::new((i % 8) as f32 * 60.0, (i / 8) as f32 * 60.0))
            .collect();
        let probe = Pos2::new(-50.0, -50.0);

        let tree = Quadtree::build(&positions, 0.5);
        let approx = tree.force_at(probe, -250.0, 1.0);

        let mut exact = Vec2::ZERO;
        for p in &positions {
            let delta = probe - *p;
            let d = delta.length().max(1.0);
            exact += (delta / d) * (250.0 / (d * d));
        }

        let error = (approx - exact).length() / exact.length();
        assert!(error < 0.1, "relative error too large: {error}");
    }

    #[test]
    fn partition_is_stable() {
        let mut points = vec![
            Pos2::new(1.0, 0.0),
            Pos2::new(-2.0, 0.0),
            Pos2::new(3.0, 0.0),
            Pos2::new(-4.0, 0.0),
        ];
        let n = partition(&mut points, |p| p.x < 0.0);
        assert_eq!(n, 2);
        assert_eq!(points[0].x, -2.0);
        assert_eq!(points[1].x, -4.0);
        assert_eq!(points[2].x, 1.0);
        assert_eq!(points[3].x, 3.0);
    }
}
