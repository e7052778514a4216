//! Uniform-grid broad phase.
//!
//! The grid spans the simulation bounding box with cell size at least
//! twice the largest disk radius, so any overlapping pair of shapes is
//! found in a cell and its 8 neighbors. Wall segments are rasterized
//! into cells once per run; moving shapes are re-inserted every
//! sub-step.

use crowdmech_math::Vec2;

/// Identifies one disk of one agent: `(agent index, shape index)`.
pub type ShapeRef = (usize, usize);

/// Identifies one wall segment: `(wall index, segment index)`.
pub type SegmentRef = (usize, usize);

/// Uniform spatial grid over `[0, lx] x [0, ly]`.
pub struct SpatialGrid {
    nx: usize,
    ny: usize,
    cell: f64,
    r_max: f64,
    shapes: Vec<Vec<ShapeRef>>,
    segments: Vec<Vec<SegmentRef>>,
}

impl SpatialGrid {
    /// Build an empty grid. `r_max` is the largest disk radius across
    /// all shapes; cells are `2 * r_max` wide so that overlap implies
    /// adjacency. A world without shapes degenerates to a single cell.
    pub fn new(lx: f64, ly: f64, r_max: f64) -> Self {
        let cell = if r_max > 0.0 {
            2.0 * r_max
        } else {
            lx.max(ly).max(1.0)
        };
        let nx = ((lx / cell).ceil() as usize).max(1);
        let ny = ((ly / cell).ceil() as usize).max(1);
        SpatialGrid {
            nx,
            ny,
            cell,
            r_max,
            shapes: vec![Vec::new(); nx * ny],
            segments: vec![Vec::new(); nx * ny],
        }
    }

    /// Cell index for a world position. Positions outside the bounding
    /// box clamp to the border cells.
    pub fn cell_index(&self, p: &Vec2) -> usize {
        let ix = ((p.x / self.cell).floor() as isize).clamp(0, self.nx as isize - 1) as usize;
        let iy = ((p.y / self.cell).floor() as isize).clamp(0, self.ny as isize - 1) as usize;
        iy * self.nx + ix
    }

    /// Drop all shape entries, keeping allocations for the next sub-step.
    pub fn clear_shapes(&mut self) {
        for cell in &mut self.shapes {
            cell.clear();
        }
    }

    /// Insert one shape center.
    pub fn insert_shape(&mut self, shape: ShapeRef, center: &Vec2) {
        let idx = self.cell_index(center);
        self.shapes[idx].push(shape);
    }

    /// Register a wall segment into every cell it could touch from.
    ///
    /// A disk center lies in some cell and its radius is at most
    /// `r_max`, so the segment is registered into each cell whose
    /// rectangle, inflated by `r_max`, the segment crosses. Called once
    /// per run per segment.
    pub fn register_segment(&mut self, seg: SegmentRef, a: &Vec2, b: &Vec2) {
        let min_x = a.x.min(b.x) - self.r_max;
        let max_x = a.x.max(b.x) + self.r_max;
        let min_y = a.y.min(b.y) - self.r_max;
        let max_y = a.y.max(b.y) + self.r_max;

        let ix0 = ((min_x / self.cell).floor() as isize).clamp(0, self.nx as isize - 1) as usize;
        let ix1 = ((max_x / self.cell).floor() as isize).clamp(0, self.nx as isize - 1) as usize;
        let iy0 = ((min_y / self.cell).floor() as isize).clamp(0, self.ny as isize - 1) as usize;
        let iy1 = ((max_y / self.cell).floor() as isize).clamp(0, self.ny as isize - 1) as usize;

        for iy in iy0..=iy1 {
            for ix in ix0..=ix1 {
                let cell_min = Vec2::new(ix as f64 * self.cell - self.r_max, iy as f64 * self.cell - self.r_max);
                let cell_max = Vec2::new(
                    (ix + 1) as f64 * self.cell + self.r_max,
                    (iy + 1) as f64 * self.cell + self.r_max,
                );
                if segment_intersects_rect(a, b, &cell_min, &cell_max) {
                    self.segments[iy * self.nx + ix].push(seg);
                }
            }
        }
    }

    /// Segments registered in the cell containing `p`.
    pub fn segments_near(&self, p: &Vec2) -> &[SegmentRef] {
        &self.segments[self.cell_index(p)]
    }

    /// Enumerate candidate shape pairs into `out`.
    ///
    /// Every pair appears exactly once, ordered so that the first
    /// member is lexicographically smaller, and same-agent pairs are
    /// skipped (agents do not self-collide).
    pub fn candidate_pairs(&self, out: &mut Vec<(ShapeRef, ShapeRef)>) {
        for iy in 0..self.ny {
            for ix in 0..self.nx {
                let cell = &self.shapes[iy * self.nx + ix];
                if cell.is_empty() {
                    continue;
                }
                for &a in cell {
                    for dy in -1isize..=1 {
                        for dx in -1isize..=1 {
                            let jx = ix as isize + dx;
                            let jy = iy as isize + dy;
                            if jx < 0 || jy < 0 || jx >= self.nx as isize || jy >= self.ny as isize
                            {
                                continue;
                            }
                            for &b in &self.shapes[jy as usize * self.nx + jx as usize] {
                                if a.0 != b.0 && a < b {
                                    out.push((a, b));
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Liang-Barsky clip of the segment `ab` against an axis-aligned
/// rectangle. True when any part of the segment lies inside.
fn segment_intersects_rect(a: &Vec2, b: &Vec2, min: &Vec2, max: &Vec2) -> bool {
    let d = b - a;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for axis in 0..2 {
        if d[axis] == 0.0 {
            if a[axis] < min[axis] || a[axis] > max[axis] {
                return false;
            }
            continue;
        }
        let inv = 1.0 / d[axis];
        let mut near = (min[axis] - a[axis]) * inv;
        let mut far = (max[axis] - a[axis]) * inv;
        if near > far {
            std::mem::swap(&mut near, &mut far);
        }
        t0 = t0.max(near);
        t1 = t1.min(far);
        if t0 > t1 {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighboring_shapes_pair_once() {
        let mut grid = SpatialGrid::new(10.0, 10.0, 0.1);
        grid.insert_shape((0, 0), &Vec2::new(5.0, 5.0));
        grid.insert_shape((1, 0), &Vec2::new(5.15, 5.0));
        let mut pairs = Vec::new();
        grid.candidate_pairs(&mut pairs);
        assert_eq!(pairs, vec![((0, 0), (1, 0))]);
    }

    #[test]
    fn same_agent_shapes_are_skipped() {
        let mut grid = SpatialGrid::new(10.0, 10.0, 0.1);
        grid.insert_shape((0, 0), &Vec2::new(5.0, 5.0));
        grid.insert_shape((0, 1), &Vec2::new(5.05, 5.0));
        let mut pairs = Vec::new();
        grid.candidate_pairs(&mut pairs);
        assert!(pairs.is_empty());
    }

    #[test]
    fn distant_shapes_do_not_pair() {
        let mut grid = SpatialGrid::new(10.0, 10.0, 0.1);
        grid.insert_shape((0, 0), &Vec2::new(1.0, 1.0));
        grid.insert_shape((1, 0), &Vec2::new(9.0, 9.0));
        let mut pairs = Vec::new();
        grid.candidate_pairs(&mut pairs);
        assert!(pairs.is_empty());
    }

    #[test]
    fn clear_keeps_registered_segments() {
        let mut grid = SpatialGrid::new(10.0, 10.0, 0.1);
        grid.register_segment((0, 0), &Vec2::new(5.0, 0.0), &Vec2::new(5.0, 10.0));
        grid.insert_shape((0, 0), &Vec2::new(5.05, 5.0));
        grid.clear_shapes();
        assert!(!grid.segments_near(&Vec2::new(5.05, 5.0)).is_empty());
    }

    #[test]
    fn segment_reaches_adjacent_cell_queries() {
        // A vertical wall at x = 5; a disk center one cell away cannot
        // touch it, a center within r_max of the wall finds it.
        let grid = {
            let mut g = SpatialGrid::new(10.0, 10.0, 0.1);
            g.register_segment((2, 3), &Vec2::new(5.0, 0.0), &Vec2::new(5.0, 10.0));
            g
        };
        assert!(grid
            .segments_near(&Vec2::new(5.05, 5.0))
            .contains(&(2, 3)));
        assert!(grid
            .segments_near(&Vec2::new(4.95, 5.0))
            .contains(&(2, 3)));
        assert!(grid.segments_near(&Vec2::new(8.0, 5.0)).is_empty());
    }

    #[test]
    fn liang_barsky_clip() {
        let min = Vec2::new(0.0, 0.0);
        let max = Vec2::new(1.0, 1.0);
        assert!(segment_intersects_rect(
            &Vec2::new(-1.0, 0.5),
            &Vec2::new(2.0, 0.5),
            &min,
            &max
        ));
        assert!(!segment_intersects_rect(
            &Vec2::new(-1.0, 2.0),
            &Vec2::new(2.0, 2.0),
            &min,
            &max
        ));
        // Diagonal that passes outside the corner.
        assert!(!segment_intersects_rect(
            &Vec2::new(1.5, -0.5),
            &Vec2::new(2.5, 0.5),
            &min,
            &max
        ));
    }
}
