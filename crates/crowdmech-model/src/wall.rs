//! Static wall obstacles.

use crowdmech_math::Vec2;

/// A polygonal wall: consecutive corners joined by line segments.
/// Segment `k` joins corner `k` to corner `k + 1`; repeating the first
/// corner as the last closes the boundary.
#[derive(Debug, Clone)]
pub struct Wall {
    pub id: u32,
    /// Material id, resolved to the wall default when absent.
    pub material: String,
    /// At least two corners.
    pub corners: Vec<Vec2>,
}

impl Wall {
    pub fn segment_count(&self) -> usize {
        self.corners.len().saturating_sub(1)
    }

    /// Endpoints of segment `k`.
    pub fn segment(&self, k: usize) -> (Vec2, Vec2) {
        (self.corners[k], self.corners[k + 1])
    }
}
