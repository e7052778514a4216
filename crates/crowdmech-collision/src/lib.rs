//! Contact detection for the crowdmech engine.
//!
//! Narrow phase: disk-disk and disk-segment closest-point queries.
//! Broad phase: a uniform grid over the simulation bounding box that
//! yields candidate shape pairs and shape-segment pairs.

pub mod geometry;
pub mod grid;

pub use geometry::{disk_disk, disk_segment, Disk, Overlap, Segment};
pub use grid::{SegmentRef, ShapeRef, SpatialGrid};
