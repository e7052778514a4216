//! Static agent description.

use crowdmech_math::{rotate, Vec2};

use crate::state::AgentState;

/// Number of disks composing one agent, ordered left shoulder to right
/// shoulder.
pub const SHAPES_PER_AGENT: usize = 5;

/// One disk of an agent, positioned in the agent's local frame.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Center offset relative to the agent's center of mass.
    pub offset: Vec2,
    pub radius: f64,
    /// Material id, already resolved to a default when absent from the
    /// input.
    pub material: String,
}

/// Immutable per-agent data for one run.
#[derive(Debug, Clone)]
pub struct AgentDef {
    pub id: u32,
    /// Mass (kg).
    pub mass: f64,
    /// Moment of inertia about the center of mass (kg m^2).
    pub inertia: f64,
    /// Translational relaxation time of the floor damping (s).
    pub tau_translation: f64,
    /// Rotational relaxation time (s).
    pub tau_rotation: f64,
    /// Exactly [`SHAPES_PER_AGENT`] shapes.
    pub shapes: Vec<Shape>,
}

impl AgentDef {
    /// World-space center of shape `s` under the given pose.
    pub fn shape_center(&self, pose: &AgentState, s: usize) -> Vec2 {
        pose.position + rotate(&self.shapes[s].offset, pose.theta)
    }

    /// Largest disk radius of this agent.
    pub fn max_radius(&self) -> f64 {
        self.shapes.iter().map(|s| s.radius).fold(0.0, f64::max)
    }
}
