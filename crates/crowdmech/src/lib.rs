//! crowdmech: mechanical crowd simulation engine.
//!
//! Advances a population of pedestrian agents, each a rigid body of
//! five disks, through one coarse time step while resolving every
//! agent-agent and agent-wall contact at a finer mechanical sub-step.
//! This umbrella crate owns the two-scale integrator and the driver;
//! the sub-crates are re-exported for direct use.

pub use crowdmech_collision::{self};
pub use crowdmech_contact::{self, ContactBook, ContactKey, ContactRecord};
pub use crowdmech_math::{self, Vec2};
pub use crowdmech_model::{
    self, AgentDef, AgentState, Drive, MaterialRegistry, Model, Shape, State, Wall,
    SHAPES_PER_AGENT,
};
pub use crowdmech_xml::{self, ConfigError};

mod engine;
mod stepper;

pub use engine::{crowd_mechanics, run, INTERACTIONS_FILE};
pub use stepper::Stepper;

use thiserror::Error;

/// Failures of one engine call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("expected 5 or 6 configuration files, got {0}")]
    FileCount(usize),

    #[error("non-finite state for agent {agent} at sub-step {substep}")]
    NonFinite { agent: u32, substep: usize },
}
