//! World description and state for the crowdmech engine.
//!
//! `Model` is the static description of a run (agents, walls, materials,
//! bounding box, time steps). `State` is the mutable simulation state
//! (poses, velocities, per-agent force accumulators). The split keeps
//! the integrator borrowing the model immutably while it advances the
//! state.

pub mod agent;
pub mod material;
pub mod model;
pub mod state;
pub mod wall;

pub use agent::{AgentDef, Shape, SHAPES_PER_AGENT};
pub use material::{
    ContactParams, Material, MaterialRegistry, DEFAULT_CONTACT, DEFAULT_MATERIAL, HUMAN_MATERIAL,
    WALL_MATERIAL,
};
pub use model::{Model, ModelError};
pub use state::{AgentState, Drive, State};
pub use wall::Wall;
