//! XML boundary of the crowdmech engine.
//!
//! All configuration and state files are attribute-based XML. Inputs
//! are validated exhaustively before any integration starts; outputs
//! are replaced atomically. Unknown attributes and elements are
//! ignored.

mod error;
mod parser;
mod writer;

pub use error::{ConfigError, Result};
pub use parser::{
    parse_agents, parse_dynamics, parse_geometry, parse_interactions, parse_materials,
    parse_parameters, DynamicsEntry, GeometryFile, Parameters,
};
pub use writer::{write_dynamics, write_interactions};
