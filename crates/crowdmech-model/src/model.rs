//! The static model of one run and its load-time validation.

use thiserror::Error;

use crowdmech_math::Vec2;

use crate::{AgentDef, MaterialRegistry, Wall, SHAPES_PER_AGENT};

/// Validation failures detected before any integration.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("agent {0}: mass must be positive (got {1})")]
    NonPositiveMass(u32, f64),
    #[error("agent {0}: moment of inertia must be positive (got {1})")]
    NonPositiveInertia(u32, f64),
    #[error("agent {0}: damping time must be positive (got {1})")]
    NonPositiveDamping(u32, f64),
    #[error("agent {0}: shape radius must be positive (got {1})")]
    NonPositiveRadius(u32, f64),
    #[error("agent {0}: expected {SHAPES_PER_AGENT} shapes, found {1}")]
    ShapeCount(u32, usize),
    #[error("duplicate agent id {0}")]
    DuplicateAgent(u32),
    #[error("wall {0}: needs at least two corners, found {1}")]
    TooFewCorners(u32, usize),
    #[error("duplicate wall id {0}")]
    DuplicateWall(u32),
    #[error("duplicate material id {0}")]
    DuplicateMaterial(String),
    #[error("duplicate contact pair {0}/{1}")]
    DuplicateContactPair(String, String),
    #[error("contact pair references undeclared material {0}")]
    UnknownPairMaterial(String),
    #[error("no contact parameters declared for materials {0}/{1}")]
    MissingContactPair(String, String),
    #[error("bounding box dimensions must be positive (got {0} x {1})")]
    NonPositiveBounds(f64, f64),
    #[error("time step must be positive (got {0})")]
    NonPositiveTimeStep(f64),
    #[error("mechanical time step {0} exceeds coarse time step {1}")]
    TimeStepOrder(f64, f64),
}

/// Static description of one run: registries plus the two time scales.
#[derive(Debug)]
pub struct Model {
    /// Agents in ascending id order.
    pub agents: Vec<AgentDef>,
    /// Walls in ascending id order.
    pub walls: Vec<Wall>,
    pub materials: MaterialRegistry,
    /// Bounding box `[0, x] x [0, y]`.
    pub bounds: Vec2,
    /// Coarse step `dt` (s), the caller cadence.
    pub dt: f64,
    /// Mechanical sub-step `dt_m` (s).
    pub dt_m: f64,
}

impl Model {
    /// Assemble and validate a model. Agents and walls are sorted by id
    /// so that index order equals ascending id order everywhere.
    pub fn new(
        mut agents: Vec<AgentDef>,
        mut walls: Vec<Wall>,
        materials: MaterialRegistry,
        bounds: Vec2,
        dt: f64,
        dt_m: f64,
    ) -> Result<Self, ModelError> {
        agents.sort_by_key(|a| a.id);
        walls.sort_by_key(|w| w.id);
        let model = Model {
            agents,
            walls,
            materials,
            bounds,
            dt,
            dt_m,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if !(self.bounds.x > 0.0 && self.bounds.y > 0.0) {
            return Err(ModelError::NonPositiveBounds(self.bounds.x, self.bounds.y));
        }
        if !(self.dt_m > 0.0) {
            return Err(ModelError::NonPositiveTimeStep(self.dt_m));
        }
        if !(self.dt > 0.0) {
            return Err(ModelError::NonPositiveTimeStep(self.dt));
        }
        if self.dt < self.dt_m {
            return Err(ModelError::TimeStepOrder(self.dt_m, self.dt));
        }
        for pair in self.agents.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(ModelError::DuplicateAgent(pair[0].id));
            }
        }
        for pair in self.walls.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(ModelError::DuplicateWall(pair[0].id));
            }
        }
        for agent in &self.agents {
            if !(agent.mass > 0.0) {
                return Err(ModelError::NonPositiveMass(agent.id, agent.mass));
            }
            if !(agent.inertia > 0.0) {
                return Err(ModelError::NonPositiveInertia(agent.id, agent.inertia));
            }
            if !(agent.tau_translation > 0.0) {
                return Err(ModelError::NonPositiveDamping(
                    agent.id,
                    agent.tau_translation,
                ));
            }
            if !(agent.tau_rotation > 0.0) {
                return Err(ModelError::NonPositiveDamping(agent.id, agent.tau_rotation));
            }
            if agent.shapes.len() != SHAPES_PER_AGENT {
                return Err(ModelError::ShapeCount(agent.id, agent.shapes.len()));
            }
            for shape in &agent.shapes {
                if !(shape.radius > 0.0) {
                    return Err(ModelError::NonPositiveRadius(agent.id, shape.radius));
                }
            }
        }
        for wall in &self.walls {
            if wall.corners.len() < 2 {
                return Err(ModelError::TooFewCorners(wall.id, wall.corners.len()));
            }
        }
        self.materials.validate_pairs()
    }

    /// Largest disk radius across all shapes; sizes the broad-phase
    /// grid cells.
    pub fn max_radius(&self) -> f64 {
        self.agents
            .iter()
            .map(AgentDef::max_radius)
            .fold(0.0, f64::max)
    }

    /// Index of the agent with the given external id.
    pub fn agent_index(&self, id: u32) -> Option<usize> {
        self.agents.binary_search_by_key(&id, |a| a.id).ok()
    }

    /// Index of the wall with the given external id.
    pub fn wall_index(&self, id: u32) -> Option<usize> {
        self.walls.binary_search_by_key(&id, |w| w.id).ok()
    }

    /// Warn when the mechanical step is too coarse for the stiffest
    /// contact this crowd can form. The explicit spring-damper needs
    /// `dt_m` well below `sqrt(m / k_n)`.
    pub fn check_stability(&self) {
        let m_min = self
            .agents
            .iter()
            .map(|a| a.mass)
            .fold(f64::INFINITY, f64::min);
        let r_max = self.max_radius();
        if !m_min.is_finite() || r_max <= 0.0 {
            return;
        }
        // Series compliance keeps any contact stiffness below the
        // softer side, and every contact involves a shape.
        let e_max = self
            .agents
            .iter()
            .flat_map(|a| &a.shapes)
            .map(|s| self.materials.shape_material(&s.material).young_modulus)
            .fold(0.0, f64::max);
        let k_max = e_max * r_max;
        let bound = (m_min / k_max).sqrt();
        if self.dt_m > 0.1 * bound {
            log::warn!(
                "mechanical step {} is close to the contact stability bound sqrt(m/k) = {bound:.3e}; \
                 expect energy growth in stiff contacts",
                self.dt_m
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{ContactParams, Material};
    use crate::Shape;

    fn shapes() -> Vec<Shape> {
        (0..SHAPES_PER_AGENT)
            .map(|k| Shape {
                offset: Vec2::new(0.0, 0.1 * k as f64 - 0.2),
                radius: 0.1,
                material: "human".into(),
            })
            .collect()
    }

    fn agent(id: u32) -> AgentDef {
        AgentDef {
            id,
            mass: 80.0,
            inertia: 1.5,
            tau_translation: 0.5,
            tau_rotation: 0.5,
            shapes: shapes(),
        }
    }

    fn registry() -> MaterialRegistry {
        let mut reg = MaterialRegistry::new();
        reg.insert_material(
            "human",
            Material {
                young_modulus: 2.6e6,
                shear_modulus: 1.0e6,
            },
        )
        .unwrap();
        reg.insert_contact(
            "human",
            "human",
            ContactParams {
                gamma_normal: 1.0e4,
                gamma_tangential: 1.0e4,
                kinetic_friction: 0.5,
            },
        )
        .unwrap();
        reg
    }

    #[test]
    fn valid_model_builds_sorted() {
        let model = Model::new(
            vec![agent(3), agent(1)],
            Vec::new(),
            registry(),
            Vec2::new(10.0, 10.0),
            0.1,
            1.0e-4,
        )
        .unwrap();
        assert_eq!(model.agents[0].id, 1);
        assert_eq!(model.agent_index(3), Some(1));
        assert_eq!(model.agent_index(2), None);
    }

    #[test]
    fn duplicate_agent_id_rejected() {
        let err = Model::new(
            vec![agent(1), agent(1)],
            Vec::new(),
            registry(),
            Vec2::new(10.0, 10.0),
            0.1,
            1.0e-4,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateAgent(1)));
    }

    #[test]
    fn wrong_shape_count_rejected() {
        let mut bad = agent(0);
        bad.shapes.pop();
        let err = Model::new(
            vec![bad],
            Vec::new(),
            registry(),
            Vec2::new(10.0, 10.0),
            0.1,
            1.0e-4,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::ShapeCount(0, 4)));
    }

    #[test]
    fn non_positive_mass_rejected() {
        let mut bad = agent(0);
        bad.mass = 0.0;
        let err = Model::new(
            vec![bad],
            Vec::new(),
            registry(),
            Vec2::new(10.0, 10.0),
            0.1,
            1.0e-4,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::NonPositiveMass(0, _)));
    }

    #[test]
    fn sub_step_may_not_exceed_coarse_step() {
        let err = Model::new(
            vec![agent(0)],
            Vec::new(),
            registry(),
            Vec2::new(10.0, 10.0),
            1.0e-4,
            0.1,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::TimeStepOrder(_, _)));
    }

    #[test]
    fn one_corner_wall_rejected() {
        let err = Model::new(
            vec![agent(0)],
            vec![Wall {
                id: 0,
                material: "concrete".into(),
                corners: vec![Vec2::zeros()],
            }],
            registry(),
            Vec2::new(10.0, 10.0),
            0.1,
            1.0e-4,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::TooFewCorners(0, 1)));
    }
}
