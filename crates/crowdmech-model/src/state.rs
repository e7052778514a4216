//! Mutable simulation state.

use crowdmech_math::Vec2;

/// Kinematic state of one agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentState {
    pub position: Vec2,
    /// Orientation (rad, counterclockwise).
    pub theta: f64,
    pub velocity: Vec2,
    /// Angular velocity (rad/s).
    pub omega: f64,
}

/// Driving force and torque supplied by the decisional layer for one
/// coarse step.
#[derive(Debug, Clone, Copy)]
pub struct Drive {
    /// `F_p` (N).
    pub force: Vec2,
    /// `M_p` (N m).
    pub torque: f64,
}

impl Default for Drive {
    fn default() -> Self {
        Drive {
            force: Vec2::zeros(),
            torque: 0.0,
        }
    }
}

/// Mutable state of the whole crowd, index-aligned with
/// `Model::agents`.
#[derive(Debug, Clone)]
pub struct State {
    pub agents: Vec<AgentState>,
    pub drive: Vec<Drive>,
    /// Contact force accumulated on each agent during the current
    /// sub-step (N).
    pub contact_force: Vec<Vec2>,
    /// Contact torque accumulated on each agent during the current
    /// sub-step (N m).
    pub contact_torque: Vec<f64>,
}

impl State {
    pub fn new(agents: Vec<AgentState>, drive: Vec<Drive>) -> Self {
        let n = agents.len();
        debug_assert_eq!(n, drive.len());
        State {
            agents,
            drive,
            contact_force: vec![Vec2::zeros(); n],
            contact_torque: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Zero the per-sub-step contact accumulators in place.
    pub fn clear_accumulators(&mut self) {
        for f in &mut self.contact_force {
            *f = Vec2::zeros();
        }
        for t in &mut self.contact_torque {
            *t = 0.0;
        }
    }

    /// True when every kinematic quantity of agent `i` is finite.
    pub fn agent_is_finite(&self, i: usize) -> bool {
        let a = &self.agents[i];
        a.position.x.is_finite()
            && a.position.y.is_finite()
            && a.theta.is_finite()
            && a.velocity.x.is_finite()
            && a.velocity.y.is_finite()
            && a.omega.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> State {
        State::new(
            vec![AgentState {
                position: Vec2::new(1.0, 2.0),
                theta: 0.0,
                velocity: Vec2::zeros(),
                omega: 0.0,
            }],
            vec![Drive::default()],
        )
    }

    #[test]
    fn accumulators_clear_in_place() {
        let mut st = state();
        st.contact_force[0] = Vec2::new(3.0, 4.0);
        st.contact_torque[0] = 1.0;
        st.clear_accumulators();
        assert_eq!(st.contact_force[0], Vec2::zeros());
        assert_eq!(st.contact_torque[0], 0.0);
    }

    #[test]
    fn finite_check_catches_nan() {
        let mut st = state();
        assert!(st.agent_is_finite(0));
        st.agents[0].velocity.x = f64::NAN;
        assert!(!st.agent_is_finite(0));
    }
}
