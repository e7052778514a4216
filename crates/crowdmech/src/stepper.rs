//! Two-scale explicit integrator.
//!
//! One call to [`Stepper::step`] advances the crowd by the coarse step
//! `dt`, internally running `N = round(dt / dt_m)` mechanical sub-steps.
//! Within a sub-step, contact forces are computed from the positions at
//! the start of the sub-step, then the state advances by symplectic
//! Euler: velocities first, positions with the updated velocities.
//!
//! Agents are iterated in index (= ascending id) order and contacts in
//! ascending key order, so floating-point summation order is fixed and
//! two runs on the same inputs are bit-identical.

use crowdmech_collision::{disk_disk, disk_segment, Disk, Segment, ShapeRef, SpatialGrid};
use crowdmech_contact::{contact_force, effective_length, series_stiffness};
use crowdmech_contact::{ContactBook, ContactInput, ContactKey};
use crowdmech_math::{cross, point_velocity, Vec2};
use crowdmech_model::{ContactParams, Material, Model, State, SHAPES_PER_AGENT};

use crate::EngineError;

/// One overlap found by the narrow phase, ready for the force model.
struct Pending {
    key: ContactKey,
    /// Agent receiving the force as the first participant.
    first: usize,
    /// Second agent, absent for wall contacts.
    second: Option<usize>,
    point: Vec2,
    input: ContactInput,
}

/// Integrator state reused across sub-steps and calls.
pub struct Stepper {
    dt_m: f64,
    substeps: usize,
    grid: SpatialGrid,
    /// Resolved elastic intrinsics per shape, `agent * 5 + shape`.
    shape_elastic: Vec<Material>,
    /// Resolved elastic intrinsics per wall.
    wall_elastic: Vec<Material>,
    /// Interned material index per shape and per wall, and the dense
    /// pair-parameter table, so the sub-step loop never touches the
    /// string-keyed registry.
    shape_mat: Vec<usize>,
    wall_mat: Vec<usize>,
    n_mats: usize,
    pair_params: Vec<ContactParams>,
    centers: Vec<Vec2>,
    pairs: Vec<(ShapeRef, ShapeRef)>,
    contacts: Vec<Pending>,
}

impl Stepper {
    /// Prepare the integrator for a model: size the broad-phase grid,
    /// rasterize wall segments (once per run), resolve materials, and
    /// fix the sub-step count.
    pub fn new(model: &Model) -> Self {
        let ratio = model.dt / model.dt_m;
        let substeps = (ratio.round() as usize).max(1);
        if (ratio - ratio.round()).abs() > 1.0e-9 {
            log::warn!(
                "coarse step {} is not an integer multiple of the mechanical step {}; \
                 advancing {} sub-steps ({} s) instead",
                model.dt,
                model.dt_m,
                substeps,
                substeps as f64 * model.dt_m
            );
        }

        let mut grid = SpatialGrid::new(model.bounds.x, model.bounds.y, model.max_radius());
        for (w, wall) in model.walls.iter().enumerate() {
            for k in 0..wall.segment_count() {
                let (a, b) = wall.segment(k);
                grid.register_segment((w, k), &a, &b);
            }
        }

        let shape_elastic = model
            .agents
            .iter()
            .flat_map(|agent| {
                agent
                    .shapes
                    .iter()
                    .map(|s| model.materials.shape_material(&s.material))
            })
            .collect();
        let wall_elastic = model
            .walls
            .iter()
            .map(|w| model.materials.wall_material(&w.material))
            .collect();

        // Intern the material ids in use and tabulate every pair's
        // contact parameters up front.
        let unique: Vec<&str> = {
            let mut set = std::collections::BTreeSet::new();
            for agent in &model.agents {
                for shape in &agent.shapes {
                    set.insert(shape.material.as_str());
                }
            }
            for wall in &model.walls {
                set.insert(wall.material.as_str());
            }
            set.into_iter().collect()
        };
        let mat_index = |id: &str| unique.binary_search(&id).expect("interned material");
        let shape_mat = model
            .agents
            .iter()
            .flat_map(|a| a.shapes.iter().map(|s| mat_index(&s.material)))
            .collect();
        let wall_mat = model
            .walls
            .iter()
            .map(|w| mat_index(&w.material))
            .collect();
        let n_mats = unique.len();
        let mut pair_params = Vec::with_capacity(n_mats * n_mats);
        for a in &unique {
            for b in &unique {
                pair_params.push(model.materials.contact(a, b));
            }
        }

        model.check_stability();

        Stepper {
            dt_m: model.dt_m,
            substeps,
            grid,
            shape_elastic,
            wall_elastic,
            shape_mat,
            wall_mat,
            n_mats,
            pair_params,
            centers: vec![Vec2::zeros(); model.agents.len() * SHAPES_PER_AGENT],
            pairs: Vec::new(),
            contacts: Vec::new(),
        }
    }

    fn params(&self, mat_a: usize, mat_b: usize) -> ContactParams {
        self.pair_params[mat_a * self.n_mats + mat_b]
    }

    /// Number of mechanical sub-steps per call.
    pub fn substeps(&self) -> usize {
        self.substeps
    }

    /// Advance the crowd by one coarse step.
    pub fn step(
        &mut self,
        model: &Model,
        state: &mut State,
        book: &mut ContactBook,
    ) -> Result<(), EngineError> {
        for substep in 0..self.substeps {
            state.clear_accumulators();
            self.detect(model, state);
            self.apply_forces(state, book);
            self.integrate(model, state, substep)?;
        }
        book.sweep();
        Ok(())
    }

    /// Broad plus narrow phase from the positions at the start of the
    /// sub-step. Fills `self.contacts` in ascending key order.
    fn detect(&mut self, model: &Model, state: &State) {
        self.grid.clear_shapes();
        for (i, agent) in model.agents.iter().enumerate() {
            for s in 0..SHAPES_PER_AGENT {
                let c = agent.shape_center(&state.agents[i], s);
                self.centers[i * SHAPES_PER_AGENT + s] = c;
                self.grid.insert_shape((i, s), &c);
            }
        }

        self.pairs.clear();
        self.grid.candidate_pairs(&mut self.pairs);

        self.contacts.clear();
        for &((i, sa), (j, sb)) in &self.pairs {
            let shape_a = &model.agents[i].shapes[sa];
            let shape_b = &model.agents[j].shapes[sb];
            let disk_a = Disk {
                center: self.centers[i * SHAPES_PER_AGENT + sa],
                radius: shape_a.radius,
            };
            let disk_b = Disk {
                center: self.centers[j * SHAPES_PER_AGENT + sb],
                radius: shape_b.radius,
            };
            let Some(overlap) = disk_disk(&disk_a, &disk_b) else {
                continue;
            };

            let sta = &state.agents[i];
            let stb = &state.agents[j];
            let u_rel = point_velocity(&sta.position, &sta.velocity, sta.omega, &overlap.point)
                - point_velocity(&stb.position, &stb.velocity, stb.omega, &overlap.point);

            let ma = self.shape_elastic[i * SHAPES_PER_AGENT + sa];
            let mb = self.shape_elastic[j * SHAPES_PER_AGENT + sb];
            let l_eff = effective_length(shape_a.radius, shape_b.radius);
            let params = self.params(
                self.shape_mat[i * SHAPES_PER_AGENT + sa],
                self.shape_mat[j * SHAPES_PER_AGENT + sb],
            );

            self.contacts.push(Pending {
                key: ContactKey::agent_agent(i, sa, j, sb),
                first: i,
                second: Some(j),
                point: overlap.point,
                input: ContactInput {
                    depth: overlap.depth,
                    normal: overlap.normal,
                    u_rel,
                    stiffness_normal: series_stiffness(
                        ma.young_modulus,
                        mb.young_modulus,
                        l_eff,
                    ),
                    stiffness_tangent: series_stiffness(
                        ma.shear_modulus,
                        mb.shear_modulus,
                        l_eff,
                    ),
                    params,
                },
            });
        }

        for (i, agent) in model.agents.iter().enumerate() {
            for s in 0..SHAPES_PER_AGENT {
                let center = self.centers[i * SHAPES_PER_AGENT + s];
                let shape = &agent.shapes[s];
                let disk = Disk {
                    center,
                    radius: shape.radius,
                };
                for &(w, k) in self.grid.segments_near(&center) {
                    let (a, b) = model.walls[w].segment(k);
                    let Some(overlap) = disk_segment(&disk, &Segment { a, b }) else {
                        continue;
                    };

                    let st = &state.agents[i];
                    let u_rel =
                        point_velocity(&st.position, &st.velocity, st.omega, &overlap.point);
                    let ms = self.shape_elastic[i * SHAPES_PER_AGENT + s];
                    let mw = self.wall_elastic[w];
                    let params =
                        self.params(self.shape_mat[i * SHAPES_PER_AGENT + s], self.wall_mat[w]);

                    // The narrow-phase normal points from the wall
                    // toward the disk; with the agent as first
                    // participant it is flipped.
                    self.contacts.push(Pending {
                        key: ContactKey::agent_wall(i, s, w, k),
                        first: i,
                        second: None,
                        point: overlap.point,
                        input: ContactInput {
                            depth: overlap.depth,
                            normal: -overlap.normal,
                            u_rel,
                            stiffness_normal: series_stiffness(
                                ms.young_modulus,
                                mw.young_modulus,
                                shape.radius,
                            ),
                            stiffness_tangent: series_stiffness(
                                ms.shear_modulus,
                                mw.shear_modulus,
                                shape.radius,
                            ),
                            params,
                        },
                    });
                }
            }
        }

        self.contacts.sort_by(|a, b| a.key.cmp(&b.key));
    }

    /// Run the force model over the detected contacts in key order,
    /// accumulating force and torque on each participant and updating
    /// the contact book.
    fn apply_forces(&self, state: &mut State, book: &mut ContactBook) {
        for pending in &self.contacts {
            let record = book.get_or_create(pending.key);
            let forces = contact_force(&pending.input, record, self.dt_m);
            let total = forces.total();

            let arm = pending.point - state.agents[pending.first].position;
            state.contact_force[pending.first] += total;
            state.contact_torque[pending.first] += cross(&arm, &total);

            if let Some(second) = pending.second {
                let arm = pending.point - state.agents[second].position;
                state.contact_force[second] -= total;
                state.contact_torque[second] += cross(&arm, &(-total));
            }
        }
    }

    /// Symplectic Euler update of every agent, with the driving force,
    /// viscous floor damping, and the accumulated contact forces.
    fn integrate(
        &self,
        model: &Model,
        state: &mut State,
        substep: usize,
    ) -> Result<(), EngineError> {
        for i in 0..model.agents.len() {
            let def = &model.agents[i];
            let drive = state.drive[i];
            let accel = drive.force / def.mass - state.agents[i].velocity / def.tau_translation
                + state.contact_force[i] / def.mass;
            let ang_accel = drive.torque / def.inertia - state.agents[i].omega / def.tau_rotation
                + state.contact_torque[i] / def.inertia;

            let st = &mut state.agents[i];
            st.velocity += accel * self.dt_m;
            st.omega += ang_accel * self.dt_m;
            let velocity = st.velocity;
            let omega = st.omega;
            st.position += velocity * self.dt_m;
            st.theta += omega * self.dt_m;

            if !state.agent_is_finite(i) {
                return Err(EngineError::NonFinite {
                    agent: def.id,
                    substep,
                });
            }
        }
        Ok(())
    }
}
