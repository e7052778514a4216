//! Damped-spring contact force with Coulomb-capped tangential friction.

use crowdmech_math::{normalize_or, Vec2};
use crowdmech_model::ContactParams;

use crate::ContactRecord;

/// Geometry, kinematics and material response of one active contact,
/// resolved by the caller.
///
/// `normal` is the unit contact normal pointing from the first
/// participant toward the second. `u_rel` is the velocity of the first
/// participant's contact point relative to the second's; against a wall
/// the wall side is at rest and `u_rel` is simply the disk point
/// velocity.
#[derive(Debug, Clone, Copy)]
pub struct ContactInput {
    pub depth: f64,
    pub normal: Vec2,
    pub u_rel: Vec2,
    /// `k_n` (N/m).
    pub stiffness_normal: f64,
    /// `k_t` (N/m).
    pub stiffness_tangent: f64,
    pub params: ContactParams,
}

/// Forces on the first participant; the second receives the negation.
#[derive(Debug, Clone, Copy)]
pub struct ContactForces {
    pub normal: Vec2,
    pub tangential: Vec2,
}

impl ContactForces {
    pub fn total(&self) -> Vec2 {
        self.normal + self.tangential
    }
}

/// Series stiffness of two moduli over an effective contact length:
/// `(ma * mb) / (ma + mb) * l_eff`.
pub fn series_stiffness(ma: f64, mb: f64, l_eff: f64) -> f64 {
    let sum = ma + mb;
    if sum <= 0.0 {
        return 0.0;
    }
    ma * mb / sum * l_eff
}

/// Effective contact length of two disks: the harmonic mean of their
/// radii. Against a wall the disk radius is used directly.
pub fn effective_length(ra: f64, rb: f64) -> f64 {
    let sum = ra + rb;
    if sum <= 0.0 {
        return 0.0;
    }
    2.0 * ra * rb / sum
}

/// Advance one contact by `dt_m` and return the forces on the first
/// participant.
///
/// Normal: a damped spring along the contact normal, clamped so the
/// contact never pulls. Tangential: the record's relative displacement
/// `xi` integrates the tangential relative velocity and loads a spring;
/// the trial force is capped at `mu * |F_n|`, and on slip `xi` is
/// rescaled to `-F_t / k_t` so the spring stays consistent with the
/// sliding force. The record keeps the forces for the interactions
/// output.
pub fn contact_force(
    input: &ContactInput,
    record: &mut ContactRecord,
    dt_m: f64,
) -> ContactForces {
    let n = input.normal;
    let u_n = input.u_rel.dot(&n);

    // Spring repulsion plus damping; positive along `n` would be a
    // pull, so clamp to zero.
    let fn_scalar = (-input.stiffness_normal * input.depth - input.params.gamma_normal * u_n)
        .min(0.0);
    let normal = n * fn_scalar;
    let fn_mag = -fn_scalar;

    let u_t = input.u_rel - n * u_n;
    let mut xi = record.xi + u_t * dt_m;
    // The contact plane may have rotated since the last sub-step; keep
    // xi tangential.
    xi -= n * xi.dot(&n);

    let trial = -xi * input.stiffness_tangent - u_t * input.params.gamma_tangential;
    let cap = input.params.kinetic_friction * fn_mag;
    let tangential = if trial.norm() > cap {
        let ft = normalize_or(&trial, Vec2::zeros()) * cap;
        if input.stiffness_tangent > 0.0 {
            xi = -ft / input.stiffness_tangent;
        }
        ft
    } else {
        trial
    };

    record.xi = xi;
    record.normal_force = normal;
    record.tangential_force = tangential;
    ContactForces { normal, tangential }
}
