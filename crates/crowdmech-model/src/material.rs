//! Material intrinsics and pairwise contact parameters.
//!
//! The registry is built once at load and frozen. Lookups never fail:
//! a missing material falls back to the default for its class, a
//! missing contact pair falls back to a fixed default triple. Those
//! defaults are part of the external contract.

use std::collections::BTreeMap;

use crate::ModelError;

/// Default material id for agent shapes.
pub const HUMAN_MATERIAL: &str = "human";
/// Default material id for walls.
pub const WALL_MATERIAL: &str = "concrete";

/// Intrinsic elastic scalars of one material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Young's modulus `E` (Pa).
    pub young_modulus: f64,
    /// Shear modulus `G` (Pa).
    pub shear_modulus: f64,
}

/// Fallback intrinsics when an id is absent from the registry.
pub const DEFAULT_MATERIAL: Material = Material {
    young_modulus: 1.0e6,
    shear_modulus: 1.0e6,
};

/// Parameters of one unordered material pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactParams {
    /// Normal damping coefficient (N s/m).
    pub gamma_normal: f64,
    /// Tangential damping coefficient (N s/m).
    pub gamma_tangential: f64,
    /// Kinetic friction coefficient.
    pub kinetic_friction: f64,
}

/// Fallback triple when a pair is absent from the registry.
pub const DEFAULT_CONTACT: ContactParams = ContactParams {
    gamma_normal: 0.0,
    gamma_tangential: 0.0,
    kinetic_friction: 0.5,
};

/// Immutable registry of materials and pairwise contact parameters.
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    materials: BTreeMap<String, Material>,
    pairs: BTreeMap<(String, String), ContactParams>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a material. Duplicate ids are a configuration error.
    pub fn insert_material(&mut self, id: &str, material: Material) -> Result<(), ModelError> {
        if self
            .materials
            .insert(id.to_string(), material)
            .is_some()
        {
            return Err(ModelError::DuplicateMaterial(id.to_string()));
        }
        Ok(())
    }

    /// Declare a contact pair; arguments commute. Both ids must already
    /// be declared.
    pub fn insert_contact(
        &mut self,
        id1: &str,
        id2: &str,
        params: ContactParams,
    ) -> Result<(), ModelError> {
        for id in [id1, id2] {
            if !self.materials.contains_key(id) {
                return Err(ModelError::UnknownPairMaterial(id.to_string()));
            }
        }
        let key = pair_key(id1, id2);
        if self.pairs.insert(key, params).is_some() {
            return Err(ModelError::DuplicateContactPair(
                id1.to_string(),
                id2.to_string(),
            ));
        }
        Ok(())
    }

    /// Every unordered pair of declared materials (self pairs included)
    /// must carry contact parameters.
    pub fn validate_pairs(&self) -> Result<(), ModelError> {
        let ids: Vec<&String> = self.materials.keys().collect();
        for (n, a) in ids.iter().enumerate() {
            for b in &ids[n..] {
                if !self.pairs.contains_key(&pair_key(a, b)) {
                    return Err(ModelError::MissingContactPair(
                        a.to_string(),
                        b.to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    fn intrinsic_or(&self, id: &str, class_default: &str) -> Material {
        if let Some(m) = self.materials.get(id) {
            return *m;
        }
        if let Some(m) = self.materials.get(class_default) {
            log::warn!("material {id:?} not declared, using {class_default:?}");
            return *m;
        }
        log::warn!("material {id:?} not declared, using built-in default");
        DEFAULT_MATERIAL
    }

    /// Intrinsics for an agent shape material.
    pub fn shape_material(&self, id: &str) -> Material {
        self.intrinsic_or(id, HUMAN_MATERIAL)
    }

    /// Intrinsics for a wall material.
    pub fn wall_material(&self, id: &str) -> Material {
        self.intrinsic_or(id, WALL_MATERIAL)
    }

    /// Contact parameters for an unordered material pair.
    pub fn contact(&self, a: &str, b: &str) -> ContactParams {
        self.pairs
            .get(&pair_key(a, b))
            .copied()
            .unwrap_or(DEFAULT_CONTACT)
    }

}
