//! Driver for one engine call: load the XML inputs, advance one coarse
//! step, write the outputs.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crowdmech_contact::ContactBook;
use crowdmech_model::{Model, State};
use crowdmech_xml::{
    parse_agents, parse_dynamics, parse_geometry, parse_interactions, parse_materials,
    parse_parameters, write_dynamics, write_interactions, ConfigError,
};

use crate::{EngineError, Stepper};

/// Output (and default input) file name for the persistent contact
/// records, kept in the dynamic directory.
pub const INTERACTIONS_FILE: &str = "AgentInteractions.xml";

/// Run one coarse step of the engine.
///
/// `files` lists, in order: parameters, materials, geometry, agents,
/// agent dynamics, and optionally agent interactions. The parameters
/// path is used as given; materials, geometry and agents resolve
/// relative to the static directory, dynamics and interactions relative
/// to the dynamic directory it declares.
///
/// The dynamics file is rewritten in place (minus the driving terms)
/// and the interactions file is rewritten in the dynamic directory, so
/// a decisional layer can alternate with the engine on the same
/// directory.
pub fn run(files: &[PathBuf]) -> Result<(), EngineError> {
    if !(5..=6).contains(&files.len()) {
        return Err(EngineError::FileCount(files.len()));
    }

    let params = parse_parameters(&files[0])?;
    let registry = parse_materials(&params.static_dir.join(&files[1]))?;
    let geometry = parse_geometry(&params.static_dir.join(&files[2]))?;
    let agents = parse_agents(&params.static_dir.join(&files[3]))?;

    let model = Model::new(
        agents,
        geometry.walls,
        registry,
        geometry.bounds,
        params.dt,
        params.dt_m,
    )
    .map_err(ConfigError::from)?;

    let dynamics_path = params.dynamic_dir.join(&files[4]);
    let mut state = load_state(&model, &dynamics_path)?;

    let interactions_path = params.dynamic_dir.join(INTERACTIONS_FILE);
    let mut book = match files.get(5) {
        Some(name) => parse_interactions(&params.dynamic_dir.join(name), &model)?,
        // Without an explicit sixth file, pick up the records left by
        // the previous call when they exist.
        None if interactions_path.exists() => parse_interactions(&interactions_path, &model)?,
        None => ContactBook::new(),
    };

    let mut stepper = Stepper::new(&model);
    log::info!(
        "advancing {} agents and {} walls by {} sub-steps of {} s",
        model.agents.len(),
        model.walls.len(),
        stepper.substeps(),
        model.dt_m
    );
    stepper.step(&model, &mut state, &mut book)?;

    write_dynamics(&dynamics_path, &model, &state)?;
    write_interactions(&interactions_path, &model, &book)?;
    Ok(())
}

/// C-style entry point: zero on success, non-zero on any validation,
/// I/O, or numeric failure.
pub fn crowd_mechanics<P: AsRef<Path>>(files: &[P]) -> i32 {
    let files: Vec<PathBuf> = files.iter().map(|f| f.as_ref().to_path_buf()).collect();
    match run(&files) {
        Ok(()) => 0,
        Err(err) => {
            log::error!("{err}");
            1
        }
    }
}

/// Match the dynamics entries to the model agents by id.
fn load_state(model: &Model, path: &Path) -> Result<State, EngineError> {
    let mut by_id = BTreeMap::new();
    for entry in parse_dynamics(path)? {
        if by_id.insert(entry.id, entry).is_some() {
            return Err(
                ConfigError::Invalid(format!("dynamics: duplicate agent id {}", entry.id)).into(),
            );
        }
    }

    let mut agents = Vec::with_capacity(model.agents.len());
    let mut drive = Vec::with_capacity(model.agents.len());
    for def in &model.agents {
        let entry = by_id.remove(&def.id).ok_or_else(|| {
            ConfigError::Invalid(format!("dynamics: no kinematics for agent {}", def.id))
        })?;
        agents.push(entry.state);
        drive.push(entry.drive);
    }
    if let Some((id, _)) = by_id.pop_first() {
        return Err(ConfigError::Invalid(format!("dynamics: unknown agent id {id}")).into());
    }
    Ok(State::new(agents, drive))
}
