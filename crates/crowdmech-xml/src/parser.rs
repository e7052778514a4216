//! Parsers for the attribute-based XML input files.
//!
//! Every parser validates exhaustively: a missing mandatory attribute,
//! a malformed number, or a reference to an unknown id is reported
//! before any integration starts. Unknown attributes and elements are
//! skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crowdmech_contact::{ContactBook, ContactKey, ContactRecord};
use crowdmech_math::Vec2;
use crowdmech_model::{
    AgentDef, AgentState, ContactParams, Drive, Material, MaterialRegistry, Model, Shape, Wall,
    HUMAN_MATERIAL, SHAPES_PER_AGENT, WALL_MATERIAL,
};

use crate::{ConfigError, Result};

/// Default relaxation time (s) when `FloorDamping` or `AngularDamping`
/// is omitted.
const DEFAULT_RELAXATION_TIME: f64 = 0.5;

/// Contents of the parameters file; directories are resolved relative
/// to the file's own location.
#[derive(Debug, Clone)]
pub struct Parameters {
    pub static_dir: PathBuf,
    pub dynamic_dir: PathBuf,
    pub dt: f64,
    pub dt_m: f64,
}

/// Contents of the geometry file.
#[derive(Debug)]
pub struct GeometryFile {
    /// Bounding box `[0, x] x [0, y]`.
    pub bounds: Vec2,
    pub walls: Vec<Wall>,
}

/// One agent's entry in the dynamics file.
#[derive(Debug, Clone, Copy)]
pub struct DynamicsEntry {
    pub id: u32,
    pub state: AgentState,
    pub drive: Drive,
}

/// Attributes of one element, collected for mandatory/optional lookup.
struct Attrs {
    element: String,
    map: HashMap<String, String>,
}

impl Attrs {
    fn collect(e: &BytesStart) -> Result<Attrs> {
        let element = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let mut map = HashMap::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| ConfigError::Invalid(err.to_string()))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = String::from_utf8_lossy(&attr.value).to_string();
            map.insert(key, value);
        }
        Ok(Attrs { element, map })
    }

    fn optional(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    fn required(&self, name: &str) -> Result<&str> {
        self.optional(name).ok_or_else(|| {
            ConfigError::MissingAttribute(self.element.clone(), name.to_string())
        })
    }

    fn malformed(&self, name: &str, value: &str) -> ConfigError {
        ConfigError::MalformedValue(self.element.clone(), name.to_string(), value.to_string())
    }

    fn f64(&self, name: &str) -> Result<f64> {
        let raw = self.required(name)?;
        raw.trim()
            .parse()
            .map_err(|_| self.malformed(name, raw))
    }

    fn f64_opt(&self, name: &str, default: f64) -> Result<f64> {
        match self.optional(name) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| self.malformed(name, raw)),
        }
    }

    fn u32(&self, name: &str) -> Result<u32> {
        let raw = self.required(name)?;
        raw.trim()
            .parse()
            .map_err(|_| self.malformed(name, raw))
    }

    fn usize(&self, name: &str) -> Result<usize> {
        let raw = self.required(name)?;
        raw.trim()
            .parse()
            .map_err(|_| self.malformed(name, raw))
    }

    /// Decimal `"x,y"` pair.
    fn vec2(&self, name: &str) -> Result<Vec2> {
        let raw = self.required(name)?;
        let mut parts = raw.split(',');
        let x = parts
            .next()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| self.malformed(name, raw))?;
        let y = parts
            .next()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| self.malformed(name, raw))?;
        if parts.next().is_some() {
            return Err(self.malformed(name, raw));
        }
        Ok(Vec2::new(x, y))
    }
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

/// Parse the parameters file. `Static` and `Dynamic` are resolved
/// relative to the parameters file's parent directory.
pub fn parse_parameters(path: &Path) -> Result<Parameters> {
    let xml = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parameters_from_str(&xml, base)
}

pub fn parameters_from_str(xml: &str, base: &Path) -> Result<Parameters> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut dirs: Option<(PathBuf, PathBuf)> = None;
    let mut times: Option<(f64, f64)> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match tag_name(&e).as_str() {
                "Directories" => {
                    let attrs = Attrs::collect(&e)?;
                    dirs = Some((
                        base.join(attrs.required("Static")?),
                        base.join(attrs.required("Dynamic")?),
                    ));
                }
                "Times" => {
                    let attrs = Attrs::collect(&e)?;
                    times = Some((attrs.f64("TimeStep")?, attrs.f64("TimeStepMechanical")?));
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let (static_dir, dynamic_dir) =
        dirs.ok_or_else(|| ConfigError::Invalid("parameters: no <Directories> element".into()))?;
    let (dt, dt_m) =
        times.ok_or_else(|| ConfigError::Invalid("parameters: no <Times> element".into()))?;
    Ok(Parameters {
        static_dir,
        dynamic_dir,
        dt,
        dt_m,
    })
}

/// Parse the materials file into a frozen registry.
pub fn parse_materials(path: &Path) -> Result<MaterialRegistry> {
    let xml = fs::read_to_string(path)?;
    materials_from_str(&xml)
}

pub fn materials_from_str(xml: &str) -> Result<MaterialRegistry> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut registry = MaterialRegistry::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match tag_name(&e).as_str() {
                "Material" => {
                    let attrs = Attrs::collect(&e)?;
                    registry.insert_material(
                        attrs.required("Id")?,
                        Material {
                            young_modulus: attrs.f64("YoungModulus")?,
                            shear_modulus: attrs.f64("ShearModulus")?,
                        },
                    )?;
                }
                "Contact" => {
                    let attrs = Attrs::collect(&e)?;
                    registry.insert_contact(
                        attrs.required("Id1")?,
                        attrs.required("Id2")?,
                        ContactParams {
                            gamma_normal: attrs.f64("GammaNormal")?,
                            gamma_tangential: attrs.f64("GammaTangential")?,
                            kinetic_friction: attrs.f64("KineticFriction")?,
                        },
                    )?;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    registry.validate_pairs()?;
    Ok(registry)
}

/// Parse the geometry file: bounding box and walls.
pub fn parse_geometry(path: &Path) -> Result<GeometryFile> {
    let xml = fs::read_to_string(path)?;
    geometry_from_str(&xml)
}

pub fn geometry_from_str(xml: &str) -> Result<GeometryFile> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut bounds: Option<Vec2> = None;
    let mut walls: Vec<Wall> = Vec::new();
    let mut open_wall: Option<Wall> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => {
                match tag_name(&e).as_str() {
                    "Dimensions" => {
                        let attrs = Attrs::collect(&e)?;
                        bounds = Some(Vec2::new(attrs.f64("Lx")?, attrs.f64("Ly")?));
                    }
                    "Wall" => {
                        let attrs = Attrs::collect(&e)?;
                        let wall = Wall {
                            id: attrs.u32("Id")?,
                            material: attrs
                                .optional("MaterialId")
                                .unwrap_or(WALL_MATERIAL)
                                .to_string(),
                            corners: Vec::new(),
                        };
                        if open_wall.replace(wall).is_some() {
                            return Err(ConfigError::Invalid(
                                "geometry: nested <Wall> elements".into(),
                            ));
                        }
                    }
                    "Corner" => {
                        let attrs = Attrs::collect(&e)?;
                        let corner = attrs.vec2("Coordinates")?;
                        match open_wall.as_mut() {
                            Some(wall) => wall.corners.push(corner),
                            None => {
                                return Err(ConfigError::Invalid(
                                    "geometry: <Corner> outside <Wall>".into(),
                                ))
                            }
                        }
                    }
                    _ => {}
                }
            }
            Event::End(e) => {
                if String::from_utf8_lossy(e.name().as_ref()) == "Wall" {
                    if let Some(wall) = open_wall.take() {
                        walls.push(wall);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let bounds = bounds
        .ok_or_else(|| ConfigError::Invalid("geometry: no <Dimensions> element".into()))?;
    Ok(GeometryFile { bounds, walls })
}

/// Parse the static agents file.
pub fn parse_agents(path: &Path) -> Result<Vec<AgentDef>> {
    let xml = fs::read_to_string(path)?;
    agents_from_str(&xml)
}

pub fn agents_from_str(xml: &str) -> Result<Vec<AgentDef>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut agents: Vec<AgentDef> = Vec::new();
    let mut open: Option<AgentDef> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match tag_name(&e).as_str() {
                "Agent" => {
                    let attrs = Attrs::collect(&e)?;
                    let agent = AgentDef {
                        id: attrs.u32("Id")?,
                        mass: attrs.f64("Mass")?,
                        inertia: attrs.f64("MomentOfInertia")?,
                        tau_translation: attrs.f64_opt("FloorDamping", DEFAULT_RELAXATION_TIME)?,
                        tau_rotation: attrs.f64_opt("AngularDamping", DEFAULT_RELAXATION_TIME)?,
                        shapes: Vec::with_capacity(SHAPES_PER_AGENT),
                    };
                    if open.replace(agent).is_some() {
                        return Err(ConfigError::Invalid(
                            "agents: nested <Agent> elements".into(),
                        ));
                    }
                }
                "Shape" => {
                    let attrs = Attrs::collect(&e)?;
                    let kind = attrs.required("Type")?;
                    if kind != "disk" {
                        return Err(ConfigError::Invalid(format!(
                            "agents: unsupported shape type {kind:?}"
                        )));
                    }
                    let shape = Shape {
                        offset: attrs.vec2("Position")?,
                        radius: attrs.f64("Radius")?,
                        material: attrs
                            .optional("MaterialId")
                            .unwrap_or(HUMAN_MATERIAL)
                            .to_string(),
                    };
                    match open.as_mut() {
                        Some(agent) => agent.shapes.push(shape),
                        None => {
                            return Err(ConfigError::Invalid(
                                "agents: <Shape> outside <Agent>".into(),
                            ))
                        }
                    }
                }
                _ => {}
            },
            Event::End(e) => {
                if String::from_utf8_lossy(e.name().as_ref()) == "Agent" {
                    if let Some(agent) = open.take() {
                        agents.push(agent);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(agents)
}

/// Parse the agent dynamics file. A missing `<Dynamics>` element means
/// zero driving, which lets the previous output be fed back directly.
pub fn parse_dynamics(path: &Path) -> Result<Vec<DynamicsEntry>> {
    let xml = fs::read_to_string(path)?;
    dynamics_from_str(&xml)
}

pub fn dynamics_from_str(xml: &str) -> Result<Vec<DynamicsEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut entries: Vec<DynamicsEntry> = Vec::new();
    let mut open: Option<(u32, Option<AgentState>, Drive)> = None;

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => match tag_name(&e).as_str() {
                "Agent" => {
                    let attrs = Attrs::collect(&e)?;
                    let id = attrs.u32("Id")?;
                    if open.replace((id, None, Drive::default())).is_some() {
                        return Err(ConfigError::Invalid(
                            "dynamics: nested <Agent> elements".into(),
                        ));
                    }
                }
                "Kinematics" => {
                    let attrs = Attrs::collect(&e)?;
                    let state = AgentState {
                        position: attrs.vec2("Position")?,
                        velocity: attrs.vec2("Velocity")?,
                        theta: attrs.f64("Theta")?,
                        omega: attrs.f64("Omega")?,
                    };
                    match open.as_mut() {
                        Some((_, kin, _)) => *kin = Some(state),
                        None => {
                            return Err(ConfigError::Invalid(
                                "dynamics: <Kinematics> outside <Agent>".into(),
                            ))
                        }
                    }
                }
                "Dynamics" => {
                    let attrs = Attrs::collect(&e)?;
                    let drive = Drive {
                        force: attrs.vec2("Fp")?,
                        torque: attrs.f64("Mp")?,
                    };
                    match open.as_mut() {
                        Some((_, _, d)) => *d = drive,
                        None => {
                            return Err(ConfigError::Invalid(
                                "dynamics: <Dynamics> outside <Agent>".into(),
                            ))
                        }
                    }
                }
                _ => {}
            },
            Event::End(e) => {
                if String::from_utf8_lossy(e.name().as_ref()) == "Agent" {
                    if let Some((id, kin, drive)) = open.take() {
                        let state = kin.ok_or_else(|| {
                            ConfigError::Invalid(format!(
                                "dynamics: agent {id} has no <Kinematics>"
                            ))
                        })?;
                        entries.push(DynamicsEntry { id, state, drive });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(entries)
}

/// Parse the interactions file from a previous coarse step into a
/// contact book. Participants are mapped from external ids to model
/// indices; an unknown id is a configuration error.
pub fn parse_interactions(path: &Path, model: &Model) -> Result<ContactBook> {
    let xml = fs::read_to_string(path)?;
    interactions_from_str(&xml, model)
}

pub fn interactions_from_str(xml: &str, model: &Model) -> Result<ContactBook> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut book = ContactBook::new();
    // Outer <Agent>: the parent; inner <Agent>: the child.
    let mut stack: Vec<usize> = Vec::new();

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match tag_name(&e).as_str() {
                "Agent" => {
                    let attrs = Attrs::collect(&e)?;
                    let id = attrs.u32("Id")?;
                    let index = model.agent_index(id).ok_or_else(|| {
                        ConfigError::Invalid(format!("interactions: unknown agent id {id}"))
                    })?;
                    if stack.len() >= 2 {
                        return Err(ConfigError::Invalid(
                            "interactions: <Agent> nested deeper than two levels".into(),
                        ));
                    }
                    stack.push(index);
                }
                "Interaction" => restore_interaction(&e, &stack, &mut book)?,
                "Wall" => restore_wall_interaction(&e, &stack, model, &mut book)?,
                _ => {}
            },
            Event::Empty(e) => match tag_name(&e).as_str() {
                "Interaction" => restore_interaction(&e, &stack, &mut book)?,
                "Wall" => restore_wall_interaction(&e, &stack, model, &mut book)?,
                // A childless <Agent/> carries no interactions.
                _ => {}
            },
            Event::End(e) => {
                if String::from_utf8_lossy(e.name().as_ref()) == "Agent" {
                    stack.pop();
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(book)
}

fn restore_interaction(e: &BytesStart, stack: &[usize], book: &mut ContactBook) -> Result<()> {
    let (parent, child) = match stack {
        [p, c] => (*p, *c),
        _ => {
            return Err(ConfigError::Invalid(
                "interactions: <Interaction> outside nested <Agent>".into(),
            ))
        }
    };
    let attrs = Attrs::collect(e)?;
    let sa = shape_index(&attrs, "ParentShape")?;
    let sb = shape_index(&attrs, "ChildShape")?;
    let key = ContactKey::agent_agent(parent, sa, child, sb);
    book.restore(key, restored_record(&attrs)?);
    Ok(())
}

fn restore_wall_interaction(
    e: &BytesStart,
    stack: &[usize],
    model: &Model,
    book: &mut ContactBook,
) -> Result<()> {
    let parent = *stack.first().ok_or_else(|| {
        ConfigError::Invalid("interactions: <Wall> outside <Agent>".into())
    })?;
    let attrs = Attrs::collect(e)?;
    let s = shape_index(&attrs, "ShapeId")?;
    let wall_id = attrs.u32("WallId")?;
    let wall = model.wall_index(wall_id).ok_or_else(|| {
        ConfigError::Invalid(format!("interactions: unknown wall id {wall_id}"))
    })?;
    let corner = attrs.usize("CornerId")?;
    if corner >= model.walls[wall].segment_count() {
        return Err(ConfigError::Invalid(format!(
            "interactions: wall {wall_id} has no segment {corner}"
        )));
    }
    let key = ContactKey::agent_wall(parent, s, wall, corner);
    book.restore(key, restored_record(&attrs)?);
    Ok(())
}

fn shape_index(attrs: &Attrs, name: &str) -> Result<usize> {
    let s = attrs.usize(name)?;
    if s >= SHAPES_PER_AGENT {
        return Err(ConfigError::Invalid(format!(
            "interactions: shape index {s} out of range"
        )));
    }
    Ok(s)
}

fn restored_record(attrs: &Attrs) -> Result<ContactRecord> {
    Ok(ContactRecord::restored(
        attrs.vec2("TangentialRelativeDisplacement")?,
        attrs.vec2("Fn")?,
        attrs.vec2("Ft")?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn parameters_parse_and_resolve_dirs() {
        let xml = r#"<Parameters>
            <Directories Static="static" Dynamic="dynamic"/>
            <Times TimeStep="0.1" TimeStepMechanical="1e-5"/>
        </Parameters>"#;
        let p = parameters_from_str(xml, Path::new("/run")).unwrap();
        assert_eq!(p.static_dir, Path::new("/run/static"));
        assert_eq!(p.dynamic_dir, Path::new("/run/dynamic"));
        assert_relative_eq!(p.dt, 0.1);
        assert_relative_eq!(p.dt_m, 1.0e-5);
    }

    #[test]
    fn parameters_missing_times_rejected() {
        let xml = r#"<Parameters><Directories Static="s" Dynamic="d"/></Parameters>"#;
        assert!(parameters_from_str(xml, Path::new(".")).is_err());
    }

    #[test]
    fn materials_parse_with_pairs() {
        let xml = r#"<Materials>
            <Intrinsic>
                <Material Id="human" YoungModulus="2.6e6" ShearModulus="1e6"/>
            </Intrinsic>
            <Binary>
                <Contact Id1="human" Id2="human" GammaNormal="1e4" GammaTangential="1e4" KineticFriction="0.5"/>
            </Binary>
        </Materials>"#;
        let reg = materials_from_str(xml).unwrap();
        assert_relative_eq!(reg.shape_material("human").young_modulus, 2.6e6);
        assert_relative_eq!(reg.contact("human", "human").kinetic_friction, 0.5);
    }

    #[test]
    fn materials_incomplete_pairs_rejected() {
        let xml = r#"<Materials>
            <Intrinsic>
                <Material Id="a" YoungModulus="1e6" ShearModulus="1e6"/>
                <Material Id="b" YoungModulus="1e6" ShearModulus="1e6"/>
            </Intrinsic>
            <Binary>
                <Contact Id1="a" Id2="a" GammaNormal="0" GammaTangential="0" KineticFriction="0.5"/>
            </Binary>
        </Materials>"#;
        assert!(materials_from_str(xml).is_err());
    }

    #[test]
    fn materials_malformed_number_rejected() {
        let xml = r#"<Materials>
            <Intrinsic>
                <Material Id="a" YoungModulus="soft" ShearModulus="1e6"/>
            </Intrinsic>
        </Materials>"#;
        let err = materials_from_str(xml).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedValue(_, _, _)));
    }

    #[test]
    fn geometry_parses_closed_wall() {
        let xml = r#"<Geometry>
            <Dimensions Lx="10" Ly="5"/>
            <Wall Id="0" MaterialId="concrete">
                <Corner Coordinates="0,0"/>
                <Corner Coordinates="10,0"/>
                <Corner Coordinates="10,5"/>
                <Corner Coordinates="0,0"/>
            </Wall>
        </Geometry>"#;
        let geo = geometry_from_str(xml).unwrap();
        assert_relative_eq!(geo.bounds.x, 10.0);
        assert_eq!(geo.walls.len(), 1);
        assert_eq!(geo.walls[0].segment_count(), 3);
    }

    #[test]
    fn geometry_wall_without_material_defaults() {
        let xml = r#"<Geometry>
            <Dimensions Lx="10" Ly="5"/>
            <Wall Id="1">
                <Corner Coordinates="0,0"/>
                <Corner Coordinates="1,0"/>
            </Wall>
        </Geometry>"#;
        let geo = geometry_from_str(xml).unwrap();
        assert_eq!(geo.walls[0].material, WALL_MATERIAL);
    }

    #[test]
    fn agents_parse_five_shapes() {
        let xml = r#"<Agents>
            <Agent Id="0" Mass="80" MomentOfInertia="1.5" FloorDamping="2">
                <Shape Type="disk" Radius="0.1" Position="0,-0.2"/>
                <Shape Type="disk" Radius="0.1" Position="0,-0.1"/>
                <Shape Type="disk" Radius="0.12" Position="0,0" MaterialId="human"/>
                <Shape Type="disk" Radius="0.1" Position="0,0.1"/>
                <Shape Type="disk" Radius="0.1" Position="0,0.2"/>
            </Agent>
        </Agents>"#;
        let agents = agents_from_str(xml).unwrap();
        assert_eq!(agents.len(), 1);
        let a = &agents[0];
        assert_eq!(a.shapes.len(), 5);
        assert_relative_eq!(a.tau_translation, 2.0);
        // AngularDamping omitted, falls back.
        assert_relative_eq!(a.tau_rotation, DEFAULT_RELAXATION_TIME);
        assert_eq!(a.shapes[0].material, HUMAN_MATERIAL);
        assert_relative_eq!(a.shapes[2].radius, 0.12);
    }

    #[test]
    fn agents_unsupported_shape_type_rejected() {
        let xml = r#"<Agents>
            <Agent Id="0" Mass="80" MomentOfInertia="1.5">
                <Shape Type="square" Radius="0.1" Position="0,0"/>
            </Agent>
        </Agents>"#;
        assert!(agents_from_str(xml).is_err());
    }

    #[test]
    fn dynamics_parse_with_and_without_drive() {
        let xml = r#"<Agents>
            <Agent Id="0">
                <Kinematics Position="5,2" Velocity="1,0" Theta="0" Omega="0"/>
                <Dynamics Fp="3,-1" Mp="0.2"/>
            </Agent>
            <Agent Id="1">
                <Kinematics Position="1,1" Velocity="0,0" Theta="0.5" Omega="0"/>
            </Agent>
        </Agents>"#;
        let entries = dynamics_from_str(xml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_relative_eq!(entries[0].drive.force.x, 3.0);
        assert_relative_eq!(entries[0].drive.torque, 0.2);
        assert_relative_eq!(entries[1].drive.force.norm(), 0.0);
        assert_relative_eq!(entries[1].state.theta, 0.5);
    }

    #[test]
    fn dynamics_missing_kinematics_rejected() {
        let xml = r#"<Agents>
            <Agent Id="0"><Dynamics Fp="0,0" Mp="0"/></Agent>
        </Agents>"#;
        assert!(dynamics_from_str(xml).is_err());
    }
}
